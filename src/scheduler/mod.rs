//! Conflict-free course schedule generation.
//!
//! [`timetable`] discretises clock times into a half-hour-block bitmap;
//! [`section`] and [`catalog`] model the sections a request draws from;
//! [`conflict`] derives the pairwise exclusion relation; [`sat`] encodes it
//! as CNF; [`solver`] enumerates models; [`orchestrator`] wires the pieces
//! together for one request.

pub mod catalog;
pub mod conflict;
pub mod errors;
pub mod orchestrator;
pub mod sat;
pub mod section;
pub mod solver;
pub mod timetable;

pub use errors::SchedulerError;
pub use orchestrator::{BusyTime, CourseRequest, ScheduleRequest, ScheduleResponse};
pub use section::{CatalogMetadata, Component, ComponentKind, Section, SectionId};
