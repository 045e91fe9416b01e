//! Database access.

pub mod catalog;
