//! The `Section` value type and the component-kinds the catalog recognises.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scheduler::errors::SchedulerError;
use crate::scheduler::timetable::{BlockTime, Day, TimetableRange};

/// The kind of instructional component a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum ComponentKind {
    Lec,
    Lab,
    Sem,
    Lbl,
}

impl ComponentKind {
    pub fn parse(s: &str) -> Option<ComponentKind> {
        match s.to_ascii_uppercase().as_str() {
            "LEC" => Some(ComponentKind::Lec),
            "LAB" => Some(ComponentKind::Lab),
            "SEM" => Some(ComponentKind::Sem),
            "LBL" => Some(ComponentKind::Lbl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Lec => "LEC",
            ComponentKind::Lab => "LAB",
            ComponentKind::Sem => "SEM",
            ComponentKind::Lbl => "LBL",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a unique (course, component, section) within one (term, institution).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SectionId {
    pub course: String,
    pub component: ComponentKind,
    pub label: String,
}

/// Catalog attributes carried through the solver untouched: never read by
/// the timetable, conflict, or SAT layers. Present on the domain type per
/// §3; the `/api/schedule` response projection does not echo it (§6).
#[derive(Debug, Clone, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogMetadata {
    pub career: Option<String>,
    pub capacity: Option<i32>,
    pub campus: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub units: Option<String>,
}

/// A single meeting pattern plus catalog metadata, decorated with its derived
/// timetable occupancy. Immutable once built by the catalog adapter.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Section {
    pub id: SectionId,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub display: String,

    /// Section label this section mandates be co-scheduled, in a different component
    /// of the same course. Empty when there is no dependency.
    pub auto_enroll_label: Option<String>,
    /// Resolved by the catalog adapter's second pass once the target section's
    /// component kind is known; `None` until resolved or if the label never resolves.
    pub auto_enroll_component: Option<ComponentKind>,

    #[serde(flatten)]
    pub metadata: CatalogMetadata,

    #[serde(skip)]
    #[ts(skip)]
    pub range: TimetableRange,
}

impl Section {
    /// Builds a Section from raw catalog fields, parsing the time fields and deriving
    /// the timetable occupancy range eagerly so no caller ever has to compute it lazily.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        course: String,
        component: ComponentKind,
        label: String,
        days: String,
        start_time: String,
        end_time: String,
        location: Option<String>,
        instructor: Option<String>,
        display: String,
        auto_enroll_label: Option<String>,
        metadata: CatalogMetadata,
    ) -> Result<Section, SchedulerError> {
        let day_set = Day::parse_set(&days)?;
        let start = BlockTime::parse(&start_time)?;
        let end = BlockTime::parse(&end_time)?;
        let range = TimetableRange::from_days(&day_set, start, end)?;

        Ok(Section {
            id: SectionId {
                course,
                component,
                label,
            },
            days,
            start_time,
            end_time,
            location,
            instructor,
            display,
            auto_enroll_label,
            auto_enroll_component: None,
            metadata,
            range,
        })
    }
}

/// A nonempty list of sections sharing (course, component kind).
#[derive(Debug, Clone)]
pub struct Component {
    pub course: String,
    pub kind: ComponentKind,
    pub sections: Vec<Section>,
}
