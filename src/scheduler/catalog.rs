//! Groups raw catalog rows into components and resolves auto-enroll links.
//!
//! This module is storage-agnostic: the backing query lives in
//! `crate::data::catalog`, which fetches rows and hands them here.

use std::collections::HashMap;

use tracing::warn;

use crate::scheduler::section::{CatalogMetadata, Component, ComponentKind, Section};

/// One row as returned by the backing store, before parsing.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub course: String,
    pub component: String,
    pub label: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub display: String,
    pub auto_enroll_label: Option<String>,
    pub career: Option<String>,
    pub capacity: Option<i32>,
    pub campus: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub units: Option<String>,
}

/// Parses rows into components, skipping unrecognised component kinds and
/// malformed rows (each skip is logged, not propagated as a request failure),
/// then resolves every section's auto-enroll target to its component kind.
pub fn group_into_components(rows: Vec<CatalogRow>) -> Vec<Component> {
    let mut by_key: HashMap<(String, ComponentKind), Vec<Section>> = HashMap::new();

    for row in rows {
        let Some(kind) = ComponentKind::parse(&row.component) else {
            warn!(course = %row.course, component = %row.component, "skipping row with unrecognized component kind");
            continue;
        };

        match Section::build(
            row.course.clone(),
            kind,
            row.label,
            row.days,
            row.start_time,
            row.end_time,
            row.location,
            row.instructor,
            row.display,
            row.auto_enroll_label,
            CatalogMetadata {
                career: row.career,
                capacity: row.capacity,
                campus: row.campus,
                title: row.title,
                description: row.description,
                units: row.units,
            },
        ) {
            Ok(section) => {
                by_key.entry((row.course, kind)).or_default().push(section);
            }
            Err(e) => {
                warn!(course = %row.course, error = %e, "skipping malformed catalog row");
            }
        }
    }

    let mut components: Vec<Component> = by_key
        .into_iter()
        .map(|((course, kind), sections)| Component { course, kind, sections })
        .collect();

    resolve_auto_enroll_links(&mut components);

    components
}

/// Second pass: for each section with an auto-enroll label, find the peer
/// section (same course, matching label) among the other components of that
/// course and stamp its component kind. Unresolved labels are left as `None`
/// and surfaced by the caller as a warning.
fn resolve_auto_enroll_links(components: &mut [Component]) {
    let peer_kinds: HashMap<(String, String), ComponentKind> = components
        .iter()
        .flat_map(|c| c.sections.iter().map(move |s| ((c.course.clone(), s.id.label.clone()), c.kind)))
        .collect();

    for component in components.iter_mut() {
        for section in component.sections.iter_mut() {
            if let Some(label) = section.auto_enroll_label.clone() {
                section.auto_enroll_component = peer_kinds.get(&(section.id.course.clone(), label)).copied();
            }
        }
    }
}

/// Labels whose auto-enroll target never resolved to a known section.
pub fn unresolved_auto_enroll_warnings(components: &[Component]) -> Vec<String> {
    components
        .iter()
        .flat_map(|c| c.sections.iter())
        .filter(|s| s.auto_enroll_label.is_some() && s.auto_enroll_component.is_none())
        .map(|s| format!("{} {:?} {}: auto-enroll target '{}' did not resolve", s.id.course, s.id.component, s.id.label, s.auto_enroll_label.as_deref().unwrap_or("")))
        .collect()
}
