//! Read-only Postgres adapter feeding the scheduling core's catalog layer.

use anyhow::Context;
use sqlx::PgPool;
use sqlx::FromRow;

use crate::scheduler::SchedulerError;
use crate::scheduler::catalog::{group_into_components, CatalogRow};
use crate::scheduler::section::Component;

const SECTION_SELECT: &str = "SELECT course, component, label, days, start_time, end_time, \
            location, instructor, display, auto_enroll_label, \
            career, capacity, campus, title, description, units \
     FROM sections \
     WHERE institution = $1 AND term = $2 AND course = $3 \
     ORDER BY id";

#[derive(FromRow)]
struct SectionRow {
    course: String,
    component: String,
    label: String,
    days: String,
    start_time: String,
    end_time: String,
    location: Option<String>,
    instructor: Option<String>,
    display: String,
    auto_enroll_label: Option<String>,
    career: Option<String>,
    capacity: Option<i32>,
    campus: Option<String>,
    title: Option<String>,
    description: Option<String>,
    units: Option<String>,
}

impl From<SectionRow> for CatalogRow {
    fn from(row: SectionRow) -> Self {
        CatalogRow {
            course: row.course,
            component: row.component,
            label: row.label,
            days: row.days,
            start_time: row.start_time,
            end_time: row.end_time,
            location: row.location,
            instructor: row.instructor,
            display: row.display,
            auto_enroll_label: row.auto_enroll_label,
            career: row.career,
            capacity: row.capacity,
            campus: row.campus,
            title: row.title,
            description: row.description,
            units: row.units,
        }
    }
}

/// Loads every component the catalog has for `course` within (institution, term).
///
/// Returns `CatalogUnavailable` only when the query itself fails; malformed
/// individual rows are skipped and logged by [`group_into_components`], never
/// surfaced as a request failure.
pub async fn fetch_components(pool: &PgPool, institution: &str, term: &str, course: &str) -> Result<Vec<Component>, SchedulerError> {
    let rows: Vec<SectionRow> = sqlx::query_as(SECTION_SELECT)
        .bind(institution)
        .bind(term)
        .bind(course)
        .fetch_all(pool)
        .await
        .context("section catalog query failed")
        .map_err(SchedulerError::CatalogUnavailable)?;

    let catalog_rows: Vec<CatalogRow> = rows.into_iter().map(CatalogRow::from).collect();
    Ok(group_into_components(catalog_rows))
}
