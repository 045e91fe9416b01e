//! `POST /api/schedule`: the only handler that exercises the scheduling core.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::data::catalog::fetch_components;
use crate::scheduler::orchestrator::{self, BusyTime, CourseRequest, ScheduleRequest};
use crate::scheduler::{Section, SectionId};
use crate::state::AppState;
use crate::web::error::ApiError;

/// One elective group: at least one of its courses suffices. Forwarded
/// end-to-end but not acted on by the core -- see the Open Questions in
/// `DESIGN.md`.
#[derive(Debug, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ElectiveGroup {
    pub courses: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BusyTimeDto {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduleRequestDto {
    pub institution: String,
    pub term: String,
    pub courses: Vec<String>,
    #[serde(default)]
    pub electives: Vec<ElectiveGroup>,
    #[serde(default)]
    pub busy_times: Vec<BusyTimeDto>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

/// The section projection exposed to callers: identifier fields plus display
/// string, matching the response shape in SPEC_FULL.md §6. `Section::metadata`
/// (career, capacity, campus, title, description, units) is carried on the
/// domain type but not part of that projection, so it is not echoed back here.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SectionDto {
    pub course: String,
    pub component: String,
    pub label: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub display: String,
}

impl From<&crate::scheduler::Section> for SectionDto {
    fn from(section: &crate::scheduler::Section) -> Self {
        let SectionId { course, component, label } = &section.id;
        SectionDto {
            course: course.clone(),
            component: component.as_str().to_string(),
            label: label.clone(),
            days: section.days.clone(),
            start_time: section.start_time.clone(),
            end_time: section.end_time.clone(),
            location: section.location.clone(),
            instructor: section.instructor.clone(),
            display: section.display.clone(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduleResponseDto {
    pub schedules: Vec<Vec<SectionDto>>,
    pub warnings: Vec<String>,
}

impl From<orchestrator::ScheduleResponse> for ScheduleResponseDto {
    fn from(response: orchestrator::ScheduleResponse) -> Self {
        ScheduleResponseDto {
            schedules: response
                .schedules
                .iter()
                .map(|schedule| schedule.iter().map(SectionDto::from).collect())
                .collect(),
            warnings: response.warnings,
        }
    }
}

pub(super) async fn schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequestDto>,
) -> Result<Json<ScheduleResponseDto>, ApiError> {
    if request.institution.trim().is_empty() {
        return Err(ApiError::bad_request("institution must not be empty"));
    }
    if request.term.trim().is_empty() {
        return Err(ApiError::bad_request("term must not be empty"));
    }
    if request.courses.is_empty() {
        return Err(ApiError::bad_request("courses must not be empty"));
    }

    let mut courses = Vec::with_capacity(request.courses.len());
    for course in &request.courses {
        let components = fetch_components(&state.db_pool, &request.institution, &request.term, course).await?;
        courses.push(CourseRequest {
            course: course.clone(),
            components,
        });
    }

    let busy_times = request
        .busy_times
        .into_iter()
        .map(|b| BusyTime {
            days: b.day,
            start_time: b.start_time,
            end_time: b.end_time,
        })
        .collect();

    let solve_request = ScheduleRequest {
        courses,
        busy_times,
        result_cap: state.solver_result_cap,
        deadline: state.solver_deadline,
    };

    let cancel = state.shutdown.clone();
    let response = tokio::task::spawn_blocking(move || orchestrator::run(solve_request, &cancel))
        .await
        .map_err(|e| ApiError::from(crate::scheduler::SchedulerError::CatalogUnavailable(anyhow::anyhow!("solver task panicked: {e}"))))??;

    Ok(Json(response.into()))
}
