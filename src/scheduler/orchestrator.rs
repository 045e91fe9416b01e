//! Request-level glue: fetch components, build the conflict relation and
//! SAT encoding, drive the solver, and assemble the response.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::scheduler::catalog::unresolved_auto_enroll_warnings;
use crate::scheduler::conflict::build_conflict_set;
use crate::scheduler::errors::SchedulerError;
use crate::scheduler::sat::encode;
use crate::scheduler::section::{Component, Section};
use crate::scheduler::solver::{enumerate, SolveLimits};
use crate::scheduler::timetable::{BlockTime, Day, TimetableRange};
use crate::utils::log_if_slow;

/// Below this, a solve is unremarkable and not worth a warning even if it
/// ran the whole loop to the result cap.
const SLOW_SOLVE_THRESHOLD: Duration = Duration::from_millis(250);

/// A day/time-range busy interval as supplied by the caller.
#[derive(Debug, Clone)]
pub struct BusyTime {
    pub days: String,
    pub start_time: String,
    pub end_time: String,
}

/// A single course request (plus whatever components the catalog had for it).
pub struct CourseRequest {
    pub course: String,
    pub components: Vec<Component>,
}

pub struct ScheduleRequest {
    pub courses: Vec<CourseRequest>,
    pub busy_times: Vec<BusyTime>,
    pub result_cap: usize,
    pub deadline: Duration,
}

pub struct ScheduleResponse {
    pub schedules: Vec<Vec<Section>>,
    pub warnings: Vec<String>,
}

/// Runs one schedule request to completion (or to its cap/deadline/cancellation).
pub fn run(request: ScheduleRequest, cancel: &CancellationToken) -> Result<ScheduleResponse, SchedulerError> {
    let mut warnings = Vec::new();

    let mut components: Vec<Component> = Vec::new();
    for course in request.courses {
        if course.components.is_empty() {
            warnings.push(format!("course '{}' contributed no components and was skipped", course.course));
            continue;
        }
        components.extend(course.components);
    }

    warnings.extend(unresolved_auto_enroll_warnings(&components));

    let mut flat_sections: Vec<Section> = Vec::new();
    let mut offsets = Vec::with_capacity(components.len());
    for component in &components {
        offsets.push(flat_sections.len());
        flat_sections.extend(component.sections.iter().cloned());
    }

    let busy_ranges = parse_busy_times(&request.busy_times)?;
    let conflicts = build_conflict_set(&flat_sections, &busy_ranges);
    let encoding = encode(&components, flat_sections.len(), &offsets, &conflicts);

    let limits = SolveLimits {
        result_cap: request.result_cap,
        deadline: request.deadline,
    };
    let solve_start = Instant::now();
    let outcome = enumerate(encoding, &limits, cancel);
    log_if_slow(solve_start, SLOW_SOLVE_THRESHOLD, "schedule solve");

    if outcome.limit_reached {
        warnings.push("solver stopped early: result cap or deadline reached".to_string());
    }
    if flat_sections.is_empty() || (outcome.models.is_empty() && !components.is_empty()) {
        warnings.push("request is infeasible given the available sections and busy times".to_string());
    }

    let schedules = outcome
        .models
        .into_iter()
        .map(|positions| positions.into_iter().map(|i| flat_sections[i].clone()).collect())
        .collect();

    Ok(ScheduleResponse { schedules, warnings })
}

fn parse_busy_times(busy_times: &[BusyTime]) -> Result<Vec<TimetableRange>, SchedulerError> {
    let ranges = busy_times
        .iter()
        .map(|b| {
            let days = Day::parse_set(&b.days)?;
            let start = BlockTime::parse(&b.start_time)?;
            let end = BlockTime::parse(&b.end_time)?;
            TimetableRange::from_days(&days, start, end)
        })
        .filter_map(|r| match r {
            Ok(range) => Some(range),
            Err(e) => {
                warn!(error = %e, "dropping malformed busy time");
                None
            }
        })
        .collect();
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::section::ComponentKind;

    fn section(course: &str, kind: ComponentKind, label: &str, start: &str, end: &str) -> Section {
        Section::build(
            course.into(),
            kind,
            label.into(),
            "MWF".into(),
            start.into(),
            end.into(),
            None,
            None,
            format!("{course} {label}"),
            None,
            crate::scheduler::section::CatalogMetadata::default(),
        )
        .unwrap()
    }

    fn component(course: &str, kind: ComponentKind, sections: Vec<Section>) -> Component {
        Component { course: course.into(), kind, sections }
    }

    #[test]
    fn single_component_yields_one_schedule_per_section() {
        let sections = vec![
            section("CS101", ComponentKind::Lec, "A1", "09:00 AM", "09:50 AM"),
            section("CS101", ComponentKind::Lec, "A2", "11:00 AM", "11:50 AM"),
            section("CS101", ComponentKind::Lec, "A3", "01:00 PM", "01:50 PM"),
        ];
        let request = ScheduleRequest {
            courses: vec![CourseRequest {
                course: "CS101".into(),
                components: vec![component("CS101", ComponentKind::Lec, sections)],
            }],
            busy_times: vec![],
            result_cap: 200,
            deadline: Duration::from_secs(5),
        };
        let response = run(request, &CancellationToken::new()).unwrap();
        assert_eq!(response.schedules.len(), 3);
        assert!(response.schedules.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn missing_course_is_reported_as_warning_not_failure() {
        let request = ScheduleRequest {
            courses: vec![CourseRequest {
                course: "PHYS999".into(),
                components: vec![],
            }],
            busy_times: vec![],
            result_cap: 200,
            deadline: Duration::from_secs(5),
        };
        let response = run(request, &CancellationToken::new()).unwrap();
        assert!(response.warnings.iter().any(|w| w.contains("PHYS999")));
    }

    #[test]
    fn busy_time_excludes_overlapping_sections_from_every_schedule() {
        let sections = vec![
            section("CS101", ComponentKind::Lec, "A1", "04:00 PM", "05:15 PM"),
            section("CS101", ComponentKind::Lec, "A2", "09:00 AM", "09:50 AM"),
        ];
        let request = ScheduleRequest {
            courses: vec![CourseRequest {
                course: "CS101".into(),
                components: vec![component("CS101", ComponentKind::Lec, sections)],
            }],
            busy_times: vec![BusyTime {
                days: "MWF".into(),
                start_time: "04:00 PM".into(),
                end_time: "06:00 PM".into(),
            }],
            result_cap: 200,
            deadline: Duration::from_secs(5),
        };
        let response = run(request, &CancellationToken::new()).unwrap();
        assert_eq!(response.schedules.len(), 1);
        assert_eq!(response.schedules[0][0].id.label, "A2");
    }
}
