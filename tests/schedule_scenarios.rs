//! End-to-end scenarios against the orchestrator, bypassing the database by
//! constructing components directly. Mirrors the catalog adapter's output
//! shape so these exercise exactly what `data::catalog::fetch_components`
//! would hand the orchestrator after a real query.

use std::time::Duration;

use classtime::scheduler::orchestrator::{BusyTime, CourseRequest, ScheduleRequest};
use classtime::scheduler::{CatalogMetadata, Component, ComponentKind, Section};
use tokio_util::sync::CancellationToken;

fn section(course: &str, kind: ComponentKind, label: &str, days: &str, start: &str, end: &str, auto_enroll: Option<&str>) -> Section {
    Section::build(
        course.to_string(),
        kind,
        label.to_string(),
        days.to_string(),
        start.to_string(),
        end.to_string(),
        None,
        None,
        format!("{course} {label}"),
        auto_enroll.map(str::to_string),
        CatalogMetadata::default(),
    )
    .unwrap()
}

fn component(course: &str, kind: ComponentKind, sections: Vec<Section>) -> Component {
    Component {
        course: course.to_string(),
        kind,
        sections,
    }
}

fn solve(courses: Vec<CourseRequest>, busy_times: Vec<BusyTime>) -> classtime::scheduler::ScheduleResponse {
    let request = ScheduleRequest {
        courses,
        busy_times,
        result_cap: 200,
        deadline: Duration::from_secs(5),
    };
    classtime::scheduler::orchestrator::run(request, &CancellationToken::new()).unwrap()
}

/// Scenario 1/2: a single LEC component with three non-conflicting sections
/// yields three singleton schedules, none of which double up on LEC.
#[test]
fn single_component_three_sections_yields_three_singleton_schedules() {
    let sections = vec![
        section("CS101", ComponentKind::Lec, "A1", "MWF", "09:00 AM", "09:50 AM", None),
        section("CS101", ComponentKind::Lec, "A2", "MWF", "11:00 AM", "11:50 AM", None),
        section("CS101", ComponentKind::Lec, "A3", "TR", "01:00 PM", "02:15 PM", None),
    ];
    let response = solve(
        vec![CourseRequest {
            course: "CS101".into(),
            components: vec![component("CS101", ComponentKind::Lec, sections)],
        }],
        vec![],
    );

    assert_eq!(response.schedules.len(), 3);
    for schedule in &response.schedules {
        assert_eq!(schedule.len(), 1);
    }
    let labels: std::collections::BTreeSet<_> = response.schedules.iter().map(|s| s[0].id.label.clone()).collect();
    assert_eq!(labels, ["A1", "A2", "A3"].into_iter().map(String::from).collect());
}

/// Scenario 3: two overlapping LEC sections of the same course never appear
/// together in a schedule.
#[test]
fn overlapping_sections_never_coexist() {
    let sections = vec![
        section("CS101", ComponentKind::Lec, "A1", "MWF", "10:00 AM", "10:50 AM", None),
        section("CS101", ComponentKind::Lec, "A2", "MWF", "10:30 AM", "11:20 AM", None),
    ];
    let response = solve(
        vec![CourseRequest {
            course: "CS101".into(),
            components: vec![component("CS101", ComponentKind::Lec, sections)],
        }],
        vec![],
    );

    // Structural exclusion already forbids two LEC sections together, and
    // the pair also overlaps in time -- either axis alone would block it.
    assert_eq!(response.schedules.len(), 2);
    for schedule in &response.schedules {
        assert_eq!(schedule.len(), 1);
    }
}

/// Scenario 4: LEC A1 auto-enrolls into LAB A2. A1 must never pair with any
/// other LAB; B1 (no dependency) may pair with any LAB.
#[test]
fn auto_enroll_link_constrains_lab_pairing() {
    let mut a1 = section("CS101", ComponentKind::Lec, "A1", "MWF", "09:00 AM", "09:50 AM", Some("A2"));
    a1.auto_enroll_component = Some(ComponentKind::Lab);
    let lec = vec![a1, section("CS101", ComponentKind::Lec, "B1", "MWF", "11:00 AM", "11:50 AM", None)];
    let lab = vec![
        section("CS101", ComponentKind::Lab, "A2", "TR", "02:00 PM", "02:50 PM", None),
        section("CS101", ComponentKind::Lab, "A3", "TR", "03:00 PM", "03:50 PM", None),
        section("CS101", ComponentKind::Lab, "B2", "TR", "04:00 PM", "04:50 PM", None),
    ];

    let response = solve(
        vec![CourseRequest {
            course: "CS101".into(),
            components: vec![component("CS101", ComponentKind::Lec, lec), component("CS101", ComponentKind::Lab, lab)],
        }],
        vec![],
    );

    for schedule in &response.schedules {
        let lec_label = schedule.iter().find(|s| s.id.component == ComponentKind::Lec).unwrap().id.label.clone();
        let lab_label = schedule.iter().find(|s| s.id.component == ComponentKind::Lab).unwrap().id.label.clone();
        if lec_label == "A1" {
            assert_eq!(lab_label, "A2", "A1 must pair only with its auto-enroll target A2");
        }
    }
    // B1 should appear paired with every lab at least once across the result set.
    let b1_labs: std::collections::BTreeSet<_> = response
        .schedules
        .iter()
        .filter(|s| s.iter().any(|sec| sec.id.label == "B1"))
        .map(|s| s.iter().find(|sec| sec.id.component == ComponentKind::Lab).unwrap().id.label.clone())
        .collect();
    assert_eq!(b1_labs, ["A2", "A3", "B2"].into_iter().map(String::from).collect());
}

/// Scenario 5: a busy block excludes every overlapping section from every
/// result.
#[test]
fn busy_time_excludes_overlapping_sections() {
    let sections = vec![
        section("CS101", ComponentKind::Lec, "A1", "MWF", "04:00 PM", "05:15 PM", None),
        section("CS101", ComponentKind::Lec, "A2", "MWF", "09:00 AM", "09:50 AM", None),
    ];
    let response = solve(
        vec![CourseRequest {
            course: "CS101".into(),
            components: vec![component("CS101", ComponentKind::Lec, sections)],
        }],
        vec![BusyTime {
            days: "MWF".into(),
            start_time: "04:00 PM".into(),
            end_time: "06:00 PM".into(),
        }],
    );

    assert_eq!(response.schedules.len(), 1);
    assert_eq!(response.schedules[0][0].id.label, "A2");
}

/// Scenario 6: the result cap is respected even when the feasible set is
/// much larger -- three independent two-section components already yield 8
/// combinations, so a cap of 4 must stop enumeration early.
#[test]
fn result_cap_bounds_enumeration() {
    let mut courses = Vec::new();
    let time_slots = [
        ("CS101", "09:00 AM", "09:50 AM", "10:00 AM", "10:50 AM"),
        ("CS102", "11:00 AM", "11:50 AM", "12:00 PM", "12:50 PM"),
        ("CS103", "01:00 PM", "01:50 PM", "02:00 PM", "02:50 PM"),
    ];
    for (course, s1, e1, s2, e2) in time_slots {
        let sections = vec![
            section(course, ComponentKind::Lec, "A1", "M", s1, e1, None),
            section(course, ComponentKind::Lec, "A2", "M", s2, e2, None),
        ];
        courses.push(CourseRequest {
            course: course.into(),
            components: vec![component(course, ComponentKind::Lec, sections)],
        });
    }

    let request = ScheduleRequest {
        courses,
        busy_times: vec![],
        result_cap: 4,
        deadline: Duration::from_secs(5),
    };
    let response = classtime::scheduler::orchestrator::run(request, &CancellationToken::new()).unwrap();

    assert_eq!(response.schedules.len(), 4);
    assert!(response.warnings.iter().any(|w| w.contains("cap") || w.contains("deadline")));
}

/// Every pair within a returned schedule must be conflict-free, and every
/// schedule must be a distinct set of sections (universal invariants 1 and 4).
#[test]
fn returned_schedules_are_pairwise_conflict_free_and_distinct() {
    let lec = vec![
        section("CS101", ComponentKind::Lec, "A1", "MWF", "09:00 AM", "09:50 AM", None),
        section("CS101", ComponentKind::Lec, "A2", "TR", "11:00 AM", "12:15 PM", None),
    ];
    let lab = vec![
        section("CS101", ComponentKind::Lab, "L1", "TR", "02:00 PM", "02:50 PM", None),
        section("CS101", ComponentKind::Lab, "L2", "TR", "03:00 PM", "03:50 PM", None),
    ];
    let response = solve(
        vec![CourseRequest {
            course: "CS101".into(),
            components: vec![component("CS101", ComponentKind::Lec, lec), component("CS101", ComponentKind::Lab, lab)],
        }],
        vec![],
    );

    use classtime::scheduler::conflict::conflicts;
    for schedule in &response.schedules {
        for (i, a) in schedule.iter().enumerate() {
            for b in &schedule[i + 1..] {
                assert!(!conflicts(a, b));
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    for schedule in &response.schedules {
        let mut labels: Vec<_> = schedule.iter().map(|s| (s.id.course.clone(), s.id.label.clone())).collect();
        labels.sort();
        assert!(seen.insert(labels), "duplicate schedule returned");
    }
}
