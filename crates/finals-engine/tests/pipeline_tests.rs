//! End-to-end tests for the validation pipeline.

use finals_engine::{
    validate, DayCode, ErrorCode, FinalExamEntry, FinalsGrid, Report, RoomCapacities, Section,
    ValidationConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn run(sections: Vec<Section>, finals: &[FinalExamEntry]) -> Report {
    run_with(sections, finals, &RoomCapacities::new(), &ValidationConfig::default())
}

fn run_with(
    sections: Vec<Section>,
    finals: &[FinalExamEntry],
    capacities: &RoomCapacities,
    config: &ValidationConfig,
) -> Report {
    validate(sections, finals, capacities, FinalsGrid::standard(), config)
}

fn errors(report: &Report, crn: &str) -> Vec<ErrorCode> {
    report.find(crn).expect("section present").errors.clone()
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_no_final() {
    let report = run(vec![Section::new("10001", "MW", "08:00-09:15")], &[]);
    assert_eq!(errors(&report, "10001"), vec![ErrorCode::NoFinal]);
    assert!(report.find("10001").unwrap().final_exam.is_none());
}

#[test]
fn scenario_wrong_day() {
    let section = Section {
        course_number: "2410".to_string(),
        ..Section::new("10002", "MW", "08:00-09:15")
    };
    let finals = vec![FinalExamEntry::new("10002", DayCode::Tuesday, "08:00-10:00", "")];
    let report = run(vec![section], &finals);
    assert_eq!(errors(&report, "10002"), vec![ErrorCode::WrongDay]);
}

#[test]
fn scenario_instructor_double_block() {
    let a = Section {
        instructor: "Alvarez".to_string(),
        ..Section::new("20001", "MW", "08:00-09:15")
    };
    let b = Section {
        instructor: "Alvarez".to_string(),
        ..Section::new("20002", "MW", "09:30-10:45")
    };
    let finals = vec![
        FinalExamEntry::new("20001", DayCode::Monday, "08:00-09:00", ""),
        FinalExamEntry::new("20002", DayCode::Monday, "08:00-09:00", ""),
    ];
    let report = run(vec![a, b], &finals);

    assert_eq!(errors(&report, "20001"), vec![ErrorCode::InstrBlockOverlap]);
    assert_eq!(errors(&report, "20002"), vec![ErrorCode::InstrBlockOverlap]);
}

#[test]
fn scenario_room_back_to_back() {
    let a = Section::new("30001", "MW", "08:00-09:15");
    let b = Section::new("30002", "MW", "09:30-10:45");
    let finals = vec![
        FinalExamEntry::new("30001", DayCode::Monday, "08:00-09:00", "KC 307"),
        FinalExamEntry::new("30002", DayCode::Monday, "09:00-10:00", "KC 307"),
    ];
    let mut rooms = RoomCapacities::new();
    rooms.insert("KC 307", 45);
    let report = run_with(vec![a, b], &finals, &rooms, &ValidationConfig::default());

    assert_eq!(errors(&report, "30001"), vec![ErrorCode::RoomBackToBack]);
    assert_eq!(errors(&report, "30002"), vec![ErrorCode::RoomBackToBack]);
}

#[test]
fn scenario_grid_mismatch() {
    let section = Section {
        credit_hours: 3,
        ..Section::new("40001", "MWF", "08:00-08:50")
    };
    let finals = vec![FinalExamEntry::new("40001", DayCode::Tuesday, "14:00-16:00", "")];
    let report = run(vec![section], &finals);

    let codes = errors(&report, "40001");
    assert!(codes.contains(&ErrorCode::GridMismatch), "{codes:?}");
}

#[test]
fn stretch_course_meeting_mw_with_saturday_final() {
    let section = Section {
        course_number: "1314".to_string(),
        credit_hours: 3,
        ..Section::new("50001", "MW", "08:00-09:15")
    };
    let finals = vec![FinalExamEntry::new("50001", DayCode::Saturday, "09:00-11:00", "")];
    let config = ValidationConfig::default().with_stretch_courses(["1313", "1314", "1315"]);
    let report = run_with(vec![section], &finals, &RoomCapacities::new(), &config);

    let codes = errors(&report, "50001");
    assert!(!codes.contains(&ErrorCode::WrongDay));
    assert!(!codes.contains(&ErrorCode::GridMismatch));
}

#[test]
fn combined_seating_final_is_clean() {
    let a = Section {
        enrolled: 20,
        ..Section::new("60001", "MW", "08:00-09:15")
    };
    let b = Section {
        enrolled: 20,
        ..Section::new("60002", "TR", "09:30-10:45")
    };
    let finals = vec![
        FinalExamEntry::new("60001", DayCode::Monday, "18:00-20:00", "KC 307"),
        FinalExamEntry::new("60002", DayCode::Monday, "18:00-20:00", "KC 307"),
    ];
    let mut rooms = RoomCapacities::new();
    rooms.insert("KC 307", 45);
    let report = run_with(vec![a, b], &finals, &rooms, &ValidationConfig::default());

    // The room block overlap is suppressed: 40 students fit in 45 seats.
    // 60002 meets TR, so its Monday final is on the wrong day; nothing else.
    assert!(errors(&report, "60001").is_empty());
    assert_eq!(errors(&report, "60002"), vec![ErrorCode::WrongDay]);
}

// ── Report assembly ─────────────────────────────────────────────────────────

#[test]
fn every_section_survives_in_input_order() {
    let sections = vec![
        Section::new("3", "MW", "08:00-09:15"),
        Section::new("1", "MW", "09:30-10:45"),
        Section::new("2", "TR", "08:00-09:15"),
    ];
    let finals = vec![
        FinalExamEntry::new("1", DayCode::Monday, "08:00-10:00", ""),
        FinalExamEntry::new("1", DayCode::Wednesday, "08:00-10:00", ""),
        FinalExamEntry::new("2", DayCode::Tuesday, "08:00-10:00", ""),
    ];
    let report = run(sections, &finals);

    let crns: Vec<&str> = report.sections.iter().map(|s| s.crn.as_str()).collect();
    assert_eq!(crns, vec!["3", "1", "2"]);
    assert_eq!(errors(&report, "3"), vec![ErrorCode::NoFinal]);
    assert_eq!(errors(&report, "1"), vec![ErrorCode::MultipleFinals]);
    assert!(errors(&report, "2").is_empty());
}

#[test]
fn codes_are_unique_and_in_detection_order() {
    // Wrong day, instructor double block, unknown room, all on one section.
    let a = Section {
        instructor: "Kim".to_string(),
        ..Section::new("70001", "TR", "08:00-09:15")
    };
    let b = Section {
        instructor: "Kim".to_string(),
        ..Section::new("70002", "MW", "09:30-10:45")
    };
    let finals = vec![
        FinalExamEntry::new("70001", DayCode::Monday, "08:00-10:00", "Annex 2"),
        FinalExamEntry::new("70002", DayCode::Monday, "08:00-10:00", "Annex 2"),
    ];
    let report = run(vec![a, b], &finals);

    assert_eq!(
        errors(&report, "70001"),
        vec![
            ErrorCode::WrongDay,
            ErrorCode::InstrBlockOverlap,
            ErrorCode::RoomBlockOverlap,
            ErrorCode::RoomUnknown,
        ]
    );
}

#[test]
fn summary_counts_sections_per_code() {
    let sections = vec![
        Section::new("1", "MW", "08:00-09:15"),
        Section::new("2", "MW", "08:00-09:15"),
        Section::new("3", "MW", "08:00-09:15"),
    ];
    let finals = vec![FinalExamEntry::new("3", DayCode::Friday, "08:00-10:00", "")];
    let report = run(sections, &finals);

    let summary = report.summary();
    assert_eq!(summary.get(&ErrorCode::NoFinal), Some(&2));
    assert_eq!(summary.get(&ErrorCode::WrongDay), Some(&1));
    assert_eq!(report.flagged().count(), 3);
    assert!(!report.is_clean());
}

#[test]
fn rerunning_on_a_report_is_idempotent() {
    let sections = vec![
        Section {
            instructor: "Alvarez".to_string(),
            ..Section::new("1", "MW", "08:00-09:15")
        },
        Section {
            instructor: "Alvarez".to_string(),
            ..Section::new("2", "MW", "09:30-10:45")
        },
        Section::new("3", "TR", "08:00-09:15"),
    ];
    let finals = vec![
        FinalExamEntry::new("1", DayCode::Monday, "08:00-10:00", "KC 307"),
        FinalExamEntry::new("2", DayCode::Monday, "09:00-11:00", "KC 307"),
    ];

    let first = run(sections.clone(), &finals);
    let second = run(sections, &finals);
    let again = run(first.sections.clone(), &finals);

    assert_eq!(first, second);
    assert_eq!(first, again);
}

#[test]
fn oversized_buffer_set_directly_does_not_panic() {
    let a = Section {
        instructor: "Kim".to_string(),
        ..Section::new("80001", "MW", "08:00-09:15")
    };
    let b = Section {
        instructor: "Kim".to_string(),
        ..Section::new("80002", "MW", "12:30-13:45")
    };
    let finals = vec![
        FinalExamEntry::new("80001", DayCode::Monday, "08:00-10:00", ""),
        FinalExamEntry::new("80002", DayCode::Monday, "13:00-15:00", ""),
    ];
    let config = ValidationConfig {
        back_to_back_buffer_minutes: i64::MAX,
        ..ValidationConfig::default()
    };
    let report = run_with(vec![a, b], &finals, &RoomCapacities::new(), &config);

    assert_eq!(errors(&report, "80001"), vec![ErrorCode::InstrBackToBack]);
    assert_eq!(errors(&report, "80002"), vec![ErrorCode::InstrBackToBack]);
}

#[test]
fn report_serializes_codes_as_screaming_snake_case() {
    let report = run(vec![Section::new("10001", "MW", "08:00-09:15")], &[]);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json[0]["errors"][0], "NO_FINAL");
    assert_eq!(json[0]["crn"], "10001");
}
