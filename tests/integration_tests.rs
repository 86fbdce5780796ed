use chrono::{TimeZone, Utc};
use fleet_reporter::model::{Device, EntityRef, ExceptionEvent, Rule, Trip};
use fleet_reporter::reports::dispatch::{ReportInputs, ReportKind, run_report};
use fleet_reporter::reports::report::Cell;

fn device(id: &str, name: &str) -> Device {
    Device {
        id: id.to_string(),
        name: Some(name.to_string()),
        serial_number: None,
    }
}

fn rule(id: &str, name: &str) -> Rule {
    Rule {
        id: id.to_string(),
        name: Some(name.to_string()),
    }
}

fn event(rule_id: &str, rule_name: &str, device_id: &str) -> ExceptionEvent {
    ExceptionEvent {
        rule: Some(EntityRef {
            id: Some(rule_id.to_string()),
            name: Some(rule_name.to_string()),
        }),
        device: Some(EntityRef {
            id: Some(device_id.to_string()),
            name: None,
        }),
    }
}

/// A small fleet: two trucks and a van, a typical rule set, a month of
/// activity.
fn fixture() -> ReportInputs {
    let start = |day, hour| Utc.with_ymd_and_hms(2025, 7, day, hour, 0, 0).unwrap();

    ReportInputs {
        devices: vec![
            device("b1", "Truck A"),
            device("b2", "Truck B"),
            device("b3", "Van"),
        ],
        rules: vec![
            rule("r1", "Posted Speeding"),
            rule("r2", "Seat Belt Violation"),
            rule("r3", "Harsh Braking"),
        ],
        events: vec![
            event("r1", "Posted Speeding", "b1"),
            event("r1", "Posted Speeding", "b1"),
            event("r1", "Posted Speeding", "b2"),
            event("r2", "Seat Belt Violation", "b2"),
            event("r3", "Harsh Braking", "b3"),
            // Dangling device reference, tolerated and skipped
            event("r1", "Posted Speeding", "ghost"),
        ],
        trips: vec![
            Trip {
                device: Some(EntityRef {
                    id: Some("b1".into()),
                    name: None,
                }),
                distance: Some(120_000.0),
                idle_duration: Some(1800.0),
                drive_duration: Some(7200.0),
                start: Some(start(1, 8)),
                ..Trip::default()
            },
            Trip {
                device: Some(EntityRef {
                    id: Some("b1".into()),
                    name: None,
                }),
                start_odometer: Some(500_000.0),
                stop_odometer: Some(530_000.0),
                idle_duration: Some(900.0),
                drive_duration: Some(3600.0),
                start: Some(start(2, 9)),
                ..Trip::default()
            },
            Trip {
                device: Some(EntityRef {
                    id: Some("b3".into()),
                    name: None,
                }),
                distance: Some(45_500.0),
                idle_duration: Some(600.0),
                drive_duration: Some(5400.0),
                start: Some(start(1, 14)),
                ..Trip::default()
            },
        ],
    }
}

fn count_col(report: &fleet_reporter::reports::report::Report, col: usize) -> Vec<String> {
    report.rows.iter().map(|r| r[col].to_string()).collect()
}

#[test]
fn test_speeding_report_end_to_end() {
    let report = run_report(ReportKind::Speeding, &fixture());

    assert_eq!(report.headers, vec!["Vehicle", "Speeding Count"]);
    assert_eq!(
        report.rows,
        vec![
            vec![Cell::Text("Truck A".into()), Cell::Int(2)],
            vec![Cell::Text("Truck B".into()), Cell::Int(1)],
            vec![Cell::Text("Van".into()), Cell::Int(0)],
        ]
    );
    assert_eq!(report.chart.labels, count_col(&report, 0));
}

#[test]
fn test_unmatched_category_yields_empty_report() {
    let mut inputs = fixture();
    inputs.rules.retain(|r| r.id != "r2");

    let report = run_report(ReportKind::Seatbelt, &inputs);
    assert_eq!(report.headers, vec!["Vehicle", "Seatbelt Count"]);
    assert!(report.rows.is_empty());
}

#[test]
fn test_scorecard_ranks_full_fleet() {
    let report = run_report(ReportKind::SafetyScorecard, &fixture());

    assert_eq!(report.headers, vec!["Rank", "Vehicle", "Total Events"]);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(count_col(&report, 0), vec!["1", "2", "3"]);
    // Truck A and Truck B tie at 2 events and keep device order
    assert_eq!(count_col(&report, 1), vec!["Truck A", "Truck B", "Van"]);
    assert_eq!(count_col(&report, 2), vec!["2", "2", "1"]);
}

#[test]
fn test_events_by_type_groups_by_rule_name() {
    let report = run_report(ReportKind::EventsByType, &fixture());

    assert_eq!(report.headers, vec!["Rule", "Event Count"]);
    assert_eq!(
        report.rows[0],
        vec![Cell::Text("Posted Speeding".into()), Cell::Int(4)]
    );
}

#[test]
fn test_distance_report_uses_odometer_fallback() {
    let report = run_report(ReportKind::Distance, &fixture());

    // Truck A: 120 km direct + 30 km odometer delta
    assert_eq!(
        report.rows,
        vec![
            vec![Cell::Text("Truck A".into()), Cell::Num(150.0)],
            vec![Cell::Text("Van".into()), Cell::Num(45.5)],
            vec![Cell::Text("Truck B".into()), Cell::Num(0.0)],
        ]
    );
}

#[test]
fn test_idle_report_sorts_by_distance() {
    let report = run_report(ReportKind::Idle, &fixture());

    assert_eq!(
        report.headers,
        vec!["Vehicle", "Idle (h)", "Drive (h)", "Distance (km)"]
    );
    assert_eq!(count_col(&report, 0), vec!["Truck A", "Van", "Truck B"]);
    // Truck A: (1800 + 900) s idle, (7200 + 3600) s drive
    assert_eq!(report.rows[0][1], Cell::Num(0.75));
    assert_eq!(report.rows[0][2], Cell::Num(3.0));
    assert_eq!(report.chart.data, vec![150.0, 45.5, 0.0]);
}

#[test]
fn test_utilization_counts_distinct_days() {
    let report = run_report(ReportKind::Utilization, &fixture());

    assert_eq!(
        report.rows,
        vec![
            vec![Cell::Text("Truck A".into()), Cell::Int(2)],
            vec![Cell::Text("Van".into()), Cell::Int(1)],
            vec![Cell::Text("Truck B".into()), Cell::Int(0)],
        ]
    );
}

#[test]
fn test_reports_are_deterministic_across_runs() {
    let inputs = fixture();
    for kind in ReportKind::ALL {
        let first = run_report(kind, &inputs);
        let second = run_report(kind, &inputs);
        assert_eq!(first, second, "report {} not idempotent", kind.key());
    }
}

#[test]
fn test_row_count_matches_fleet_size_for_per_vehicle_reports() {
    let inputs = fixture();
    for kind in [
        ReportKind::Speeding,
        ReportKind::Seatbelt,
        ReportKind::HarshBraking,
        ReportKind::GeneralEvents,
        ReportKind::Distance,
        ReportKind::Idle,
        ReportKind::Utilization,
    ] {
        let report = run_report(kind, &inputs);
        assert_eq!(
            report.rows.len(),
            inputs.devices.len(),
            "report {} should emit one row per device",
            kind.key()
        );
    }
}
