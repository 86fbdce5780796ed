//! The fixed registry of report keys and the single entry point routing raw
//! inputs to an aggregator.

use clap::ValueEnum;

use crate::model::{Device, ExceptionEvent, Rule, Trip};
use crate::reports::aggregate::{
    count_all_events, count_by_rule, count_by_type, distance_per_vehicle, idle_drive_distance,
    scorecard, utilization_days,
};
use crate::reports::matcher::find_rule_id;
use crate::reports::names::NameIndex;
use crate::reports::report::Report;

/// The eleven report types the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ReportKind {
    Speeding,
    Seatbelt,
    HarshBraking,
    HarshCornering,
    HarshAcceleration,
    GeneralEvents,
    EventsByType,
    SafetyScorecard,
    Distance,
    Idle,
    Utilization,
}

impl ReportKind {
    pub const ALL: [ReportKind; 11] = [
        ReportKind::Speeding,
        ReportKind::Seatbelt,
        ReportKind::HarshBraking,
        ReportKind::HarshCornering,
        ReportKind::HarshAcceleration,
        ReportKind::GeneralEvents,
        ReportKind::EventsByType,
        ReportKind::SafetyScorecard,
        ReportKind::Distance,
        ReportKind::Idle,
        ReportKind::Utilization,
    ];

    /// The stable string key for this report.
    pub fn key(self) -> &'static str {
        match self {
            ReportKind::Speeding => "speeding",
            ReportKind::Seatbelt => "seatbelt",
            ReportKind::HarshBraking => "harsh_braking",
            ReportKind::HarshCornering => "harsh_cornering",
            ReportKind::HarshAcceleration => "harsh_acceleration",
            ReportKind::GeneralEvents => "general_events",
            ReportKind::EventsByType => "events_by_type",
            ReportKind::SafetyScorecard => "safety_scorecard",
            ReportKind::Distance => "distance",
            ReportKind::Idle => "idle",
            ReportKind::Utilization => "utilization",
        }
    }

    /// Resolves a key to its report kind. Unknown keys are an absence, never
    /// a panic; callers validate membership before running anything.
    pub fn parse_key(key: &str) -> Option<ReportKind> {
        ReportKind::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Human title used as table/chart caption.
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Speeding => "Speeding",
            ReportKind::Seatbelt => "Seatbelt",
            ReportKind::HarshBraking => "Harsh Braking",
            ReportKind::HarshCornering => "Harsh Cornering",
            ReportKind::HarshAcceleration => "Harsh Acceleration",
            ReportKind::GeneralEvents => "General Events per Vehicle",
            ReportKind::EventsByType => "Events by Type",
            ReportKind::SafetyScorecard => "Safety Scorecard",
            ReportKind::Distance => "Distance per Vehicle",
            ReportKind::Idle => "Idle / Drive Time / Distance",
            ReportKind::Utilization => "Utilization (Days Driven)",
        }
    }

    /// Whether this report consumes rules + exception events.
    pub fn needs_exceptions(self) -> bool {
        !self.needs_trips()
    }

    /// Whether this report consumes trips.
    pub fn needs_trips(self) -> bool {
        matches!(
            self,
            ReportKind::Distance | ReportKind::Idle | ReportKind::Utilization
        )
    }
}

/// Raw collections one report run consumes. Collections a report does not
/// need stay empty.
#[derive(Debug, Default)]
pub struct ReportInputs {
    pub devices: Vec<Device>,
    pub rules: Vec<Rule>,
    pub events: Vec<ExceptionEvent>,
    pub trips: Vec<Trip>,
}

/// Runs one report: derives the name index once, then routes to the
/// aggregator with the curated keyword list where one applies.
pub fn run_report(kind: ReportKind, inputs: &ReportInputs) -> Report {
    let names = NameIndex::from_devices(&inputs.devices);
    let by_rule = |label: &str, keywords: &[&str]| {
        let rule_id = find_rule_id(&inputs.rules, keywords);
        count_by_rule(&inputs.events, rule_id.as_deref(), &names, label)
    };

    match kind {
        ReportKind::Speeding => by_rule("Speeding", &["speeding"]),
        ReportKind::Seatbelt => by_rule("Seatbelt", &["seatbelt", "seat belt"]),
        ReportKind::HarshBraking => by_rule(
            "Harsh Braking",
            &["harsh braking", "hard brake", "harsh brake"],
        ),
        ReportKind::HarshCornering => by_rule("Harsh Cornering", &["harsh corner", "harsh turn"]),
        ReportKind::HarshAcceleration => by_rule(
            "Harsh Acceleration",
            &["harsh accel", "harsh acceleration", "hard accel"],
        ),
        ReportKind::GeneralEvents => count_all_events(&inputs.events, &names),
        ReportKind::EventsByType => count_by_type(&inputs.events),
        ReportKind::SafetyScorecard => scorecard(&inputs.events, &names),
        ReportKind::Distance => distance_per_vehicle(&inputs.trips, &names),
        ReportKind::Idle => idle_drive_distance(&inputs.trips, &names),
        ReportKind::Utilization => utilization_days(&inputs.trips, &names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityRef;

    #[test]
    fn test_key_round_trips_for_all_kinds() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::parse_key(kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert_eq!(ReportKind::parse_key("fuel_economy"), None);
        assert_eq!(ReportKind::parse_key(""), None);
    }

    #[test]
    fn test_input_needs_partition() {
        for kind in ReportKind::ALL {
            assert_ne!(kind.needs_exceptions(), kind.needs_trips());
        }
        assert!(ReportKind::SafetyScorecard.needs_exceptions());
        assert!(ReportKind::Utilization.needs_trips());
    }

    #[test]
    fn test_run_report_matches_rule_by_keyword() {
        let inputs = ReportInputs {
            devices: vec![Device {
                id: "d1".into(),
                name: Some("Truck A".into()),
                serial_number: None,
            }],
            rules: vec![Rule {
                id: "r1".into(),
                name: Some("Speeding Event".into()),
            }],
            events: vec![ExceptionEvent {
                rule: Some(EntityRef {
                    id: Some("r1".into()),
                    name: None,
                }),
                device: Some(EntityRef {
                    id: Some("d1".into()),
                    name: None,
                }),
            }],
            trips: Vec::new(),
        };

        let report = run_report(ReportKind::Speeding, &inputs);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0][0].to_string(), "Truck A");
        assert_eq!(report.rows[0][1].to_string(), "1");
    }

    #[test]
    fn test_run_report_on_empty_inputs_never_fails() {
        let inputs = ReportInputs::default();
        for kind in ReportKind::ALL {
            let report = run_report(kind, &inputs);
            assert!(report.rows.is_empty());
            assert!(!report.headers.is_empty());
        }
    }
}
