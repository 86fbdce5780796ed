//! Pure per-report aggregators.
//!
//! Every function takes raw record collections plus the per-run [`NameIndex`]
//! and produces a [`Report`]. Nothing here touches I/O, nothing fails:
//! records with unresolvable device or rule references are skipped, and
//! categories with no activity come back as valid zero/empty results.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::model::{ExceptionEvent, Trip};
use crate::reports::names::NameIndex;
use crate::reports::report::{Cell, Report};

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Trip distance in kilometers: the direct meter field when present,
/// otherwise the odometer delta, otherwise no contribution.
fn trip_km(trip: &Trip) -> f64 {
    if let Some(meters) = trip.distance {
        meters / 1000.0
    } else if let (Some(stop), Some(start)) = (trip.stop_odometer, trip.start_odometer) {
        (stop - start) / 1000.0
    } else {
        0.0
    }
}

/// One `(display_name, count)` pair per indexed device (default 0), sorted by
/// count descending. The sort is stable, so equal counts keep index order.
fn per_device_counts(names: &NameIndex, counts: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = names
        .iter()
        .map(|(id, name)| (name.to_string(), counts.get(id).copied().unwrap_or(0)))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

fn count_report(pairs: Vec<(String, u64)>, headers: &[&str], series_label: &str) -> Report {
    let mut report = Report::empty(headers, series_label);
    for (name, count) in pairs {
        report.chart.labels.push(name.clone());
        report.chart.data.push(count as f64);
        report.rows.push(vec![Cell::Text(name), Cell::Int(count)]);
    }
    report
}

/// Tallies events of one rule per vehicle.
///
/// `rule_id = None` means the category had no matching rule on this
/// installation; that is a valid empty result, not an error.
pub fn count_by_rule(
    events: &[ExceptionEvent],
    rule_id: Option<&str>,
    names: &NameIndex,
    label: &str,
) -> Report {
    let count_header = format!("{label} Count");
    let headers = ["Vehicle", count_header.as_str()];
    let Some(rule_id) = rule_id else {
        return Report::empty(&headers, label);
    };

    let mut counts: HashMap<String, u64> = HashMap::new();
    for event in events {
        let matches_rule = event
            .rule
            .as_ref()
            .and_then(|r| r.id())
            .is_some_and(|id| id == rule_id);
        if !matches_rule {
            continue;
        }
        if let Some(device_id) = event.device.as_ref().and_then(|d| d.id()) {
            if names.contains(device_id) {
                *counts.entry(device_id.to_string()).or_insert(0) += 1;
            }
        }
    }

    count_report(per_device_counts(names, &counts), &headers, label)
}

/// Tallies every event per vehicle, regardless of rule.
pub fn count_all_events(events: &[ExceptionEvent], names: &NameIndex) -> Report {
    let counts = total_counts(events, names);
    count_report(
        per_device_counts(names, &counts),
        &["Vehicle", "Event Count"],
        "Events",
    )
}

fn total_counts(events: &[ExceptionEvent], names: &NameIndex) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for event in events {
        if let Some(device_id) = event.device.as_ref().and_then(|d| d.id()) {
            if names.contains(device_id) {
                *counts.entry(device_id.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Groups events by rule name. Events with an absent or nameless rule
/// reference land in the "Unknown" bucket. Ties keep first-appearance order.
pub fn count_by_type(events: &[ExceptionEvent]) -> Report {
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for event in events {
        let name = event
            .rule
            .as_ref()
            .and_then(|r| r.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown");
        match by_name.get(name) {
            Some(&i) => order[i].1 += 1,
            None => {
                by_name.insert(name.to_string(), order.len());
                order.push((name.to_string(), 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    count_report(order, &["Rule", "Event Count"], "Events")
}

/// Per-vehicle event totals ranked 1..n. The chart keeps the un-ranked
/// `(vehicle, count)` pairs.
pub fn scorecard(events: &[ExceptionEvent], names: &NameIndex) -> Report {
    let counts = total_counts(events, names);
    let pairs = per_device_counts(names, &counts);

    let mut report = Report::empty(&["Rank", "Vehicle", "Total Events"], "Events");
    for (rank, (name, count)) in pairs.into_iter().enumerate() {
        report.chart.labels.push(name.clone());
        report.chart.data.push(count as f64);
        report.rows.push(vec![
            Cell::Int(rank as u64 + 1),
            Cell::Text(name),
            Cell::Int(count),
        ]);
    }
    report
}

/// Total distance driven per vehicle in kilometers, 2-decimal rounded.
pub fn distance_per_vehicle(trips: &[Trip], names: &NameIndex) -> Report {
    let mut km_by_device: HashMap<String, f64> = HashMap::new();
    for trip in trips {
        if let Some(device_id) = trip.device.as_ref().and_then(|d| d.id()) {
            *km_by_device.entry(device_id.to_string()).or_insert(0.0) += trip_km(trip);
        }
    }

    let mut pairs: Vec<(String, f64)> = names
        .iter()
        .map(|(id, name)| {
            (
                name.to_string(),
                round2(km_by_device.get(id).copied().unwrap_or(0.0)),
            )
        })
        .collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut report = Report::empty(&["Vehicle", "Distance (km)"], "Distance (km)");
    for (name, km) in pairs {
        report.chart.labels.push(name.clone());
        report.chart.data.push(km);
        report.rows.push(vec![Cell::Text(name), Cell::Num(km)]);
    }
    report
}

#[derive(Default)]
struct TripTotals {
    idle_h: f64,
    drive_h: f64,
    km: f64,
}

/// Idle hours, drive hours, and distance per vehicle, each 2-decimal rounded
/// independently. Rows sort by the distance column.
pub fn idle_drive_distance(trips: &[Trip], names: &NameIndex) -> Report {
    let mut totals: HashMap<String, TripTotals> = HashMap::new();
    for trip in trips {
        if let Some(device_id) = trip.device.as_ref().and_then(|d| d.id()) {
            let t = totals.entry(device_id.to_string()).or_default();
            t.idle_h += trip.idle_duration.unwrap_or(0.0) / 3600.0;
            t.drive_h += trip.drive_duration.unwrap_or(0.0) / 3600.0;
            t.km += trip_km(trip);
        }
    }

    let mut rows: Vec<(String, f64, f64, f64)> = names
        .iter()
        .map(|(id, name)| {
            let t = totals.get(id);
            (
                name.to_string(),
                round2(t.map_or(0.0, |t| t.idle_h)),
                round2(t.map_or(0.0, |t| t.drive_h)),
                round2(t.map_or(0.0, |t| t.km)),
            )
        })
        .collect();
    rows.sort_by(|a, b| b.3.total_cmp(&a.3));

    let mut report = Report::empty(
        &["Vehicle", "Idle (h)", "Drive (h)", "Distance (km)"],
        "Distance (km)",
    );
    for (name, idle_h, drive_h, km) in rows {
        report.chart.labels.push(name.clone());
        report.chart.data.push(km);
        report.rows.push(vec![
            Cell::Text(name),
            Cell::Num(idle_h),
            Cell::Num(drive_h),
            Cell::Num(km),
        ]);
    }
    report
}

/// Distinct UTC calendar dates with at least one trip, per vehicle.
pub fn utilization_days(trips: &[Trip], names: &NameIndex) -> Report {
    let mut days: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
    for trip in trips {
        let Some(device_id) = trip.device.as_ref().and_then(|d| d.id()) else {
            continue;
        };
        if let Some(start) = trip.start {
            days.entry(device_id.to_string())
                .or_default()
                .insert(start.date_naive());
        }
    }

    let counts: HashMap<String, u64> = days
        .into_iter()
        .map(|(id, dates)| (id, dates.len() as u64))
        .collect();
    count_report(
        per_device_counts(names, &counts),
        &["Vehicle", "Days Driven"],
        "Days Driven",
    )
}
