//! Trait over the vendor fleet API and the per-report input fan-out.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use fleet_reporter::model::{Device, ExceptionEvent, Rule, Trip};
use fleet_reporter::reports::dispatch::{ReportInputs, ReportKind};

/// The dashboard fetched everything in one page with a generous cap.
pub const DEFAULT_RESULTS_LIMIT: u32 = 100_000;

/// Abstraction over the four vendor data listings a report run can need.
#[async_trait]
pub trait FleetApi {
    async fn list_devices(&self, limit: u32) -> Result<Vec<Device>>;
    async fn list_rules(&self, limit: u32) -> Result<Vec<Rule>>;
    async fn list_exceptions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<ExceptionEvent>>;
    async fn list_trips(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Trip>>;
}

/// Fetches only the collections `kind` needs, concurrently.
///
/// Devices are always required (the name index is built from them); event
/// reports add rules + exceptions, trip reports add trips. Any failed fetch
/// aborts the whole run; there are no partial reports.
pub async fn fetch_inputs<A: FleetApi + Sync>(
    api: &A,
    kind: ReportKind,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<ReportInputs> {
    let limit = DEFAULT_RESULTS_LIMIT;

    let inputs = if kind.needs_trips() {
        let (devices, trips) = tokio::try_join!(
            api.list_devices(limit),
            api.list_trips(from, to, limit)
        )?;
        ReportInputs {
            devices,
            trips,
            ..ReportInputs::default()
        }
    } else {
        let (devices, rules, events) = tokio::try_join!(
            api.list_devices(limit),
            api.list_rules(limit),
            api.list_exceptions(from, to, limit)
        )?;
        ReportInputs {
            devices,
            rules,
            events,
            ..ReportInputs::default()
        }
    };

    info!(
        report = kind.key(),
        devices = inputs.devices.len(),
        rules = inputs.rules.len(),
        events = inputs.events.len(),
        trips = inputs.trips.len(),
        "Inputs fetched"
    );

    Ok(inputs)
}
