//! Raw vendor records consumed by the report engine.
//!
//! Everything here is deserialized straight from the JSON-RPC `Get` results.
//! The vendor omits fields freely, so anything that can be absent is an
//! `Option` and references to other entities are resolved explicitly through
//! lookups, never assumed to be present.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A vehicle (telematics unit) registered on the vendor platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub serial_number: Option<String>,
}

/// A named violation category configured on the platform.
///
/// Rule ids are opaque and installation-specific; the only portable handle on
/// a category is its free-text name, matched heuristically by
/// [`crate::reports::matcher::find_rule_id`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    pub id: String,
    pub name: Option<String>,
}

/// An embedded reference to another entity, carried by id and sometimes name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// One occurrence of a rule violation by one device.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExceptionEvent {
    pub rule: Option<EntityRef>,
    pub device: Option<EntityRef>,
}

/// A single trip recorded for a device.
///
/// `distance` is meters when present; otherwise the odometer pair is the
/// fallback. Durations are seconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trip {
    pub device: Option<EntityRef>,
    pub distance: Option<f64>,
    pub start_odometer: Option<f64>,
    pub stop_odometer: Option<f64>,
    pub idle_duration: Option<f64>,
    pub drive_duration: Option<f64>,
    pub start: Option<DateTime<Utc>>,
}

impl EntityRef {
    /// Returns the referenced id, treating an empty string as absent.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}
