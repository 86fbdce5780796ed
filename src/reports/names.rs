//! Per-run lookup from device id to display label.

use std::collections::HashMap;

use crate::model::Device;

/// Insertion-ordered map from device id to display name.
///
/// Order matters: every report emits one row per indexed device, and ties in
/// the count sorts fall back to this order.
#[derive(Debug, Default)]
pub struct NameIndex {
    entries: Vec<(String, String)>,
    by_id: HashMap<String, usize>,
}

impl NameIndex {
    /// Builds the index in device order. Display name priority is
    /// name, then serial number, then the id itself; empty strings count as
    /// absent. Duplicate ids keep the first entry.
    pub fn from_devices(devices: &[Device]) -> Self {
        let mut index = Self::default();
        for device in devices {
            if index.by_id.contains_key(&device.id) {
                continue;
            }
            let display = device
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .or(device.serial_number.as_deref().filter(|s| !s.is_empty()))
                .unwrap_or(&device.id)
                .to_string();
            index.by_id.insert(device.id.clone(), index.entries.len());
            index.entries.push((device.id.clone(), display));
        }
        index
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.by_id
            .get(id)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Iterates `(id, display_name)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, name: Option<&str>, serial: Option<&str>) -> Device {
        Device {
            id: id.to_string(),
            name: name.map(str::to_string),
            serial_number: serial.map(str::to_string),
        }
    }

    #[test]
    fn test_display_name_priority() {
        let index = NameIndex::from_devices(&[
            device("d1", Some("Truck A"), Some("SN1")),
            device("d2", None, Some("SN2")),
            device("d3", None, None),
            device("d4", Some(""), Some("")),
        ]);

        assert_eq!(index.display_name("d1"), Some("Truck A"));
        assert_eq!(index.display_name("d2"), Some("SN2"));
        assert_eq!(index.display_name("d3"), Some("d3"));
        assert_eq!(index.display_name("d4"), Some("d4"));
    }

    #[test]
    fn test_every_device_indexed_once() {
        let index = NameIndex::from_devices(&[
            device("d1", Some("A"), None),
            device("d2", Some("B"), None),
            device("d1", Some("A again"), None),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.display_name("d1"), Some("A"));
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let index = NameIndex::from_devices(&[
            device("z", Some("Zulu"), None),
            device("a", Some("Alpha"), None),
            device("m", Some("Mike"), None),
        ]);

        let ids: Vec<&str> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_missing_id_resolves_to_none() {
        let index = NameIndex::from_devices(&[device("d1", Some("A"), None)]);
        assert!(index.display_name("ghost").is_none());
        assert!(!index.contains("ghost"));
    }
}
