use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{is_zero_time, Serial};

/// Entry of the `/all` listing
///
/// Only `revoked` matters here; the other fields mirror the service's own records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteEntry {
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
    /// RFC 3339 timestamp; the zero time or null means not revoked
    #[serde(default)]
    pub revoked: Option<DateTime<Utc>>,
}

/// Body of `PUT /update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub serial: Serial,
    /// RFC 3339 timestamp, the zero time to clear
    pub revoked: String,
}

/// Point-in-time view of the revocation service
///
/// Holds only serials with a non-zero revocation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevocationSnapshot {
    revoked: HashMap<Serial, DateTime<Utc>>,
}

impl RevocationSnapshot {
    /// Build a snapshot from the `/all` listing, dropping zero timestamps
    pub fn from_entries(entries: HashMap<Serial, RemoteEntry>) -> Self {
        let revoked = entries
            .into_iter()
            .filter_map(|(serial, entry)| match entry.revoked {
                Some(t) if !is_zero_time(&t) => Some((serial, t)),
                _ => None,
            })
            .collect();

        Self { revoked }
    }

    /// Revocation time of `serial`, `None` when it is not revoked
    pub fn revoked_at(&self, serial: Serial) -> Option<DateTime<Utc>> {
        self.revoked.get(&serial).copied()
    }

    /// Whether `serial` is currently revoked
    pub fn is_revoked(&self, serial: Serial) -> bool {
        self.revoked.contains_key(&serial)
    }

    /// Number of revoked serials
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

impl FromIterator<(Serial, DateTime<Utc>)> for RevocationSnapshot {
    fn from_iter<I: IntoIterator<Item = (Serial, DateTime<Utc>)>>(iter: I) -> Self {
        Self {
            revoked: iter.into_iter().filter(|(_, t)| !is_zero_time(t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_drops_zero_and_null() {
        let body = r#"{
            "1": {"requester": "requester_1", "subject": "sub_1", "revoked": "0001-01-01T00:00:00Z"},
            "2": {"requester": "requester_2", "subject": "sub_2", "revoked": "2019-10-12T07:20:50Z"},
            "3": {"revoked": null},
            "4": {}
        }"#;

        let entries: HashMap<Serial, RemoteEntry> = serde_json::from_str(body).unwrap();
        let snapshot = RevocationSnapshot::from_entries(entries);

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.is_revoked(1));
        assert_eq!(
            snapshot.revoked_at(2),
            Some("2019-10-12T07:20:50Z".parse().unwrap())
        );
        assert_eq!(snapshot.revoked_at(3), None);
        assert_eq!(snapshot.revoked_at(4), None);
        assert_eq!(snapshot.revoked_at(99), None);
    }
}
