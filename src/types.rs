use std::fmt;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Deserialize, Serializer};

/// Project-wide Result type
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Serial number shared by the issuance log and the revocation service
pub type Serial = i64;

/// Seconds since the Unix epoch of `0001-01-01T00:00:00Z`, the revocation service's "not revoked" value
pub const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Wire form of the zero timestamp
pub const ZERO_TIME_RFC3339: &str = "0001-01-01T00:00:00Z";

/// Whether `t` is the revocation service's zero timestamp
pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.timestamp() == ZERO_TIME_SECS && t.timestamp_subsec_nanos() == 0
}

/// Format a timestamp as RFC 3339 with a `Z` suffix
pub fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn serialize_time<S: Serializer>(t: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format_time(t))
}

fn serialize_opt_time<S: Serializer>(t: &Option<DateTime<Utc>>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match t {
        Some(t) => serialize_time(t, s),
        None => s.serialize_none(),
    }
}

/// Entry of the issuance log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    /// Serial number
    pub serial: Serial,
    /// Identity that requested the certificate
    pub requester: String,
    /// Subject of the certificate
    pub subject: String,
    /// Issuance time
    pub issued: DateTime<Utc>,
    /// Expiry time
    pub expires: DateTime<Utc>,
}

/// Issuance record merged with its current revocation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub serial: Serial,
    pub requester: String,
    pub subject: String,
    #[serde(serialize_with = "serialize_time")]
    pub issued: DateTime<Utc>,
    #[serde(serialize_with = "serialize_time")]
    pub expires: DateTime<Utc>,
    /// Set only when the revocation service reports a non-zero timestamp
    #[serde(serialize_with = "serialize_opt_time")]
    pub revoked: Option<DateTime<Utc>>,
}

impl Certificate {
    /// Attach a revocation state to an issuance record
    pub fn from_record(record: CertificateRecord, revoked: Option<DateTime<Utc>>) -> Self {
        Self {
            serial: record.serial,
            requester: record.requester,
            subject: record.subject,
            issued: record.issued,
            expires: record.expires,
            revoked,
        }
    }
}

/// Outcome of a single revoke/unrevoke request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionOutcome {
    /// Certificate was not revoked and now is
    Revoked,
    /// Certificate was revoked and now is not
    Unrevoked,
    /// Certificate already was in the requested state, nothing was written
    Unchanged,
}

impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionOutcome::Revoked => write!(f, "revoked"),
            TransitionOutcome::Unrevoked => write!(f, "unrevoked"),
            TransitionOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zero_time_detection() {
        let zero: DateTime<Utc> = ZERO_TIME_RFC3339.parse().unwrap();
        assert!(is_zero_time(&zero));

        let revoked = Utc.with_ymd_and_hms(2019, 10, 12, 7, 20, 50).unwrap();
        assert!(!is_zero_time(&revoked));
    }

    #[test]
    fn test_certificate_json_shape() {
        let cert = Certificate {
            serial: 2,
            requester: "requester_2".to_string(),
            subject: "sub_2".to_string(),
            issued: Utc.with_ymd_and_hms(2020, 6, 23, 0, 0, 0).unwrap(),
            expires: Utc.with_ymd_and_hms(2022, 6, 23, 0, 0, 0).unwrap(),
            revoked: Some(Utc.with_ymd_and_hms(2019, 10, 12, 7, 20, 50).unwrap()),
        };

        let value = serde_json::to_value(&cert).unwrap();
        assert_eq!(value["serial"], 2);
        assert_eq!(value["issued"], "2020-06-23T00:00:00Z");
        assert_eq!(value["revoked"], "2019-10-12T07:20:50Z");

        let unrevoked = Certificate { revoked: None, ..cert };
        let value = serde_json::to_value(&unrevoked).unwrap();
        assert!(value["revoked"].is_null());
    }

    #[test]
    fn test_outcome_display_matches_wire() {
        for outcome in [TransitionOutcome::Revoked, TransitionOutcome::Unrevoked, TransitionOutcome::Unchanged] {
            let wire = serde_json::to_value(outcome).unwrap();
            assert_eq!(wire, outcome.to_string());
        }
    }
}
