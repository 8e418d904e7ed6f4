use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{debug, info};

use crate::query::{Filter, Pagination};
use crate::revocation::{RevocationSnapshot, RevocationStatus};
use crate::store::IssuanceLog;
use crate::types::{Certificate, CertificateRecord, Result, Serial, TransitionOutcome};

/// One page of the merged certificate view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePage {
    /// Number of records matching the filter, regardless of pagination
    pub total: u64,
    /// Merged records on this page, ascending by serial
    pub certificates: Vec<Certificate>,
}

/// Joins the issuance log with the revocation service and toggles revocation state
///
/// Nothing is cached between calls. Toggles on the same serial from concurrent
/// requests are not serialized: each reads the remote state, decides and pushes
/// on its own.
pub struct ReconciliationEngine {
    /// Authoritative list of issued certificates
    log: Arc<dyn IssuanceLog>,
    /// Authoritative revocation state
    revocations: Arc<dyn RevocationStatus>,
}

impl ReconciliationEngine {
    /// Create a new engine
    pub fn new(log: Arc<dyn IssuanceLog>, revocations: Arc<dyn RevocationStatus>) -> Self {
        Self { log, revocations }
    }

    /// Merged view of the certificates matching `filter`
    ///
    /// Reads the count, then the records, then the revocation snapshot, and
    /// stops at the first failure.
    pub async fn list(
        &self,
        filter: Option<&Filter>,
        pagination: Option<Pagination>,
    ) -> Result<CertificatePage> {
        let total = self.log.count(filter).await?;
        let records = self.log.list(filter, pagination).await?;
        let snapshot = self.revocations.fetch_all().await?;

        debug!(
            "Merging {} issuance records with {} revoked serials",
            records.len(),
            snapshot.len()
        );

        Ok(CertificatePage {
            total,
            certificates: merge(records, &snapshot),
        })
    }

    /// Revoke (`request_revoke == true`) or unrevoke `serial`
    ///
    /// Nothing is pushed when the serial already is in the requested state.
    pub async fn toggle(&self, serial: Serial, request_revoke: bool) -> Result<TransitionOutcome> {
        let snapshot = self.revocations.fetch_all().await?;
        let currently_revoked = snapshot.is_revoked(serial);

        let outcome = match (request_revoke, currently_revoked) {
            (true, true) | (false, false) => TransitionOutcome::Unchanged,
            (true, false) => {
                let now = Utc::now().trunc_subsecs(0);
                self.revocations.push(serial, Some(now)).await?;
                TransitionOutcome::Revoked
            }
            (false, true) => {
                self.revocations.push(serial, None).await?;
                TransitionOutcome::Unrevoked
            }
        };

        info!("Toggle on serial {} (revoke={}): {}", serial, request_revoke, outcome);
        Ok(outcome)
    }
}

/// Attach revocation times from `snapshot` to `records`
///
/// Serials present only in the snapshot are not surfaced.
pub fn merge(records: Vec<CertificateRecord>, snapshot: &RevocationSnapshot) -> Vec<Certificate> {
    records
        .into_iter()
        .map(|record| {
            let revoked = snapshot.revoked_at(record.serial);
            Certificate::from_record(record, revoked)
        })
        .collect()
}
