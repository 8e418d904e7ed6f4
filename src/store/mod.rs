pub mod sqlite;

use async_trait::async_trait;

use crate::query::{Filter, Pagination};
use crate::types::{CertificateRecord, Result};

pub use sqlite::SqliteIssuanceLog;

/// Read-only access to the certificate issuance log
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssuanceLog: Send + Sync {
    /// Number of records matching `filter`
    async fn count<'a>(&self, filter: Option<&'a Filter>) -> Result<u64>;

    /// Records matching `filter`, ascending by serial, restricted to one page when `pagination` is set
    async fn list<'a>(
        &self,
        filter: Option<&'a Filter>,
        pagination: Option<Pagination>,
    ) -> Result<Vec<CertificateRecord>>;
}
