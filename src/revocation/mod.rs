pub mod types;
pub mod client;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{Result, Serial};

pub use types::RevocationSnapshot;
pub use client::HttpRevocationClient;

/// Revocation-status service interface
///
/// Every call is one round trip. Nothing is cached, and a push is not
/// guaranteed to be visible to a later `fetch_all`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevocationStatus: Send + Sync {
    /// Read the revocation state of every serial the service knows about
    async fn fetch_all(&self) -> Result<RevocationSnapshot>;

    /// Set the revocation time of `serial`, or clear it with `None`
    async fn push(&self, serial: Serial, revoked: Option<DateTime<Utc>>) -> Result<()>;
}
