//! letsrevoke - certificate listing and revocation API
//!
//! Joins a read-only certificate issuance log with a remote revocation-status
//! service and lets one authorized operator revoke or unrevoke certificates.

// Foundational layer
pub mod error;
pub mod types;
pub mod config;
pub mod telemetry;

// Core layer
pub mod query;
pub mod store;
pub mod revocation;
pub mod reconcile;
pub mod auth;
pub mod index;

// Interface layer
pub mod api;

// Public key types
pub use crate::error::Error;
pub use crate::types::{Certificate, CertificateRecord, Result, Serial, TransitionOutcome};
pub use crate::config::Config;
pub use crate::query::{Filter, FilterField, Pagination};
pub use crate::store::{IssuanceLog, SqliteIssuanceLog};
pub use crate::revocation::{HttpRevocationClient, RevocationSnapshot, RevocationStatus};
pub use crate::reconcile::{CertificatePage, ReconciliationEngine};
pub use crate::auth::{AuthGateway, JwtVerifier, TokenVerifier};
