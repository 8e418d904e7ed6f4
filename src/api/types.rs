use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::api::handlers::login::LoginProxy;
use crate::auth::AuthGateway;
use crate::config::Config;
use crate::reconcile::ReconciliationEngine;

/// Name of the header carrying the unpaginated match count
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// API state shared between handlers
#[derive(Clone)]
pub struct ApiState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Merged view and revocation toggles
    pub engine: Arc<ReconciliationEngine>,
    /// Bearer credential check
    pub auth: AuthGateway,
    /// Token issuer behind `/login`, if configured
    pub login: Option<Arc<LoginProxy>>,
}

/// Identity bound to a request once its bearer credential is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

/// Body of `PUT /certificates/<serial>`
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleRequest {
    /// `true` to revoke, `false` to unrevoke
    pub revoke: bool,
}
