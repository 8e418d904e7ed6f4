//! Router fixtures for handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};

use crate::api::handlers::login::LoginProxy;
use crate::api::routes::create_router;
use crate::api::types::ApiState;
use crate::auth::testing::PUBLIC_KEY_PEM;
use crate::auth::{AuthGateway, JwtVerifier};
use crate::config::Config;
use crate::error::Error;
use crate::reconcile::ReconciliationEngine;
use crate::revocation::{RevocationSnapshot, RevocationStatus};
use crate::store::sqlite::tests::seeded_log;
use crate::telemetry::logging::init_test_logging;
use crate::types::{Result, Serial};

pub(crate) use crate::revocation::client::tests::spawn_stub;

#[derive(Default)]
struct FakeState {
    revoked: HashMap<Serial, DateTime<Utc>>,
    fetches: usize,
    pushes: usize,
    failure: Option<String>,
}

/// In-memory revocation service that applies pushes and counts calls
#[derive(Clone, Default)]
pub(crate) struct FakeRevocations {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRevocations {
    pub(crate) fn with_revoked(entries: &[(Serial, &str)]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            for (serial, at) in entries {
                let at = DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Utc);
                state.revoked.insert(*serial, at);
            }
        }
        fake
    }

    /// Make every later call fail with a remote error carrying `detail`
    pub(crate) fn fail_with(&self, detail: &str) {
        self.state.lock().unwrap().failure = Some(detail.to_string());
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub(crate) fn push_count(&self) -> usize {
        self.state.lock().unwrap().pushes
    }

    pub(crate) fn revoked_at(&self, serial: Serial) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().revoked.get(&serial).copied()
    }
}

#[async_trait]
impl RevocationStatus for FakeRevocations {
    async fn fetch_all(&self) -> Result<RevocationSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if let Some(detail) = &state.failure {
            return Err(Error::RemoteError(detail.clone()));
        }
        Ok(state.revoked.iter().map(|(s, t)| (*s, *t)).collect())
    }

    async fn push(&self, serial: Serial, revoked: Option<DateTime<Utc>>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pushes += 1;
        if let Some(detail) = &state.failure {
            return Err(Error::RemoteError(detail.clone()));
        }
        match revoked {
            Some(at) => state.revoked.insert(serial, at),
            None => state.revoked.remove(&serial),
        };
        Ok(())
    }
}

fn test_state(
    rows: &[(i64, &str)],
    remote: FakeRevocations,
    login: Option<Arc<LoginProxy>>,
) -> ApiState {
    init_test_logging();

    let mut config = Config::default();
    config.auth.allowed_subject = "operator".to_string();

    let verifier = JwtVerifier::from_ec_pem(PUBLIC_KEY_PEM.as_bytes()).unwrap();

    ApiState {
        config: Arc::new(config),
        engine: Arc::new(ReconciliationEngine::new(
            Arc::new(seeded_log(rows)),
            Arc::new(remote),
        )),
        auth: AuthGateway::new(Arc::new(verifier), "operator"),
        login,
    }
}

/// Full router over a seeded issuance log, accepting tokens for `operator`
pub(crate) fn test_router(rows: &[(i64, &str)], remote: FakeRevocations) -> Router {
    create_router(test_state(rows, remote, None))
}

pub(crate) fn test_router_with_login(
    rows: &[(i64, &str)],
    remote: FakeRevocations,
    login: Arc<LoginProxy>,
) -> Router {
    create_router(test_state(rows, remote, Some(login)))
}
