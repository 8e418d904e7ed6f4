pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod routes;
pub mod server;
pub mod types;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthGateway, JwtVerifier};
use crate::config::Config;
use crate::error::Error;
use crate::reconcile::ReconciliationEngine;
use crate::revocation::HttpRevocationClient;
use crate::store::SqliteIssuanceLog;

use self::handlers::login::LoginProxy;
use self::types::ApiState;

pub use routes::create_router;
pub use server::ApiServer;

/// Wire the issuance log, revocation client and credential checks from `config`
pub fn build_state(config: Arc<Config>) -> Result<ApiState, Error> {
    let log = SqliteIssuanceLog::open(&config.storage.database_path)?;
    let revocations = HttpRevocationClient::new(
        &config.revocation.base_url,
        config.revocation_timeout(),
    )?;
    let engine = ReconciliationEngine::new(Arc::new(log), Arc::new(revocations));

    let verifier = JwtVerifier::from_file(&config.auth.public_key_path)?;
    let auth = AuthGateway::new(Arc::new(verifier), config.auth.allowed_subject.clone());

    let login = match &config.auth.issuer_url {
        Some(url) => {
            info!("Login requests are forwarded to {}", url);
            Some(Arc::new(LoginProxy::new(
                url,
                config.auth.issuer_accept_invalid_certs,
            )?))
        }
        None => None,
    };

    Ok(ApiState {
        config,
        engine: Arc::new(engine),
        auth,
        login,
    })
}
