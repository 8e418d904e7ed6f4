pub mod jwt;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use tracing::warn;

use crate::error::Error;
use crate::types::Result;

pub use jwt::JwtVerifier;

/// Verifies a bearer token and returns its subject
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String>;
}

/// Checks the bearer credential of a request against the single allowed subject
#[derive(Clone)]
pub struct AuthGateway {
    verifier: Arc<dyn TokenVerifier>,
    allowed_subject: String,
}

impl AuthGateway {
    /// Create a new gateway
    pub fn new(verifier: Arc<dyn TokenVerifier>, allowed_subject: impl Into<String>) -> Self {
        Self {
            verifier,
            allowed_subject: allowed_subject.into(),
        }
    }

    /// Authenticate an `Authorization` header value, returning the caller's subject
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<String> {
        let authorization = authorization
            .ok_or_else(|| Error::Auth("Missing Authorization header".into()))?;

        let token = match authorization.split_once(' ') {
            Some(("Bearer", token)) if !token.trim().is_empty() => token.trim(),
            _ => return Err(Error::Auth("Malformed Authorization header".into())),
        };

        let subject = self.verifier.verify(token)?;

        if subject != self.allowed_subject {
            warn!("Rejected verified subject {}", subject);
            return Err(Error::Auth("Wrong username".into()));
        }

        Ok(subject)
    }
}
