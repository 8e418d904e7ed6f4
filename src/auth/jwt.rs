use std::collections::HashSet;
use std::path::Path;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use crate::auth::TokenVerifier;
use crate::error::Error;
use crate::types::Result;

/// Claims read from the token
#[derive(Debug, Deserialize)]
struct Claims {
    /// Subject
    sub: Option<String>,
}

/// ES256 token verifier
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier from an ECDSA public key in PEM form
    pub fn from_ec_pem(pem: &[u8]) -> Result<Self> {
        let key = DecodingKey::from_ec_pem(pem)
            .map_err(|e| Error::Config(format!("Invalid token public key: {}", e)))?;

        // Only `sub` is needed; exp/nbf are still checked when present
        let mut validation = Validation::new(Algorithm::ES256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self { key, validation })
    }

    /// Create a verifier from a PEM file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading token public key from {}", path.display());
        let pem = std::fs::read(path)?;
        Self::from_ec_pem(&pem)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| Error::Auth(format!("Invalid token: {}", e)))?;

        match data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(Error::Auth("Token has no \"sub\" claim".into())),
        }
    }
}
