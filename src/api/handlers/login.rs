use axum::{
    extract::State,
    http::{header::{AUTHORIZATION, CONTENT_TYPE}, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::api::errors::ApiResult;
use crate::api::types::ApiState;
use crate::error::Error;
use crate::types::Result;

/// Forwards login requests to the token issuer
pub struct LoginProxy {
    client: Client,
    url: String,
}

impl LoginProxy {
    /// Create a proxy for the issuer at `url`
    pub fn new(url: &str, accept_invalid_certs: bool) -> Result<Self> {
        if accept_invalid_certs {
            warn!("TLS certificate checks disabled for token issuer {}", url);
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build issuer client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// POST to the issuer with the caller's `Authorization` header and return the token body
    pub async fn forward(&self, authorization: Option<&HeaderValue>) -> Result<Bytes> {
        let mut request = self.client.post(&self.url);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Issuer(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .bytes()
                .await
                .map_err(|e| Error::Issuer(e.to_string())),
            StatusCode::UNAUTHORIZED => {
                Err(Error::Auth("Unrecognized username or password".into()))
            }
            status => Err(Error::Issuer(status.to_string())),
        }
    }
}

/// Exchange issuer credentials for a bearer token
///
/// # Route
///
/// `POST /login`
pub async fn login(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let proxy = state
        .login
        .as_ref()
        .ok_or_else(|| Error::Internal("Login is not configured".into()))?;

    debug!("Forwarding login request to token issuer");
    let token = proxy.forward(headers.get(AUTHORIZATION)).await?;

    Ok(([(CONTENT_TYPE, "application/json")], token))
}
