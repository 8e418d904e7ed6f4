use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use tracing::{debug, info};
use url::Url;

use crate::error::Error;
use crate::revocation::types::{RemoteEntry, RevocationSnapshot, UpdateRequest};
use crate::revocation::RevocationStatus;
use crate::types::{format_time, Result, Serial, ZERO_TIME_RFC3339};

/// HTTP/JSON client for the revocation-status service
#[derive(Debug, Clone)]
pub struct HttpRevocationClient {
    /// HTTP client
    client: Client,
    /// `GET` endpoint listing every known serial
    all_url: Url,
    /// `PUT` endpoint updating one serial
    update_url: Url,
}

impl HttpRevocationClient {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = base_url.trim_end_matches('/');

        let all_url = Url::parse(&format!("{}/all", base))
            .map_err(|e| Error::Config(format!("Invalid revocation service URL: {}", e)))?;
        let update_url = Url::parse(&format!("{}/update", base))
            .map_err(|e| Error::Config(format!("Invalid revocation service URL: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            all_url,
            update_url,
        })
    }

    /// Turn a non-success response into `RemoteError` carrying the body
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let detail = if text.trim().is_empty() {
            status.to_string()
        } else {
            text.trim().to_string()
        };

        Err(Error::RemoteError(detail))
    }
}

#[async_trait]
impl RevocationStatus for HttpRevocationClient {
    async fn fetch_all(&self) -> Result<RevocationSnapshot> {
        debug!("Fetching revocation states from {}", self.all_url);

        let response = self
            .client
            .get(self.all_url.clone())
            .send()
            .await
            .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

        let response = Self::check_status(response).await?;

        // An empty service answers `null`
        let entries: Option<HashMap<Serial, RemoteEntry>> = response
            .json()
            .await
            .map_err(|e| Error::RemoteError(format!("Invalid response from revocation service: {}", e)))?;

        let snapshot = RevocationSnapshot::from_entries(entries.unwrap_or_default());
        debug!("Revocation service reports {} revoked serials", snapshot.len());

        Ok(snapshot)
    }

    async fn push(&self, serial: Serial, revoked: Option<DateTime<Utc>>) -> Result<()> {
        let body = UpdateRequest {
            serial,
            revoked: revoked
                .map(|t| format_time(&t))
                .unwrap_or_else(|| ZERO_TIME_RFC3339.to_string()),
        };

        debug!("Pushing revocation state {} for serial {}", body.revoked, serial);

        let response = self
            .client
            .put(self.update_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::RemoteUnavailable(e.to_string()))?;

        Self::check_status(response).await?;

        info!("Revocation state of serial {} set to {}", serial, body.revoked);
        Ok(())
    }
}
