use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    http::HeaderName,
    response::IntoResponse,
    Extension, Json,
};
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ApiResult;
use crate::api::types::{ApiState, Principal, ToggleRequest, TOTAL_COUNT_HEADER};
use crate::error::Error;
use crate::query::{parse_filter, parse_pagination};
use crate::types::{Serial, TransitionOutcome};

/// List certificates merged with their revocation state
///
/// # Route
///
/// `GET /certificates?filter[subject]=<v>&per_page=<n>&page=<n>`
///
/// Responds with a JSON array ordered by serial and an `X-Total-Count`
/// header holding the number of matches before pagination.
pub async fn list_certificates(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let filter = parse_filter(&params);
    let pagination = parse_pagination(&params, state.config.api.default_per_page)?;

    debug!(
        "{} lists certificates (filter: {:?}, pagination: {:?})",
        principal.0, filter, pagination
    );

    let page = state.engine.list(filter.as_ref(), pagination).await?;

    Ok((
        [(HeaderName::from_static(TOTAL_COUNT_HEADER), page.total.to_string())],
        Json(page.certificates),
    ))
}

/// Revoke or unrevoke one certificate
///
/// # Route
///
/// `PUT /certificates/<serial>` with body `{"revoke": true|false}`
///
/// Responds with `{"<serial>": "revoked"|"unrevoked"|"unchanged"}`.
pub async fn toggle_revocation(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(serial): Path<String>,
    body: Bytes,
) -> ApiResult<Json<BTreeMap<String, TransitionOutcome>>> {
    let serial: Serial = serial
        .parse()
        .map_err(|_| Error::InvalidSerial(serial.clone()))?;

    let request: ToggleRequest = serde_json::from_slice(&body)
        .map_err(|e| Error::MalformedBody(format!("Invalid request body: {}", e)))?;

    debug!("{} requests revoke={} for serial {}", principal.0, request.revoke, serial);

    let outcome = state.engine.toggle(serial, request.revoke).await?;

    Ok(Json(BTreeMap::from([(serial.to_string(), outcome)])))
}
