// src/api/middlewares.rs
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info};
use std::time::Instant;
use uuid::Uuid;

use crate::api::types::{ApiState, Principal};
use crate::error::Error;

pub async fn logging_middleware<B>(
    req: Request<B>,
    next: Next<B>
) -> Response {
    let path = req.uri().path().to_owned();
    let method = req.method().clone();

    let start = Instant::now();
    debug!("Request started: {} {}", method, path);

    let res = next.run(req).await;

    let duration = start.elapsed();
    info!("Request completed: {} {} {} - {:?}", method, path, res.status().as_u16(), duration);

    res
}

/// Stamp every response with a fresh request id
pub async fn request_id_middleware<B>(
    req: Request<B>,
    next: Next<B>
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(HeaderName::from_static("x-request-id"), value);
    }

    res
}

/// Reject requests without an acceptable bearer credential
///
/// Runs before any handler, so a rejected request touches neither the
/// issuance log nor the revocation service.
pub async fn require_bearer<B>(
    State(state): State<ApiState>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, Error> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| Error::Auth("Malformed Authorization header".into()))
        })
        .transpose()?;

    let subject = state.auth.authenticate(authorization)?;
    debug!("Authenticated request from {}", subject);

    req.extensions_mut().insert(Principal(subject));
    Ok(next.run(req).await)
}
