use axum::http::{header, HeaderName, Method};
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    certificates::{list_certificates, toggle_revocation},
    login::login,
};
use crate::api::middlewares::{logging_middleware, request_id_middleware, require_bearer};
use crate::api::types::{ApiState, TOTAL_COUNT_HEADER};

/// Create router with all API routes
///
/// Certificate routes sit behind the bearer check. `/login` is mounted only
/// when a token issuer is configured.
pub fn create_router(state: ApiState) -> Router {
    let prefix = state.config.api.path_prefix.trim_end_matches('/').to_string();

    let protected_routes = Router::new()
        .route("/certificates", get(list_certificates))
        .route("/certificates/:serial", put(toggle_revocation))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let mut api_routes = Router::new().merge(protected_routes);
    if state.login.is_some() {
        api_routes = api_routes.route("/login", post(login));
    }

    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(&prefix, api_routes)
    };

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer());

    router.layer(middleware_stack).with_state(state)
}

/// Any origin may call the API and read the total-count header
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(TOTAL_COUNT_HEADER)])
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::api::testing::{test_router, FakeRevocations};
    use crate::auth::testing::sign_subject;

    #[tokio::test]
    async fn test_preflight_allows_any_origin() {
        let app = test_router(&[], FakeRevocations::default());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v0/certificates")
            .header(header::ORIGIN, "https://admin.example.org")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_total_count_is_exposed() {
        let app = test_router(&[(1, "sub_1")], FakeRevocations::default());

        let request = Request::builder()
            .uri("/api/v0/certificates")
            .header(header::ORIGIN, "https://admin.example.org")
            .header(header::AUTHORIZATION, format!("Bearer {}", sign_subject("operator")))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let exposed = response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS]
            .to_str()
            .unwrap();
        assert!(exposed.contains("x-total-count"));
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_router(&[], FakeRevocations::default());

        let request = Request::builder()
            .uri("/api/v0/unknown")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
