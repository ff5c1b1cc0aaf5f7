// src/server/routes.rs
//! Axum router configuration for the recipe server

use crate::server::SharedState;
use crate::server::handlers::{self, recipes};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the main application router
pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.cors_allowed_origins);
    let body_limit = state.body_limit();

    let api_routes = Router::new()
        .route(
            "/api/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/:id",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/api/stats", get(handlers::stats))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// CORS for the configured origins; any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Count recipe API requests and their failures
async fn track_requests(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let counted = request.uri().path().starts_with("/api/recipes");
    let response = next.run(request).await;

    if counted {
        state.metrics.record_request();
        state.metrics.record_error(response.status().as_u16());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeService;
    use crate::server::ServerState;
    use crate::store::MemoryRecipeStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(origins: &[&str]) -> SharedState {
        let service = RecipeService::new(Arc::new(MemoryRecipeStore::new()), None);
        let mut state = ServerState::with_service(service, 1024);
        state.cors_allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        Arc::new(state)
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state(&[]));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_requests_are_counted() {
        let state = test_state(&[]);
        let app = create_router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/recipes/not-a-valid-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.requests_total, 1);
        assert_eq!(snapshot.client_errors, 1);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = create_router(test_state(&["http://localhost:3000"]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/recipes")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }
}
