pub mod auth;
mod books;
pub mod error;
mod requests;
pub mod validation;

use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Resource routes; authorization is enforced per handler through the
    // Identity/Admin extractors, so GET /books can stay public.
    let api_routes = Router::new()
        .route("/requests", post(requests::create_request))
        .route("/requests", get(requests::list_requests))
        .route("/requests/me", get(requests::list_my_requests))
        .route("/requests/:id", patch(requests::update_request_status))
        .route("/books", post(books::create_book))
        .route("/books", get(books::list_books));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    match config.cors.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                origin = %config.cors.allowed_origin,
                "Invalid CORS origin in config, allowing any origin"
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

async fn root() -> &'static str {
    "Library Book Request & Tracking System API"
}

async fn health_check() -> &'static str {
    "OK"
}
