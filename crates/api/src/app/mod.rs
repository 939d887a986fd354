//! HTTP API application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: shared state built once at startup (stores, key manager, limiter)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        identity: Arc::new(services.identity_resolver()),
    };

    // Protected routes: identity resolution first, then the browser
    // navigation gate. The fallback keeps unmatched paths inside the same
    // middleware stack so the gate sees every navigation target.
    let protected = routes::router()
        .fallback(routes::system::fallback)
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn(
            middleware::route_authorization_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest(
            "/auth",
            routes::password_reset::router().layer(Extension(services)),
        )
        .merge(protected)
}
