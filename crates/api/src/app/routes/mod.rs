use axum::{Router, routing::get};

pub mod api_keys;
pub mod events;
pub mod password_reset;
pub mod system;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/api-keys", api_keys::router())
        .nest("/events", events::router())
}
