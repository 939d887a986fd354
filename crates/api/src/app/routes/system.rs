use axum::{Extension, Json, response::IntoResponse};
use serde_json::json;

use eventum_auth::OrgContext;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Echo the resolved identity (diagnostics; carries no secrets).
pub async fn whoami(Extension(ctx): Extension<OrgContext>) -> impl IntoResponse {
    Json(json!({
        "organization_id": ctx.organization_id(),
        "user_id": ctx.user_id(),
        "role": ctx.role(),
        "auth_method": ctx.auth_method().as_str(),
    }))
}

/// Fallback for unmatched authenticated paths.
///
/// Registered on the protected router so the navigation gate sees every
/// path, routed or not.
pub async fn fallback() -> axum::response::Response {
    crate::app::errors::not_found()
}
