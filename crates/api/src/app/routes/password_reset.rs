//! Password-reset request/verification endpoints.
//!
//! Both are unauthenticated and therefore throttled per normalized email.
//! Token issuance, email delivery and code verification belong to external
//! collaborators; the responses never reveal whether an account exists.

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;

use crate::app::{AppServices, dto, errors};

const REQUEST_LIMIT: u32 = 5;
const REQUEST_WINDOW: Duration = Duration::from_secs(15 * 60);

const VERIFY_LIMIT: u32 = 10;
const VERIFY_WINDOW: Duration = Duration::from_secs(15 * 60);

pub fn router() -> Router {
    Router::new()
        .route("/password-reset/request", post(request_reset))
        .route("/password-reset/verify", post(verify_reset))
}

pub async fn request_reset(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PasswordResetRequest>,
) -> axum::response::Response {
    let key = throttle_key("password-reset", &body.email);
    let decision = services.limiter.check(&key, REQUEST_LIMIT, REQUEST_WINDOW);
    if !decision.allowed {
        return errors::rate_limited(decision.retry_after_seconds);
    }
    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" }))).into_response()
}

pub async fn verify_reset(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PasswordResetVerify>,
) -> axum::response::Response {
    let key = throttle_key("password-reset-verify", &body.email);
    let decision = services.limiter.check(&key, VERIFY_LIMIT, VERIFY_WINDOW);
    if !decision.allowed {
        return errors::rate_limited(decision.retry_after_seconds);
    }
    // Code verification lives with the identity-provider collaborator; an
    // unknown or stale code is rejected with the same uniform response.
    errors::unauthorized()
}

fn throttle_key(namespace: &str, email: &str) -> String {
    format!("{namespace}:{}", email.trim().to_ascii_lowercase())
}
