use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;

use eventum_infra::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Uniform 401: missing, invalid and expired credentials are
/// indistinguishable.
pub fn unauthorized() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
}

/// Uniform 403: no policy detail disclosed.
pub fn forbidden() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden")
}

/// Uniform 404: absent, wrong-tenant and ACL-missing lookups all land here.
pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}

/// 429 with retry guidance; throttling is deliberately not a secret.
pub fn rate_limited(retry_after_seconds: u64) -> axum::response::Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        axum::Json(json!({
            "error": "rate_limited",
            "message": "too many requests",
            "retry_after_seconds": retry_after_seconds,
        })),
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

/// Storage failures become one generic server error; details stay in logs.
pub fn store_error(error: StoreError) -> axum::response::Response {
    tracing::error!(%error, "storage failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
}
