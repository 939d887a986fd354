//! Tenant API key management.
//!
//! Management requires a session-derived context: an API key cannot mint,
//! list or revoke keys. Mutations additionally pass the role gate.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use serde_json::json;

use eventum_auth::{Capability, OrgContext, is_mutation_restricted};
use eventum_core::ApiKeyId;

use crate::app::{AppServices, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_key).get(list_keys))
        .route("/:id", delete(revoke_key))
}

fn gate(ctx: &OrgContext, capability: &'static str) -> Result<(), axum::response::Response> {
    let Some(role) = ctx.role() else {
        return Err(errors::forbidden());
    };
    if is_mutation_restricted(role, &Capability::new(capability)) {
        return Err(errors::forbidden());
    }
    Ok(())
}

pub async fn create_key(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
    Json(body): Json<dto::CreateApiKeyRequest>,
) -> axum::response::Response {
    if let Err(denied) = gate(&ctx, "api_keys.create") {
        return denied;
    }
    let label = body.label.trim();
    if label.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "label must not be empty",
        );
    }

    match services
        .api_keys
        .create(ctx.organization_id(), label, body.expires_at)
        .await
    {
        // The plaintext appears in this response and nowhere else.
        Ok(issued) => (StatusCode::CREATED, Json(dto::issued_key_to_json(&issued))).into_response(),
        Err(error) => errors::store_error(error),
    }
}

pub async fn list_keys(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
) -> axum::response::Response {
    if let Err(denied) = gate(&ctx, "api_keys.read") {
        return denied;
    }
    match services.api_keys.list(ctx.organization_id()).await {
        Ok(keys) => {
            let items: Vec<_> = keys.iter().map(dto::api_key_to_json).collect();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(error) => errors::store_error(error),
    }
}

pub async fn revoke_key(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(denied) = gate(&ctx, "api_keys.delete") {
        return denied;
    }
    let Ok(id) = id.parse::<ApiKeyId>() else {
        return errors::not_found();
    };
    match services.api_keys.revoke(ctx.organization_id(), id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::not_found(),
        Err(error) => errors::store_error(error),
    }
}
