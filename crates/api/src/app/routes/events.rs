//! Event endpoints. Every read goes through the tenant/ACL scope filter, so
//! absent, wrong-tenant and ACL-missing lookups share one not-found surface.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;

use eventum_auth::{Capability, EventScope, OrgContext, is_mutation_restricted};
use eventum_core::{EventId, UserId};
use eventum_infra::{EventRecord, EventRepository};

use crate::app::{AppServices, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_event).get(list_events))
        .route("/:id", get(get_event))
        .route("/:id/abstracts", get(list_abstracts))
        .route("/:id/reviewers", post(grant_reviewer))
}

/// Role-gate a mutation. API-key callers carry no role and act as the
/// tenant itself, so only session roles are checked.
fn mutation_allowed(ctx: &OrgContext, capability: &'static str) -> bool {
    match ctx.role() {
        Some(role) => !is_mutation_restricted(role, &Capability::new(capability)),
        None => true,
    }
}

pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
    Json(body): Json<dto::CreateEventRequest>,
) -> axum::response::Response {
    if !mutation_allowed(&ctx, "events.create") {
        return errors::forbidden();
    }
    let name = body.name.trim();
    if name.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "name must not be empty",
        );
    }

    let record = EventRecord {
        id: EventId::new(),
        organization_id: ctx.organization_id(),
        name: name.to_string(),
        starts_at: body.starts_at,
        created_at: Utc::now(),
    };
    match services.events.insert(record.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(dto::event_to_json(&record))).into_response(),
        Err(error) => errors::store_error(error),
    }
}

pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
) -> axum::response::Response {
    let scope = EventScope::for_context(&ctx, None);
    match services.events.list_scoped(&scope).await {
        Ok(records) => {
            let items: Vec<_> = records.iter().map(dto::event_to_json).collect();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(error) => errors::store_error(error),
    }
}

pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match find_scoped(&services, &ctx, &id).await {
        Ok(record) => (StatusCode::OK, Json(dto::event_to_json(&record))).into_response(),
        Err(response) => response,
    }
}

/// Abstract workflow view for one event (the sub-path restricted roles may
/// reach). The abstracts themselves are generic CRUD outside this core; the
/// event lookup still goes through the scope filter.
pub async fn list_abstracts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match find_scoped(&services, &ctx, &id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "event": dto::event_to_json(&record), "items": [] })),
        )
            .into_response(),
        Err(response) => response,
    }
}

pub async fn grant_reviewer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<OrgContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::GrantReviewerRequest>,
) -> axum::response::Response {
    if !mutation_allowed(&ctx, "events.update") {
        return errors::forbidden();
    }
    // Resolve through the caller's scope first, so a cross-tenant grant is
    // structurally unconstructible.
    let record = match find_scoped(&services, &ctx, &id).await {
        Ok(record) => record,
        Err(response) => return response,
    };
    let user_id = UserId::from_uuid(body.user_id);
    match services.events.grant_reviewer(record.id, user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "event_id": record.id, "user_id": user_id })),
        )
            .into_response(),
        Err(error) => errors::store_error(error),
    }
}

/// Shared scoped resolution. Malformed ids resolve through the same
/// not-found surface as misses; nothing here can leak existence.
async fn find_scoped(
    services: &AppServices,
    ctx: &OrgContext,
    raw_id: &str,
) -> Result<EventRecord, axum::response::Response> {
    let Ok(event_id) = raw_id.parse::<EventId>() else {
        return Err(errors::not_found());
    };
    let scope = EventScope::for_context(ctx, Some(event_id));
    match services.events.find_scoped(&scope).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(errors::not_found()),
        Err(error) => Err(errors::store_error(error)),
    }
}
