//! Request/response DTOs and JSON mapping helpers.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use eventum_infra::{ApiKeyRecord, EventRecord, IssuedApiKey};

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetVerify {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub label: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct GrantReviewerRequest {
    pub user_id: Uuid,
}

/// The only response that ever carries the plaintext key.
pub fn issued_key_to_json(issued: &IssuedApiKey) -> serde_json::Value {
    json!({
        "id": issued.record.id,
        "key": issued.key,
        "prefix": issued.record.display_prefix,
        "label": issued.record.label,
        "expires_at": issued.record.expires_at,
    })
}

/// Listing form; the digest never leaves the store layer.
pub fn api_key_to_json(record: &ApiKeyRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "label": record.label,
        "prefix": record.display_prefix,
        "is_active": record.is_active,
        "created_at": record.created_at,
        "last_used_at": record.last_used_at,
        "expires_at": record.expires_at,
    })
}

pub fn event_to_json(record: &EventRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "organization_id": record.organization_id,
        "name": record.name,
        "starts_at": record.starts_at,
        "created_at": record.created_at,
    })
}
