//! API key records, repository and manager.
//!
//! The plaintext key exists only inside [`ApiKeyManager::create`] and the
//! [`IssuedApiKey`] it returns; repositories only ever see the digest and
//! the short display prefix.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use eventum_auth::api_key;
use eventum_core::{ApiKeyId, OrganizationId};

use crate::error::StoreError;

/// Stored form of a tenant API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    pub id: ApiKeyId,
    pub organization_id: OrganizationId,
    pub label: String,
    /// One-way digest of the plaintext; the only stored secret-derived value.
    pub key_hash: String,
    /// Non-secret identification prefix shown in listings.
    pub display_prefix: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Storage collaborator for API keys.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn insert(&self, record: ApiKeyRecord) -> Result<(), StoreError>;

    /// Exact-match lookup on the digest.
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>, StoreError>;

    async fn list_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ApiKeyRecord>, StoreError>;

    /// Clear `is_active` on a key owned by `organization_id`.
    /// Returns `false` when no such key exists in that organization.
    async fn deactivate(
        &self,
        organization_id: OrganizationId,
        id: ApiKeyId,
    ) -> Result<bool, StoreError>;

    async fn touch_last_used(&self, id: ApiKeyId, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// In-memory key store for tests/dev, keyed by digest.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyStore {
    records: RwLock<HashMap<String, ApiKeyRecord>>,
}

impl InMemoryApiKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyStore {
    async fn insert(&self, record: ApiKeyRecord) -> Result<(), StoreError> {
        self.records.write().insert(record.key_hash.clone(), record);
        Ok(())
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>, StoreError> {
        Ok(self.records.read().get(key_hash).cloned())
    }

    async fn list_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ApiKeyRecord>, StoreError> {
        let mut keys: Vec<ApiKeyRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.organization_id == organization_id)
            .cloned()
            .collect();
        keys.sort_by_key(|r| r.created_at);
        Ok(keys)
    }

    async fn deactivate(
        &self,
        organization_id: OrganizationId,
        id: ApiKeyId,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write();
        for record in records.values_mut() {
            if record.id == id && record.organization_id == organization_id {
                record.is_active = false;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn touch_last_used(&self, id: ApiKeyId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut records = self.records.write();
        for record in records.values_mut() {
            if record.id == id {
                record.last_used_at = Some(at);
                break;
            }
        }
        Ok(())
    }
}

/// A freshly created key. `key` is the plaintext, surfaced exactly once.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub record: ApiKeyRecord,
    pub key: String,
}

/// What a valid plaintext key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedApiKey {
    pub id: ApiKeyId,
    pub organization_id: OrganizationId,
}

/// Generates, stores and validates long-lived tenant API keys.
#[derive(Clone)]
pub struct ApiKeyManager {
    repo: Arc<dyn ApiKeyRepository>,
}

impl ApiKeyManager {
    pub fn new(repo: Arc<dyn ApiKeyRepository>) -> Self {
        Self { repo }
    }

    /// Mint and store a key for `organization_id`.
    pub async fn create(
        &self,
        organization_id: OrganizationId,
        label: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<IssuedApiKey, StoreError> {
        let key = api_key::generate();
        let record = ApiKeyRecord {
            id: ApiKeyId::new(),
            organization_id,
            label: label.into(),
            key_hash: api_key::hash(&key),
            display_prefix: api_key::display_prefix(&key),
            is_active: true,
            created_at: Utc::now(),
            last_used_at: None,
            expires_at,
        };
        self.repo.insert(record.clone()).await?;
        tracing::info!(key_id = %record.id, organization_id = %record.organization_id, "api key issued");
        Ok(IssuedApiKey { record, key })
    }

    /// Resolve a plaintext key to its owning organization.
    ///
    /// Unknown, inactive and expired keys are all `None`; callers cannot
    /// tell the cases apart. Candidates without the constant prefix return
    /// before any hashing or store round-trip.
    pub async fn validate(&self, plaintext: &str) -> Result<Option<ResolvedApiKey>, StoreError> {
        if !api_key::has_key_prefix(plaintext) {
            return Ok(None);
        }
        let Some(record) = self.repo.find_by_hash(&api_key::hash(plaintext)).await? else {
            return Ok(None);
        };
        if !record.is_active {
            return Ok(None);
        }
        if let Some(expires_at) = record.expires_at {
            if Utc::now() >= expires_at {
                return Ok(None);
            }
        }
        Ok(Some(ResolvedApiKey {
            id: record.id,
            organization_id: record.organization_id,
        }))
    }

    pub async fn list(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ApiKeyRecord>, StoreError> {
        self.repo.list_for_organization(organization_id).await
    }

    /// Revoke a key within the caller's organization.
    pub async fn revoke(
        &self,
        organization_id: OrganizationId,
        id: ApiKeyId,
    ) -> Result<bool, StoreError> {
        let revoked = self.repo.deactivate(organization_id, id).await?;
        if revoked {
            tracing::info!(key_id = %id, %organization_id, "api key revoked");
        }
        Ok(revoked)
    }

    /// Record key usage without blocking the enclosing request.
    ///
    /// Fire-and-forget: failures are logged at debug level and never retried.
    pub fn touch_last_used(&self, id: ApiKeyId) {
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            if let Err(error) = repo.touch_last_used(id, Utc::now()).await {
                tracing::debug!(key_id = %id, %error, "failed to record api key usage");
            }
        });
    }
}
