//! Session-store collaborator.
//!
//! Browser sessions are opaque tokens; their format and crypto live outside
//! this core. Resolving a token yields the organization, user and role the
//! session was minted for.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use eventum_auth::Role;
use eventum_core::{OrganizationId, UserId};

use crate::error::StoreError;

/// What a valid session token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: Role,
}

/// External session store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a token; unknown or expired tokens are `None`.
    async fn resolve(&self, token: &str) -> Result<Option<SessionRecord>, StoreError>;
}

/// In-memory session store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, record: SessionRecord) {
        self.sessions.write().insert(token.into(), record);
    }

    pub fn remove(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn resolve(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.sessions.read().get(token).copied())
    }
}
