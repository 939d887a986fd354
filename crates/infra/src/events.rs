//! Event repository with the tenant/ACL filter built into every lookup.
//!
//! Reviewer visibility is a typed relation of `(event, user)` pairs; it is
//! consulted only through [`EventScope::permits`], so a lookup that fails the
//! filter is indistinguishable from one that finds nothing.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use eventum_auth::EventScope;
use eventum_core::{EventId, OrganizationId, UserId};

use crate::error::StoreError;

/// Stored form of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: EventId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Storage collaborator for events and their reviewer ACL.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, record: EventRecord) -> Result<(), StoreError>;

    /// Look up the event named by `scope`, applying the full filter.
    /// A scope without an event id finds nothing.
    async fn find_scoped(&self, scope: &EventScope) -> Result<Option<EventRecord>, StoreError>;

    /// All events visible under `scope`, ordered by creation time.
    async fn list_scoped(&self, scope: &EventScope) -> Result<Vec<EventRecord>, StoreError>;

    async fn grant_reviewer(&self, event_id: EventId, user_id: UserId) -> Result<(), StoreError>;

    async fn revoke_reviewer(&self, event_id: EventId, user_id: UserId) -> Result<(), StoreError>;
}

/// In-memory event store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, EventRecord>>,
    reviewer_acl: RwLock<HashSet<(EventId, UserId)>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventStore {
    async fn insert(&self, record: EventRecord) -> Result<(), StoreError> {
        self.events.write().insert(record.id, record);
        Ok(())
    }

    async fn find_scoped(&self, scope: &EventScope) -> Result<Option<EventRecord>, StoreError> {
        let Some(event_id) = scope.event_id() else {
            return Ok(None);
        };
        let events = self.events.read();
        let Some(record) = events.get(&event_id) else {
            return Ok(None);
        };
        let acl = self.reviewer_acl.read();
        let visible = scope.permits(record.organization_id, record.id, |user| {
            acl.contains(&(record.id, user))
        });
        Ok(visible.then(|| record.clone()))
    }

    async fn list_scoped(&self, scope: &EventScope) -> Result<Vec<EventRecord>, StoreError> {
        let events = self.events.read();
        let acl = self.reviewer_acl.read();
        let mut visible: Vec<EventRecord> = events
            .values()
            .filter(|record| {
                scope.permits(record.organization_id, record.id, |user| {
                    acl.contains(&(record.id, user))
                })
            })
            .cloned()
            .collect();
        visible.sort_by_key(|record| record.created_at);
        Ok(visible)
    }

    async fn grant_reviewer(&self, event_id: EventId, user_id: UserId) -> Result<(), StoreError> {
        self.reviewer_acl.write().insert((event_id, user_id));
        Ok(())
    }

    async fn revoke_reviewer(&self, event_id: EventId, user_id: UserId) -> Result<(), StoreError> {
        self.reviewer_acl.write().remove(&(event_id, user_id));
        Ok(())
    }
}
