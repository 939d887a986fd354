//! Shared application services, built once at startup and injected into
//! handlers via request extensions. No ambient singletons.

use std::sync::Arc;
use std::time::Duration;

use eventum_infra::{
    ApiKeyManager, InMemoryApiKeyStore, InMemoryEventStore, InMemorySessionStore, RateLimiter,
    start_sweep_task,
};

use crate::identity::IdentityResolver;

/// How often stale rate-limit entries are swept, and how long a closed
/// window lingers before eviction.
const LIMITER_SWEEP_EVERY: Duration = Duration::from_secs(60);
const LIMITER_SWEEP_GRACE: Duration = Duration::from_secs(300);

pub struct AppServices {
    pub sessions: Arc<InMemorySessionStore>,
    pub api_keys: ApiKeyManager,
    pub events: Arc<InMemoryEventStore>,
    pub limiter: Arc<RateLimiter>,
}

impl AppServices {
    pub fn identity_resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.sessions.clone(), self.api_keys.clone())
    }
}

/// Wire up the in-memory collaborators and start the limiter sweep.
///
/// Must run inside a tokio runtime (the sweep is a spawned task).
pub fn build_services() -> AppServices {
    let sessions = Arc::new(InMemorySessionStore::new());
    let api_keys = ApiKeyManager::new(Arc::new(InMemoryApiKeyStore::new()));
    let events = Arc::new(InMemoryEventStore::new());
    let limiter = Arc::new(RateLimiter::new());

    start_sweep_task(limiter.clone(), LIMITER_SWEEP_EVERY, LIMITER_SWEEP_GRACE);

    AppServices {
        sessions,
        api_keys,
        events,
        limiter,
    }
}
