//! `eventum-infra` — storage collaborators and shared mutable state.
//!
//! Relational persistence stays behind the traits in this crate; the
//! in-memory implementations back tests and the dev binary.

pub mod api_keys;
pub mod error;
pub mod events;
pub mod rate_limit;
pub mod sessions;

pub use api_keys::{
    ApiKeyManager, ApiKeyRecord, ApiKeyRepository, InMemoryApiKeyStore, IssuedApiKey,
    ResolvedApiKey,
};
pub use error::StoreError;
pub use events::{EventRecord, EventRepository, InMemoryEventStore};
pub use rate_limit::{RateLimitDecision, RateLimiter, start_sweep_task};
pub use sessions::{InMemorySessionStore, SessionRecord, SessionStore};
