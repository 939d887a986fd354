//! `eventum-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: policies are
//! deterministic functions over resolved identity, and key material helpers
//! touch no store. Wiring lives in `eventum-api`/`eventum-infra`.

pub mod api_key;
pub mod capability;
pub mod context;
pub mod gate;
pub mod roles;
pub mod scope;

pub use capability::Capability;
pub use context::{AuthMethod, OrgContext};
pub use gate::{NavDecision, is_mutation_restricted, navigation_decision};
pub use roles::Role;
pub use scope::EventScope;
