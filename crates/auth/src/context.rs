use eventum_core::{OrganizationId, UserId};

use crate::Role;

/// How the caller authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Browser session credential.
    Session,
    /// Long-lived tenant API key.
    ApiKey,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Session => "session",
            AuthMethod::ApiKey => "api_key",
        }
    }
}

/// Resolved caller identity and tenant scope for a single request.
///
/// Immutable; built once per request and discarded with it.
///
/// # Invariants
/// - `organization_id` always matches the tenant that owns the credential
///   that produced this context.
/// - An API-key-derived context never carries a user or a role; only the
///   constructors below can build a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgContext {
    organization_id: OrganizationId,
    user_id: Option<UserId>,
    role: Option<Role>,
    auth_method: AuthMethod,
}

impl OrgContext {
    /// Context for a session-authenticated user.
    pub fn for_session(organization_id: OrganizationId, user_id: UserId, role: Role) -> Self {
        Self {
            organization_id,
            user_id: Some(user_id),
            role: Some(role),
            auth_method: AuthMethod::Session,
        }
    }

    /// Context for an API-key caller acting as the tenant itself.
    pub fn for_api_key(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            user_id: None,
            role: None,
            auth_method: AuthMethod::ApiKey,
        }
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }
}
