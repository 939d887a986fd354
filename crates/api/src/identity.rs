//! Request identity resolution.

use std::sync::Arc;

use axum::http::{HeaderMap, header};

use eventum_auth::OrgContext;
use eventum_infra::{ApiKeyManager, SessionStore, StoreError};

/// Name of the cookie carrying the opaque browser session token.
pub const SESSION_COOKIE: &str = "session";

/// Header carrying a tenant API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Resolves a request to an [`OrgContext`].
///
/// Ordered chain of credential resolvers; the first that yields an identity
/// wins. The session credential is tried before the API-key header, so a
/// forged header can never override an authenticated session.
#[derive(Clone)]
pub struct IdentityResolver {
    sessions: Arc<dyn SessionStore>,
    api_keys: ApiKeyManager,
}

impl IdentityResolver {
    pub fn new(sessions: Arc<dyn SessionStore>, api_keys: ApiKeyManager) -> Self {
        Self { sessions, api_keys }
    }

    /// `None` means no credential resolved, whatever the cause.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<OrgContext>, StoreError> {
        if let Some(ctx) = self.resolve_session(headers).await? {
            return Ok(Some(ctx));
        }
        self.resolve_api_key(headers).await
    }

    async fn resolve_session(&self, headers: &HeaderMap) -> Result<Option<OrgContext>, StoreError> {
        let Some(token) = session_token(headers) else {
            return Ok(None);
        };
        let Some(session) = self.sessions.resolve(&token).await? else {
            return Ok(None);
        };
        Ok(Some(OrgContext::for_session(
            session.organization_id,
            session.user_id,
            session.role,
        )))
    }

    async fn resolve_api_key(&self, headers: &HeaderMap) -> Result<Option<OrgContext>, StoreError> {
        let Some(candidate) = api_key_candidate(headers) else {
            return Ok(None);
        };
        let Some(resolved) = self.api_keys.validate(&candidate).await? else {
            return Ok(None);
        };
        // Usage tracking is fire-and-forget; the response never waits on it.
        self.api_keys.touch_last_used(resolved.id);
        Ok(Some(OrgContext::for_api_key(resolved.organization_id)))
    }
}

/// Opaque session token from the `Cookie` header, if present.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// API key candidate from `x-api-key` or `Authorization: Bearer <key>`.
fn api_key_candidate(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        let key = value.to_str().ok()?.trim();
        return (!key.is_empty()).then(|| key.to_string());
    }
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, rest) = auth.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let key = rest.trim();
    (!key.is_empty()).then(|| key.to_string())
}
