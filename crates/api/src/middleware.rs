use std::sync::Arc;

use axum::{
    extract::State,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use eventum_auth::{AuthMethod, NavDecision, OrgContext, navigation_decision};

use crate::app::errors;
use crate::identity::IdentityResolver;

#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<IdentityResolver>,
}

/// Resolve identity and attach the [`OrgContext`] to the request.
///
/// Requests without a resolvable identity receive one uniform 401, whatever
/// the underlying cause; storage failures surface as a generic server error.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = match state.identity.resolve(req.headers()).await {
        Ok(Some(ctx)) => ctx,
        Ok(None) => return errors::unauthorized(),
        Err(error) => return errors::store_error(error),
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Gate browser navigation by role, before any handler runs.
///
/// Applies to session-derived contexts only; API-key callers are never
/// redirected. Every branch terminates in pass-through or redirect: no
/// error state, no data access.
pub async fn route_authorization_middleware(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let decision = match req.extensions().get::<OrgContext>() {
        Some(ctx) if ctx.auth_method() == AuthMethod::Session => match ctx.role() {
            Some(role) => navigation_decision(role, req.uri().path()),
            None => NavDecision::PassThrough,
        },
        _ => NavDecision::PassThrough,
    };
    match decision {
        NavDecision::PassThrough => next.run(req).await,
        NavDecision::Redirect(location) => Redirect::to(&location).into_response(),
    }
}
