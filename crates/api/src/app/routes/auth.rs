//! Auth endpoints: login, refresh, logout-all, me, permissions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use campus_auth::{can_access_node, AuthError, Role, Scope};
use campus_core::NodeId;

use crate::app::{errors, AppState};
use crate::context::SessionContext;
use crate::cookies::REFRESH_COOKIE;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Which of the user's assigned roles this session acts as. Defaults to
    /// the first assigned role.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionsQuery {
    pub node: Option<NodeId>,
}

/// POST /auth/login — on success sets both cookies.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    let identity = match state
        .credentials
        .verify_credentials(&body.email, &body.password)
        .await
    {
        Ok(Some(identity)) => identity,
        // Unknown email and wrong password read identically.
        Ok(None) => return errors::json_error(StatusCode::UNAUTHORIZED, "invalid credentials"),
        Err(err) => {
            tracing::error!(error = %err, "credential check failed; failing closed");
            return errors::json_error(StatusCode::UNAUTHORIZED, "invalid credentials");
        }
    };

    if !identity.is_active() {
        return errors::auth_error_response(&AuthError::InactiveAccount);
    }

    let requested = body.role.map(Role::new);
    let Some(active_role) = identity.select_active_role(requested.as_ref()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "role not assigned");
    };

    let pair = match state.issuer.issue_pair(&identity.snapshot(active_role.clone())) {
        Ok(pair) => pair,
        Err(err) => return errors::auth_error_response(&err),
    };

    let jar = jar
        .add(state.cookies.session(pair.access))
        .add(state.cookies.refresh(pair.refresh));

    (jar, Json(json!({ "ok": true, "activeRole": active_role }))).into_response()
}

/// POST /auth/refresh — requires the `refreshToken` cookie; rotates both
/// cookies on success.
pub async fn refresh(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> axum::response::Response {
    let Some(cookie) = jar.get(REFRESH_COOKIE) else {
        return errors::unauthorized();
    };

    match state.refresh.refresh(cookie.value()).await {
        Ok(rotated) => {
            let active_role = rotated.active_role.clone();
            let jar = jar
                .add(state.cookies.session(rotated.access_token))
                .add(state.cookies.refresh(rotated.refresh_token));
            (jar, Json(json!({ "ok": true, "activeRole": active_role }))).into_response()
        }
        Err(err) => errors::auth_error_response(&err),
    }
}

/// POST /auth/logout-all — revokes every outstanding session for the caller.
pub async fn logout_all(
    Extension(state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    jar: CookieJar,
) -> axum::response::Response {
    match state.revocation.revoke_all(session.user_id()).await {
        Ok(_) => {
            // The bump changes what this user's tokens resolve to; cached
            // permission sets for them are stale by policy.
            state.permission_cache.invalidate_user(session.user_id());

            let (expired_session, expired_refresh) = state.cookies.removals();
            let jar = jar.add(expired_session).add(expired_refresh);
            (jar, Json(json!({ "ok": true }))).into_response()
        }
        Err(err) => errors::auth_error_response(&err),
    }
}

/// GET /auth/me — the decoded claim set, for inspection/debugging.
pub async fn me(Extension(session): Extension<SessionContext>) -> axum::response::Response {
    Json(session.claims().clone()).into_response()
}

/// GET /auth/permissions?node=<uuid> — the caller's effective permission
/// set at a scope (tenant-wide when `node` is absent).
pub async fn permissions(
    Extension(state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<PermissionsQuery>,
) -> axum::response::Response {
    let scope = match query.node {
        Some(node) => Scope::Node(node),
        None => Scope::Global,
    };

    if let Scope::Node(target) = scope {
        // Node assignment lives on the identity, not in the claims.
        let identity = match state.identities.find_by_id(session.user_id()).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return errors::unauthorized(),
            Err(err) => {
                tracing::warn!(error = %err, "identity read failed; failing closed");
                return errors::unauthorized();
            }
        };

        if !can_access_node(session.active_role(), identity.node_id, target) {
            return errors::forbidden();
        }
    }

    match state.aggregator.resolve(session.user_id(), scope).await {
        Ok(resolved) => {
            let mut permissions: Vec<&str> = resolved.iter().map(|p| p.as_str()).collect();
            permissions.sort_unstable();
            (
                StatusCode::OK,
                Json(json!({ "ok": true, "permissions": permissions })),
            )
                .into_response()
        }
        Err(err) => errors::auth_error_response(&err),
    }
}
