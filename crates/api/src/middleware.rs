use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;

use campus_auth::TokenVerifier;

use crate::app::errors;
use crate::context::SessionContext;
use crate::cookies::SESSION_COOKIE;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<TokenVerifier>,
}

/// Session-cookie authentication for protected routes.
///
/// Full verification (storage round-trip included): a revoked or suspended
/// session must stop working on the very next request, so the light mode is
/// not acceptable here.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return errors::unauthorized();
    };

    let claims = match state.verifier.verify(cookie.value()).await {
        Ok(claims) => claims,
        Err(err) => return errors::auth_error_response(&err),
    };

    req.extensions_mut().insert(SessionContext::new(claims));

    next.run(req).await
}
