//! Consistent auth error responses.
//!
//! Everything the auth core can reject collapses to 401 with a
//! `{ ok: false, error }` body. The body distinguishes only the
//! account-status case (callers show a message for it); bad signature,
//! unknown user, revocation and backend failure all read the same, so a
//! caller can never probe which one it hit. Variant detail goes to logs.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use campus_auth::AuthError;

pub fn json_error(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(json!({
            "ok": false,
            "error": error.into(),
        })),
    )
        .into_response()
}

pub fn unauthorized() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "invalid token")
}

pub fn forbidden() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden")
}

/// Map an [`AuthError`] to its HTTP response, logging at the severity the
/// variant deserves.
pub fn auth_error_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::InactiveAccount => {
            tracing::info!("request rejected: account not active");
            json_error(StatusCode::UNAUTHORIZED, "account is not active")
        }
        AuthError::Encoding(detail) => {
            // Malformed input to the codec is a programming error upstream,
            // not a client fault.
            tracing::error!(%detail, "claim encoding failure");
            unauthorized()
        }
        AuthError::Unavailable => {
            tracing::error!("auth backend unavailable; failing closed");
            unauthorized()
        }
        AuthError::InvalidToken | AuthError::UnknownUser | AuthError::RevokedToken => {
            tracing::debug!(kind = ?err, "request rejected");
            unauthorized()
        }
    }
}
