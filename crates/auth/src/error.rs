//! Auth error taxonomy.
//!
//! The HTTP boundary collapses every variant to a generic 401; the variants
//! exist for logging/metrics and for callers that need to show an
//! account-status message. `InvalidToken` deliberately carries no cause:
//! a caller must not be able to tell a bad signature from a bad audience.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Signature, issuer, audience or expiry failure. Never recoverable.
    #[error("invalid token")]
    InvalidToken,

    /// The claim references a user no longer present.
    #[error("unknown user")]
    UnknownUser,

    /// The user exists but is not ACTIVE.
    #[error("account is not active")]
    InactiveAccount,

    /// `tokenVersion` mismatch; the session was revoked.
    #[error("token has been revoked")]
    RevokedToken,

    /// Malformed input to the claim codec. A programming error upstream,
    /// not a client fault.
    #[error("claim encoding failed: {0}")]
    Encoding(String),

    /// The identity/role store could not be reached outside a verification
    /// path. Verification itself collapses store failures into the
    /// fail-closed variants above.
    #[error("auth backend unavailable")]
    Unavailable,
}
