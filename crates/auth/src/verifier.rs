//! Token verification against the codec and the identity store.

use std::sync::Arc;

use crate::{AuthError, ClaimCodec, Claims, IdentityStore, StoreError, UserStatus};

/// Collapse a store failure into a fail-closed rejection.
///
/// A token must never be accepted because the store could not answer; the
/// cause is logged, the caller sees the same rejection as a forged token.
pub(crate) fn fail_closed(err: StoreError) -> AuthError {
    tracing::warn!(error = %err, "identity store failure during verification; failing closed");
    AuthError::InvalidToken
}

/// Validates tokens end to end: signature/issuer/audience/expiry, then the
/// identity lookup, status check and revocation (`tokenVersion`) check.
pub struct TokenVerifier {
    codec: Arc<ClaimCodec>,
    identities: Arc<dyn IdentityStore>,
}

impl TokenVerifier {
    pub fn new(codec: Arc<ClaimCodec>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { codec, identities }
    }

    /// Full verification, including the storage round-trip.
    ///
    /// The `tokenVersion` comparison is the sole revocation check; there is
    /// no token blacklist to consult.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.codec.decode(token)?;

        let identity = self
            .identities
            .find_by_id(claims.user_id)
            .await
            .map_err(fail_closed)?
            .ok_or(AuthError::UnknownUser)?;

        if identity.status != UserStatus::Active {
            return Err(AuthError::InactiveAccount);
        }

        if identity.token_version != claims.token_version {
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Signature/expiry-only verification, no storage round-trip.
    ///
    /// Skips the status and revocation checks, so a revoked token stays
    /// acceptable here until it expires. Only for latency-sensitive
    /// read-only call sites that can tolerate that propagation delay;
    /// refresh and every mutating endpoint must use [`Self::verify`].
    pub fn verify_light(&self, token: &str) -> Result<Claims, AuthError> {
        self.codec.decode(token)
    }
}
