//! Refresh-token rotation protocol.
//!
//! Session lineage: ISSUED -> ACTIVE -> ROTATED -> (ROTATED ... | REVOKED).
//! Rotation always produces a new claim set; the superseded refresh token is
//! not independently invalidated beyond the shared `tokenVersion` counter.
//! A captured old refresh token therefore stays usable until the next
//! explicit revocation — a recorded limitation of the protocol.

use std::sync::Arc;

use crate::verifier::fail_closed;
use crate::{AuthError, IdentityStore, Role, TokenIssuer, TokenVerifier, UserStatus};

/// Result of a successful rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub active_role: Role,
}

/// Orchestrates rotation: full verification, fresh identity read, reissue.
pub struct RefreshProtocol {
    verifier: Arc<TokenVerifier>,
    issuer: Arc<TokenIssuer>,
    identities: Arc<dyn IdentityStore>,
}

impl RefreshProtocol {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        issuer: Arc<TokenIssuer>,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            verifier,
            issuer,
            identities,
        }
    }

    /// Exchange a refresh token for a new access+refresh pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RotatedSession, AuthError> {
        // Rotation must observe revocation immediately; light mode is never
        // acceptable here.
        let claims = self.verifier.verify(refresh_token).await?;

        // Re-read so the new pair carries the *current* token version and
        // status, not what the old token remembers.
        let identity = self
            .identities
            .find_by_id(claims.user_id)
            .await
            .map_err(fail_closed)?
            .ok_or(AuthError::UnknownUser)?;

        if identity.status != UserStatus::Active {
            return Err(AuthError::InactiveAccount);
        }

        // A role revoked since login cannot be renewed into a new session.
        let active_role = identity
            .select_active_role(Some(&claims.active_role))
            .ok_or(AuthError::InvalidToken)?;

        let pair = self.issuer.issue_pair(&identity.snapshot(active_role.clone()))?;

        Ok(RotatedSession {
            access_token: pair.access,
            refresh_token: pair.refresh,
            active_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ClaimCodec, SigningKey};
    use crate::testing::{active_identity, FakeIdentityStore};

    fn protocol() -> (
        RefreshProtocol,
        Arc<TokenIssuer>,
        Arc<ClaimCodec>,
        Arc<FakeIdentityStore>,
    ) {
        let codec = Arc::new(ClaimCodec::new(SigningKey::from_secret(b"unit-test-secret")));
        let store = Arc::new(FakeIdentityStore::new());
        let issuer = Arc::new(TokenIssuer::new(codec.clone()));
        let verifier = Arc::new(TokenVerifier::new(codec.clone(), store.clone()));
        (
            RefreshProtocol::new(verifier, issuer.clone(), store.clone()),
            issuer,
            codec,
            store,
        )
    }

    #[tokio::test]
    async fn rotation_issues_fresh_pair_with_current_version() {
        let (protocol, issuer, codec, store) = protocol();
        let identity = active_identity("ines@example.edu", vec![Role::new("TEACHER")]);
        store.insert(identity.clone());

        let refresh_token = issuer
            .issue_refresh_token(&identity.snapshot(Role::new("TEACHER")))
            .unwrap();

        let rotated = protocol.refresh(&refresh_token).await.unwrap();
        let claims = codec.decode(&rotated.access_token).unwrap();

        assert_eq!(claims.user_id, identity.id);
        assert_eq!(claims.token_version, 0);
        assert_eq!(rotated.active_role, Role::new("TEACHER"));
        assert_ne!(rotated.refresh_token, refresh_token);
    }

    #[tokio::test]
    async fn revoked_refresh_token_cannot_rotate() {
        let (protocol, issuer, _codec, store) = protocol();
        let identity = active_identity("ines@example.edu", vec![Role::new("TEACHER")]);
        store.insert(identity.clone());

        let refresh_token = issuer
            .issue_refresh_token(&identity.snapshot(Role::new("TEACHER")))
            .unwrap();
        store.bump_token_version(identity.id).await.unwrap();

        assert_eq!(
            protocol.refresh(&refresh_token).await,
            Err(AuthError::RevokedToken)
        );
    }

    #[tokio::test]
    async fn suspension_between_issue_and_rotation_blocks_refresh() {
        let (protocol, issuer, _codec, store) = protocol();
        let identity = active_identity("ines@example.edu", vec![Role::new("TEACHER")]);
        store.insert(identity.clone());

        let refresh_token = issuer
            .issue_refresh_token(&identity.snapshot(Role::new("TEACHER")))
            .unwrap();
        store.set_status(identity.id, UserStatus::Suspended);

        assert_eq!(
            protocol.refresh(&refresh_token).await,
            Err(AuthError::InactiveAccount)
        );
    }

    #[tokio::test]
    async fn rotation_picks_up_new_version_after_revocation() {
        let (protocol, issuer, codec, store) = protocol();
        let identity = active_identity("ines@example.edu", vec![Role::new("TEACHER")]);
        store.insert(identity.clone());

        store.bump_token_version(identity.id).await.unwrap();
        let current = store.find_by_id(identity.id).await.unwrap().unwrap();

        let refresh_token = issuer
            .issue_refresh_token(&current.snapshot(Role::new("TEACHER")))
            .unwrap();
        let rotated = protocol.refresh(&refresh_token).await.unwrap();

        assert_eq!(codec.decode(&rotated.access_token).unwrap().token_version, 1);
    }
}
