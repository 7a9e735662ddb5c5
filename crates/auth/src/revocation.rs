//! Bulk session revocation via the per-user version counter.

use std::sync::Arc;

use campus_core::UserId;

use crate::{AuthError, IdentityStore};

/// "Log out everywhere": one atomic counter increment invalidates every
/// outstanding access and refresh token for the user, regardless of
/// remaining TTL. O(1) over an unbounded number of tokens; there is no
/// per-session store to sweep.
pub struct RevocationAuthority {
    identities: Arc<dyn IdentityStore>,
}

impl RevocationAuthority {
    pub fn new(identities: Arc<dyn IdentityStore>) -> Self {
        Self { identities }
    }

    /// Increment `tokenVersion` by exactly 1, returning the new value.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u32, AuthError> {
        let bumped = self
            .identities
            .bump_token_version(user_id)
            .await
            .map_err(|err| {
                tracing::error!(%user_id, error = %err, "token version bump failed");
                AuthError::Unavailable
            })?;

        match bumped {
            Some(version) => {
                tracing::info!(%user_id, token_version = version, "all sessions revoked");
                Ok(version)
            }
            None => Err(AuthError::UnknownUser),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{active_identity, FakeIdentityStore};
    use crate::Role;

    #[tokio::test]
    async fn revoke_all_increments_by_one() {
        let store = Arc::new(FakeIdentityStore::new());
        let identity = active_identity("pat@example.edu", vec![Role::new("STUDENT")]);
        store.insert(identity.clone());

        let authority = RevocationAuthority::new(store.clone());
        assert_eq!(authority.revoke_all(identity.id).await, Ok(1));
        assert_eq!(authority.revoke_all(identity.id).await, Ok(2));

        let stored = store.find_by_id(identity.id).await.unwrap().unwrap();
        assert_eq!(stored.token_version, 2);
    }

    #[tokio::test]
    async fn revoking_unknown_user_fails() {
        let store = Arc::new(FakeIdentityStore::new());
        let authority = RevocationAuthority::new(store);

        assert_eq!(
            authority.revoke_all(campus_core::UserId::new()).await,
            Err(AuthError::UnknownUser)
        );
    }
}
