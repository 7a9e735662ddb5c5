//! Token issuance from a caller-supplied identity snapshot.

use std::sync::Arc;

use chrono::Duration;

use crate::{AuthError, ClaimCodec, IdentitySnapshot};

/// A freshly issued access+refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Produces short-lived access tokens and longer-lived refresh tokens.
///
/// The issuer never queries storage: `token_version` is whatever the
/// snapshot carried, so callers must supply a freshly read identity.
pub struct TokenIssuer {
    codec: Arc<ClaimCodec>,
}

impl TokenIssuer {
    pub fn new(codec: Arc<ClaimCodec>) -> Self {
        Self { codec }
    }

    /// TTL of access tokens: 15 minutes.
    pub fn access_ttl() -> Duration {
        Duration::minutes(15)
    }

    /// TTL of refresh tokens: 7 days.
    pub fn refresh_ttl() -> Duration {
        Duration::days(7)
    }

    pub fn issue_access_token(&self, snapshot: &IdentitySnapshot) -> Result<String, AuthError> {
        self.codec.encode(snapshot, Self::access_ttl())
    }

    pub fn issue_refresh_token(&self, snapshot: &IdentitySnapshot) -> Result<String, AuthError> {
        self.codec.encode(snapshot, Self::refresh_ttl())
    }

    pub fn issue_pair(&self, snapshot: &IdentitySnapshot) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue_access_token(snapshot)?,
            refresh: self.issue_refresh_token(snapshot)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SigningKey;
    use crate::testing::snapshot;
    use crate::Role;

    fn issuer() -> (TokenIssuer, Arc<ClaimCodec>) {
        let codec = Arc::new(ClaimCodec::new(SigningKey::from_secret(b"unit-test-secret")));
        (TokenIssuer::new(codec.clone()), codec)
    }

    #[test]
    fn access_and_refresh_ttls_differ() {
        let (issuer, codec) = issuer();
        let subject = snapshot("omar@example.edu", Role::new("STUDENT"), 2);

        let access = codec.decode(&issuer.issue_access_token(&subject).unwrap()).unwrap();
        let refresh = codec.decode(&issuer.issue_refresh_token(&subject).unwrap()).unwrap();

        assert_eq!(access.exp - access.iat, 15 * 60);
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn issued_claims_carry_snapshot_version() {
        let (issuer, codec) = issuer();
        let subject = snapshot("omar@example.edu", Role::new("STUDENT"), 9);

        let pair = issuer.issue_pair(&subject).unwrap();
        assert_eq!(codec.decode(&pair.access).unwrap().token_version, 9);
        assert_eq!(codec.decode(&pair.refresh).unwrap().token_version, 9);
    }
}
