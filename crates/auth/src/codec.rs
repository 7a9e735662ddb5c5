//! Claim codec: signed, time-bounded token encode/decode.
//!
//! Pure CPU, owns no state beyond the key material. Signature, issuer,
//! audience and expiry are all checked in one pass on decode, and every
//! decode failure collapses to [`AuthError::InvalidToken`] so callers
//! cannot distinguish the causes.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{AuthError, Claims, IdentitySnapshot, AUDIENCE, ISSUER};

/// Process-wide symmetric key material, loaded once at startup.
///
/// Rotating the secret invalidates every outstanding token instantly; treat
/// that as an operational event, not a routine code path.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// HS256 claim codec bound to the `lms-auth`/`lms-api` trust pair.
pub struct ClaimCodec {
    key: SigningKey,
    validation: Validation,
}

impl ClaimCodec {
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Zero leeway: an expired token is expired, full stop.
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        Self { key, validation }
    }

    /// Serialize and sign a claim set expiring at `now + ttl`.
    ///
    /// Fails only on malformed input, never on business conditions.
    pub fn encode(&self, subject: &IdentitySnapshot, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: subject.user_id,
            email: subject.email.clone(),
            active_role: subject.active_role.clone(),
            tenant_id: subject.tenant_id,
            token_version: subject.token_version,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            // Fresh per signing; timestamps alone have one-second resolution,
            // so without this two signings in the same second would collide.
            jti: Uuid::now_v7(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.key.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature, issuer, audience and expiry in one pass.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.key.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                // Cause is logged, never surfaced (anti-enumeration).
                tracing::debug!(cause = %e, "token decode rejected");
                AuthError::InvalidToken
            })
    }
}
