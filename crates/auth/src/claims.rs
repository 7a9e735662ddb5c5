//! Signed claim set (token payload).
//!
//! Field names are part of the wire contract and must remain stable. The
//! struct is closed: unknown fields make deserialization (and therefore
//! verification) fail rather than being silently accepted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::{TenantId, UserId};

use crate::{IdentitySnapshot, Role};

/// Issuer baked into every token.
pub const ISSUER: &str = "lms-auth";

/// Audience baked into every token.
pub const AUDIENCE: &str = "lms-api";

/// The structured payload inside a signed token.
///
/// Immutable once signed; rotation always produces a new claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: UserId,

    pub email: String,

    #[serde(rename = "activeRole")]
    pub active_role: Role,

    #[serde(rename = "tenantId")]
    pub tenant_id: TenantId,

    /// Copied from the identity at issuance time; compared against the
    /// stored counter on every full verification.
    #[serde(rename = "tokenVersion")]
    pub token_version: u32,

    pub iss: String,
    pub aud: String,

    /// Unique token id, fresh on every signing. Guarantees rotation yields a
    /// new token value even when two signings land in the same second.
    pub jti: Uuid,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// The identity-derived portion, for comparing against a snapshot.
    pub fn subject(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            user_id: self.user_id,
            email: self.email.clone(),
            active_role: self.active_role.clone(),
            tenant_id: self.tenant_id,
            token_version: self.token_version,
        }
    }
}
