//! Identity records, issuance snapshots and the injected identity store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campus_core::{NodeId, TenantId, UserId};

use crate::Role;

/// User account status.
///
/// Anything other than `Active` fails verification with
/// [`crate::AuthError::InactiveAccount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserStatus {
    /// User is active and can authenticate.
    #[default]
    Active,
    /// User is suspended and cannot authenticate.
    Suspended,
    /// User account was deactivated (terminal).
    Deactivated,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "Active"),
            UserStatus::Suspended => write!(f, "Suspended"),
            UserStatus::Deactivated => write!(f, "Deactivated"),
        }
    }
}

/// Identity record as read from the store.
///
/// # Invariants
/// - A user belongs to exactly one tenant.
/// - `node_id = None` means the user acts tenant-wide.
/// - `token_version` is monotonically non-decreasing and is the sole
///   revocation mechanism; token validity is derived from it, never looked
///   up in a token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub status: UserStatus,
    pub tenant_id: TenantId,
    pub node_id: Option<NodeId>,
    pub roles: Vec<Role>,
    pub token_version: u32,
}

impl Identity {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Pick the role this session will act as.
    ///
    /// A requested role must actually be held; with no request the first
    /// assigned role is used. Holding roles and acting as one are distinct:
    /// the token carries exactly one active role.
    pub fn select_active_role(&self, requested: Option<&Role>) -> Option<Role> {
        match requested {
            Some(role) if self.roles.contains(role) => Some(role.clone()),
            Some(_) => None,
            None => self.roles.first().cloned(),
        }
    }

    /// Freeze this identity into an issuance snapshot acting as `active_role`.
    ///
    /// The snapshot copies `token_version` at call time; the issuer never
    /// reads storage itself, so the caller must hand it a freshly read
    /// identity.
    pub fn snapshot(&self, active_role: Role) -> IdentitySnapshot {
        IdentitySnapshot {
            user_id: self.id,
            email: self.email.clone(),
            active_role,
            tenant_id: self.tenant_id,
            token_version: self.token_version,
        }
    }
}

/// The identity-derived portion of a claim set, frozen at issuance time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySnapshot {
    pub user_id: UserId,
    pub email: String,
    pub active_role: Role,
    pub tenant_id: TenantId,
    pub token_version: u32,
}

/// Failure talking to the persistence layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Injected identity persistence.
///
/// `bump_token_version` must be atomic and linearizable per user: once the
/// increment is acknowledged, every subsequent read observes it. A stale
/// read window here would let a revoked token be briefly accepted.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, StoreError>;

    /// Increment the user's token version by exactly 1, returning the new
    /// value, or `None` when the user does not exist.
    async fn bump_token_version(&self, user_id: UserId) -> Result<Option<u32>, StoreError>;
}
