//! `campus-auth` — authentication/authorization core (zero-trust).
//!
//! Token issuance/verification, refresh rotation, version-counter revocation
//! and node-scoped RBAC resolution. Storage is injected behind traits; this
//! crate is intentionally decoupled from HTTP.

pub mod claims;
pub mod codec;
pub mod error;
pub mod identity;
pub mod issuer;
pub mod permissions;
pub mod rbac;
pub mod refresh;
pub mod revocation;
pub mod roles;
pub mod scope;
pub mod verifier;

pub use claims::{Claims, AUDIENCE, ISSUER};
pub use codec::{ClaimCodec, SigningKey};
pub use error::AuthError;
pub use identity::{Identity, IdentitySnapshot, IdentityStore, StoreError, UserStatus};
pub use issuer::{TokenIssuer, TokenPair};
pub use permissions::Permission;
pub use rbac::{
    permission_cache_key, DirectoryStore, OverrideEffect, PermissionAggregator, PermissionCache,
    PermissionOverride, Scope,
};
pub use refresh::{RefreshProtocol, RotatedSession};
pub use revocation::RevocationAuthority;
pub use roles::Role;
pub use scope::can_access_node;
pub use verifier::TokenVerifier;

#[cfg(test)]
mod testing;
