//! `campus-infra` — store implementations behind the auth core's traits.
//!
//! In-memory stores cover dev and tests; the `postgres` feature adds a
//! sqlx-backed identity store for deployments.

pub mod cache;
pub mod credentials;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use cache::InMemoryPermissionCache;
pub use credentials::CredentialStore;
pub use memory::{InMemoryDirectoryStore, InMemoryIdentityStore};

#[cfg(feature = "postgres")]
pub use postgres::PostgresIdentityStore;
