//! In-memory identity and directory stores for dev/test wiring.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use campus_auth::{
    DirectoryStore, Identity, IdentityStore, Permission, PermissionOverride, Role, Scope,
    StoreError,
};
use campus_core::UserId;

use crate::credentials::{self, CredentialStore};

struct IdentityRecord {
    identity: Identity,
    password_hash: String,
}

/// In-memory [`IdentityStore`] + [`CredentialStore`].
///
/// `bump_token_version` takes the single write lock, so increments are
/// atomic and every later read observes them (the linearizability the
/// verifier relies on).
#[derive(Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<HashMap<UserId, IdentityRecord>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with an argon2-hashed password.
    pub fn seed_user(&self, identity: Identity, password: &str) -> Result<(), StoreError> {
        let password_hash = credentials::hash_password(password)?;
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.insert(
            identity.id,
            IdentityRecord {
                identity,
                password_hash,
            },
        );
        Ok(())
    }

    pub fn set_status(&self, user_id: UserId, status: campus_auth::UserStatus) {
        if let Ok(mut inner) = self.inner.write() {
            if let Some(record) = inner.get_mut(&user_id) {
                record.identity.status = status;
            }
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("identity store lock poisoned".to_string())
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.get(&user_id).map(|r| r.identity.clone()))
    }

    async fn bump_token_version(&self, user_id: UserId) -> Result<Option<u32>, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        Ok(inner.get_mut(&user_id).map(|record| {
            record.identity.token_version += 1;
            record.identity.token_version
        }))
    }
}

#[async_trait]
impl CredentialStore for InMemoryIdentityStore {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        let Some(record) = inner
            .values()
            .find(|r| r.identity.email.eq_ignore_ascii_case(email))
        else {
            return Ok(None);
        };

        if credentials::verify_password(password, &record.password_hash) {
            Ok(Some(record.identity.clone()))
        } else {
            Ok(None)
        }
    }
}

/// In-memory [`DirectoryStore`] with seeding helpers.
#[derive(Default)]
pub struct InMemoryDirectoryStore {
    assignments: RwLock<HashMap<UserId, Vec<Role>>>,
    role_permissions: RwLock<HashMap<Role, Vec<Permission>>>,
    overrides: RwLock<HashMap<(UserId, Scope), Vec<PermissionOverride>>>,
}

impl InMemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_role(&self, user_id: UserId, role: Role) {
        if let Ok(mut map) = self.assignments.write() {
            let roles = map.entry(user_id).or_default();
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
    }

    pub fn grant_to_role(&self, role: Role, permission: Permission) {
        if let Ok(mut map) = self.role_permissions.write() {
            let perms = map.entry(role).or_default();
            if !perms.contains(&permission) {
                perms.push(permission);
            }
        }
    }

    pub fn add_override(&self, user_id: UserId, scope: Scope, ovr: PermissionOverride) {
        if let Ok(mut map) = self.overrides.write() {
            map.entry((user_id, scope)).or_default().push(ovr);
        }
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, StoreError> {
        let map = self.assignments.read().map_err(poisoned)?;
        Ok(map.get(&user_id).cloned().unwrap_or_default())
    }

    async fn role_permissions(&self, role: &Role) -> Result<Vec<Permission>, StoreError> {
        let map = self.role_permissions.read().map_err(poisoned)?;
        Ok(map.get(role).cloned().unwrap_or_default())
    }

    async fn overrides_for(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> Result<Vec<PermissionOverride>, StoreError> {
        let map = self.overrides.read().map_err(poisoned)?;
        Ok(map.get(&(user_id, scope)).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_auth::UserStatus;
    use campus_core::TenantId;

    fn identity(email: &str) -> Identity {
        Identity {
            id: UserId::new(),
            email: email.to_string(),
            status: UserStatus::Active,
            tenant_id: TenantId::new(),
            node_id: None,
            roles: vec![Role::new("STUDENT")],
            token_version: 0,
        }
    }

    #[tokio::test]
    async fn credentials_round_trip() {
        let store = InMemoryIdentityStore::new();
        let user = identity("jo@example.edu");
        store.seed_user(user.clone(), "hunter2!").unwrap();

        let found = store
            .verify_credentials("jo@example.edu", "hunter2!")
            .await
            .unwrap();
        assert_eq!(found.map(|i| i.id), Some(user.id));

        let wrong = store
            .verify_credentials("jo@example.edu", "hunter3!")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = store
            .verify_credentials("nobody@example.edu", "hunter2!")
            .await
            .unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let store = InMemoryIdentityStore::new();
        let user = identity("Jo@Example.EDU");
        store.seed_user(user.clone(), "pw").unwrap();

        let found = store
            .verify_credentials("jo@example.edu", "pw")
            .await
            .unwrap();
        assert_eq!(found.map(|i| i.id), Some(user.id));
    }

    #[tokio::test]
    async fn bump_is_visible_to_subsequent_reads() {
        let store = InMemoryIdentityStore::new();
        let user = identity("jo@example.edu");
        store.seed_user(user.clone(), "pw").unwrap();

        assert_eq!(store.bump_token_version(user.id).await.unwrap(), Some(1));
        let read = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(read.token_version, 1);
    }

    #[tokio::test]
    async fn duplicate_role_assignment_is_idempotent() {
        let directory = InMemoryDirectoryStore::new();
        let user_id = UserId::new();

        directory.assign_role(user_id, Role::new("TEACHER"));
        directory.assign_role(user_id, Role::new("TEACHER"));

        assert_eq!(
            directory.assigned_roles(user_id).await.unwrap(),
            vec![Role::new("TEACHER")]
        );
    }
}
