//! Shared fakes/builders for the crate's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use campus_core::{TenantId, UserId};

use crate::{
    DirectoryStore, Identity, IdentitySnapshot, IdentityStore, Permission, PermissionOverride,
    Role, Scope, StoreError, UserStatus,
};

pub fn snapshot(email: &str, active_role: Role, token_version: u32) -> IdentitySnapshot {
    IdentitySnapshot {
        user_id: UserId::new(),
        email: email.to_string(),
        active_role,
        tenant_id: TenantId::new(),
        token_version,
    }
}

pub fn active_identity(email: &str, roles: Vec<Role>) -> Identity {
    Identity {
        id: UserId::new(),
        email: email.to_string(),
        status: UserStatus::Active,
        tenant_id: TenantId::new(),
        node_id: None,
        roles,
        token_version: 0,
    }
}

/// In-memory identity store with a switch to simulate an outage.
#[derive(Default)]
pub struct FakeIdentityStore {
    inner: RwLock<HashMap<UserId, Identity>>,
    unavailable: AtomicBool,
}

impl FakeIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identity: Identity) {
        self.inner.write().unwrap().insert(identity.id, identity);
    }

    pub fn set_status(&self, user_id: UserId, status: UserStatus) {
        if let Some(identity) = self.inner.write().unwrap().get_mut(&user_id) {
            identity.status = status;
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityStore for FakeIdentityStore {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, StoreError> {
        self.check_available()?;
        Ok(self.inner.read().unwrap().get(&user_id).cloned())
    }

    async fn bump_token_version(&self, user_id: UserId) -> Result<Option<u32>, StoreError> {
        self.check_available()?;
        let mut inner = self.inner.write().unwrap();
        Ok(inner.get_mut(&user_id).map(|identity| {
            identity.token_version += 1;
            identity.token_version
        }))
    }
}

/// In-memory role/override directory.
#[derive(Default)]
pub struct FakeDirectory {
    assignments: RwLock<HashMap<UserId, Vec<Role>>>,
    role_permissions: RwLock<HashMap<Role, Vec<Permission>>>,
    overrides: RwLock<HashMap<(UserId, Scope), Vec<PermissionOverride>>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&self, user_id: UserId, role: Role) {
        self.assignments
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(role);
    }

    pub fn grant_to_role(&self, role: Role, permission: Permission) {
        self.role_permissions
            .write()
            .unwrap()
            .entry(role)
            .or_default()
            .push(permission);
    }

    pub fn add_override(&self, user_id: UserId, scope: Scope, ovr: PermissionOverride) {
        self.overrides
            .write()
            .unwrap()
            .entry((user_id, scope))
            .or_default()
            .push(ovr);
    }
}

#[async_trait]
impl DirectoryStore for FakeDirectory {
    async fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, StoreError> {
        Ok(self
            .assignments
            .read()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn role_permissions(&self, role: &Role) -> Result<Vec<Permission>, StoreError> {
        Ok(self
            .role_permissions
            .read()
            .unwrap()
            .get(role)
            .cloned()
            .unwrap_or_default())
    }

    async fn overrides_for(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> Result<Vec<PermissionOverride>, StoreError> {
        Ok(self
            .overrides
            .read()
            .unwrap()
            .get(&(user_id, scope))
            .cloned()
            .unwrap_or_default())
    }
}
