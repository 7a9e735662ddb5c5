//! RBAC resolution: role-permission union with deny-dominant overrides,
//! keyed by `(user, scope)`.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use campus_core::{NodeId, UserId};

use crate::{AuthError, Permission, Role, StoreError};

/// The unit over which permissions are resolved: tenant-wide or a single
/// organizational node. The same user may hold different effective
/// permissions in different nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Node(NodeId),
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            // The sentinel is not a UUID, so it can never collide with a
            // node-scoped key.
            Scope::Global => f.write_str("global"),
            Scope::Node(node_id) => core::fmt::Display::fmt(node_id, f),
        }
    }
}

/// Cache key for a resolved permission set.
pub fn permission_cache_key(user_id: UserId, scope: Scope) -> String {
    format!("permissions:{user_id}:{scope}")
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideEffect {
    Grant,
    Deny,
}

/// Per-user, per-scope grant or deny of a single permission.
///
/// Deny always wins over any grant for the same permission, whether the
/// grant comes from a role or from another override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverride {
    pub permission: Permission,
    pub effect: OverrideEffect,
}

/// Injected role/permission/override persistence.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, StoreError>;

    async fn role_permissions(&self, role: &Role) -> Result<Vec<Permission>, StoreError>;

    async fn overrides_for(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> Result<Vec<PermissionOverride>, StoreError>;
}

/// Optional cache in front of [`PermissionAggregator::resolve`].
///
/// Entries must be invalidated (or allowed to expire) whenever a role,
/// override or `tokenVersion` changes for the affected user.
pub trait PermissionCache: Send + Sync {
    fn get(&self, key: &str) -> Option<HashSet<Permission>>;

    fn put(&self, key: String, permissions: HashSet<Permission>);

    /// Drop every cached scope for a user.
    fn invalidate_user(&self, user_id: UserId);
}

/// Computes a user's effective permission set for a scope.
pub struct PermissionAggregator {
    directory: Arc<dyn DirectoryStore>,
    cache: Option<Arc<dyn PermissionCache>>,
}

impl PermissionAggregator {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self {
            directory,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn PermissionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Union of all role permissions, minus denies, plus grants not denied.
    ///
    /// Deny strictly dominates, independent of the ordering of overrides.
    pub async fn resolve(
        &self,
        user_id: UserId,
        scope: Scope,
    ) -> Result<HashSet<Permission>, AuthError> {
        let key = permission_cache_key(user_id, scope);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key) {
                return Ok(cached);
            }
        }

        let mut effective: HashSet<Permission> = HashSet::new();
        for role in self.directory.assigned_roles(user_id).await.map_err(deny)? {
            effective.extend(self.directory.role_permissions(&role).await.map_err(deny)?);
        }

        let overrides = self
            .directory
            .overrides_for(user_id, scope)
            .await
            .map_err(deny)?;

        let denied: HashSet<&Permission> = overrides
            .iter()
            .filter(|o| o.effect == OverrideEffect::Deny)
            .map(|o| &o.permission)
            .collect();

        for ovr in &overrides {
            if ovr.effect == OverrideEffect::Grant && !denied.contains(&ovr.permission) {
                effective.insert(ovr.permission.clone());
            }
        }
        effective.retain(|p| !denied.contains(p));

        if let Some(cache) = &self.cache {
            cache.put(key, effective.clone());
        }

        Ok(effective)
    }

    /// Convenience check used by protected operations after verification.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        scope: Scope,
        permission: &Permission,
    ) -> Result<bool, AuthError> {
        Ok(self.resolve(user_id, scope).await?.contains(permission))
    }
}

/// A resolution that cannot consult the directory denies by construction.
fn deny(err: StoreError) -> AuthError {
    tracing::warn!(error = %err, "directory store failure during permission resolution");
    AuthError::Unavailable
}
