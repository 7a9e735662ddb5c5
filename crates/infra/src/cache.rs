//! TTL permission cache.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use campus_auth::{Permission, PermissionCache};
use campus_core::UserId;

/// In-memory TTL cache for resolved permission sets.
///
/// Keys follow `permissions:{userId}:{scope}`, so one user's scopes can be
/// dropped together when their roles, overrides or token version change.
pub struct InMemoryPermissionCache {
    inner: RwLock<HashMap<String, (Instant, HashSet<Permission>)>>,
    ttl: Duration,
}

impl InMemoryPermissionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

impl PermissionCache for InMemoryPermissionCache {
    fn get(&self, key: &str) -> Option<HashSet<Permission>> {
        let map = self.inner.read().ok()?;
        let (stored_at, permissions) = map.get(key)?;
        if stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(permissions.clone())
    }

    fn put(&self, key: String, permissions: HashSet<Permission>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, (Instant::now(), permissions));
        }
    }

    fn invalidate_user(&self, user_id: UserId) {
        let prefix = format!("permissions:{user_id}:");
        if let Ok(mut map) = self.inner.write() {
            map.retain(|key, _| !key.starts_with(&prefix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_auth::{permission_cache_key, Scope};
    use campus_core::NodeId;

    fn perms(names: &[&'static str]) -> HashSet<Permission> {
        names.iter().map(|n| Permission::new(*n)).collect()
    }

    #[test]
    fn put_get_round_trip() {
        let cache = InMemoryPermissionCache::new(Duration::from_secs(60));
        let key = permission_cache_key(UserId::new(), Scope::Global);

        cache.put(key.clone(), perms(&["course:read"]));
        assert_eq!(cache.get(&key), Some(perms(&["course:read"])));
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache = InMemoryPermissionCache::new(Duration::ZERO);
        let key = permission_cache_key(UserId::new(), Scope::Global);

        cache.put(key.clone(), perms(&["course:read"]));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn invalidating_one_user_spares_others() {
        let cache = InMemoryPermissionCache::new(Duration::from_secs(60));
        let alice = UserId::new();
        let bob = UserId::new();
        let node = NodeId::new();

        let alice_global = permission_cache_key(alice, Scope::Global);
        let alice_node = permission_cache_key(alice, Scope::Node(node));
        let bob_global = permission_cache_key(bob, Scope::Global);

        cache.put(alice_global.clone(), perms(&["a"]));
        cache.put(alice_node.clone(), perms(&["b"]));
        cache.put(bob_global.clone(), perms(&["c"]));

        cache.invalidate_user(alice);

        assert_eq!(cache.get(&alice_global), None);
        assert_eq!(cache.get(&alice_node), None);
        assert_eq!(cache.get(&bob_global), Some(perms(&["c"])));
    }
}
