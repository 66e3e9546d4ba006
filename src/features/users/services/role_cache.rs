use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::features::users::models::Role;

/// Cached identity for a token subject.
#[derive(Debug, Clone)]
pub struct CachedIdentity {
    pub user_id: i64,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
}

struct Entry {
    identity: CachedIdentity,
    fetched_at: Instant,
}

/// TTL cache for per-request role lookups.
///
/// Injected into the auth middleware rather than living as a module-level
/// global; role changes call `invalidate_user` so a demoted admin loses
/// access within one request, not one TTL.
pub struct RoleCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl RoleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, subject: &str) -> Option<CachedIdentity> {
        let entries = self.entries.read().await;
        entries.get(subject).and_then(|entry| {
            if entry.fetched_at.elapsed() < self.ttl {
                Some(entry.identity.clone())
            } else {
                None
            }
        })
    }

    pub async fn insert(&self, subject: &str, identity: CachedIdentity) {
        let mut entries = self.entries.write().await;
        entries.insert(
            subject.to_string(),
            Entry {
                identity,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Invalidation hook for role changes.
    pub async fn invalidate_user(&self, user_id: i64) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.identity.user_id != user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_id: i64, role: Role) -> CachedIdentity {
        CachedIdentity {
            user_id,
            display_name: "Test".to_string(),
            email: None,
            role,
        }
    }

    #[tokio::test]
    async fn get_returns_cached_identity_within_ttl() {
        let cache = RoleCache::new(Duration::from_secs(60));
        cache.insert("sub-1", identity(1, Role::Admin)).await;

        let hit = cache.get("sub-1").await.unwrap();
        assert_eq!(hit.user_id, 1);
        assert_eq!(hit.role, Role::Admin);
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let cache = RoleCache::new(Duration::from_secs(0));
        cache.insert("sub-1", identity(1, Role::Student)).await;

        assert!(cache.get("sub-1").await.is_none());
    }

    #[tokio::test]
    async fn invalidate_user_removes_all_entries_for_that_user() {
        let cache = RoleCache::new(Duration::from_secs(60));
        cache.insert("sub-1", identity(1, Role::Admin)).await;
        cache.insert("sub-2", identity(2, Role::Student)).await;

        cache.invalidate_user(1).await;

        assert!(cache.get("sub-1").await.is_none());
        assert!(cache.get("sub-2").await.is_some());
    }
}
