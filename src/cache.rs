// In-memory per-user result cache with lazy TTL expiry.
// One slot per user; reads after the TTL window behave as a miss.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// A cached value plus the moment it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            cached_at: Utc::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > ttl
    }
}

/// Per-user single-slot cache with one fixed TTL for all entries.
///
/// Expiry is evaluated at read time; there is no sweep task. Concurrent
/// writers for the same user race last-write-wins, which is fine for a
/// freshness optimization.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get the live value for a user, dropping the slot if it has expired.
    pub fn get(&self, user_id: &str) -> Option<T> {
        let mut entries = self.lock();
        match entries.get(user_id) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(user_id);
                None
            }
            None => None,
        }
    }

    /// Store a value for a user, overwriting any prior slot.
    pub fn set(&self, user_id: &str, value: T) {
        self.lock()
            .insert(user_id.to_string(), CacheEntry::new(value));
    }

    /// Drop a user's slot.
    pub fn remove(&self, user_id: &str) {
        self.lock().remove(user_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shift an entry's stored timestamp into the past (clock simulation).
    #[cfg(test)]
    pub fn backdate(&self, user_id: &str, by: chrono::TimeDelta) {
        if let Some(entry) = self.lock().get_mut(user_id) {
            entry.cached_at -= by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(300));

        cache.set("user-1", vec!["a", "b"]);
        assert_eq!(cache.get("user-1"), Some(vec!["a", "b"]));
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let cache = TtlCache::new(Duration::from_secs(300));

        cache.set("user-1", 42);
        cache.backdate("user-1", chrono::TimeDelta::seconds(600));

        assert_eq!(cache.get("user-1"), None);
        // The expired slot is gone, not just hidden.
        assert_eq!(cache.get("user-1"), None);
    }

    #[test]
    fn test_set_overwrites_single_slot() {
        let cache = TtlCache::new(Duration::from_secs(300));

        cache.set("user-1", 1);
        cache.set("user-1", 2);
        assert_eq!(cache.get("user-1"), Some(2));
    }

    #[test]
    fn test_users_are_independent() {
        let cache = TtlCache::new(Duration::from_secs(300));

        cache.set("user-1", 1);
        cache.set("user-2", 2);
        cache.remove("user-1");

        assert_eq!(cache.get("user-1"), None);
        assert_eq!(cache.get("user-2"), Some(2));
    }
}
