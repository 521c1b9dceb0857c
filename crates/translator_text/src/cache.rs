//! Cache layers for loaded translation groups.
//!
//! Groups are cached twice: [`GroupCache`] keeps them for the lifetime of the
//! resolver, and an optional [`ExternalCache`] shares them between processes
//! for a limited time. The external cache stores opaque strings; the resolver
//! encodes groups as JSON.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::error::CacheError;
use crate::store::TranslationRow;

/// Key/value cache shared beyond the current process.
///
/// Each operation is expected to be atomic for its single key.
#[cfg_attr(test, mockall::automock)]
pub trait ExternalCache: Send + Sync {
    /// Whether a live entry exists for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend cannot be queried.
    fn has(&self, key: &str) -> Result<bool, CacheError>;

    /// Returns the live entry for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend cannot be queried.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend rejects the write.
    fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`; returns whether an entry existed.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend rejects the removal.
    fn forget(&self, key: &str) -> Result<bool, CacheError>;
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Entries a [`MemoryCache`] holds unless built with another capacity.
pub const DEFAULT_MEMORY_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1023);

/// Bounded in-memory [`ExternalCache`] with per-entry expiry.
///
/// Expired entries are dropped when read and swept on every write; once
/// full, the least recently used entry makes room for a new one.
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CACHE_CAPACITY)
    }
}

impl MemoryCache {
    /// Creates an empty cache holding up to
    /// [`DEFAULT_MEMORY_CACHE_CAPACITY`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache holding up to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Maximum number of entries held at once.
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cap()
    }

    /// Number of entries currently held, live or not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let lookup = entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.value.clone()));
        match lookup {
            Some(Some(value)) => Some(value),
            Some(None) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }
}

fn sweep_expired(entries: &mut LruCache<String, Entry>, now: Instant) {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| !entry.is_live(now))
        .map(|(key, _)| key.clone())
        .collect();
    for key in expired {
        entries.pop(&key);
    }
}

impl ExternalCache for MemoryCache {
    fn has(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.live_value(key).is_some())
    }

    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.live_value(key))
    }

    fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Backend {
                operation: "put",
                key: key.to_owned(),
                reason: format!("ttl of {ttl:?} overflows the clock"),
            })?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        sweep_expired(&mut entries, now);
        entries.put(key.to_owned(), Entry { value, expires_at });
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop(key)
            .is_some())
    }
}

/// In-process map of loaded groups.
///
/// Reads share the lock; loads and flushes take it exclusively and replace
/// whole groups, never individual rows.
#[derive(Debug, Default)]
pub struct GroupCache {
    groups: RwLock<HashMap<String, Arc<[TranslationRow]>>>,
}

impl GroupCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rows of `group`.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<Arc<[TranslationRow]>> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(group)
            .cloned()
    }

    /// Stores the rows of `group`, replacing any previous copy.
    pub fn insert(&self, group: &str, rows: Arc<[TranslationRow]>) {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(group.to_owned(), rows);
    }

    /// Drops `group`; returns whether it was cached.
    pub fn remove(&self, group: &str) -> bool {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(group)
            .is_some()
    }

    /// Drops every group.
    pub fn clear(&self) {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether `group` is cached.
    #[must_use]
    pub fn contains(&self, group: &str) -> bool {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn memory_cache_round_trips_live_entries() {
        let cache = MemoryCache::new();
        cache
            .put("translator.group.blog", "[]".to_owned(), Duration::from_secs(60))
            .expect("memory cache accepts writes");

        assert!(cache.has("translator.group.blog").expect("memory cache reads"));
        assert_eq!(
            cache.get("translator.group.blog").expect("memory cache reads"),
            Some("[]".to_owned())
        );
    }

    #[rstest]
    fn memory_cache_expires_entries() {
        let cache = MemoryCache::new();
        cache
            .put("translator.group.blog", "[]".to_owned(), Duration::ZERO)
            .expect("memory cache accepts writes");

        assert!(!cache.has("translator.group.blog").expect("memory cache reads"));
        assert!(cache.is_empty());
    }

    #[rstest]
    fn memory_cache_sweeps_expired_entries_on_write() {
        let cache = MemoryCache::new();
        for index in 0..100 {
            cache
                .put(&format!("translator.group.g{index}"), "[]".to_owned(), Duration::ZERO)
                .expect("memory cache accepts writes");
        }
        cache
            .put("translator.group.live", "[]".to_owned(), Duration::from_secs(60))
            .expect("memory cache accepts writes");

        assert_eq!(cache.len(), 1);
        assert!(cache.has("translator.group.live").expect("memory cache reads"));
    }

    #[rstest]
    fn memory_cache_evicts_the_least_recently_used_entry() {
        let capacity = NonZeroUsize::MIN.saturating_add(1);
        let cache = MemoryCache::with_capacity(capacity);
        let ttl = Duration::from_secs(60);
        cache.put("a", "1".to_owned(), ttl).expect("memory cache accepts writes");
        cache.put("b", "2".to_owned(), ttl).expect("memory cache accepts writes");
        assert!(cache.has("a").expect("memory cache reads"));
        cache.put("c", "3".to_owned(), ttl).expect("memory cache accepts writes");

        assert_eq!(cache.capacity(), capacity);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b").expect("memory cache reads"), None);
        assert_eq!(cache.get("a").expect("memory cache reads"), Some("1".to_owned()));
    }

    #[rstest]
    fn memory_cache_forgets_entries() {
        let cache = MemoryCache::new();
        cache
            .put("key", "value".to_owned(), Duration::from_secs(60))
            .expect("memory cache accepts writes");

        assert!(cache.forget("key").expect("memory cache removes"));
        assert!(!cache.forget("key").expect("memory cache removes"));
        assert_eq!(cache.get("key").expect("memory cache reads"), None);
    }

    #[rstest]
    fn group_cache_replaces_whole_groups() {
        let groups = GroupCache::new();
        groups.insert("blog", Arc::from(vec![TranslationRow::new("blog", "a", "en", "A")]));
        groups.insert("blog", Arc::from(vec![TranslationRow::new("blog", "b", "en", "B")]));

        let rows = groups.get("blog").expect("group was inserted");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().map(|row| row.needle.as_str()), Some("b"));
    }

    #[rstest]
    fn group_cache_removes_and_clears() {
        let groups = GroupCache::new();
        groups.insert("blog", Arc::from(Vec::new()));
        groups.insert("menu", Arc::from(Vec::new()));

        assert!(groups.remove("blog"));
        assert!(!groups.contains("blog"));
        assert!(groups.contains("menu"));

        groups.clear();
        assert!(!groups.contains("menu"));
    }
}
