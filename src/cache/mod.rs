/// In-memory TTL cache for resolved handle lists
///
/// Sits in front of the directory store to absorb repeated lookups for
/// the same extension. Keys are the raw extension strings; values carry
/// an absolute expiry instant. State is not persisted and is rebuilt
/// from traffic after a restart.
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A cached handle list with its expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    handles: Vec<String>,
    expires_at: Instant,
}

/// Thread-safe TTL cache keyed by extension string.
#[derive(Debug)]
pub struct HandleCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl HandleCache {
    /// Create a cache whose entries live for `ttl` after each `set`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get the cached handle list for an extension.
    ///
    /// An entry whose expiry is at or before now is a miss, whether or
    /// not it has been physically evicted yet.
    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let entries = self.entries.read().expect("cache lock poisoned");

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.handles.clone()),
            _ => None,
        }
    }

    /// Cache a handle list, replacing any existing entry and its expiry.
    ///
    /// Empty lists are cached like any other result, so extensions with
    /// no matches do not hit the store on every request.
    pub fn set(&self, key: &str, handles: Vec<String>) {
        let entry = CacheEntry {
            handles,
            expires_at: Instant::now() + self.ttl,
        };

        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(key.to_string(), entry);
    }

    /// Physically evict expired entries, returning how many were removed.
    ///
    /// Purely hygiene for the background sweep; `get` already treats
    /// expired entries as misses.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().expect("cache lock poisoned");

        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
