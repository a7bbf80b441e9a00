use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Time-windowed cache for rendered listing responses, keyed by request path
/// (including query string).
///
/// Entries are served verbatim until the TTL elapses, even when the
/// underlying store has changed since they were rendered. There is no
/// write-through invalidation; staleness is bounded only by the TTL and by
/// explicit `clear()` calls.
#[derive(Clone)]
pub struct PageCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

struct CacheEntry {
    body: Vec<u8>,
    stored_at: Instant,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch the cached body for `key` if it is still within the TTL window.
    /// Expired entries are evicted lazily on read.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.stored_at.elapsed() < self.ttl {
                    debug!("page cache HIT for {}", key);
                    return Some(entry.body.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        debug!("page cache MISS for {}", key);
        None
    }

    pub fn insert(&self, key: impl Into<String>, body: Vec<u8>) {
        let key = key.into();
        debug!("page cache WRITE for {} ({} bytes)", key, body.len());
        self.entries.insert(
            key,
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Evict every entry immediately, forcing fresh composition on the next
    /// request.
    pub fn clear(&self) {
        debug!("page cache CLEAR ({} entries)", self.entries.len());
        self.entries.clear();
    }
}
