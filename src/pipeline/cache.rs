//! Memoization of derived views.
//!
//! Views are pure functions of a document and a request, so a result can be
//! reused whenever both are value-equal. Keys pair the document fingerprint
//! with the request; callers choose the policy per view.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::sync::Mutex;

use rustc_hash::FxHashMap;

/// A cache for results of type `V` keyed by `K`.
///
/// Implementations use interior mutability so a shared session can cache
/// through `&self`.
pub trait CachePolicy<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;

    fn put(&self, key: K, value: V);

    fn clear(&self);

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<K, V> CachePolicy<K, V> for NoCache {
    fn get(&self, _key: &K) -> Option<V> {
        None
    }

    fn put(&self, _key: K, _value: V) {}

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}

struct MemoEntries<K, V> {
    values: FxHashMap<K, V>,
    /// Least recently used first
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> MemoEntries<K, V> {
    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

/// Bounded least-recently-used cache.
///
/// A poisoned lock is treated as a miss rather than a panic.
pub struct MemoCache<K, V> {
    capacity: usize,
    entries: Mutex<MemoEntries<K, V>>,
}

impl<K, V> MemoCache<K, V> {
    /// A cache holding at most `capacity` entries; `0` stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(MemoEntries {
                values: FxHashMap::default(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.entries.lock().map(|e| e.values.len()).unwrap_or(0);
        f.debug_struct("MemoCache")
            .field("capacity", &self.capacity)
            .field("len", &len)
            .finish()
    }
}

impl<K, V> CachePolicy<K, V> for MemoCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        let value = entries.values.get(key)?.clone();
        entries.touch(key);
        Some(value)
    }

    fn put(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.values.insert(key.clone(), value).is_some() {
            entries.touch(&key);
            return;
        }
        entries.order.push_back(key);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.values.remove(&oldest);
            }
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.values.clear();
            entries.order.clear();
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().map(|e| e.values.len()).unwrap_or(0)
    }
}

/// `MemoCache` for a positive capacity, otherwise `NoCache`.
pub fn cache_for<K, V>(capacity: usize) -> Box<dyn CachePolicy<K, V>>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    if capacity == 0 {
        Box::new(NoCache)
    } else {
        Box::new(MemoCache::new(capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cache_never_hits() {
        let cache = NoCache;
        CachePolicy::<u32, u32>::put(&cache, 1, 1);
        assert_eq!(CachePolicy::<u32, u32>::get(&cache, &1), None);
        assert!(CachePolicy::<u32, u32>::is_empty(&cache));
    }

    #[test]
    fn test_memo_cache_hits_and_evicts_oldest() {
        let cache: MemoCache<(u64, &str), usize> = MemoCache::new(2);
        cache.put((1, "a"), 10);
        cache.put((1, "b"), 20);
        assert_eq!(cache.get(&(1, "a")), Some(10)); // "a" is now most recent

        cache.put((2, "c"), 30);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&(1, "b")), None);
        assert_eq!(cache.get(&(1, "a")), Some(10));
        assert_eq!(cache.get(&(2, "c")), Some(30));
    }

    #[test]
    fn test_memo_cache_replaces_existing_key() {
        let cache: MemoCache<u8, &str> = MemoCache::new(2);
        cache.put(1, "old");
        cache.put(1, "new");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some("new"));
    }

    #[test]
    fn test_zero_capacity_and_clear() {
        let cache: MemoCache<u8, u8> = MemoCache::new(0);
        cache.put(1, 1);
        assert!(cache.is_empty());

        let boxed = cache_for::<u8, u8>(4);
        boxed.put(1, 1);
        assert_eq!(boxed.len(), 1);
        boxed.clear();
        assert!(boxed.is_empty());
        assert!(cache_for::<u8, u8>(0).get(&1).is_none());
    }
}
