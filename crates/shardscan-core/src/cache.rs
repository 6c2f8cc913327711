use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, OnceLock};

/// Look up `key` in a bounded process-local cache, building and inserting the
/// value on a miss.
///
/// A poisoned lock never fails the caller; it degrades to building a fresh
/// value. `max_entries == 0` disables caching entirely.
pub fn get_or_build<K, V, F>(
    cache_cell: &'static OnceLock<Mutex<HashMap<K, V>>>,
    key: K,
    max_entries: usize,
    build: F,
) -> V
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: FnOnce() -> V,
{
    if max_entries == 0 {
        return build();
    }

    let cache = cache_cell.get_or_init(|| Mutex::new(HashMap::new()));

    if let Ok(guard) = cache.lock()
        && let Some(value) = guard.get(&key)
    {
        return value.clone();
    }

    let value = build();

    if let Ok(mut guard) = cache.lock() {
        if !guard.contains_key(&key)
            && guard.len() >= max_entries
            && let Some(evict_key) = guard.keys().next().cloned()
        {
            guard.remove(&evict_key);
        }
        guard.insert(key, value.clone());
    }

    value
}
