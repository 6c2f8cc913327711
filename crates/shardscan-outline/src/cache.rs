use crate::scanner;
use shardscan_core::cache::get_or_build;
use shardscan_core::constants::OUTLINE_CACHE_MAX_ENTRIES;
use shardscan_core::types::{content_hash, SymbolRecord};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

static OUTLINE_CACHE: OnceLock<Mutex<HashMap<String, Vec<SymbolRecord>>>> = OnceLock::new();

/// Scan `source`, memoized by content hash.
///
/// Editors re-request outlines for unchanged buffers constantly; keying on
/// the content hash makes the repeat case a map lookup. Results are identical
/// to [`scanner::scan`].
pub fn scan_cached(source: &str) -> Vec<SymbolRecord> {
    let key = content_hash(source);
    get_or_build(&OUTLINE_CACHE, key, OUTLINE_CACHE_MAX_ENTRIES, || {
        debug!(bytes = source.len(), "outline cache miss, scanning");
        scanner::scan(source)
    })
}
