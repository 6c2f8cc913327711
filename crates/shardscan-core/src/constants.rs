/// Skip files larger than this during workspace scans (1 MB).
pub const MAX_FILE_SIZE: u64 = 1_048_576;

/// Default result cap for the `symbols` listing.
pub const DEFAULT_LIMIT: usize = 50;

/// File extensions treated as Crystal source.
pub const SOURCE_EXTENSIONS: &[&str] = &["cr"];

/// Global config directory under the user's home.
pub const DEFAULT_DATA_DIR: &str = ".shardscan";

/// Per-project config file, relative to the workspace root.
pub const PROJECT_CONFIG_FILE: &str = ".shardscan/config.toml";

/// Custom ignore file honored by the workspace walker.
pub const IGNORE_FILE: &str = ".shardscanignore";

/// Version prefix hashed into symbol ids; bump when the id layout changes.
pub const SYMBOL_ID_VERSION: &str = "symbol_id:v1";

/// Capacity of the process-local outline cache (entries, one per content hash).
pub const OUTLINE_CACHE_MAX_ENTRIES: usize = 128;
