use crate::constants;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_max_file_size() -> u64 {
    constants::MAX_FILE_SIZE
}
fn default_extensions() -> Vec<String> {
    constants::SOURCE_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_limit() -> usize {
    constants::DEFAULT_LIMIT
}
fn default_format() -> String {
    "text".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            extensions: default_extensions(),
            default_limit: default_limit(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration with layered precedence:
    /// 1. Explicit config file (from `--config` flag, highest priority)
    /// 2. Project config: `<root>/.shardscan/config.toml`
    /// 3. Global config: `~/.shardscan/config.toml`
    /// 4. Built-in defaults (lowest priority)
    ///
    /// Only fields explicitly set in a higher-priority file override lower layers.
    pub fn load(root: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_file(root, None)
    }

    /// Load configuration with an explicit config file path (highest priority layer).
    pub fn load_with_file(
        root: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        // Start with an empty TOML value, then layer on each config file so
        // only explicitly-set fields override previous layers.
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if let Some(home) = dirs::home_dir() {
            let global_path = home.join(constants::DEFAULT_DATA_DIR).join("config.toml");
            if global_path.exists() {
                debug!(path = %global_path.display(), "applying global config layer");
                let raw = load_toml_value(&global_path)?;
                merge_toml_values(&mut merged, &raw);
            }
        }

        if let Some(root) = root {
            let project_path = root.join(constants::PROJECT_CONFIG_FILE);
            if project_path.exists() {
                debug!(path = %project_path.display(), "applying project config layer");
                let raw = load_toml_value(&project_path)?;
                merge_toml_values(&mut merged, &raw);
            }
        }

        if let Some(cf) = config_file {
            if !cf.exists() {
                return Err(ConfigError::NotFound {
                    path: cf.display().to_string(),
                });
            }
            let raw = load_toml_value(cf)?;
            merge_toml_values(&mut merged, &raw);
        }

        // Deserialize the merged value into Config (fills remaining fields with defaults)
        let config_str =
            toml::to_string(&merged).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let mut config: Config =
            toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Environment overrides: SHARDSCAN_<SECTION>_<KEY> in UPPER_SNAKE_CASE.
        apply_env_overrides(&mut config);

        config.output.format = normalize_format(&config.output.format)?;
        if config.scan.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_file_size".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if config.scan.extensions.is_empty() {
            config.scan.extensions = default_extensions();
        }

        Ok(config)
    }
}

/// Load a TOML file as a raw `toml::Value` (preserving only explicitly-set fields).
fn load_toml_value(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Deep-merge `overlay` into `base`. Only keys present in `overlay` are written.
fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    if let (toml::Value::Table(base_map), toml::Value::Table(overlay_map)) = (base, overlay) {
        for (key, overlay_val) in overlay_map {
            if let Some(base_val) = base_map.get_mut(key) {
                if base_val.is_table() && overlay_val.is_table() {
                    merge_toml_values(base_val, overlay_val);
                } else {
                    *base_val = overlay_val.clone();
                }
            } else {
                base_map.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(v) = std::env::var("SHARDSCAN_SCAN_MAX_FILE_SIZE")
        && let Ok(n) = v.parse()
    {
        config.scan.max_file_size = n;
    }
    if let Ok(v) = std::env::var("SHARDSCAN_SCAN_DEFAULT_LIMIT")
        && let Ok(n) = v.parse()
    {
        config.scan.default_limit = n;
    }
    if let Ok(v) = std::env::var("SHARDSCAN_OUTPUT_FORMAT") {
        config.output.format = v;
    }
    if let Ok(v) = std::env::var("SHARDSCAN_LOGGING_LEVEL") {
        config.logging.level = v;
    }
}

fn normalize_format(raw: &str) -> Result<String, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "text" => Ok("text".to_string()),
        "json" => Ok("json".to_string()),
        other => Err(ConfigError::InvalidValue {
            field: "output.format".into(),
            reason: format!("unknown format '{other}' (expected 'text' or 'json')"),
        }),
    }
}
