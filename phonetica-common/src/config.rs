//! Configuration loading and root folder resolution
//!
//! TOML file layout:
//!
//! ```toml
//! root_folder = "/home/me/.local/share/phonetica"
//!
//! [dictionary]
//! us_path = "openDictUS.json"
//! uk_path = "openDictUK.json"
//!
//! [cache]
//! max_entries = 1000
//! persist = true
//!
//! [remote]
//! endpoints = ["https://api.dictionaryapi.dev/api/v2/entries/en/"]
//! attempt_timeout_ms = 5000
//! max_attempts = 4
//! backoff_step_ms = 500
//! rotate_after = 1
//!
//! [logging]
//! level = "info"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Public dictionary endpoint used when nothing else is configured
pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Default cache bound (entries)
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "PHONETICA_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "phonetica.db";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the cache database
    pub root_folder: Option<String>,
    pub dictionary: DictionaryConfig,
    pub cache: CacheConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
}

/// Local dictionary file locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DictionaryConfig {
    pub us_path: PathBuf,
    pub uk_path: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            us_path: PathBuf::from("openDictUS.json"),
            uk_path: PathBuf::from("openDictUK.json"),
        }
    }
}

/// Phonetics cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached words before FIFO eviction
    pub max_entries: usize,
    /// Persist the cache to the database after every write
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            persist: true,
        }
    }
}

/// Remote dictionary service settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URLs tried in rotation; the word is appended to the base
    pub endpoints: Vec<String>,
    pub attempt_timeout_ms: u64,
    pub max_attempts: u32,
    pub backoff_step_ms: u64,
    /// Consecutive failures before moving to the next endpoint
    pub rotate_after: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![DEFAULT_REMOTE_ENDPOINT.to_string()],
            attempt_timeout_ms: 5000,
            max_attempts: 4,
            backoff_step_ms: 500,
            rotate_after: 1,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load the configuration file if present, defaults otherwise
///
/// An explicit path that does not exist is an error; the platform default
/// path silently falls back to defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_toml_config(&path),
        _ => Ok(TomlConfig::default()),
    }
}

/// Write configuration atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;

    tracing::debug!(path = %path.display(), "Wrote TOML config");
    Ok(())
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument
/// 2. Environment variable (`PHONETICA_ROOT`)
/// 3. TOML `root_folder`
/// 4. OS-dependent default
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return PathBuf::from(path);
    }

    default_root_folder()
}

/// Path of the cache database inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// `~/.config/phonetica/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("phonetica").join("config.toml"))
}

fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("phonetica"))
        .unwrap_or_else(|| PathBuf::from("./phonetica_data"))
}
