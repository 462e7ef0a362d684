//! Configuration
//!
//! `config.toml` in the data directory. Every field is optional; a missing
//! file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, DEFAULT_ICON};
use crate::repository::STORAGE_KEY;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "BOOKMARKS_PATH";

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "bookmarks.db";

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. BOOKMARKS_PATH environment variable (with tilde expansion)
/// 3. Platform data directory
/// 4. ~/.bookmarks
pub fn resolve_data_dir(explicit_path: Option<&str>) -> DomainResult<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV) {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("bookmarks"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".bookmarks"));
    }

    Err(DomainError::Config(
        "Could not determine data directory: no home or platform data directory found".to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key the bookmark list is stored under
    pub storage_key: String,
    /// Icon pre-selected in the create form
    pub default_icon: String,
    /// Log directory; `<data_dir>/logs` when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            default_icon: DEFAULT_ICON.to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    pub fn load_from(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| DomainError::Config(format!("Invalid {}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Config(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| DomainError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| DomainError::Config(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE)
    }

    pub fn log_dir(&self, data_dir: &Path) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| data_dir.join("logs"))
    }
}
