//! Store configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the stored quiz documents.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Code required by the authoring commands (publish/delete).
    #[serde(default = "default_admin_code")]
    pub admin_code: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/quizzes")
}

fn default_admin_code() -> String {
    "112233".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            admin_code: default_admin_code(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable overrides: `QUIZDECK_DATA_DIR`,
/// `QUIZDECK_ADMIN_CODE`.
pub fn load_config() -> Result<StoreConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<StoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdeck.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<StoreConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => StoreConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZDECK_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(code) = std::env::var("QUIZDECK_ADMIN_CODE") {
        config.admin_code = code;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("quizdeck"))
}
