use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DIR_NAME: &str = ".timecard";

/// Optional settings read from `config.toml` in the data directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Minutes a full day is expected to last (9h by default).
    pub daily_target_minutes: i64,
    pub weekly_target_hours: i64,
    /// Remark attached to a day on punch-in when it has none yet.
    pub default_remark: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_target_minutes: 9 * 60,
            weekly_target_hours: 45,
            default_remark: Some("Regular workday".to_string()),
        }
    }
}

impl Config {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if config.daily_target_minutes <= 0 {
            return Err(anyhow!("daily_target_minutes must be positive"));
        }
        Ok(config)
    }
}

/// `~/.timecard` unless overridden by the caller.
pub fn resolve_data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir),
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            Ok(home_dir.join(DEFAULT_DIR_NAME))
        }
    }
}
