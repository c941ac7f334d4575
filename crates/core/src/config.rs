//! Application configuration loaded from TOML and the environment.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{alphabet::Alphabet, catalog::RecordPolicy, dataset::DEFAULT_DATASET};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "CITIES_CONFIG";
/// Prefix for per-field environment overrides, e.g. `CITIES_DATA_PATH`.
pub const ENV_PREFIX: &str = "CITIES";
/// Directory under the user config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "cities-game";

const DEFAULT_CONFIG: &str = r#"# Cities game configuration.

# JSON dataset with the list of cities.
data_path = "cities.json"

# Letters used to work out which starting letters have no city.
alphabet = "абвгдеёжзийклмнопрстуфхцчшщъыьэюя"

# What to do with malformed records: "lenient" skips them, "strict" rejects the dataset.
record_policy = "lenient"

# Default log filter when RUST_LOG is not set.
log_level = "info"
"#;

/// Runtime settings for the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// City dataset to load.
    pub data_path: PathBuf,
    /// Letters considered when computing unreachable letters.
    pub alphabet: Alphabet,
    /// Treatment of malformed dataset records.
    pub record_policy: RecordPolicy,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATASET),
            alphabet: Alphabet::cyrillic(),
            record_policy: RecordPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from [`config_path`] plus `CITIES_*` environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from an explicit file. A missing file leaves every field at its default.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(false))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Config file location: `$CITIES_CONFIG` if set, otherwise the user config dir.
pub fn config_path() -> PathBuf {
    match env::var_os(CONFIG_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => default_config_path(),
    }
}

/// `<config dir>/cities-game/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default config if none exists yet. Does nothing when
/// `$CITIES_CONFIG` redirects to another file.
pub fn ensure_default_config() -> Result<()> {
    if env::var_os(CONFIG_PATH_ENV).is_some() {
        return Ok(());
    }
    write_default_config(default_config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("nope.toml"))?;
        assert_eq!(config.data_path, PathBuf::from("cities.json"));
        assert_eq!(config.record_policy, RecordPolicy::Lenient);
        assert_eq!(config.alphabet.len(), 33);
        Ok(())
    }

    #[test]
    fn default_file_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/config.toml");
        write_default_config(path.clone())?;
        assert_eq!(AppConfig::load_from(&path)?, AppConfig::default());
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "record_policy = [not toml")?;
        assert!(AppConfig::load_from(&path).is_err());
        fs::write(&path, "record_policy = \"sometimes\"\n")?;
        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_path = \"/srv/towns.json\"\nalphabet = \"abc\"\nrecord_policy = \"strict\"\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_path, PathBuf::from("/srv/towns.json"));
        assert_eq!(config.alphabet, Alphabet::new("abc"));
        assert_eq!(config.record_policy, RecordPolicy::Strict);
        assert_eq!(config.log_level, "info");
        Ok(())
    }
}
