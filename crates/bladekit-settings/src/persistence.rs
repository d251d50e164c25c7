//! Settings persistence.
//!
//! Configs live as TOML (default) or JSON, chosen by file extension. The
//! default location is `bladekit/config.toml` under the platform config
//! directory. Loading a missing file yields defaults so first runs work
//! without bootstrapping.

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file location under the platform config directory.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| SettingsError::ConfigDirectory("no platform config dir".to_string()))?;
    Ok(base.join("bladekit").join("config.toml"))
}

fn format_for(path: &Path) -> SettingsResult<FileFormat> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("toml") => Ok(FileFormat::Toml),
        Some("json") => Ok(FileFormat::Json),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Json,
}

impl Config {
    /// Load from a TOML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let text = fs::read_to_string(path)?;
        let config = match format {
            FileFormat::Toml => toml::from_str(&text)?,
            FileFormat::Json => serde_json::from_str(&text)?,
        };
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it does not exist.
    /// Parse errors still fail: a present-but-broken config must not be
    /// silently replaced.
    pub fn load_or_default(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save as TOML or JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> SettingsResult<()> {
        let path = path.as_ref();
        let format = format_for(path)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = match format {
            FileFormat::Toml => toml::to_string_pretty(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };
        fs::write(path, text)?;
        Ok(())
    }
}
