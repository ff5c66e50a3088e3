//! CLI configuration
//!
//! Layering, most specific wins: command-line flags, then an explicit
//! `--config` file, then `ember.toml` in the user config directory,
//! then built-in defaults. The config file is optional everywhere
//! except when the user names one explicitly and it is missing.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ember.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub hearth: HearthConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HearthConfig {
    /// Notes directory; `~` expands to the home directory.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Collect without renaming attachments or writing documents back.
    #[serde(default)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("config file '{}' does not exist", path.display());
            }
            return Self::read(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config '{}'", path.display()))
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ember").join(CONFIG_FILE_NAME))
    }

    /// Configured hearth directory after `~` expansion.
    pub fn hearth_path(&self) -> Option<PathBuf> {
        self.hearth
            .path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: CliConfig = toml::from_str(
            "[hearth]\npath = \"~/org\"\n\n[scan]\ndry_run = true\n",
        )
        .unwrap();
        assert_eq!(config.hearth.path.as_deref(), Some("~/org"));
        assert!(config.scan.dry_run);
        assert!(config.hearth_path().is_some());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.hearth.path, None);
        assert!(!config.scan.dry_run);
        assert_eq!(config.hearth_path(), None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<CliConfig>("[hearth]\npth = \"typo\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/ember.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
