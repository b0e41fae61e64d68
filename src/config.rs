//! User configuration management
//!
//! Configuration is stored in TOML format at `~/.pkgscout/config.toml`. Every
//! field has a default, so a missing file or a partial file is fine.
//!
//! # Examples
//!
//! ```no_run
//! use pkgscout::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::load()?;
//! println!("Bower command: {}", config.bower.command);
//!
//! config.install.components_dir = "vendor_components".to_string();
//! config.save()?;
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "PKGSCOUT_CONFIG_DIR";

/// Environment variable overriding `bower.command`
pub const BOWER_ENV: &str = "PKGSCOUT_BOWER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How to run the Bower registry client
    #[serde(default)]
    pub bower: BowerConfig,

    /// Where packages get installed for inspection
    #[serde(default)]
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BowerConfig {
    /// Executable to run (name on PATH or full path)
    #[serde(default = "default_bower_command")]
    pub command: String,

    /// Extra arguments passed to every invocation
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_bower_command() -> String {
    "bower".to_string()
}

impl Default for BowerConfig {
    fn default() -> Self {
        Self {
            command: default_bower_command(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Directory Bower runs in; the install working area lives below it
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    /// Install working area removed by prune (relative to `working_dir`)
    #[serde(default = "default_components_dir")]
    pub components_dir: String,
}

fn default_working_dir() -> String {
    ".".to_string()
}

fn default_components_dir() -> String {
    "bower_components".to_string()
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            components_dir: default_components_dir(),
        }
    }
}

impl InstallConfig {
    /// Working directory with `~` and environment variables expanded
    pub fn working_dir_path(&self) -> PathBuf {
        PathBuf::from(expand(&self.working_dir))
    }

    /// Absolute-or-relative path of the install working area
    pub fn components_path(&self) -> PathBuf {
        self.working_dir_path().join(&self.components_dir)
    }
}

impl BowerConfig {
    pub fn command_path(&self) -> String {
        expand(&self.command)
    }
}

fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses PKGSCOUT_CONFIG_DIR if set, otherwise ~/.pkgscout/config.toml
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not find home directory".to_string()))?;

        Ok(home.join(".pkgscout").join("config.toml"))
    }

    /// Load config from file, or use defaults if it doesn't exist
    ///
    /// Environment variable overrides:
    /// - `PKGSCOUT_BOWER`: Overrides `bower.command`
    /// - `PKGSCOUT_CONFIG_DIR`: Overrides the config directory location
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;

        if let Ok(command) = std::env::var(BOWER_ENV) {
            if !command.is_empty() {
                config.bower.command = command;
            }
        }

        Ok(config)
    }

    /// Load the config file as written, without environment overrides
    pub fn load_file() -> Result<Self> {
        let path = Self::default_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bower.command, "bower");
        assert!(config.bower.extra_args.is_empty());
        assert_eq!(config.install.working_dir, ".");
        assert_eq!(config.install.components_dir, "bower_components");
        assert_eq!(
            config.install.components_path(),
            PathBuf::from(".").join("bower_components")
        );
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
[bower]
command = "/opt/node/bin/bower"

[install]
components_dir = "vendor"
"#,
        )
        .unwrap();

        assert_eq!(config.bower.command, "/opt/node/bin/bower");
        assert_eq!(config.install.working_dir, ".");
        assert_eq!(config.install.components_dir, "vendor");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.bower.extra_args = vec!["--allow-root".to_string()];

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.bower.extra_args, vec!["--allow-root"]);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[bower\ncommand = 1"),
            Err(Error::TomlDe(_))
        ));
    }
}
