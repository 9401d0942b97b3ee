//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for arxrel
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub filter: FilterConfig,
    pub gender: GenderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub area: String,
    pub bare_tokens: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            area: "math".to_string(),
            bare_tokens: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenderConfig {
    /// `name,gender` CSV; unset means every gender is unknown
    pub names_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub max_record_warnings: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_record_warnings: 20,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./arxrel.toml (current directory)
    /// 2. ~/.config/arxrel/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("arxrel.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "arxrel") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.output.default_dir, PathBuf::from("./data"));
        assert_eq!(config.filter.area, "math");
        assert!(!config.filter.bare_tokens);
        assert!(config.gender.names_file.is_none());
        assert_eq!(config.log.max_record_warnings, 20);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[output]
default_dir = "/tmp/arxiv"

[filter]
area = "cs"
bare_tokens = true

[gender]
names_file = "names.csv"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.default_dir, PathBuf::from("/tmp/arxiv"));
        assert_eq!(config.filter.area, "cs");
        assert!(config.filter.bare_tokens);
        assert_eq!(config.gender.names_file, Some(PathBuf::from("names.csv")));
        assert_eq!(config.log.max_record_warnings, 20);
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[filter\narea = 1").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
