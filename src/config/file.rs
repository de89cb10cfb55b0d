//! Configuration files
//!
//! Looked up in the working directory first, then in the user's home.
//! The format follows the extension: `.yaml`/`.yml` is YAML, anything else
//! is JSON.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::AppConfig;

const FILE_VERSION: &str = "1.0";

/// Candidate paths, highest precedence first
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("./mesh-console.yaml"),
        PathBuf::from("./mesh-console.yml"),
        PathBuf::from("./.mesh-console.yaml"),
    ];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/mesh-console/config.yaml"));
        paths.push(home.join(".mesh-console.yaml"));
    }
    paths
}

/// Where `config init` writes when no path is given
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mesh-console")
        .join("config.yaml")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }

    fn parse(self, content: &str) -> Result<ConfigFile> {
        match self {
            ConfigFormat::Yaml => serde_yaml::from_str(content).context("Invalid YAML"),
            ConfigFormat::Json => serde_json::from_str(content).context("Invalid JSON"),
        }
    }

    fn render(self, config: &ConfigFile) -> Result<String> {
        match self {
            ConfigFormat::Yaml => serde_yaml::to_string(config).context("Failed to render YAML"),
            ConfigFormat::Json => {
                serde_json::to_string_pretty(config).context("Failed to render JSON")
            }
        }
    }
}

/// On-disk configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "file_version")]
    pub version: String,

    #[serde(default)]
    pub app: AppConfig,
}

fn file_version() -> String {
    FILE_VERSION.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: file_version(),
            app: AppConfig::default(),
        }
    }
}

impl ConfigFile {
    /// First existing file among the standard locations
    pub fn find() -> Option<PathBuf> {
        search_paths().into_iter().find(|path| path.is_file())
    }

    /// Load the first file found, or defaults when there is none
    pub fn load_default() -> Result<Self> {
        let Some(path) = Self::find() else {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        };
        debug!("Using config file {}", path.display());
        Self::load(&path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = ConfigFormat::of(path)
            .parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write to `path`, creating missing parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = ConfigFormat::of(path).render(self)?;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != FILE_VERSION {
            bail!("Unsupported config version: {}", self.version);
        }

        let server = &self.app.server;
        if !(server.starts_with("http://") || server.starts_with("https://")) {
            bail!("Server URL must start with http:// or https://: {server}");
        }

        if self.app.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Template written by `config init`
    pub fn example() -> Self {
        let mut app = AppConfig {
            server: "https://console.example.com".to_string(),
            default_cluster: Some("prod".to_string()),
            default_namespace: Some("default".to_string()),
            ..AppConfig::default()
        };
        app.headers
            .insert("Cookie".to_string(), "SESSION=<session-id>".to_string());

        Self {
            version: file_version(),
            app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConfigFile::default();
        assert_eq!(config.version, "1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = ConfigFile::example();
        config.save(&path).unwrap();

        assert_eq!(ConfigFile::load(&path).unwrap(), config);
    }

    #[test]
    fn test_json_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        ConfigFile::example().save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.trim_start().starts_with('{'));

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.app.default_cluster.as_deref(), Some("prod"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            ConfigFile {
                version: "2.0".to_string(),
                ..ConfigFile::default()
            },
            ConfigFile {
                app: AppConfig {
                    server: "console.example.com".to_string(),
                    ..AppConfig::default()
                },
                ..ConfigFile::default()
            },
            ConfigFile {
                app: AppConfig {
                    timeout_secs: 0,
                    ..AppConfig::default()
                },
                ..ConfigFile::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_load_reports_invalid_server() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "version: \"1.0\"\napp:\n  server: ftp://nope\n").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("http://"));
    }

    #[test]
    fn test_format_of() {
        assert_eq!(ConfigFormat::of(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::of(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::of(Path::new("noext")), ConfigFormat::Json);
    }

    #[test]
    fn test_default_path_ends_in_app_dir() {
        assert!(default_config_path().ends_with("mesh-console/config.yaml"));
    }
}
