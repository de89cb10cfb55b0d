//! Configuration module
//!
//! Handles loading and merging configuration. Precedence, highest first:
//! command-line flags, environment, config file, defaults.

pub mod env;
pub mod file;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use self::env::EnvConfig;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dashboard server base URL
    pub server: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Cluster used when a command does not name one
    pub default_cluster: Option<String>,

    /// Namespace used when a command does not name one
    pub default_namespace: Option<String>,

    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,

    /// Headers sent with every request, e.g. a session cookie
    pub headers: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            default_cluster: None,
            default_namespace: None,
            accept_invalid_certs: false,
            headers: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Overlay values set in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(server) = &env.server {
            self.server = server.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if env.cluster.is_some() {
            self.default_cluster = env.cluster.clone();
        }
        if env.namespace.is_some() {
            self.default_namespace = env.namespace.clone();
        }
    }

    /// Cluster from the command line, else the configured default
    pub fn cluster_or_default(&self, cluster: Option<String>) -> Option<String> {
        cluster.or_else(|| self.default_cluster.clone())
    }

    /// Namespace from the command line, else the configured default
    pub fn namespace_or_default(&self, namespace: Option<String>) -> Option<String> {
        namespace.or_else(|| self.default_namespace.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = AppConfig {
            default_cluster: Some("dev".to_string()),
            ..AppConfig::default()
        };
        let env = EnvConfig {
            server: Some("https://console.example.com".to_string()),
            namespace: Some("bookinfo".to_string()),
            ..EnvConfig::default()
        };

        config.apply_env(&env);
        assert_eq!(config.server, "https://console.example.com");
        assert_eq!(config.default_cluster.as_deref(), Some("dev"));
        assert_eq!(config.default_namespace.as_deref(), Some("bookinfo"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_cli_beats_defaults() {
        let config = AppConfig {
            default_cluster: Some("dev".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.cluster_or_default(Some("prod".to_string())).as_deref(),
            Some("prod")
        );
        assert_eq!(config.cluster_or_default(None).as_deref(), Some("dev"));
        assert_eq!(config.namespace_or_default(None), None);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("server: https://mesh.internal\n").unwrap();
        assert_eq!(config.server, "https://mesh.internal");
        assert_eq!(config.timeout_secs, 30);
    }
}
