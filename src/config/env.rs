//! `MESH_CONSOLE_*` environment overrides

use std::fmt;
use tracing::warn;

const ENV_PREFIX: &str = "MESH_CONSOLE";

/// Settings read from the environment. Unset and empty variables are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub server: Option<String>,
    pub cluster: Option<String>,
    pub namespace: Option<String>,
    pub timeout: Option<u64>,
    pub config_file: Option<String>,
    pub verbose: Option<bool>,
    pub format: Option<String>,
}

impl EnvConfig {
    /// Read the process environment
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`, which receives the full variable name
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(&var_name(name)).filter(|v| !v.is_empty());

        Self {
            server: var("SERVER"),
            cluster: var("CLUSTER"),
            namespace: var("NAMESPACE"),
            timeout: var("TIMEOUT").and_then(|v| match v.parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!("Ignoring {}: not a number of seconds: {v}", var_name("TIMEOUT"));
                    None
                }
            }),
            config_file: var("CONFIG"),
            verbose: var("VERBOSE").and_then(|v| {
                let flag = parse_flag(&v);
                if flag.is_none() {
                    warn!("Ignoring {}: not a boolean: {v}", var_name("VERBOSE"));
                }
                flag
            }),
            format: var("FORMAT"),
        }
    }

    pub fn has_any(&self) -> bool {
        *self != Self::default()
    }

    /// Output format, or `default` when unset
    pub fn format_or(&self, default: &str) -> String {
        self.format.clone().unwrap_or_else(|| default.to_string())
    }

    fn entries(&self) -> [(&'static str, Option<String>); 7] {
        [
            ("SERVER", self.server.clone()),
            ("CLUSTER", self.cluster.clone()),
            ("NAMESPACE", self.namespace.clone()),
            ("TIMEOUT", self.timeout.map(|t| t.to_string())),
            ("CONFIG", self.config_file.clone()),
            ("VERBOSE", self.verbose.map(|v| v.to_string())),
            ("FORMAT", self.format.clone()),
        ]
    }

    pub fn print_summary(&self) {
        print!("{self}");
    }
}

impl fmt::Display for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Environment:")?;
        for (name, value) in self.entries() {
            let name = var_name(name);
            match value {
                Some(value) => writeln!(f, "  {name:<24} {value}")?,
                None => writeln!(f, "  {name:<24} (unset)")?,
            }
        }
        Ok(())
    }
}

fn var_name(name: &str) -> String {
    format!("{ENV_PREFIX}_{name}")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn print_env_help() {
    let help = [
        ("SERVER", "Dashboard server URL"),
        ("CLUSTER", "Cluster used when --cluster is omitted"),
        ("NAMESPACE", "Namespace used when --namespace is omitted"),
        ("TIMEOUT", "Request timeout in seconds"),
        ("CONFIG", "Configuration file path"),
        ("VERBOSE", "Debug logging (true/false)"),
        ("FORMAT", "Output format (table, json, json-pretty, yaml, csv)"),
    ];

    println!("Environment variables:");
    for (name, about) in help {
        println!("  {:<24} {about}", var_name(name));
    }
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_SERVER=https://console.example.com");
    println!("  export {ENV_PREFIX}_CLUSTER=prod");
    println!("  mesh-console list vs -n bookinfo");
}
