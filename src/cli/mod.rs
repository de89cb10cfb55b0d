//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use crate::mesh::ResourceKind;

/// Istio traffic management console
#[derive(Parser, Debug)]
#[command(name = "mesh-console")]
#[command(version = "0.1.0")]
#[command(about = "Manage Istio VirtualServices, DestinationRules and Gateways")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the standard locations)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Dashboard server URL, overrides config and environment
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resources of one kind
    List(ListArgs),

    /// Show a single resource
    Get(ItemArgs),

    /// Create a resource from a manifest file
    Create(CreateArgs),

    /// Replace a resource from a manifest file
    Update(UpdateArgs),

    /// Delete a resource
    Delete(ItemArgs),

    /// Count resources of every kind
    Overview(ScopeArgs),

    /// Fetch server-side traffic analytics
    Analytics(ScopeArgs),

    /// Analyze traffic offline from exported resource lists
    Analyze(AnalyzeArgs),

    /// Print the dashboard route table
    Routes(RoutesArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Print a starter manifest
    Scaffold(ScaffoldArgs),
}

/// Cluster and namespace selection
#[derive(Parser, Debug)]
pub struct ScopeArgs {
    /// Cluster name
    #[arg(short, long)]
    pub cluster: Option<String>,

    /// Namespace (all namespaces when omitted)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Output format (table, json, json-pretty, yaml, csv)
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Resource kind (virtualservice/vs, destinationrule/dr, gateway/gw)
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Send search parameters
    #[arg(short, long)]
    pub search: bool,

    /// Keyword filter (with --search)
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Page number, 1-based (with --search and --page-size)
    #[arg(long)]
    pub page_num: Option<u32>,

    /// Page size (with --search and --page-num)
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Arguments naming one resource
#[derive(Parser, Debug)]
pub struct ItemArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Resource name
    pub name: String,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Arguments for create command
#[derive(Parser, Debug)]
pub struct CreateArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Manifest file (YAML or JSON)
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Arguments for update command
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Resource name
    pub name: String,

    /// Manifest file (YAML or JSON)
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Arguments for offline analysis
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// VirtualService list exported with `kubectl get -o yaml`
    #[arg(long)]
    pub virtual_services: String,

    /// DestinationRule list
    #[arg(long)]
    pub destination_rules: Option<String>,

    /// Pod list
    #[arg(long)]
    pub pods: String,

    /// Output format
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for routes command
#[derive(Parser, Debug)]
pub struct RoutesArgs {
    /// Include routes hidden from the menu
    #[arg(short, long)]
    pub all: bool,

    /// Resolve a concrete dashboard path instead of printing the table
    #[arg(long)]
    pub resolve: Option<String>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path (defaults to ~/.config/mesh-console/config.yaml)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Show environment variables
    Env,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the first one found)
        file: Option<String>,
    },
}

/// Arguments for scaffold command
#[derive(Parser, Debug)]
pub struct ScaffoldArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Resource name
    pub name: String,

    /// Namespace written into the manifest
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Service host (defaults to the resource name)
    #[arg(long)]
    pub host: Option<String>,

    /// Output format (yaml, json)
    #[arg(short, long, default_value = "yaml")]
    pub format: String,
}

fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    ResourceKind::from_str(s).ok_or_else(|| format!("unknown resource kind: {s}"))
}
