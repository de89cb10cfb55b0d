//! mesh-console - Istio traffic management console
//!
//! A CLI for the dashboard's Istio endpoints: VirtualServices,
//! DestinationRules and Gateways per cluster and namespace, plus traffic
//! analytics.
//!
//! ## Usage
//!
//! ```bash
//! # List VirtualServices in a namespace
//! mesh-console list vs -c prod -n bookinfo
//!
//! # Search Gateways, second page of 20
//! mesh-console list gw -c prod --search --keywords edge --page-num 2 --page-size 20
//!
//! # Apply a manifest
//! mesh-console create dr -c prod -n bookinfo --file reviews-dr.yaml
//!
//! # Traffic analytics, server-side or from exported lists
//! mesh-console analytics -c prod -n bookinfo
//! mesh-console analyze --virtual-services vs.yaml --destination-rules dr.yaml --pods pods.yaml
//!
//! # Dashboard routes
//! mesh-console routes --all
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use futures::future::try_join_all;
use kube::core::DynamicObject;
use serde::de::DeserializeOwned;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use mesh_console::analytics::{self, TrafficAnalytics};
use mesh_console::api::{IstioClient, ListQuery, ResourceList};
use mesh_console::cli::{self, Args, Command};
use mesh_console::config::env::{print_env_help, EnvConfig};
use mesh_console::config::file::{default_config_path, ConfigFile};
use mesh_console::config::AppConfig;
use mesh_console::http::HttpClient;
use mesh_console::mesh::{self, DestinationRule, ResourceKind, VirtualService};
use mesh_console::output::{OutputFormat, ResultFormatter};
use mesh_console::routes::istio_section;
use mesh_console::utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    init_logger(LogLevel::from_verbose(
        args.verbose || env.verbose.unwrap_or(false),
    ));

    let Args {
        command,
        config,
        server,
        ..
    } = args;

    match command {
        Command::Config(config_args) => manage_config(config_args, config, server, &env)?,
        Command::Routes(routes_args) => show_routes(routes_args, &env)?,
        Command::Analyze(analyze_args) => run_analyze(analyze_args, &env)?,
        Command::Scaffold(scaffold_args) => run_scaffold(scaffold_args)?,
        remote => {
            let app = load_config(config.as_deref(), server, &env)?;
            Console::new(app, env)?.run(remote).await?;
        }
    }

    Ok(())
}

/// Merge file, environment and command-line settings
fn load_config(path: Option<&str>, server: Option<String>, env: &EnvConfig) -> Result<AppConfig> {
    let file = match path.or(env.config_file.as_deref()) {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_default()?,
    };

    let mut app = file.app;
    app.apply_env(env);
    if let Some(server) = server {
        app.server = server;
    }
    Ok(app)
}

fn formatter(flag: Option<&str>, env: &EnvConfig) -> Result<ResultFormatter> {
    let name = flag
        .map(str::to_string)
        .unwrap_or_else(|| env.format_or("table"));
    let format =
        OutputFormat::from_str(&name).ok_or_else(|| anyhow!("Unknown output format: {name}"))?;

    let formatter = ResultFormatter::new(format);
    Ok(if std::io::stdout().is_terminal() {
        formatter
    } else {
        formatter.no_color()
    })
}

/// Read a YAML or JSON document
fn read_document<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    // YAML is a superset of JSON
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {path}"))
}

/// Commands that talk to the dashboard server
struct Console {
    app: AppConfig,
    env: EnvConfig,
    client: IstioClient,
}

impl Console {
    fn new(app: AppConfig, env: EnvConfig) -> Result<Self> {
        let client = IstioClient::new(HttpClient::from_config(&app)?);
        debug!("Using server {}", app.server);
        Ok(Self { app, env, client })
    }

    fn cluster(&self, flag: Option<String>) -> Result<String> {
        self.app.cluster_or_default(flag).ok_or_else(|| {
            anyhow!("No cluster given: pass --cluster or set default_cluster in the config")
        })
    }

    fn namespace(&self, flag: Option<String>) -> Option<String> {
        self.app.namespace_or_default(flag)
    }

    fn required_namespace(&self, flag: Option<String>) -> Result<String> {
        self.namespace(flag)
            .filter(|ns| !ns.trim().is_empty())
            .ok_or_else(|| anyhow!("No namespace given: pass --namespace"))
    }

    async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::List(args) => self.list(args).await,
            Command::Get(args) => self.get(args).await,
            Command::Create(args) => self.create(args).await,
            Command::Update(args) => self.update(args).await,
            Command::Delete(args) => self.delete(args).await,
            Command::Overview(args) => self.overview(args).await,
            Command::Analytics(args) => self.analytics(args).await,
            Command::Config(_) | Command::Routes(_) | Command::Analyze(_) | Command::Scaffold(_) => {
                Err(anyhow!("Command does not use the server"))
            }
        }
    }

    async fn list(&self, args: cli::ListArgs) -> Result<()> {
        let cluster = self.cluster(args.scope.cluster)?;
        let namespace = self.namespace(args.scope.namespace);
        let formatter = formatter(args.scope.format.as_deref(), &self.env)?;

        let mut query = if args.search {
            ListQuery::search()
        } else {
            ListQuery::new()
        };
        if let Some(keywords) = args.keywords {
            query = query.keywords(keywords);
        }
        query.page_num = args.page_num;
        query.page_size = args.page_size;
        if !args.search && (query.keywords.is_some() || query.page_num.is_some()) {
            warn!("--keywords and paging only apply with --search");
        }

        let list: ResourceList<DynamicObject> = self
            .client
            .resource(args.kind)
            .list(&cluster, namespace.as_deref(), &query)
            .await?
            .into_data()?;

        print!("{}", formatter.format_resources(args.kind, &list)?);
        Ok(())
    }

    async fn get(&self, args: cli::ItemArgs) -> Result<()> {
        let cluster = self.cluster(args.scope.cluster)?;
        let namespace = self.required_namespace(args.scope.namespace)?;
        let formatter = formatter(args.scope.format.as_deref(), &self.env)?;

        let resource: serde_json::Value = self
            .client
            .get(args.kind, &cluster, &namespace, &args.name)
            .await?
            .into_data()?;

        println!("{}", formatter.format_resource(&resource)?);
        Ok(())
    }

    async fn create(&self, args: cli::CreateArgs) -> Result<()> {
        let cluster = self.cluster(args.scope.cluster)?;
        let manifest: serde_json::Value = read_document(&args.file)?;
        check_kind(args.kind, &manifest);

        let namespace = match args.scope.namespace {
            Some(ns) => ns,
            None => match manifest_namespace(&manifest) {
                Some(ns) => ns,
                None => self.required_namespace(None)?,
            },
        };

        self.client
            .create(args.kind, &cluster, &namespace, &manifest)
            .await?
            .error_for_status()?;

        info!(
            "Created {} {}/{}",
            args.kind,
            namespace,
            manifest_name(&manifest).unwrap_or_default()
        );
        Ok(())
    }

    async fn update(&self, args: cli::UpdateArgs) -> Result<()> {
        let cluster = self.cluster(args.scope.cluster)?;
        let namespace = self.required_namespace(args.scope.namespace)?;
        let manifest: serde_json::Value = read_document(&args.file)?;
        check_kind(args.kind, &manifest);

        self.client
            .update(args.kind, &cluster, &namespace, &args.name, &manifest)
            .await?
            .error_for_status()?;

        info!("Updated {} {}/{}", args.kind, namespace, args.name);
        Ok(())
    }

    async fn delete(&self, args: cli::ItemArgs) -> Result<()> {
        let cluster = self.cluster(args.scope.cluster)?;
        let namespace = self.required_namespace(args.scope.namespace)?;

        self.client
            .delete(args.kind, &cluster, &namespace, &args.name)
            .await?
            .error_for_status()?;

        info!("Deleted {} {}/{}", args.kind, namespace, args.name);
        Ok(())
    }

    async fn overview(&self, args: cli::ScopeArgs) -> Result<()> {
        let cluster = self.cluster(args.cluster)?;
        let namespace = self.namespace(args.namespace);
        let formatter = formatter(args.format.as_deref(), &self.env)?;
        let query = ListQuery::new();

        let lists = try_join_all(ResourceKind::all().into_iter().map(|kind| {
            let api = self.client.resource(kind);
            let (cluster, namespace, query) = (&cluster, namespace.as_deref(), &query);
            async move {
                let list: ResourceList<serde_json::Value> =
                    api.list(cluster, namespace, query).await?.into_data()?;
                Ok::<_, anyhow::Error>((api.kind(), list.len()))
            }
        }))
        .await?;

        print!("{}", formatter.format_overview(&lists)?);
        Ok(())
    }

    async fn analytics(&self, args: cli::ScopeArgs) -> Result<()> {
        let cluster = self.cluster(args.cluster)?;
        let namespace = self.namespace(args.namespace);
        let formatter = formatter(args.format.as_deref(), &self.env)?;

        let report: TrafficAnalytics = self
            .client
            .traffic_analytics(&cluster, namespace.as_deref())
            .await?
            .into_data()?;

        if let Some(error) = &report.error {
            warn!("Server reported an analytics error: {error}");
        }

        print!("{}", formatter.format_analytics(&report)?);
        Ok(())
    }
}

fn manifest_name(manifest: &serde_json::Value) -> Option<&str> {
    manifest["metadata"]["name"].as_str()
}

fn manifest_namespace(manifest: &serde_json::Value) -> Option<String> {
    manifest["metadata"]["namespace"]
        .as_str()
        .filter(|ns| !ns.trim().is_empty())
        .map(str::to_string)
}

/// Manifests are sent as-is; a kind mismatch is only reported
fn check_kind(kind: ResourceKind, manifest: &serde_json::Value) {
    if let Some(found) = manifest["kind"].as_str() {
        if found != kind.kind() {
            warn!("Manifest kind {found} does not match {kind}");
        }
    }
}

fn show_routes(args: cli::RoutesArgs, env: &EnvConfig) -> Result<()> {
    let formatter = formatter(args.format.as_deref(), env)?;
    let section = istio_section();

    match args.resolve {
        Some(path) => {
            let matched = section
                .resolve(&path)
                .ok_or_else(|| anyhow!("No route matches {path}"))?;
            print!("{}", formatter.format_route_match(&matched)?);
        }
        None => print!("{}", formatter.format_routes(section, args.all)?),
    }
    Ok(())
}

fn run_analyze(args: cli::AnalyzeArgs, env: &EnvConfig) -> Result<()> {
    let formatter = formatter(args.format.as_deref(), env)?;

    let virtual_services: ResourceList<VirtualService> = read_document(&args.virtual_services)?;
    let destination_rules: ResourceList<DestinationRule> = match &args.destination_rules {
        Some(path) => read_document(path)?,
        None => ResourceList {
            items: Vec::new(),
            total: None,
        },
    };
    let pods: ResourceList<k8s_openapi::api::core::v1::Pod> = read_document(&args.pods)?;

    info!(
        "Analyzing {} VirtualServices across {} pods",
        virtual_services.len(),
        pods.len()
    );

    let report = analytics::analyze(
        &virtual_services.items,
        &destination_rules.items,
        &pods.items,
    );
    print!("{}", formatter.format_analytics(&report)?);
    Ok(())
}

fn run_scaffold(args: cli::ScaffoldArgs) -> Result<()> {
    let manifest = mesh::scaffold(
        args.kind,
        &args.name,
        args.namespace.as_deref(),
        args.host.as_deref(),
    )?;

    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&manifest)?,
        "yaml" | "yml" => serde_yaml::to_string(&manifest)?,
        other => anyhow::bail!("Unsupported manifest format: {other}"),
    };
    println!("{output}");
    Ok(())
}

fn manage_config(
    args: cli::ConfigArgs,
    config_path: Option<String>,
    server: Option<String>,
    env: &EnvConfig,
) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = output
                .map(PathBuf::from)
                .unwrap_or_else(default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            ConfigFile::example().save(&path)?;
            println!("✓ Configuration file created: {}", path.display());
            println!("\nEdit the file to set the server URL and session cookie.");
        }

        cli::ConfigAction::Show { format } => {
            let app = load_config(config_path.as_deref(), server, env)?;
            let output = if format == "json" {
                serde_json::to_string_pretty(&app)?
            } else {
                serde_yaml::to_string(&app)?
            };
            println!("{output}");
        }

        cli::ConfigAction::Env => {
            print_env_help();
            if env.has_any() {
                println!();
                env.print_summary();
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file
                .or(config_path)
                .map(PathBuf::from)
                .or_else(ConfigFile::find)
                .ok_or_else(|| anyhow!("No configuration file found"))?;

            match ConfigFile::load(&path) {
                Ok(_) => println!("✓ Configuration file is valid: {}", path.display()),
                Err(e) => {
                    println!("✗ Configuration file is invalid: {}", path.display());
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
