//! Output formatters for console results
//!
//! Provides table, JSON, YAML and CSV renderings of resources, traffic
//! reports and the route table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use kube::core::DynamicObject;
use serde::Serialize;

use crate::analytics::{TrafficAnalytics, TrafficType};
use crate::api::ResourceList;
use crate::mesh::ResourceKind;
use crate::routes::{RouteMatch, RouteSection};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Yaml,
    Csv,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn structured<T: Serialize + ?Sized>(&self, value: &T) -> Result<Option<String>> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string(value).context("Failed to render JSON")?,
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(value).context("Failed to render JSON")?
            }
            OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML")?,
            OutputFormat::Table | OutputFormat::Csv => return Ok(None),
        };
        Ok(Some(rendered))
    }

    /// Format a resource listing
    pub fn format_resources(
        &self,
        kind: ResourceKind,
        list: &ResourceList<DynamicObject>,
    ) -> Result<String> {
        if let Some(rendered) = self.structured(list)? {
            return Ok(rendered);
        }

        let now = Utc::now();
        let rows: Vec<[String; 4]> = list
            .items
            .iter()
            .map(|obj| {
                [
                    obj.metadata.name.clone().unwrap_or_default(),
                    obj.metadata.namespace.clone().unwrap_or_default(),
                    hosts_column(kind, &obj.data),
                    obj.metadata
                        .creation_timestamp
                        .as_ref()
                        .map(|t| format_age(now, t.0))
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();

        if self.format == OutputFormat::Csv {
            return to_csv(&["name", "namespace", "hosts", "age"], &rows);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<32} {:<20} {:<40} {:>6}\n",
            "NAME", "NAMESPACE", "HOSTS", "AGE"
        ));
        for [name, namespace, hosts, age] in &rows {
            output.push_str(&format!("{name:<32} {namespace:<20} {hosts:<40} {age:>6}\n"));
        }
        match list.total {
            Some(total) => output.push_str(&format!("\n{} of {} {}s\n", rows.len(), total, kind)),
            None => output.push_str(&format!("\n{} {}s\n", rows.len(), kind)),
        }
        Ok(output)
    }

    /// Format a single resource
    pub fn format_resource(&self, value: &serde_json::Value) -> Result<String> {
        match self.format {
            OutputFormat::Table | OutputFormat::Csv | OutputFormat::Yaml => {
                serde_yaml::to_string(value).context("Failed to render YAML")
            }
            OutputFormat::Json => serde_json::to_string(value).context("Failed to render JSON"),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(value).context("Failed to render JSON")
            }
        }
    }

    /// Format per-kind resource counts
    pub fn format_overview(&self, counts: &[(ResourceKind, usize)]) -> Result<String> {
        let named: Vec<(String, usize)> = counts
            .iter()
            .map(|(kind, count)| (kind.kind().to_string(), *count))
            .collect();
        if let Some(rendered) = self.structured(&named)? {
            return Ok(rendered);
        }

        let rows: Vec<[String; 2]> = named
            .into_iter()
            .map(|(kind, count)| [kind, count.to_string()])
            .collect();
        if self.format == OutputFormat::Csv {
            return to_csv(&["kind", "count"], &rows);
        }

        let mut output = String::new();
        for [kind, count] in &rows {
            output.push_str(&format!("  {kind:<20} {count:>5}\n"));
        }
        Ok(output)
    }

    /// Format a traffic report
    pub fn format_analytics(&self, report: &TrafficAnalytics) -> Result<String> {
        if let Some(rendered) = self.structured(report)? {
            return Ok(rendered);
        }

        let rows: Vec<[String; 5]> = report
            .traffic_analysis
            .iter()
            .map(|e| {
                [
                    e.pod_name.clone(),
                    e.service_name.clone(),
                    e.vs_name.clone(),
                    e.traffic_type.to_string(),
                    e.subset.clone().unwrap_or_default(),
                ]
            })
            .collect();

        if self.format == OutputFormat::Csv {
            return to_csv(
                &["pod", "service", "virtual_service", "traffic", "subset"],
                &rows,
            );
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<40} {:<32} {:<24} {:<8} {}\n",
            "POD", "SERVICE", "VIRTUALSERVICE", "TRAFFIC", "SUBSET"
        ));
        for (entry, [pod, service, vs, _, subset]) in report.traffic_analysis.iter().zip(&rows) {
            output.push_str(&format!(
                "{pod:<40} {service:<32} {vs:<24} {} {subset}\n",
                self.traffic_label(entry.traffic_type)
            ));
        }

        let s = &report.summary;
        output.push_str(&format!(
            "\nPods: {} | VirtualServices: {} | DestinationRules: {}\n",
            s.total_pods, s.total_vs, s.total_dr
        ));
        output.push_str(&format!(
            "Basic: {} | Canary: {} | None: {}\n",
            s.basic_traffic, s.gray_traffic, s.no_traffic
        ));
        Ok(output)
    }

    fn traffic_label(&self, traffic_type: TrafficType) -> String {
        let label = format!("{:<8}", traffic_type.name());
        if !self.colorize {
            return label;
        }
        match traffic_type {
            TrafficType::Basic => format!("\x1b[32m{label}\x1b[0m"),
            TrafficType::Canary => format!("\x1b[33m{label}\x1b[0m"),
            TrafficType::None => format!("\x1b[31m{label}\x1b[0m"),
        }
    }

    /// Format the route table
    pub fn format_routes(&self, section: &RouteSection, include_hidden: bool) -> Result<String> {
        if let Some(rendered) = self.structured(section)? {
            return Ok(rendered);
        }

        let rows: Vec<[String; 5]> = section
            .children
            .iter()
            .filter(|r| include_hidden || !r.hidden)
            .map(|r| {
                [
                    r.name.clone(),
                    r.path.clone(),
                    r.require_permission.resource.to_string(),
                    r.require_permission.verb.to_string(),
                    if r.hidden { "hidden" } else { "menu" }.to_string(),
                ]
            })
            .collect();

        if self.format == OutputFormat::Csv {
            return to_csv(&["name", "path", "resource", "verb", "visibility"], &rows);
        }

        let mut output = format!("{} ({})\n", section.path, section.name);
        for [name, path, resource, verb, visibility] in &rows {
            output.push_str(&format!(
                "  {name:<24} {path:<48} {resource:<18} {verb:<7} {visibility}\n"
            ));
        }
        Ok(output)
    }

    /// Format the result of resolving a concrete path
    pub fn format_route_match(&self, matched: &RouteMatch<'_>) -> Result<String> {
        if let Some(rendered) = self.structured(&(matched.route, &matched.params))? {
            return Ok(rendered);
        }

        let route = matched.route;
        let mut output = format!("{} -> {}\n", route.path, route.name);
        output.push_str(&format!("  view:       {}\n", route.view.load().module));
        output.push_str(&format!(
            "  permission: {} {}/{} ({:?})\n",
            route.require_permission.verb,
            route.require_permission.api_group,
            route.require_permission.resource,
            route.require_permission.scope
        ));
        for (key, value) in &matched.params {
            output.push_str(&format!("  :{key} = {value}\n"));
        }
        Ok(output)
    }
}

/// Hosts a resource serves, for the listing table
fn hosts_column(kind: ResourceKind, data: &serde_json::Value) -> String {
    let spec = &data["spec"];
    let strings = |v: &serde_json::Value| -> Vec<String> {
        v.as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|h| h.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let hosts = match kind {
        ResourceKind::VirtualService => strings(&spec["hosts"]),
        ResourceKind::DestinationRule => spec["host"]
            .as_str()
            .map(|h| vec![h.to_string()])
            .unwrap_or_default(),
        ResourceKind::Gateway => spec["servers"]
            .as_array()
            .map(|servers| servers.iter().flat_map(|s| strings(&s["hosts"])).collect())
            .unwrap_or_default(),
    };
    hosts.join(",")
}

/// Compact age like `kubectl get`
fn format_age(now: DateTime<Utc>, created: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created);
    if age.num_days() > 0 {
        format!("{}d", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m", age.num_minutes())
    } else {
        format!("{}s", age.num_seconds().max(0))
    }
}

fn to_csv<const N: usize>(header: &[&str], rows: &[[String; N]]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header).context("Failed to write CSV")?;
    for row in rows {
        writer.write_record(row).context("Failed to write CSV")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
