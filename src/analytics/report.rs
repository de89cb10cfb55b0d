//! Traffic analytics report model

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a pod receives traffic through the mesh.
///
/// The wire labels are the dashboard's own and must not be translated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficType {
    /// Unconditional route
    #[serde(rename = "基础流量", alias = "basic")]
    Basic,
    /// Route guarded by match conditions
    #[serde(rename = "灰度流量", alias = "canary")]
    Canary,
    /// No VirtualService routes to the pod
    #[serde(rename = "无流量", alias = "none")]
    None,
}

impl TrafficType {
    pub fn name(&self) -> &'static str {
        match self {
            TrafficType::Basic => "basic",
            TrafficType::Canary => "canary",
            TrafficType::None => "none",
        }
    }
}

impl fmt::Display for TrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One pod (or unmatched host) and the traffic it receives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEntry {
    pub pod_name: String,
    pub service_name: String,
    #[serde(default)]
    pub vs_name: String,
    pub traffic_type: TrafficType,
    #[serde(default)]
    pub subset: Option<String>,
}

impl TrafficEntry {
    /// Entry for a destination host with no backing pods
    pub fn unknown_host(host: &str, vs_name: &str, subset: Option<String>) -> Self {
        Self {
            pod_name: format!("{host}{UNKNOWN_POD_SUFFIX}"),
            service_name: host.to_string(),
            vs_name: vs_name.to_string(),
            traffic_type: TrafficType::None,
            subset,
        }
    }

    pub fn is_unknown_host(&self) -> bool {
        self.pod_name.ends_with(UNKNOWN_POD_SUFFIX)
    }
}

pub(crate) const UNKNOWN_POD_SUFFIX: &str = "-unknown";

/// Report totals
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    #[serde(rename = "totalPods")]
    pub total_pods: usize,
    #[serde(rename = "totalVS")]
    pub total_vs: usize,
    #[serde(rename = "totalDR")]
    pub total_dr: usize,
    #[serde(rename = "basicTraffic")]
    pub basic_traffic: usize,
    #[serde(rename = "grayTraffic")]
    pub gray_traffic: usize,
    #[serde(rename = "noTraffic")]
    pub no_traffic: usize,
}

/// Full traffic report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficAnalytics {
    #[serde(rename = "trafficAnalysis", default)]
    pub traffic_analysis: Vec<TrafficEntry>,
    #[serde(default)]
    pub summary: TrafficSummary,
    /// Set instead of a report when the server could not collect resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrafficAnalytics {
    pub fn count(&self, traffic_type: TrafficType) -> usize {
        self.traffic_analysis
            .iter()
            .filter(|e| e.traffic_type == traffic_type)
            .count()
    }

    pub fn entries_of(&self, traffic_type: TrafficType) -> impl Iterator<Item = &TrafficEntry> {
        self.traffic_analysis
            .iter()
            .filter(move |e| e.traffic_type == traffic_type)
    }
}
