//! Offline traffic classification
//!
//! Pods are tied to services through their `app` label. An HTTP route
//! destination picks the pods whose `app` equals its host, or failing that
//! the first service name (in sorted order) that the host contains, so
//! `reviews` matches `reviews.bookinfo.svc.cluster.local`. Hosts of a
//! VirtualService without an `http` section only match exactly.

use k8s_openapi::api::core::v1::Pod;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::report::{TrafficAnalytics, TrafficEntry, TrafficSummary, TrafficType};
use crate::mesh::{DestinationRule, VirtualService};

/// Classify how every pod receives traffic.
///
/// Routes with match conditions are canary traffic, unconditional routes are
/// basic traffic. A VirtualService without an `http` key routes its hosts as
/// basic traffic, matched exactly by `app`. Hosts with no pods and pods no route reaches are
/// reported as receiving none.
pub fn analyze(
    virtual_services: &[VirtualService],
    destination_rules: &[DestinationRule],
    pods: &[Pod],
) -> TrafficAnalytics {
    let pods_by_app = index_pods(pods);
    let mut entries = Vec::new();

    for vs in virtual_services {
        let vs_name = vs.metadata.name.as_deref().unwrap_or_default();

        match &vs.spec.http {
            Some(routes) => {
                for route in routes {
                    let traffic_type = if route.is_conditional() {
                        TrafficType::Canary
                    } else {
                        TrafficType::Basic
                    };
                    for dest in &route.route {
                        let host = &dest.destination.host;
                        push_host(
                            &mut entries,
                            pods_for_destination(&pods_by_app, host),
                            host,
                            vs_name,
                            traffic_type,
                            dest.destination.subset.clone(),
                        );
                    }
                }
            }
            None => {
                for host in &vs.spec.hosts {
                    push_host(
                        &mut entries,
                        pods_by_app.get(host.as_str()).cloned().unwrap_or_default(),
                        host,
                        vs_name,
                        TrafficType::Basic,
                        None,
                    );
                }
            }
        }
    }

    let covered: HashSet<String> = entries
        .iter()
        .filter(|e| !e.is_unknown_host())
        .map(|e| e.pod_name.clone())
        .collect();

    for pod in pods {
        let name = pod_name(pod);
        if name.is_empty() || covered.contains(name) {
            continue;
        }
        entries.push(TrafficEntry {
            pod_name: name.to_string(),
            service_name: app_label(pod).unwrap_or_default().to_string(),
            vs_name: String::new(),
            traffic_type: TrafficType::None,
            subset: None,
        });
    }

    let mut report = TrafficAnalytics {
        traffic_analysis: entries,
        summary: TrafficSummary {
            total_pods: pods.len(),
            total_vs: virtual_services.len(),
            total_dr: destination_rules.len(),
            ..TrafficSummary::default()
        },
        error: None,
    };
    report.summary.basic_traffic = report.count(TrafficType::Basic);
    report.summary.gray_traffic = report.count(TrafficType::Canary);
    report.summary.no_traffic = report.count(TrafficType::None);

    debug!(
        "Classified {} entries from {} VirtualServices and {} pods",
        report.traffic_analysis.len(),
        virtual_services.len(),
        pods.len()
    );

    report
}

fn push_host(
    entries: &mut Vec<TrafficEntry>,
    pods: Vec<&Pod>,
    host: &str,
    vs_name: &str,
    traffic_type: TrafficType,
    subset: Option<String>,
) {
    if pods.is_empty() {
        entries.push(TrafficEntry::unknown_host(host, vs_name, subset));
        return;
    }

    for pod in pods {
        entries.push(TrafficEntry {
            pod_name: pod_name(pod).to_string(),
            service_name: host.to_string(),
            vs_name: vs_name.to_string(),
            traffic_type,
            subset: subset.clone(),
        });
    }
}

fn pods_for_destination<'a>(
    pods_by_app: &BTreeMap<&str, Vec<&'a Pod>>,
    host: &str,
) -> Vec<&'a Pod> {
    if let Some(pods) = pods_by_app.get(host) {
        return pods.clone();
    }
    pods_by_app
        .iter()
        .find(|(app, _)| host.contains(**app))
        .map(|(_, pods)| pods.clone())
        .unwrap_or_default()
}

fn index_pods(pods: &[Pod]) -> BTreeMap<&str, Vec<&Pod>> {
    let mut index: BTreeMap<&str, Vec<&Pod>> = BTreeMap::new();
    for pod in pods {
        if let Some(app) = app_label(pod) {
            index.entry(app).or_default().push(pod);
        }
    }
    index
}

fn pod_name(pod: &Pod) -> &str {
    pod.metadata.name.as_deref().unwrap_or_default()
}

fn app_label(pod: &Pod) -> Option<&str> {
    pod.metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get("app"))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{DestinationRuleSpec, VirtualServiceSpec};

    fn pod(name: &str, app: &str) -> Pod {
        serde_json::from_value(serde_json::json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": { "name": name, "labels": { "app": app } }
        }))
        .unwrap()
    }

    fn vs(name: &str, spec: serde_json::Value) -> VirtualService {
        let spec: VirtualServiceSpec = serde_json::from_value(spec).unwrap();
        VirtualService::new(name, spec)
    }

    fn bookinfo_pods() -> Vec<Pod> {
        vec![
            pod("reviews-v1-aaa", "reviews"),
            pod("reviews-v2-bbb", "reviews"),
            pod("ratings-v1-ccc", "ratings"),
            pod("details-v1-ddd", "details"),
        ]
    }

    #[test]
    fn test_canary_and_basic_routes() {
        let services = vec![vs(
            "reviews",
            serde_json::json!({
                "hosts": ["reviews"],
                "http": [
                    {
                        "match": [{ "headers": { "end-user": { "exact": "jason" } } }],
                        "route": [{ "destination": { "host": "reviews", "subset": "v2" } }]
                    },
                    { "route": [{ "destination": { "host": "ratings" } }] }
                ]
            }),
        )];

        let report = analyze(&services, &[], &bookinfo_pods());

        let canary: Vec<_> = report.entries_of(TrafficType::Canary).collect();
        assert_eq!(canary.len(), 2);
        assert!(canary.iter().all(|e| e.subset.as_deref() == Some("v2")));
        assert!(canary.iter().all(|e| e.vs_name == "reviews"));

        let basic: Vec<_> = report.entries_of(TrafficType::Basic).collect();
        assert_eq!(basic.len(), 1);
        assert_eq!(basic[0].pod_name, "ratings-v1-ccc");

        // details is not routed by anything
        let none: Vec<_> = report.entries_of(TrafficType::None).collect();
        assert_eq!(none.len(), 1);
        assert_eq!(none[0].pod_name, "details-v1-ddd");
        assert_eq!(none[0].service_name, "details");
        assert!(none[0].vs_name.is_empty());
    }

    #[test]
    fn test_unknown_host() {
        let services = vec![vs(
            "payments",
            serde_json::json!({
                "hosts": ["payments"],
                "http": [{ "route": [{ "destination": { "host": "payments", "subset": "v1" } }] }]
            }),
        )];

        let report = analyze(&services, &[], &[]);
        assert_eq!(report.traffic_analysis.len(), 1);

        let entry = &report.traffic_analysis[0];
        assert_eq!(entry.pod_name, "payments-unknown");
        assert_eq!(entry.traffic_type, TrafficType::None);
        assert_eq!(entry.subset.as_deref(), Some("v1"));
    }

    #[test]
    fn test_fqdn_host_matches_app_label() {
        let services = vec![vs(
            "ratings",
            serde_json::json!({
                "http": [{ "route": [{ "destination": { "host": "ratings.bookinfo.svc.cluster.local" } }] }]
            }),
        )];

        let report = analyze(&services, &[], &[pod("ratings-v1-ccc", "ratings")]);
        assert_eq!(report.traffic_analysis.len(), 1);
        assert_eq!(report.traffic_analysis[0].pod_name, "ratings-v1-ccc");
        assert_eq!(
            report.traffic_analysis[0].service_name,
            "ratings.bookinfo.svc.cluster.local"
        );
        assert_eq!(report.traffic_analysis[0].traffic_type, TrafficType::Basic);
    }

    #[test]
    fn test_hosts_without_http_section() {
        let services = vec![vs(
            "mongo",
            serde_json::json!({
                "hosts": ["mongo", "cache"],
                "tcp": [{ "route": [{ "destination": { "host": "mongo" } }] }]
            }),
        )];

        let report = analyze(&services, &[], &[pod("mongo-0", "mongo")]);
        assert_eq!(report.traffic_analysis.len(), 2);
        assert_eq!(report.traffic_analysis[0].pod_name, "mongo-0");
        assert_eq!(report.traffic_analysis[0].traffic_type, TrafficType::Basic);
        assert!(report.traffic_analysis[1].is_unknown_host());
    }

    #[test]
    fn test_hosts_without_http_section_match_exactly() {
        let services = vec![vs(
            "mongo",
            serde_json::json!({
                "hosts": ["mongo.db.svc.cluster.local"],
                "tcp": [{ "route": [{ "destination": { "host": "mongo" } }] }]
            }),
        )];

        let report = analyze(&services, &[], &[pod("mongo-0", "mongo")]);
        assert_eq!(report.traffic_analysis.len(), 2);
        assert_eq!(
            report.traffic_analysis[0].pod_name,
            "mongo.db.svc.cluster.local-unknown"
        );
        assert_eq!(report.traffic_analysis[0].traffic_type, TrafficType::None);
        assert_eq!(report.traffic_analysis[1].pod_name, "mongo-0");
        assert_eq!(report.traffic_analysis[1].traffic_type, TrafficType::None);
        assert_eq!(report.summary.basic_traffic, 0);
        assert_eq!(report.summary.no_traffic, 2);
    }

    #[test]
    fn test_null_http_section_routes_nothing() {
        let services = vec![vs(
            "mongo",
            serde_json::json!({ "hosts": ["mongo"], "http": null }),
        )];

        let report = analyze(&services, &[], &[pod("mongo-0", "mongo")]);
        assert_eq!(report.traffic_analysis.len(), 1);
        assert_eq!(report.traffic_analysis[0].pod_name, "mongo-0");
        assert_eq!(report.traffic_analysis[0].traffic_type, TrafficType::None);
        assert_eq!(report.summary.basic_traffic, 0);
    }

    #[test]
    fn test_summary_counts() {
        let services = vec![vs(
            "reviews",
            serde_json::json!({
                "http": [{
                    "match": [],
                    "route": [{ "destination": { "host": "reviews" } }]
                }]
            }),
        )];
        let rules = vec![DestinationRule::new(
            "reviews",
            DestinationRuleSpec {
                host: "reviews".to_string(),
                ..Default::default()
            },
        )];

        let report = analyze(&services, &rules, &bookinfo_pods());
        let summary = &report.summary;
        assert_eq!(summary.total_pods, 4);
        assert_eq!(summary.total_vs, 1);
        assert_eq!(summary.total_dr, 1);
        assert_eq!(summary.gray_traffic, 2);
        assert_eq!(summary.basic_traffic, 0);
        assert_eq!(summary.no_traffic, 2);
        assert_eq!(
            summary.basic_traffic + summary.gray_traffic + summary.no_traffic,
            report.traffic_analysis.len()
        );
    }
}
