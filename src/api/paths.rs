//! Dashboard REST paths
//!
//! Listing is the only operation with a cluster-scoped variant. Every
//! single-resource operation addresses a namespace.

use crate::mesh::ResourceKind;

/// Root of every Istio endpoint on the dashboard server
pub const BASE_PATH: &str = "/api/v1/istio";

/// Whether a namespace selects a namespace-scoped listing
pub fn is_namespace_scoped(namespace: Option<&str>) -> bool {
    namespace.is_some_and(|ns| !ns.trim().is_empty())
}

/// Collection path for listing.
///
/// A blank or whitespace-only namespace lists across the whole cluster. A
/// non-blank one is used verbatim, surrounding whitespace included.
pub fn list_path(cluster: &str, kind: ResourceKind, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if is_namespace_scoped(Some(ns)) => collection_path(cluster, ns, kind),
        _ => format!("{BASE_PATH}/{cluster}/{}", kind.segment()),
    }
}

/// Namespace-scoped collection path, the target of creates
pub fn collection_path(cluster: &str, namespace: &str, kind: ResourceKind) -> String {
    format!(
        "{BASE_PATH}/{cluster}/namespaces/{namespace}/{}",
        kind.segment()
    )
}

/// Path of a single named resource
pub fn item_path(cluster: &str, namespace: &str, kind: ResourceKind, name: &str) -> String {
    format!("{}/{name}", collection_path(cluster, namespace, kind))
}

pub fn traffic_analytics_path(cluster: &str) -> String {
    format!("{BASE_PATH}/{cluster}/traffic-analytics")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_path_cluster_scoped() {
        for ns in [None, Some(""), Some("   "), Some("\t\n")] {
            let path = list_path("prod", ResourceKind::VirtualService, ns);
            assert_eq!(path, "/api/v1/istio/prod/virtualservices");
            assert!(!path.contains("/namespaces/"));
        }
    }

    #[test]
    fn test_list_path_namespace_scoped() {
        assert_eq!(
            list_path("prod", ResourceKind::Gateway, Some("team-a")),
            "/api/v1/istio/prod/namespaces/team-a/gateways"
        );
        assert_eq!(
            list_path("prod", ResourceKind::DestinationRule, Some(" team-a ")),
            "/api/v1/istio/prod/namespaces/ team-a /destinationrules"
        );
    }

    #[test]
    fn test_item_path() {
        assert_eq!(
            item_path("prod", "bookinfo", ResourceKind::DestinationRule, "reviews"),
            "/api/v1/istio/prod/namespaces/bookinfo/destinationrules/reviews"
        );
    }

    #[test]
    fn test_empty_identifiers_pass_through() {
        assert_eq!(
            item_path("", "", ResourceKind::Gateway, ""),
            "/api/v1/istio//namespaces//gateways/"
        );
    }

    #[test]
    fn test_segment_shared_across_paths() {
        for kind in ResourceKind::all() {
            let segment = format!("/{}", kind.segment());
            assert!(list_path("c", kind, None).ends_with(&segment));
            assert!(list_path("c", kind, Some("ns")).ends_with(&segment));
            assert!(collection_path("c", "ns", kind).ends_with(&segment));
            assert!(item_path("c", "ns", kind, "n").ends_with(&format!("{segment}/n")));
        }
    }

    #[test]
    fn test_traffic_analytics_path() {
        assert_eq!(
            traffic_analytics_path("prod"),
            "/api/v1/istio/prod/traffic-analytics"
        );
    }
}
