//! Starter manifests

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use super::{
    Destination, DestinationRule, DestinationRuleSpec, Gateway, GatewaySpec, HttpRoute,
    HttpRouteDestination, ResourceKind, Subset, VirtualService, VirtualServiceSpec,
};

/// Build a minimal manifest for `kind`.
///
/// `host` defaults to the resource name. Gateways listen on port 80 of the
/// default ingress workload, VirtualServices send all traffic to `host`, and
/// DestinationRules declare a single `v1` subset.
pub fn scaffold(
    kind: ResourceKind,
    name: &str,
    namespace: Option<&str>,
    host: Option<&str>,
) -> Result<serde_json::Value> {
    let host = host.unwrap_or(name).to_string();

    let value = match kind {
        ResourceKind::Gateway => {
            let mut gw = Gateway::new(name, GatewaySpec::ingress().with_http_server(80, vec![host]));
            gw.metadata.namespace = namespace.map(str::to_string);
            serde_json::to_value(gw)
        }
        ResourceKind::VirtualService => {
            let spec = VirtualServiceSpec {
                hosts: vec![host.clone()],
                http: Some(vec![HttpRoute {
                    route: vec![HttpRouteDestination {
                        destination: Destination {
                            host,
                            ..Destination::default()
                        },
                        weight: None,
                    }],
                    ..HttpRoute::default()
                }]),
                ..VirtualServiceSpec::default()
            };
            let mut vs = VirtualService::new(name, spec);
            vs.metadata.namespace = namespace.map(str::to_string);
            serde_json::to_value(vs)
        }
        ResourceKind::DestinationRule => {
            let mut labels = BTreeMap::new();
            labels.insert("version".to_string(), "v1".to_string());
            let spec = DestinationRuleSpec {
                host,
                subsets: vec![Subset {
                    name: "v1".to_string(),
                    labels,
                    traffic_policy: None,
                }],
                ..DestinationRuleSpec::default()
            };
            let mut dr = DestinationRule::new(name, spec);
            dr.metadata.namespace = namespace.map(str::to_string);
            serde_json::to_value(dr)
        }
    };

    value.with_context(|| format!("Failed to build {kind} manifest"))
}
