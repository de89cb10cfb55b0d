//! VirtualService resource
//!
//! Typed model of `networking.istio.io/v1beta1` VirtualService. Fields the
//! console never inspects are kept as raw JSON so manifests round-trip intact.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// VirtualService custom resource specification
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
#[kube(
    group = "networking.istio.io",
    version = "v1beta1",
    kind = "VirtualService",
    namespaced
)]
pub struct VirtualServiceSpec {
    /// Destination hosts traffic is routed for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    /// Gateways and sidecars applying these routes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gateways: Vec<String>,

    /// HTTP routing rules. `None` only when the manifest has no `http` key;
    /// an explicit `null` is an empty list.
    #[serde(
        default,
        deserialize_with = "present_unless_missing",
        skip_serializing_if = "Option::is_none"
    )]
    pub http: Option<Vec<HttpRoute>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<Vec<serde_json::Value>>,

    #[serde(rename = "exportTo", default, skip_serializing_if = "Vec::is_empty")]
    pub export_to: Vec<String>,
}

/// A single HTTP route rule
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct HttpRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Match conditions. Present (even empty or `null`) means the rule is
    /// conditional.
    #[serde(
        rename = "match",
        default,
        deserialize_with = "present_unless_missing",
        skip_serializing_if = "Option::is_none"
    )]
    pub matches: Option<Vec<serde_json::Value>>,

    /// Weighted destinations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub route: Vec<HttpRouteDestination>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<serde_json::Value>,
}

impl HttpRoute {
    /// Whether the rule only applies to matching requests
    pub fn is_conditional(&self) -> bool {
        self.matches.is_some()
    }
}

/// Destination with an optional weight
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct HttpRouteDestination {
    pub destination: Destination,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// Service a route forwards to
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Destination {
    pub host: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<PortSelector>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct PortSelector {
    pub number: u32,
}

/// `Some` whenever the key is present. Missing keys fall back to `default`.
fn present_unless_missing<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(
        Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::Resource;

    #[test]
    fn test_deserialize_canary_route() {
        let vs: VirtualService = serde_json::from_value(serde_json::json!({
            "apiVersion": "networking.istio.io/v1beta1",
            "kind": "VirtualService",
            "metadata": { "name": "reviews", "namespace": "bookinfo" },
            "spec": {
                "hosts": ["reviews"],
                "http": [
                    {
                        "match": [{ "headers": { "end-user": { "exact": "jason" } } }],
                        "route": [{ "destination": { "host": "reviews", "subset": "v2" } }]
                    },
                    {
                        "route": [{ "destination": { "host": "reviews", "subset": "v1" }, "weight": 100 }]
                    }
                ]
            }
        }))
        .unwrap();

        let http = vs.spec.http.as_ref().unwrap();
        assert_eq!(http.len(), 2);
        assert!(http[0].is_conditional());
        assert!(!http[1].is_conditional());
        assert_eq!(http[1].route[0].weight, Some(100));
        assert_eq!(http[0].route[0].destination.subset.as_deref(), Some("v2"));
    }

    #[test]
    fn test_tcp_only_has_no_http() {
        let spec: VirtualServiceSpec = serde_json::from_value(serde_json::json!({
            "hosts": ["mongo"],
            "tcp": [{ "route": [{ "destination": { "host": "mongo" } }] }]
        }))
        .unwrap();
        assert!(spec.http.is_none());
        assert_eq!(spec.tcp.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_null_keys_count_as_present() {
        let spec: VirtualServiceSpec = serde_json::from_value(serde_json::json!({
            "hosts": ["reviews"],
            "http": [
                { "match": null, "route": [{ "destination": { "host": "reviews" } }] },
                { "route": [{ "destination": { "host": "reviews" } }] }
            ]
        }))
        .unwrap();
        let http = spec.http.as_ref().unwrap();
        assert!(http[0].is_conditional());
        assert!(!http[1].is_conditional());

        let spec: VirtualServiceSpec =
            serde_json::from_value(serde_json::json!({ "hosts": ["reviews"], "http": null }))
                .unwrap();
        assert_eq!(spec.http.map(|routes| routes.len()), Some(0));
    }

    #[test]
    fn test_resource_metadata() {
        assert_eq!(VirtualService::group(&()), "networking.istio.io");
        assert_eq!(VirtualService::plural(&()), "virtualservices");
    }
}
