//! Istio Gateway resource
//!
//! This is the `networking.istio.io` Gateway, not the Gateway API one.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gateway custom resource specification
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
#[kube(
    group = "networking.istio.io",
    version = "v1beta1",
    kind = "Gateway",
    namespaced
)]
pub struct GatewaySpec {
    /// Labels of the gateway workload pods
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selector: BTreeMap<String, String>,

    #[serde(default)]
    pub servers: Vec<Server>,
}

/// Listener exposed by the gateway
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Server {
    pub port: ServerPort,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct ServerPort {
    pub number: u32,

    /// HTTP, HTTPS, GRPC, HTTP2, MONGO, TCP or TLS
    pub protocol: String,

    pub name: String,
}

impl GatewaySpec {
    /// Create a gateway spec bound to the default ingress workload
    pub fn ingress() -> Self {
        let mut selector = BTreeMap::new();
        selector.insert("istio".to_string(), "ingressgateway".to_string());
        Self {
            selector,
            servers: Vec::new(),
        }
    }

    /// Add a plain HTTP listener
    pub fn with_http_server(mut self, port: u32, hosts: Vec<String>) -> Self {
        self.servers.push(Server {
            port: ServerPort {
                number: port,
                protocol: "HTTP".to_string(),
                name: format!("http-{port}"),
            },
            hosts,
            tls: None,
            name: None,
        });
        self
    }
}
