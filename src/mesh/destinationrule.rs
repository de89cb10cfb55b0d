//! DestinationRule resource

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// DestinationRule custom resource specification
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
#[kube(
    group = "networking.istio.io",
    version = "v1beta1",
    kind = "DestinationRule",
    namespaced
)]
pub struct DestinationRuleSpec {
    /// Service the rule applies to
    pub host: String,

    #[serde(rename = "trafficPolicy", skip_serializing_if = "Option::is_none")]
    pub traffic_policy: Option<serde_json::Value>,

    /// Named versions of the service
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsets: Vec<Subset>,

    #[serde(rename = "exportTo", default, skip_serializing_if = "Vec::is_empty")]
    pub export_to: Vec<String>,
}

/// Named subset selected by pod labels
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Subset {
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(rename = "trafficPolicy", skip_serializing_if = "Option::is_none")]
    pub traffic_policy: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsets() {
        let spec: DestinationRuleSpec = serde_json::from_value(serde_json::json!({
            "host": "reviews",
            "subsets": [
                { "name": "v1", "labels": { "version": "v1" } },
                { "name": "v2", "labels": { "version": "v2" } }
            ]
        }))
        .unwrap();

        assert_eq!(spec.host, "reviews");
        assert_eq!(spec.subsets[1].labels.get("version").unwrap(), "v2");
    }
}
