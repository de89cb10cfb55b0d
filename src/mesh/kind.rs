//! Resource kinds
//!
//! The three Istio networking kinds the console manages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// API group of every Istio networking resource
pub const ISTIO_API_GROUP: &str = "networking.istio.io";

/// API version served by the control plane
pub const ISTIO_API_VERSION: &str = "v1beta1";

/// Istio resource kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    VirtualService,
    DestinationRule,
    Gateway,
}

impl ResourceKind {
    /// URL segment used by both the REST API and the dashboard routes
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::VirtualService => "virtualservices",
            ResourceKind::DestinationRule => "destinationrules",
            ResourceKind::Gateway => "gateways",
        }
    }

    /// Kubernetes kind name
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKind::VirtualService => "VirtualService",
            ResourceKind::DestinationRule => "DestinationRule",
            ResourceKind::Gateway => "Gateway",
        }
    }

    /// Dashboard view module holding the list, create, edit and detail views
    pub fn view_module(&self) -> &'static str {
        match self {
            ResourceKind::VirtualService => "istio/virtualservice",
            ResourceKind::DestinationRule => "istio/destinationrule",
            ResourceKind::Gateway => "istio/gateway",
        }
    }

    /// i18n key of the navigation title
    pub fn title_key(&self) -> &'static str {
        match self {
            ResourceKind::VirtualService => "business.istio.virtualservice",
            ResourceKind::DestinationRule => "business.istio.destinationrule",
            ResourceKind::Gateway => "business.istio.gateway",
        }
    }

    /// `apiVersion` field for manifests of this kind
    pub fn api_version(&self) -> String {
        format!("{ISTIO_API_GROUP}/{ISTIO_API_VERSION}")
    }

    /// All kinds, in navigation order
    pub fn all() -> [ResourceKind; 3] {
        [
            ResourceKind::VirtualService,
            ResourceKind::DestinationRule,
            ResourceKind::Gateway,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<ResourceKind> {
        match s.to_lowercase().as_str() {
            "vs" | "virtualservice" | "virtualservices" => Some(ResourceKind::VirtualService),
            "dr" | "destinationrule" | "destinationrules" => Some(ResourceKind::DestinationRule),
            "gw" | "gateway" | "gateways" => Some(ResourceKind::Gateway),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert_eq!(ResourceKind::VirtualService.segment(), "virtualservices");
        assert_eq!(ResourceKind::DestinationRule.segment(), "destinationrules");
        assert_eq!(ResourceKind::Gateway.segment(), "gateways");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(ResourceKind::from_str("VS"), Some(ResourceKind::VirtualService));
        assert_eq!(
            ResourceKind::from_str("destinationrules"),
            Some(ResourceKind::DestinationRule)
        );
        assert_eq!(ResourceKind::from_str("gateway"), Some(ResourceKind::Gateway));
        assert_eq!(ResourceKind::from_str("httproute"), None);
    }

    #[test]
    fn test_api_version() {
        assert_eq!(
            ResourceKind::Gateway.api_version(),
            "networking.istio.io/v1beta1"
        );
    }
}
