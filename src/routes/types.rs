//! Route table types

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Kubernetes RBAC verb
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::List => "list",
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Namespace,
    Cluster,
}

/// Capability a user needs to reach a route
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub api_group: &'static str,
    pub resource: &'static str,
    pub verb: Verb,
    pub scope: Scope,
}

/// Navigation metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    /// i18n key of the menu title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    /// Menu item highlighted while the route is open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_menu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// Resolved view
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewHandle {
    /// Module path of the component, relative to the dashboard sources
    pub module: String,
}

impl ViewHandle {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }
}

/// Deferred view: nothing is built until [`ViewRef::load`] runs
#[derive(Clone)]
pub struct ViewRef(Arc<dyn Fn() -> ViewHandle + Send + Sync>);

impl ViewRef {
    pub fn new(factory: impl Fn() -> ViewHandle + Send + Sync + 'static) -> Self {
        Self(Arc::new(factory))
    }

    pub fn load(&self) -> ViewHandle {
        (self.0)()
    }
}

impl fmt::Debug for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewRef(<deferred>)")
    }
}

/// Leaf route
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub path: String,
    pub name: String,
    #[serde(skip)]
    pub view: ViewRef,
    pub require_permission: Permission,
    /// Reachable only through in-app links, not from the menu
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Path parameters are passed to the view as props
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub props: bool,
    pub meta: RouteMeta,
}

/// Top-level menu section and its ordered leaves
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSection {
    pub path: String,
    pub name: String,
    /// Menu position among sections
    pub sort: u32,
    #[serde(skip)]
    pub view: ViewRef,
    pub require_permission: Permission,
    pub meta: RouteMeta,
    pub children: Vec<RouteEntry>,
}

impl RouteSection {
    /// Leaves shown in the menu, in order
    pub fn navigation(&self) -> impl Iterator<Item = &RouteEntry> {
        self.children.iter().filter(|r| !r.hidden)
    }

    /// Find a leaf by route name
    pub fn find(&self, name: &str) -> Option<&RouteEntry> {
        self.children.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_view_ref_defers() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let view_ref = ViewRef::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ViewHandle::new("istio/gateway")
        });

        assert_eq!(format!("{view_ref:?}"), "ViewRef(<deferred>)");
        assert_eq!(loads.load(Ordering::SeqCst), 0);

        assert_eq!(view_ref.load().module, "istio/gateway");
        assert_eq!(view_ref.load().module, "istio/gateway");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_permission_serializes_camel_case() {
        let permission = Permission {
            api_group: "networking.istio.io",
            resource: "gateways",
            verb: Verb::Update,
            scope: Scope::Namespace,
        };
        let value = serde_json::to_value(&permission).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "apiGroup": "networking.istio.io",
                "resource": "gateways",
                "verb": "update",
                "scope": "namespace"
            })
        );
    }
}
