//! The Istio section of the dashboard
//!
//! Every resource kind gets the same four pages, and each page's verb follows
//! from its action. Deletes have no page; the list view issues them inline.

use std::sync::OnceLock;

use super::types::{
    Permission, RouteEntry, RouteMeta, RouteSection, Scope, Verb, ViewHandle, ViewRef,
};
use crate::mesh::{ResourceKind, ISTIO_API_GROUP};

const SECTION_PATH: &str = "/istio";
const SECTION_LAYOUT: &str = "business/app-layout/horizontal-layout";
const TRAFFIC_ANALYTICS_PATH: &str = "/istio/traffic-analytics";

/// Page kinds generated for every resource kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteAction {
    List,
    Create,
    Edit,
    Detail,
}

impl RouteAction {
    pub fn all() -> [RouteAction; 4] {
        [
            RouteAction::List,
            RouteAction::Create,
            RouteAction::Edit,
            RouteAction::Detail,
        ]
    }

    /// RBAC verb a user needs for this page
    pub fn verb(&self) -> Verb {
        match self {
            RouteAction::List => Verb::List,
            RouteAction::Create => Verb::Create,
            RouteAction::Edit => Verb::Update,
            RouteAction::Detail => Verb::Get,
        }
    }

    pub fn path(&self, kind: ResourceKind) -> String {
        let base = list_path(kind);
        match self {
            RouteAction::List => base,
            RouteAction::Create => format!("{base}/create"),
            RouteAction::Edit => format!("{base}/:namespace/:name/edit"),
            RouteAction::Detail => format!("{base}/:namespace/:name"),
        }
    }

    pub fn route_name(&self, kind: ResourceKind) -> String {
        match self {
            RouteAction::List => format!("{}s", kind.kind()),
            RouteAction::Create => format!("{}Create", kind.kind()),
            RouteAction::Edit => format!("{}Edit", kind.kind()),
            RouteAction::Detail => format!("{}Detail", kind.kind()),
        }
    }

    pub fn view_module(&self, kind: ResourceKind) -> String {
        let base = format!("business/{}", kind.view_module());
        match self {
            RouteAction::List => base,
            RouteAction::Create => format!("{base}/create"),
            RouteAction::Edit => format!("{base}/edit"),
            RouteAction::Detail => format!("{base}/detail"),
        }
    }

    /// Only list pages appear in the menu
    pub fn hidden(&self) -> bool {
        !matches!(self, RouteAction::List)
    }

    /// Pages addressed by namespace and name receive them as props
    pub fn props(&self) -> bool {
        matches!(self, RouteAction::Edit | RouteAction::Detail)
    }
}

fn list_path(kind: ResourceKind) -> String {
    format!("{SECTION_PATH}/{}", kind.segment())
}

fn permission(resource: &'static str, verb: Verb) -> Permission {
    Permission {
        api_group: ISTIO_API_GROUP,
        resource,
        verb,
        scope: Scope::Namespace,
    }
}

fn resource_route(kind: ResourceKind, action: RouteAction) -> RouteEntry {
    let module = action.view_module(kind);
    RouteEntry {
        path: action.path(kind),
        name: action.route_name(kind),
        view: ViewRef::new(move || ViewHandle::new(module.clone())),
        require_permission: permission(kind.segment(), action.verb()),
        hidden: action.hidden(),
        props: action.props(),
        meta: RouteMeta {
            title: (action == RouteAction::List).then(|| kind.title_key()),
            active_menu: Some(list_path(kind)),
            ..RouteMeta::default()
        },
    }
}

fn traffic_analytics_route() -> RouteEntry {
    RouteEntry {
        path: TRAFFIC_ANALYTICS_PATH.to_string(),
        name: "TrafficAnalytics".to_string(),
        view: ViewRef::new(|| ViewHandle::new("business/istio/traffic-analytics")),
        require_permission: permission(ResourceKind::VirtualService.segment(), Verb::List),
        hidden: false,
        props: false,
        meta: RouteMeta {
            title: Some("business.istio.traffic_analytics"),
            active_menu: Some(TRAFFIC_ANALYTICS_PATH.to_string()),
            ..RouteMeta::default()
        },
    }
}

fn build_section() -> RouteSection {
    let mut children: Vec<RouteEntry> = ResourceKind::all()
        .into_iter()
        .flat_map(|kind| {
            RouteAction::all()
                .into_iter()
                .map(move |action| resource_route(kind, action))
        })
        .collect();
    children.push(traffic_analytics_route());

    RouteSection {
        path: SECTION_PATH.to_string(),
        name: "IstioMesh".to_string(),
        sort: 4,
        view: ViewRef::new(|| ViewHandle::new(SECTION_LAYOUT)),
        require_permission: permission(ResourceKind::VirtualService.segment(), Verb::List),
        meta: RouteMeta {
            title: Some("business.istio.mesh"),
            icon: Some("iconfont iconnetwork"),
            active_menu: None,
            scope: Some(Scope::Namespace),
        },
        children,
    }
}

/// The Istio section, built on first use
pub fn istio_section() -> &'static RouteSection {
    static SECTION: OnceLock<RouteSection> = OnceLock::new();
    SECTION.get_or_init(build_section)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(section: &RouteSection) -> Vec<&str> {
        section.children.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_section_header() {
        let section = istio_section();
        assert_eq!(section.path, "/istio");
        assert_eq!(section.name, "IstioMesh");
        assert_eq!(section.sort, 4);
        assert_eq!(section.meta.icon, Some("iconfont iconnetwork"));
        assert_eq!(section.require_permission.verb, Verb::List);
        assert_eq!(
            section.view.load().module,
            "business/app-layout/horizontal-layout"
        );
    }

    #[test]
    fn test_children_order() {
        assert_eq!(
            names(istio_section()),
            vec![
                "VirtualServices",
                "VirtualServiceCreate",
                "VirtualServiceEdit",
                "VirtualServiceDetail",
                "DestinationRules",
                "DestinationRuleCreate",
                "DestinationRuleEdit",
                "DestinationRuleDetail",
                "Gateways",
                "GatewayCreate",
                "GatewayEdit",
                "GatewayDetail",
                "TrafficAnalytics",
            ]
        );
    }

    #[test]
    fn test_verb_follows_path_suffix() {
        for route in &istio_section().children {
            let expected = if route.path.ends_with("/create") {
                Verb::Create
            } else if route.path.ends_with("/edit") {
                Verb::Update
            } else if route.path.ends_with("/:name") {
                Verb::Get
            } else {
                Verb::List
            };
            assert_eq!(route.require_permission.verb, expected, "{}", route.path);
        }
    }

    #[test]
    fn test_permissions_are_namespaced_istio() {
        let section = istio_section();
        for route in &section.children {
            assert_eq!(route.require_permission.api_group, "networking.istio.io");
            assert_eq!(route.require_permission.scope, Scope::Namespace);
        }

        let gateway_edit = section.find("GatewayEdit").unwrap();
        assert_eq!(gateway_edit.path, "/istio/gateways/:namespace/:name/edit");
        assert_eq!(gateway_edit.require_permission.resource, "gateways");
        assert!(gateway_edit.props);

        let analytics = section.find("TrafficAnalytics").unwrap();
        assert_eq!(analytics.require_permission.resource, "virtualservices");
    }

    #[test]
    fn test_navigation_shows_list_pages() {
        let visible: Vec<_> = istio_section().navigation().map(|r| r.path.as_str()).collect();
        assert_eq!(
            visible,
            vec![
                "/istio/virtualservices",
                "/istio/destinationrules",
                "/istio/gateways",
                "/istio/traffic-analytics",
            ]
        );
        assert!(istio_section()
            .navigation()
            .all(|r| r.meta.title.is_some()));
    }

    #[test]
    fn test_active_menu_points_at_list() {
        let section = istio_section();
        let detail = section.find("DestinationRuleDetail").unwrap();
        assert_eq!(detail.meta.active_menu.as_deref(), Some("/istio/destinationrules"));
        assert!(detail.meta.title.is_none());
        assert_eq!(
            detail.view.load().module,
            "business/istio/destinationrule/detail"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(istio_section()).unwrap();
        let create = &value["children"][1];
        assert_eq!(create["path"], "/istio/virtualservices/create");
        assert_eq!(create["requirePermission"]["verb"], "create");
        assert_eq!(create["hidden"], true);
        assert!(create.get("props").is_none());
        assert!(create.get("view").is_none());
        assert_eq!(create["meta"]["activeMenu"], "/istio/virtualservices");
    }
}
