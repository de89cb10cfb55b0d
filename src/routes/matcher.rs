//! Path matching against route patterns

use std::collections::BTreeMap;

use super::types::{RouteEntry, RouteSection};

/// A leaf matched by a concrete path
#[derive(Clone, Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteEntry,
    /// Values captured by `:param` segments
    pub params: BTreeMap<String, String>,
}

impl RouteSection {
    /// Match a concrete path. The first leaf in table order wins.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.children.iter().find_map(|route| {
            match_pattern(&route.path, path).map(|params| RouteMatch { route, params })
        })
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern: Vec<&str> = segments(pattern).collect();
    let path: Vec<&str> = segments(path).collect();
    if pattern.len() != path.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern.iter().zip(&path) {
        match expected.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), actual.to_string());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use crate::routes::istio_section;

    #[test]
    fn test_resolve_static_path() {
        let matched = istio_section().resolve("/istio/gateways").unwrap();
        assert_eq!(matched.route.name, "Gateways");
        assert!(matched.params.is_empty());
    }

    #[test]
    fn test_create_is_not_a_namespace() {
        let matched = istio_section()
            .resolve("/istio/virtualservices/create")
            .unwrap();
        assert_eq!(matched.route.name, "VirtualServiceCreate");
    }

    #[test]
    fn test_resolve_captures_params() {
        let matched = istio_section()
            .resolve("/istio/destinationrules/bookinfo/reviews/edit/")
            .unwrap();
        assert_eq!(matched.route.name, "DestinationRuleEdit");
        assert_eq!(matched.params.get("namespace").unwrap(), "bookinfo");
        assert_eq!(matched.params.get("name").unwrap(), "reviews");

        let matched = istio_section()
            .resolve("/istio/destinationrules/bookinfo/reviews")
            .unwrap();
        assert_eq!(matched.route.name, "DestinationRuleDetail");
    }

    #[test]
    fn test_resolve_unknown() {
        let section = istio_section();
        assert!(section.resolve("/istio/serviceentries").is_none());
        assert!(section.resolve("/istio/gateways/ns").is_none());
        assert!(section.resolve("/istio").is_none());
    }
}
