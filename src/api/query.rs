//! Query parameters
//!
//! Optional values are omitted rather than sent empty. An empty keyword and a
//! zero page number or size count as absent.

use serde::{Deserialize, Serialize};

/// Listing options
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Search mode. Nothing else is sent without it.
    pub search: bool,
    pub keywords: Option<String>,
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    /// Plain listing, no query string
    pub fn new() -> Self {
        Self::default()
    }

    /// Search listing
    pub fn search() -> Self {
        Self {
            search: true,
            ..Self::default()
        }
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn page(mut self, page_num: u32, page_size: u32) -> Self {
        self.page_num = Some(page_num);
        self.page_size = Some(page_size);
        self
    }

    /// Query pairs in the order search, keywords, pageNum, pageSize
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.search {
            return pairs;
        }

        pairs.push(("search".to_string(), "true".to_string()));

        if let Some(keywords) = self.keywords.as_deref().filter(|k| !k.is_empty()) {
            pairs.push(("keywords".to_string(), keywords.to_string()));
        }

        let page_num = self.page_num.filter(|n| *n != 0);
        let page_size = self.page_size.filter(|n| *n != 0);
        if let (Some(num), Some(size)) = (page_num, page_size) {
            pairs.push(("pageNum".to_string(), num.to_string()));
            pairs.push(("pageSize".to_string(), size.to_string()));
        }

        pairs
    }
}

/// Traffic analytics options
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub namespace: Option<String>,
}

impl AnalyticsQuery {
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
        }
    }

    /// Sends any non-empty namespace as given. Unlike listing there is no
    /// trim check, so `"  "` is still sent.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => vec![("namespace".to_string(), ns.to_string())],
            _ => Vec::new(),
        }
    }
}
