//! List options

use serde::{Deserialize, Serialize};

/// Query key for the server-side filter
pub const FILTER_PARAM: &str = "$filter";

/// Query key for the page-size hint
pub const TOP_PARAM: &str = "$top";

/// Server-side options for the first request of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// OData filter expression, sent as `$filter`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Page-size hint, sent as `$top`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
}

impl ListOptions {
    /// Options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter expression
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the page-size hint
    #[must_use]
    pub fn with_top(mut self, top: i64) -> Self {
        self.top = Some(top);
        self
    }

    /// Query parameters for the options that are present
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(filter) = &self.filter {
            out.push((FILTER_PARAM, filter.clone()));
        }
        if let Some(top) = self.top {
            out.push((TOP_PARAM, top.to_string()));
        }
        out
    }
}
