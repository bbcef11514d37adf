//! Decoder types and traits

use crate::error::Result;
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

/// Where a page keeps its items and its continuation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Dot path to the items array (default: `value`)
    #[serde(default = "default_items_field")]
    pub items_field: String,
    /// Dot path to the next-link string (default: `nextLink`)
    #[serde(default = "default_next_link_field")]
    pub next_link_field: String,
}

fn default_items_field() -> String {
    "value".to_string()
}

fn default_next_link_field() -> String {
    "nextLink".to_string()
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            items_field: default_items_field(),
            next_link_field: default_next_link_field(),
        }
    }
}

impl PageLayout {
    /// Layout with custom field paths
    pub fn new(items_field: impl Into<String>, next_link_field: impl Into<String>) -> Self {
        Self {
            items_field: items_field.into(),
            next_link_field: next_link_field.into(),
        }
    }
}

/// Trait for decoding response bodies into pages
pub trait PageDecoder<T>: Send + Sync {
    /// Decode a successful response body
    fn decode(&self, body: &str) -> Result<Page<T>>;
}

impl<T, F> PageDecoder<T> for F
where
    F: Fn(&str) -> Result<Page<T>> + Send + Sync,
{
    fn decode(&self, body: &str) -> Result<Page<T>> {
        self(body)
    }
}
