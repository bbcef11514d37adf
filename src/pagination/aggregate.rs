//! Full-listing aggregation

use super::client::ListClient;
use super::options::ListOptions;
use crate::context::CallContext;
use crate::error::{Error, PageStage, Result};
use crate::scope::ScopeId;
use crate::types::{dot_path_pointer, JsonValue};
use tracing::{debug, info};

// ============================================================================
// Predicates
// ============================================================================

/// Decides whether an item belongs in an aggregated result
pub trait Predicate<T>: Send + Sync {
    fn matches(&self, item: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

/// Keeps every item
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<T> Predicate<T> for MatchAll {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// Equality match on fields of JSON items
///
/// Every listed field must be present and equal. Fields are dot paths into
/// the item (`properties.state`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPredicate {
    fields: Vec<(String, JsonValue)>,
}

impl FieldPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `path` to equal `value`
    #[must_use]
    pub fn with_field(mut self, path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.push((path.into(), value.into()));
        self
    }

    /// Parse a `path=value` expression
    ///
    /// The value is read as JSON when it parses (`true`, `3`, `"x"`) and as
    /// a plain string otherwise.
    pub fn parse(expr: &str) -> Result<Self> {
        Self::new().and_parse(expr)
    }

    /// Add another `path=value` expression
    pub fn and_parse(self, expr: &str) -> Result<Self> {
        let Some((path, raw)) = expr.split_once('=') else {
            return Err(Error::config(format!(
                "match expression '{expr}' must look like field=value"
            )));
        };
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::config(format!(
                "match expression '{expr}' has an empty field"
            )));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::from(raw));
        Ok(self.with_field(path, value))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Predicate<JsonValue> for FieldPredicate {
    fn matches(&self, item: &JsonValue) -> bool {
        self.fields.iter().all(|(path, expected)| {
            item.pointer(&dot_path_pointer(path)) == Some(expected)
        })
    }
}

// ============================================================================
// Result and limits
// ============================================================================

/// Every matching item of a listing, in page order then item order
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteResult<T> {
    pub items: Vec<T>,
}

impl<T> CompleteResult<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for CompleteResult<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> IntoIterator for CompleteResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Guard rails for a full listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListLimits {
    /// Fail once this many pages have been fetched and more remain
    ///
    /// Must be at least one; a listing run with zero fails before any
    /// request is sent.
    pub max_pages: Option<usize>,
}

impl ListLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn max_pages(max_pages: usize) -> Self {
        Self {
            max_pages: Some(max_pages),
        }
    }
}

// ============================================================================
// Aggregator
// ============================================================================

impl<T> ListClient<T> {
    /// Fetch every page and return all items
    pub async fn collect_all(
        &self,
        ctx: &CallContext,
        scope: &ScopeId,
        options: &ListOptions,
    ) -> Result<CompleteResult<T>> {
        self.collect_with(ctx, scope, options, &MatchAll, ListLimits::default())
            .await
    }

    /// Fetch every page and return the items `predicate` accepts
    pub async fn collect_all_matching<P>(
        &self,
        ctx: &CallContext,
        scope: &ScopeId,
        options: &ListOptions,
        predicate: &P,
    ) -> Result<CompleteResult<T>>
    where
        P: Predicate<T> + ?Sized,
    {
        self.collect_with(ctx, scope, options, predicate, ListLimits::default())
            .await
    }

    /// Fetch every page under `limits`, filtering through `predicate`
    ///
    /// Any failure aborts the whole listing; items already gathered are
    /// discarded. The error records whether the initial page or a later one
    /// failed.
    pub async fn collect_with<P>(
        &self,
        ctx: &CallContext,
        scope: &ScopeId,
        options: &ListOptions,
        predicate: &P,
        limits: ListLimits,
    ) -> Result<CompleteResult<T>>
    where
        P: Predicate<T> + ?Sized,
    {
        if limits.max_pages == Some(0) {
            return Err(Error::config("max_pages must be at least 1"));
        }

        let mut page = self
            .fetch_first_page(ctx, scope, options)
            .await
            .map_err(|e| e.on_page(PageStage::InitialPage))?;

        let mut items = Vec::new();
        let mut pages = 1usize;
        let mut seen = 0usize;

        loop {
            seen += page.len();
            let cursor = page.cursor();
            items.extend(page.items.into_iter().filter(|item| predicate.matches(item)));

            let Some(cursor) = cursor else {
                break;
            };

            if limits.max_pages.is_some_and(|max| pages >= max) {
                return Err(Error::logic(format!(
                    "listing exceeded the limit of {pages} pages"
                ))
                .on_page(PageStage::NextPage));
            }

            debug!(operation = %self.operation(), page = pages + 1, "following nextLink");

            page = self
                .fetch_cursor(ctx, &cursor)
                .await
                .map_err(|e| e.on_page(PageStage::NextPage))?;
            pages += 1;
        }

        info!(
            operation = %self.operation(),
            scope = %scope,
            pages,
            seen,
            kept = items.len(),
            "listing complete"
        );

        Ok(CompleteResult { items })
    }
}
