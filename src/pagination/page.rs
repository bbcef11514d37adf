//! Pages and continuation cursors

use crate::types::OptionStringExt;

/// One batch of items plus an optional continuation link
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in decode order
    pub items: Vec<T>,
    /// Continuation link; `None` on the terminal page
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// Create a page; an empty link is treated as absent
    pub fn new(items: Vec<T>, next_link: Option<String>) -> Self {
        Self {
            items,
            next_link: next_link.none_if_empty(),
        }
    }

    /// Create a terminal page
    pub fn terminal(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Whether a continuation link is present
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }

    /// Cursor for the following page, if any
    pub fn cursor(&self) -> Option<Cursor> {
        self.next_link.clone().map(|next_link| Cursor { next_link })
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the items, dropping the link
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Position in a listing: the server-issued continuation link
///
/// The link is opaque. The pager never derives offsets or page sizes from
/// it; it only replays its path and query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    next_link: String,
}

impl Cursor {
    /// Cursor for a continuation link; `None` when the link is empty
    pub fn new(next_link: impl Into<String>) -> Option<Self> {
        let next_link = next_link.into();
        if next_link.is_empty() {
            None
        } else {
            Some(Self { next_link })
        }
    }

    /// The continuation link
    pub fn next_link(&self) -> &str {
        &self.next_link
    }
}
