//! Pagination module
//!
//! Lists a collection one page at a time and walks continuation links to
//! the end.
//!
//! # Overview
//!
//! - [`ListClient::fetch_first_page`] issues the initial request built from a
//!   [`ScopeId`](crate::scope::ScopeId) and [`ListOptions`].
//! - Each [`Page`] carries an optional continuation link; [`Page::cursor`]
//!   turns it into a [`Cursor`] that [`ListClient::fetch_cursor`] follows.
//! - [`ListClient::load_more`] follows a page's own cursor and refuses on a
//!   terminal page.
//! - [`ListClient::collect_all_matching`] drives the chain to completion and
//!   filters items through a [`Predicate`].
//!
//! Pages are always fetched in sequence: each continuation depends on the
//! page before it.

mod aggregate;
mod client;
mod options;
mod page;
mod stream;

pub use aggregate::{CompleteResult, FieldPredicate, ListLimits, MatchAll, Predicate};
pub use client::ListClient;
pub use options::ListOptions;
pub use page::{Cursor, Page};
