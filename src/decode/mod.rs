//! Page decoder module
//!
//! Turns a raw response body into a [`Page`](crate::pagination::Page):
//! the ordered items plus the optional continuation link.
//!
//! # Overview
//!
//! [`PageDecoder`] is the seam the pager depends on. [`JsonPageDecoder`]
//! handles the resource-manager envelope `{"value": [...], "nextLink": ...}`
//! and deserializes each item into the caller's type. Closures of shape
//! `Fn(&str) -> Result<Page<T>>` are decoders too.

mod decoders;
mod types;

pub use decoders::JsonPageDecoder;
pub use types::{PageDecoder, PageLayout};
