#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! # resource-pager
//!
//! A typed client for paginated management-plane listings.
//!
//! A listing is addressed by a [`ScopeId`] (subscription, resource group or
//! nested resource) and a [`ScopePath`] naming the collection below it. The
//! first page is requested with an `api-version` plus optional `$filter` and
//! `$top`; every later page follows the server's `nextLink` until the server
//! stops issuing one.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resource_pager::{CallContext, HttpClient, ListClient, ListOptions, ProviderCollection, ScopeId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> resource_pager::Result<()> {
//!     let transport = Arc::new(HttpClient::new()?);
//!     let client = ListClient::<serde_json::Value>::new(
//!         transport,
//!         "https://management.azure.com",
//!         ProviderCollection::new("Microsoft.EventGrid", "partnerRegistrations"),
//!     )?;
//!
//!     let scope = ScopeId::resource_group("sub-id", "my-rg")?;
//!     let options = ListOptions::new().with_filter("name eq 'foo'");
//!     let all = client.collect_all(&CallContext::new(), &scope, &options).await?;
//!     println!("{} registrations", all.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ListClient                                                  │
//! │  fetch_first_page  has_more  load_more  collect_all  pages   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────┬───────────────┼───────────────┬────────────────┐
//! │   Scope     │    Decode     │     HTTP      │    Context     │
//! ├─────────────┼───────────────┼───────────────┼────────────────┤
//! │ ScopeId     │ PageDecoder   │ Transport     │ Cancellation   │
//! │ ScopePath   │ PageLayout    │ Retry/backoff │ Deadline       │
//! │ Shapes      │               │ Rate limit    │                │
//! └─────────────┴───────────────┴───────────────┴────────────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cancellation and deadlines
pub mod context;

/// Resource scope identifiers and collection paths
pub mod scope;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Page decoding
pub mod decode;

/// Pager and aggregator
pub mod pagination;

/// File-based client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use context::CallContext;
pub use decode::{JsonPageDecoder, PageDecoder, PageLayout};
pub use error::{Error, ErrorKind, PageStage, RequestStage, Result};
pub use http::{HttpClient, HttpClientConfig, Transport};
pub use pagination::{
    CompleteResult, Cursor, FieldPredicate, ListClient, ListLimits, ListOptions, MatchAll, Page,
    Predicate,
};
pub use scope::{ProviderCollection, ScopeId, ScopePath, ScopeShape};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// API version sent when a client does not set one
pub const DEFAULT_API_VERSION: &str = "2020-10-15-preview";

/// User agent advertised on every request
pub fn user_agent(api_version: &str) -> String {
    format!("{NAME}/{VERSION} (api-version {api_version})")
}
