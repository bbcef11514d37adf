//! The listing client
//!
//! Builds requests, hands them to the transport and decodes the replies.
//! Each round-trip is split into three stages (prepare, send, respond) and
//! a failure is wrapped with the stage it happened in.

use super::options::ListOptions;
use super::page::{Cursor, Page};
use crate::context::CallContext;
use crate::decode::{JsonPageDecoder, PageDecoder};
use crate::error::{Error, RequestStage, Result};
use crate::http::{PreparedRequest, RawResponse, Transport};
use crate::scope::{ScopeId, ScopePath};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Query key carrying the service API version
pub const API_VERSION_PARAM: &str = "api-version";

/// Paginated-listing client for one collection
///
/// Read-only after construction; clones share the transport, decoder and
/// path formatter, and concurrent listings never share page state.
pub struct ListClient<T> {
    operation: String,
    base_url: Url,
    api_version: String,
    path: Arc<dyn ScopePath>,
    decoder: Arc<dyn PageDecoder<T>>,
    transport: Arc<dyn Transport>,
}

impl<T: DeserializeOwned + 'static> ListClient<T> {
    /// Client decoding the default `value` / `nextLink` JSON envelope
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: &str,
        path: impl ScopePath + 'static,
    ) -> Result<Self> {
        Self::with_decoder(transport, base_url, path, JsonPageDecoder::<T>::new())
    }
}

impl<T> ListClient<T> {
    /// Client with a custom page decoder
    pub fn with_decoder(
        transport: Arc<dyn Transport>,
        base_url: &str,
        path: impl ScopePath + 'static,
        decoder: impl PageDecoder<T> + 'static,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            operation: "List".to_string(),
            base_url,
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            path: Arc::new(path),
            decoder: Arc::new(decoder),
            transport,
        })
    }

    /// Set the `api-version` sent with the first request
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the operation name used in error messages and logs
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    /// Operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Base URL every request is sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// API version sent with the first request
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    // ========================================================================
    // Pager
    // ========================================================================

    /// Fetch the first page of the listing below `scope`
    pub async fn fetch_first_page(
        &self,
        ctx: &CallContext,
        scope: &ScopeId,
        options: &ListOptions,
    ) -> Result<Page<T>> {
        self.round_trip(ctx, || self.prepare_first(scope, options))
            .await
    }

    /// Whether `page` has a continuation
    pub fn has_more(&self, page: &Page<T>) -> bool {
        page.has_more()
    }

    /// Fetch the page after `page`
    ///
    /// Fails with a logic error when `page` is terminal.
    pub async fn load_more(&self, ctx: &CallContext, page: &Page<T>) -> Result<Page<T>> {
        let Some(cursor) = page.cursor() else {
            return Err(Error::logic("no more pages returned"));
        };
        self.fetch_cursor(ctx, &cursor).await
    }

    /// Fetch the page a cursor points at
    pub async fn fetch_cursor(&self, ctx: &CallContext, cursor: &Cursor) -> Result<Page<T>> {
        self.round_trip(ctx, || self.prepare_next(cursor.next_link()))
            .await
    }

    // ========================================================================
    // Request preparation
    // ========================================================================

    /// Build the initial request: scope path plus `api-version` and options
    pub fn prepare_first(&self, scope: &ScopeId, options: &ListOptions) -> Result<PreparedRequest> {
        let path = self.path.path(scope)?;
        let mut url = self.resolve(&path);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(API_VERSION_PARAM, &self.api_version);
            for (key, value) in options.to_query() {
                query.append_pair(key, &value);
            }
        }
        Ok(PreparedRequest::get(url))
    }

    /// Build a continuation request from a next link
    ///
    /// The link may be absolute, rooted or relative. Only its path and query
    /// are kept and the request always goes to the client's scheme, host and
    /// port. Absolute and rooted paths are used as they are; a relative path
    /// is joined under the base path. Query values are decoded and encoded
    /// again, first value per key.
    pub fn prepare_next(&self, next_link: &str) -> Result<PreparedRequest> {
        let link = match Url::parse(next_link) {
            Ok(link) => link,
            Err(url::ParseError::RelativeUrlWithoutBase) if next_link.starts_with('/') => {
                self.base_url.join(next_link)?
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => self.resolve("").join(next_link)?,
            Err(e) => return Err(e.into()),
        };

        let mut params: Vec<(String, String)> = Vec::new();
        for (key, value) in link.query_pairs() {
            if !params.iter().any(|(k, _)| k.as_str() == key.as_ref()) {
                params.push((key.into_owned(), value.into_owned()));
            }
        }

        let mut url = self.base_url.clone();
        url.set_path(link.path());
        url.set_query(None);
        url.set_fragment(None);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(PreparedRequest::get(url))
    }

    /// Join `path` onto the base URL's path
    fn resolve(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    // ========================================================================
    // Round-trip
    // ========================================================================

    async fn round_trip<F>(&self, ctx: &CallContext, prepare: F) -> Result<Page<T>>
    where
        F: FnOnce() -> Result<PreparedRequest>,
    {
        let request =
            prepare().map_err(|e| e.at_stage(&self.operation, RequestStage::PreparingRequest))?;

        debug!(operation = %self.operation, url = %request.url, "sending list request");

        let response = ctx
            .run(self.transport.send(request))
            .await
            .map_err(|e| e.at_stage(&self.operation, RequestStage::SendingRequest))?;

        let page = self
            .respond(response)
            .map_err(|e| e.at_stage(&self.operation, RequestStage::RespondingToRequest))?;

        debug!(
            operation = %self.operation,
            items = page.len(),
            has_more = page.has_more(),
            "decoded page"
        );
        Ok(page)
    }

    fn respond(&self, response: RawResponse) -> Result<Page<T>> {
        if !response.is_success() {
            return Err(Error::http_status(response.status, response.body));
        }
        self.decoder.decode(&response.body)
    }
}

impl<T> Clone for ListClient<T> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            base_url: self.base_url.clone(),
            api_version: self.api_version.clone(),
            path: Arc::clone(&self.path),
            decoder: Arc::clone(&self.decoder),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> fmt::Debug for ListClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListClient")
            .field("operation", &self.operation)
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::config(format!("invalid base URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "base URL '{base_url}' must be an http(s) URL"
        )));
    }
    Ok(url)
}
