//! Transport abstraction

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

/// Content type sent with every listing request
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A fully built outbound request
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the encoded query string
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
}

impl PreparedRequest {
    /// A JSON `GET` for `url`
    pub fn get(url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        Self {
            method: Method::GET,
            url,
            headers,
        }
    }

    /// First value of query parameter `key`, decoded
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// The final response of a round-trip, body already read
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Read status, headers and body out of a `reqwest` response
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(Error::Http)?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes prepared requests
///
/// Implementations own retry, throttling and connection management. They
/// return the final response for any status code and only fail when no
/// response could be obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the whole response
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse>;
}
