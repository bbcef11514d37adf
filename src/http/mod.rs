//! HTTP transport module
//!
//! The pager never talks to `reqwest` directly. It hands a
//! [`PreparedRequest`] to a [`Transport`] and gets a [`RawResponse`] back,
//! whatever the status code. [`HttpClient`] is the production transport:
//! retries with backoff, optional token-bucket throttling, default headers.

mod client;
mod throttle;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use throttle::{RateLimiterConfig, Throttle};
pub use transport::{PreparedRequest, RawResponse, Transport};
