//! Error types for resource-pager
//!
//! Leaf errors describe what went wrong (request, transport, response or
//! caller logic). Two wrapper variants record where it went wrong: the
//! request stage inside a single round-trip, and the page stage inside a
//! pagination chain.

use std::fmt;
use thiserror::Error;

/// Stage of a single request round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    /// Building the outbound request
    PreparingRequest,
    /// Handing the request to the transport
    SendingRequest,
    /// Checking status and decoding the response
    RespondingToRequest,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PreparingRequest => "preparing request",
            Self::SendingRequest => "sending request",
            Self::RespondingToRequest => "responding to request",
        };
        f.write_str(label)
    }
}

/// Position of a failed fetch within a pagination chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStage {
    /// The first page of a listing
    InitialPage,
    /// Any page reached through a continuation token
    NextPage,
}

impl fmt::Display for PageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InitialPage => "loading the initial page",
            Self::NextPage => "loading the next page",
        };
        f.write_str(label)
    }
}

/// Coarse classification of a leaf error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Constructing or encoding the outbound request failed
    Request,
    /// Sending the request failed (network, timeout, cancellation)
    Transport,
    /// Non-success status or undecodable body
    Response,
    /// Caller misuse
    Logic,
    /// Invalid configuration or resource ID
    Config,
    /// Local I/O
    Io,
}

/// The main error type for resource-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("Invalid request: {message}")]
    Request { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String, body: String },

    // ============================================================================
    // Logic Errors
    // ============================================================================
    #[error("{message}")]
    Logic { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid resource ID: {0}")]
    ResourceId(#[from] crate::scope::IdError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Wrappers
    // ============================================================================
    #[error("{operation}: failure {stage}: {source}")]
    Operation {
        operation: String,
        stage: RequestStage,
        #[source]
        source: Box<Error>,
    },

    #[error("{stage}: {source}")]
    Pagination {
        stage: PageStage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Create a logic error
    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error carrying the raw body
    pub fn decode(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: body.into(),
        }
    }

    /// Wrap an error with the request stage it occurred in
    pub fn at_stage(self, operation: impl Into<String>, stage: RequestStage) -> Self {
        Self::Operation {
            operation: operation.into(),
            stage,
            source: Box::new(self),
        }
    }

    /// Wrap an error with its position in the pagination chain
    pub fn on_page(self, stage: PageStage) -> Self {
        Self::Pagination {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping stage wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Operation { source, .. } | Self::Pagination { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify the innermost error
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Request { .. } | Self::InvalidUrl(_) => ErrorKind::Request,
            Self::Http(_)
            | Self::Timeout { .. }
            | Self::Cancelled
            | Self::DeadlineExceeded => ErrorKind::Transport,
            Self::HttpStatus { .. } | Self::Decode { .. } => ErrorKind::Response,
            Self::Logic { .. } => ErrorKind::Logic,
            Self::Config { .. }
            | Self::ResourceId(_)
            | Self::YamlParse(_)
            | Self::JsonParse(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Operation { .. } | Self::Pagination { .. } => unreachable!("root is a leaf"),
        }
    }

    /// Outermost page stage, if this error came out of a pagination chain
    pub fn page_stage(&self) -> Option<PageStage> {
        match self {
            Self::Pagination { stage, .. } => Some(*stage),
            Self::Operation { source, .. } => source.page_stage(),
            _ => None,
        }
    }

    /// Request stage of the failed round-trip, if recorded
    pub fn request_stage(&self) -> Option<RequestStage> {
        match self {
            Self::Operation { stage, .. } => Some(*stage),
            Self::Pagination { source, .. } => source.request_stage(),
            _ => None,
        }
    }

    /// Raw response body attached to a response error
    pub fn response_body(&self) -> Option<&str> {
        match self.root() {
            Self::HttpStatus { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the request was abandoned because of cancellation or deadline
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Check if this error is retryable by the transport
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Self::Timeout { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for resource-pager
pub type Result<T> = std::result::Result<T, Error>;
