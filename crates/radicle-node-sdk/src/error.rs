//! Error types for Radicle node SDK operations.
//!
//! Two families of errors exist: [`ApiError`] covers everything that can go
//! wrong while talking to a node over HTTP, and [`ValidationError`] covers
//! local checks on inbound webhook data.

use thiserror::Error;

/// Errors during Radicle node API operations.
///
/// These errors represent failures when communicating with the node's HTTP
/// daemon, including transport failures, error responses reported by the node,
/// and payloads that could not be decoded.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error response reported by the node (HTTP status >= 400).
    ///
    /// `message` is taken from the node's error body when one could be decoded,
    /// otherwise it is the canonical reason for the status code.
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse a JSON response body from the node.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error (connection refused, TLS, DNS, aborted request, etc.).
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    /// The configured node URL could not be used to build a request URL.
    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    /// The client could not be constructed from the supplied configuration.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ApiError {
    /// The HTTP status reported by the node, if this is a node-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the node reported that the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the failure happened before the node produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpClientError(_))
    }

    /// Check if this error represents a transient condition that may succeed if retried.
    ///
    /// The SDK never retries on its own; this classification is offered to
    /// callers that implement their own retry policy.
    ///
    /// Transient conditions include:
    /// - Server errors (5xx)
    /// - Rate limiting (429)
    /// - Network/transport errors
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { status, .. } => *status >= 500 || *status == 429,
            Self::JsonError(_) => false,
            Self::HttpClientError(_) => true,
            Self::InvalidUrl { .. } => false,
            Self::Configuration { .. } => false,
        }
    }
}

/// Webhook and input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The HMAC instance could not be created from the shared secret.
    #[error("HMAC computation failed: {message}")]
    HmacError { message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
