//! Errors raised by the forge adapter.

use radicle_node_sdk::{ApiError, ValidationError};
use thiserror::Error;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

/// Broad classification of adapter failures.
///
/// Lets the orchestrator decide how to react (report, reject the webhook,
/// ask the user to fix configuration) without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node could not be reached or its response could not be read.
    Transport,
    /// The node answered with an error status.
    NodeReported,
    /// Inbound data (webhook signature or payload) was rejected.
    Validation,
    /// The request cannot be served given the current state.
    Precondition,
    /// The adapter is misconfigured.
    Configuration,
}

/// Errors from forge operations.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Node API request failed: {0}")]
    Api(#[from] ApiError),

    #[error("invalid hook message signature")]
    InvalidSignature,

    #[error("Signature check failed: {0}")]
    Signature(#[from] ValidationError),

    #[error("Malformed {event} payload: {source}")]
    MalformedPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no commits found in push")]
    EmptyPush,

    #[error("no revision found in patch")]
    EmptyPatch,

    #[error("provided secret token is unauthorized")]
    SessionUnauthorized,

    #[error("branch does not exist: {branch}")]
    BranchNotFound { branch: String },

    #[error("branch has no commits")]
    EmptyBranch,

    #[error("pipeline does not contain all required information for adding patch comment")]
    MissingPatchVariables,

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ForgeError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(api_error) => match api_error {
                ApiError::HttpError { .. } => ErrorKind::NodeReported,
                ApiError::HttpClientError(_) | ApiError::JsonError(_) => ErrorKind::Transport,
                ApiError::InvalidUrl { .. } | ApiError::Configuration { .. } => {
                    ErrorKind::Configuration
                }
            },
            Self::InvalidSignature
            | Self::Signature(_)
            | Self::MalformedPayload { .. }
            | Self::EmptyPush
            | Self::EmptyPatch => ErrorKind::Validation,
            Self::SessionUnauthorized
            | Self::BranchNotFound { .. }
            | Self::EmptyBranch
            | Self::MissingPatchVariables => ErrorKind::Precondition,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Check if the same call might succeed later.
    ///
    /// The adapter never retries on its own; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(api_error) => api_error.is_transient(),
            _ => false,
        }
    }
}
