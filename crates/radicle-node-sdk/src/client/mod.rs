//! Radicle HTTP daemon API client.
//!
//! This module provides the main [`RadicleClient`] for talking to a node's
//! `/api/v1` REST surface. The client itself holds only immutable
//! configuration and a shared HTTP connection pool; every operation is issued
//! through a [`SessionClient`] bound to an (optional) session token.
//!
//! No timeouts or retries are applied. Dropping the future returned by any
//! operation aborts the in-flight request.

mod node;
mod pagination;
mod patch;
mod project;
mod session;
mod webhook;

use std::sync::Arc;

use url::Url;

use crate::error::ApiError;

pub use node::{NodeConfig, NodeInfo, Peer, SessionInfo, SessionStatus};
pub use pagination::ListOptions;
pub use patch::{
    Conflict, CreatePatchComment, Patch, PatchRevision, PatchState, PATCH_COMMENT_TYPE,
};
pub use project::{
    Commit, CommitAuthor, Delegate, EntryKind, FileTree, ProjectDescriptor, ProjectFile,
    Repository, RepositoryCommit, TreeEntry, Visibility,
};
pub use session::SessionClient;
pub use webhook::{RepoWebhook, WEBHOOK_CONTENT_TYPE};

/// Path prefix of the versioned node API.
pub const API_PREFIX: &str = "/api/v1";

/// Configuration for node API client behavior.
///
/// # Examples
///
/// ```
/// use radicle_node_sdk::client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_user_agent("my-ci/1.0")
///     .with_projects_page_size(50);
/// assert_eq!(config.projects_page_size, 50);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for API requests
    pub user_agent: String,
    /// Page size used when walking the full project listing
    pub projects_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("radicle-node-sdk/{}", env!("CARGO_PKG_VERSION")),
            projects_page_size: 100,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the project listing page size. Zero is clamped to one.
    pub fn with_projects_page_size(mut self, page_size: u32) -> Self {
        self.projects_page_size = page_size.max(1);
        self
    }
}

/// Builder for constructing `ClientConfig` instances.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new configuration builder with defaults.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the project listing page size. Zero is clamped to one.
    pub fn projects_page_size(mut self, page_size: u32) -> Self {
        self.config.projects_page_size = page_size.max(1);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for a single Radicle node.
///
/// Cheap to share: wrap it in an [`Arc`] and hand out [`SessionClient`]s.
///
/// # Examples
///
/// ```no_run
/// # use radicle_node_sdk::client::RadicleClient;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RadicleClient::builder("http://127.0.0.1:8080").build()?;
/// let node = client.session(None).get_node_info().await?;
/// println!("Node alias: {}", node.config.alias);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RadicleClient {
    http_client: reqwest::Client,
    node_url: String,
    base_url: Url,
    config: ClientConfig,
}

impl RadicleClient {
    /// Create a new builder for a client talking to the node at `node_url`.
    pub fn builder(node_url: impl Into<String>) -> RadicleClientBuilder {
        RadicleClientBuilder::new(node_url)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The node's base URL, without a trailing slash.
    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// URL the orchestrator redirects a user to in order to obtain a session.
    ///
    /// `host` is the orchestrator's own public URL; the node calls back to
    /// `{host}/authorize` once the session has been authorized.
    pub fn login_url(&self, host: &str) -> String {
        format!(
            "{}{}/oauth?callback_url={}/authorize",
            self.node_url,
            API_PREFIX,
            host.trim_end_matches('/')
        )
    }

    /// Bind a session token to this client.
    ///
    /// An absent or empty token produces an unauthenticated session client;
    /// requests are still sent, just without an `Authorization` header.
    pub fn session(&self, token: Option<String>) -> SessionClient {
        SessionClient::new(
            Arc::new(self.clone()),
            token.filter(|token| !token.is_empty()),
        )
    }

    /// Get the HTTP client (internal use by SessionClient).
    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Full URL of an API path given as segments, e.g. `["projects", "rad:z3g"]`.
    ///
    /// Each segment is percent-encoded, so `/`, `?` and `#` inside an ID or
    /// file name stay part of that segment. `.` and `..` segments are dropped.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                message: format!("'{}' cannot be a base URL", redact_userinfo(&self.node_url)),
            })?
            .pop_if_empty()
            .extend(API_PREFIX.split('/').filter(|s| !s.is_empty()))
            .extend(segments);
        Ok(url)
    }
}

// Security: the node URL may embed credentials
impl std::fmt::Debug for RadicleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadicleClient")
            .field("node_url", &redact_userinfo(&self.node_url))
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for constructing `RadicleClient` instances.
#[derive(Debug)]
pub struct RadicleClientBuilder {
    node_url: String,
    config: ClientConfig,
}

impl RadicleClientBuilder {
    fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            config: ClientConfig::default(),
        }
    }

    /// Set the client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the node URL is not an absolute
    /// http(s) URL, or `ApiError::Configuration` if the HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<RadicleClient, ApiError> {
        let node_url = self.node_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&node_url).map_err(|e| ApiError::InvalidUrl {
            message: format!("'{}': {}", redact_userinfo(&node_url), e),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidUrl {
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http_client = reqwest::Client::builder()
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(RadicleClient {
            http_client,
            node_url,
            base_url: parsed,
            config: self.config,
        })
    }
}

/// First non-empty value of an ordered list of candidate fields.
///
/// Used wherever the node has shipped the same field under more than one
/// name across API versions.
pub(crate) fn first_non_empty<'a>(candidates: impl IntoIterator<Item = &'a str>) -> &'a str {
    candidates
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
}

fn redact_userinfo(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
