//! Adapter configuration.
//!
//! Configuration is layered with the `config` crate: an optional file (any
//! format the crate understands, chosen by extension) overridden by
//! environment variables prefixed `RADICLE_FORGE__`, with `__` separating
//! nested keys:
//!
//! ```text
//! RADICLE_FORGE__URL=http://127.0.0.1:8080
//! RADICLE_FORGE__HOST=https://ci.example.com
//! RADICLE_FORGE__AUTH__MODE=secret_token
//! RADICLE_FORGE__AUTH__TOKEN=...
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::secret::SecretValue;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "RADICLE_FORGE";

/// Page size used when walking the node's project list.
pub const DEFAULT_PROJECTS_PAGE_SIZE: u32 = 100;

fn default_projects_page_size() -> u32 {
    DEFAULT_PROJECTS_PAGE_SIZE
}

fn default_user_agent() -> String {
    format!("radicle-forge/{}", env!("CARGO_PKG_VERSION"))
}

/// How the adapter authenticates against the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthMode {
    /// Users log in through the node's web session flow.
    #[default]
    Session,
    /// A pre-issued session token is used for every call.
    SecretToken { token: SecretValue },
}

impl AuthMode {
    /// The configured token, when running in secret-token mode.
    pub fn secret_token(&self) -> Option<&SecretValue> {
        match self {
            Self::Session => None,
            Self::SecretToken { token } => Some(token),
        }
    }
}

/// Configuration for [`RadicleForge`](crate::RadicleForge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Base URL of the node's HTTP daemon.
    #[serde(default)]
    pub url: String,

    /// Public URL of the CI orchestrator, used for login callbacks and
    /// pipeline links.
    #[serde(default)]
    pub host: String,

    /// ID of the node the adapter runs against.
    #[serde(default)]
    pub node_id: String,

    /// Shared secret for webhook signatures. Verification is skipped when unset.
    #[serde(default)]
    pub hook_secret: Option<SecretValue>,

    #[serde(default)]
    pub auth: AuthMode,

    #[serde(default = "default_projects_page_size")]
    pub projects_page_size: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ForgeConfig {
    pub fn new(url: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            host: host.into(),
            node_id: String::new(),
            hook_secret: None,
            auth: AuthMode::default(),
            projects_page_size: DEFAULT_PROJECTS_PAGE_SIZE,
            user_agent: default_user_agent(),
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }

    pub fn with_hook_secret(mut self, secret: impl Into<String>) -> Self {
        self.hook_secret = Some(SecretValue::from_string(secret.into()));
        self
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_projects_page_size(mut self, page_size: u32) -> Self {
        self.projects_page_size = page_size;
        self
    }

    /// Load configuration from an optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, a value has the
    /// wrong type, or the result fails [`validated`](Self::validated).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let forge_config: ForgeConfig = config.try_deserialize()?;
        forge_config.validated()
    }

    /// Normalize and check the configuration.
    ///
    /// Trailing slashes are trimmed from both URLs and an empty hook secret is
    /// treated as unset.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.url = normalize_url("url", &self.url)?;
        self.host = normalize_url("host", &self.host)?;

        if self.projects_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "projects_page_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if let Some(token) = self.auth.secret_token() {
            if token.is_empty() {
                return Err(ConfigError::Missing {
                    key: "auth.token".to_string(),
                });
            }
        }

        if self.hook_secret.as_ref().is_some_and(SecretValue::is_empty) {
            self.hook_secret = None;
        }

        Ok(self)
    }
}

fn normalize_url(field: &str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Missing {
            key: field.to_string(),
        });
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        field: field.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}
