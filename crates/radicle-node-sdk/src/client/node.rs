//! Node identity and session operations.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    client::{first_non_empty, SessionClient},
    error::ApiError,
    timestamp::Timestamp,
};

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;

/// Information about the node serving the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub id: String,
    pub config: NodeConfig,
}

impl NodeInfo {
    /// The node ID, preferring the configured ID over the top-level one.
    ///
    /// Older daemons only report the ID at the top level.
    pub fn node_id(&self) -> &str {
        first_non_empty([self.config.id.as_str(), self.id.as_str()])
    }

    /// The node's human-readable alias.
    pub fn alias(&self) -> &str {
        &self.config.alias
    }
}

/// Node configuration as reported by `/node`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub id: String,
    pub alias: String,
}

/// A node identity appearing as an author, delegate or pusher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Peer {
    pub id: String,
    pub alias: String,
}

/// Authorization state of a web session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Authorized,
    Unauthorized,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A web session issued by the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    pub status: SessionStatus,
    pub public_key: String,
    pub alias: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl SessionInfo {
    /// Whether the node has authorized this session.
    pub fn is_authorized(&self) -> bool {
        self.status == SessionStatus::Authorized
    }
}

impl SessionClient {
    /// Fetch information about the node.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the node is unreachable, reports an error status,
    /// or returns a body that cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_node_info(&self) -> Result<NodeInfo, ApiError> {
        self.get_json(&["node"], &[]).await
    }

    /// Fetch a web session by its ID.
    ///
    /// The session ID is the token the user obtained through the node's
    /// login flow.
    #[instrument(skip(self, session_id))]
    pub async fn get_session_info(&self, session_id: &str) -> Result<SessionInfo, ApiError> {
        self.get_json(&["sessions", session_id], &[])
            .await
    }
}
