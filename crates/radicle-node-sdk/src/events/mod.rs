//! Webhook event payloads.
//!
//! The node delivers two kinds of events, selected by the
//! `x-radicle-event-type` header: `push` (new commits on a branch) and
//! `patch` (a patch was created or updated). Both embed a
//! [`HookRepository`], whose schema differs from the REST
//! [`Repository`](crate::client::Repository) in that delegates are bare IDs.
//!
//! All fields default when absent so that payloads from older or newer
//! daemons still decode; semantic checks (e.g. "a push has commits") are left
//! to the consumer.

use serde::{Deserialize, Serialize};

use crate::client::{Commit, Patch, Peer, ProjectDescriptor, Visibility};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Event types the node can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Push,
    Patch,
}

impl EventType {
    /// Header value for push events.
    pub const PUSH: &'static str = "push";
    /// Header value for patch events.
    pub const PATCH: &'static str = "patch";

    /// Parse the event type header. Unknown values yield `None`.
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim() {
            Self::PUSH => Some(Self::Push),
            Self::PATCH => Some(Self::Patch),
            _ => None,
        }
    }

    /// The header value for this event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => Self::PUSH,
            Self::Patch => Self::PATCH,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `push` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushPayload {
    /// The node that pushed.
    pub author: Peer,
    pub before: String,
    pub after: String,
    pub commits: Vec<Commit>,
    pub repository: HookRepository,
}

/// Payload of a `patch` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchPayload {
    /// What happened to the patch, e.g. `created` or `updated`.
    pub action: String,
    pub patch: Patch,
    pub repository: HookRepository,
}

/// Repository as embedded in webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookRepository {
    pub id: String,
    pub name: String,
    pub description: String,
    pub private: bool,
    pub visibility: Visibility,
    #[serde(rename = "defaultBranch")]
    pub default_branch: String,
    #[serde(rename = "default_branch")]
    pub legacy_default_branch: String,
    pub url: String,
    pub clone_url: String,
    pub delegates: Vec<String>,
    pub head: String,
}

impl ProjectDescriptor for HookRepository {
    fn raw_id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn default_branch_candidates(&self) -> [&str; 2] {
        [&self.default_branch, &self.legacy_default_branch]
    }
}
