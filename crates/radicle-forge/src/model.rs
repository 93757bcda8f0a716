//! CI orchestrator model.
//!
//! These are the normalized entities the orchestrator works with. The adapter
//! produces them from node data and consumes them when the orchestrator calls
//! back (e.g. to report a pipeline status).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of an entity on the forge side (repository, user, patch).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForgeRemoteId(String);

impl ForgeRemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// An ID is usable for lookups only when it is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ForgeRemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ForgeRemoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ForgeRemoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Users and Repositories
// ============================================================================

/// An authenticated orchestrator user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub forge_remote_id: ForgeRemoteId,
    pub login: String,
    pub avatar: String,
    #[serde(skip_serializing, default)]
    pub access_token: String,
    #[serde(skip_serializing, default)]
    pub refresh_token: String,
}

// Security: tokens never reach logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("forge_remote_id", &self.forge_remote_id)
            .field("login", &self.login)
            .field("access_token", &"<REDACTED>")
            .field("refresh_token", &"<REDACTED>")
            .finish()
    }
}

/// Access rights of a user on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perm {
    pub pull: bool,
    pub push: bool,
    pub admin: bool,
}

impl Perm {
    /// Pull, push and admin.
    pub fn full() -> Self {
        Self {
            pull: true,
            push: true,
            admin: true,
        }
    }
}

/// Source control system of a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmKind {
    #[default]
    Git,
}

/// A repository as the orchestrator sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Orchestrator-assigned ID; zero until the orchestrator stores the repo.
    pub id: i64,
    pub forge_remote_id: ForgeRemoteId,
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub avatar: String,
    pub forge_url: String,
    pub clone: String,
    pub clone_ssh: String,
    /// Default branch; the only branch the node announces.
    pub branch: String,
    pub hash: String,
    pub perm: Perm,
    pub scm_kind: ScmKind,
    pub pr_enabled: bool,
}

// ============================================================================
// Pipelines
// ============================================================================

/// What triggered a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEvent {
    #[default]
    Push,
    PullRequest,
}

/// Lifecycle status of a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failure,
    Killed,
    Error,
    Blocked,
    Declined,
    Skipped,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Killed => "killed",
            Self::Error => "error",
            Self::Blocked => "blocked",
            Self::Declined => "declined",
            Self::Skipped => "skipped",
        }
    }

    /// Whether the pipeline has not finished yet.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patch context carried by pipelines triggered from a patch event.
///
/// Required to report a status back onto the patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchVariables {
    pub patch_id: String,
    pub revision_id: String,
}

impl PatchVariables {
    pub const PATCH_ID: &'static str = "patch_id";
    pub const REVISION_ID: &'static str = "revision_id";

    pub fn new(patch_id: impl Into<String>, revision_id: impl Into<String>) -> Self {
        Self {
            patch_id: patch_id.into(),
            revision_id: revision_id.into(),
        }
    }

    /// Read from the orchestrator's generic variable map.
    ///
    /// Returns `None` unless both keys are present.
    pub fn from_variables(variables: &BTreeMap<String, String>) -> Option<Self> {
        let patch_id = variables.get(Self::PATCH_ID)?;
        let revision_id = variables.get(Self::REVISION_ID)?;
        Some(Self::new(patch_id.clone(), revision_id.clone()))
    }

    /// Write into the orchestrator's generic variable map.
    pub fn into_variables(self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (Self::PATCH_ID.to_string(), self.patch_id),
            (Self::REVISION_ID.to_string(), self.revision_id),
        ])
    }
}

/// A pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Orchestrator-assigned ID; zero for freshly parsed triggers.
    pub id: i64,
    /// Per-repository run number.
    pub number: i64,
    pub event: PipelineEvent,
    pub status: PipelineStatus,
    pub commit: String,
    pub branch: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub refspec: String,
    pub author: String,
    pub avatar: String,
    pub message: String,
    /// Unix seconds of the representative commit or revision.
    pub timestamp: i64,
    pub sender: String,
    pub email: String,
    pub forge_url: String,
    pub changed_files: Vec<String>,
    pub pr_labels: Vec<String>,
    pub patch: Option<PatchVariables>,
}

impl Pipeline {
    /// Extra variables exposed to pipeline steps.
    pub fn variables(&self) -> BTreeMap<String, String> {
        self.patch
            .clone()
            .map(PatchVariables::into_variables)
            .unwrap_or_default()
    }
}

// ============================================================================
// Listings and Content
// ============================================================================

/// A patch presented as a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub index: ForgeRemoteId,
    pub title: String,
}

/// Head commit of a branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub forge_url: String,
}

/// A file fetched from a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub data: Vec<u8>,
}

/// Page selection in the orchestrator's 1-based convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub page: u32,
    pub per_page: u32,
}

impl ListOptions {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

impl From<ListOptions> for radicle_node_sdk::ListOptions {
    fn from(value: ListOptions) -> Self {
        Self::new(value.page, value.per_page)
    }
}

/// Credentials the orchestrator's git layer uses when cloning.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Netrc {
    pub machine: String,
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Netrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Netrc")
            .field("machine", &self.machine)
            .field("login", &self.login)
            .field("password", &"<REDACTED>")
            .finish()
    }
}
