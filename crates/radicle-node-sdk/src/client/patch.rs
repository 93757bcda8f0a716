//! Patch operations.
//!
//! Patches are Radicle's pull-request analog. A patch accumulates revisions
//! over time; revisions are append-only, so the last one is always the
//! current state of the patch.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    client::{Commit, ListOptions, Peer, SessionClient},
    error::ApiError,
    timestamp::Timestamp,
};

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;

/// Action type for adding a comment to a revision.
pub const PATCH_COMMENT_TYPE: &str = "revision.comment";

/// A patch proposed against a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch {
    pub id: String,
    pub author: Peer,
    pub title: String,
    pub state: PatchState,
    pub before: String,
    pub after: String,
    pub commits: Vec<Commit>,
    pub url: String,
    pub target: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub revisions: Vec<PatchRevision>,
}

impl Patch {
    /// The current revision, if the patch has any.
    pub fn latest_revision(&self) -> Option<&PatchRevision> {
        self.revisions.last()
    }
}

/// Lifecycle state of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchState {
    pub status: String,
    pub conflicts: Vec<Conflict>,
}

/// A merge conflict recorded against a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conflict {
    pub revision_id: String,
    pub oid: String,
}

/// One revision of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchRevision {
    pub id: String,
    pub author: Peer,
    pub description: String,
    pub base: String,
    pub oid: String,
    pub timestamp: Timestamp,
}

/// Request body for commenting on a patch revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePatchComment {
    #[serde(rename = "type")]
    pub kind: String,
    pub body: String,
    pub revision: String,
}

impl CreatePatchComment {
    /// Create a comment on `revision`.
    pub fn new(body: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            kind: PATCH_COMMENT_TYPE.to_string(),
            body: body.into(),
            revision: revision.into(),
        }
    }
}

impl SessionClient {
    /// List a project's patches.
    #[instrument(skip(self))]
    pub async fn get_project_patches(
        &self,
        project_id: &str,
        options: ListOptions,
    ) -> Result<Vec<Patch>, ApiError> {
        self.get_json(&["projects", project_id, "patches"], &options.query_pairs())
        .await
    }

    /// Add a comment to a patch revision.
    #[instrument(skip(self, comment), fields(revision = %comment.revision))]
    pub async fn add_project_patch_comment(
        &self,
        project_id: &str,
        patch_id: &str,
        comment: &CreatePatchComment,
    ) -> Result<(), ApiError> {
        self.execute(
            Method::PATCH,
            &["projects", project_id, "patches", patch_id],
            &[],
            Some(comment),
        )
        .await
    }
}
