//! Project (repository) operations.
//!
//! Covers project lookup and listing, commit listing, and blob/tree access at
//! a given commit.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    client::{first_non_empty, ListOptions, Peer, SessionClient},
    error::ApiError,
    timestamp::Timestamp,
};

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;

/// Common view over the repository shapes the node emits.
///
/// The REST API and webhook payloads describe repositories with slightly
/// different schemas; converters work against this trait instead of either
/// concrete type.
pub trait ProjectDescriptor {
    /// The node's repository ID, including any `rad:` prefix.
    fn raw_id(&self) -> &str;

    /// The repository's short name.
    fn name(&self) -> &str;

    /// Default-branch fields in priority order.
    fn default_branch_candidates(&self) -> [&str; 2];

    /// The first non-empty default-branch candidate, or `""` if none is set.
    fn default_branch(&self) -> &str {
        first_non_empty(self.default_branch_candidates())
    }
}

/// Repository as returned by `/projects`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
    /// Current field name for the default branch.
    #[serde(rename = "defaultBranch")]
    pub default_branch: String,
    /// Field name used by older daemons.
    #[serde(rename = "default_branch")]
    pub legacy_default_branch: String,
    pub url: String,
    pub clone_url: String,
    pub delegates: Vec<Delegate>,
    pub head: String,
}

impl ProjectDescriptor for Repository {
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

/// Repository visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    #[serde(rename = "type")]
    pub kind: String,
}

/// A repository delegate as listed by the REST API.
pub type Delegate = Peer;

/// Commit summary from `/projects/{id}/commits`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryCommit {
    pub id: String,
    pub parents: Vec<String>,
}

/// A commit with its change set, as embedded in patches and webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub url: String,
    pub author: CommitAuthor,
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

impl Commit {
    /// Files touched by this commit: modified, then added, then removed.
    pub fn changed_files(&self) -> impl Iterator<Item = &String> {
        self.modified
            .iter()
            .chain(self.added.iter())
            .chain(self.removed.iter())
    }
}

/// Git author of a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// A single file at a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFile {
    pub binary: bool,
    pub name: String,
    pub content: String,
    pub path: String,
}

/// Directory listing at a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTree {
    pub entries: Vec<TreeEntry>,
}

/// One entry of a [`FileTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeEntry {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
}

/// Kind discriminator of a tree entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    #[default]
    #[serde(other)]
    Other,
}

impl SessionClient {
    /// Fetch a single project by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::HttpError` with status 404 if the node does not
    /// know the project.
    #[instrument(skip(self))]
    pub async fn get_project(&self, project_id: &str) -> Result<Repository, ApiError> {
        self.get_json(&["projects", project_id], &[]).await
    }

    /// List every project on the node.
    ///
    /// Walks pages from 0 using the configured page size and stops at the
    /// first empty page. Pages are fetched one after another.
    #[instrument(skip(self))]
    pub async fn get_projects(&self) -> Result<Vec<Repository>, ApiError> {
        let per_page = self.client().config().projects_page_size.max(1);
        let mut projects = Vec::new();
        let mut page: u32 = 0;

        loop {
            let query = [
                ("show", "all".to_string()),
                ("page", page.to_string()),
                ("perPage", per_page.to_string()),
            ];
            let batch: Vec<Repository> = self.get_json(&["projects"], &query).await?;
            if batch.is_empty() {
                break;
            }

            debug!(page = page, count = batch.len(), "Fetched project page");
            projects.extend(batch);
            page += 1;
        }

        Ok(projects)
    }

    /// List commits of a project's default branch, newest first.
    #[instrument(skip(self))]
    pub async fn get_project_commits(
        &self,
        project_id: &str,
        options: ListOptions,
    ) -> Result<Vec<RepositoryCommit>, ApiError> {
        self.get_json(&["projects", project_id, "commits"], &options.query_pairs())
        .await
    }

    /// Fetch a file's content at a commit.
    #[instrument(skip(self))]
    pub async fn get_project_commit_file(
        &self,
        project_id: &str,
        commit: &str,
        path: &str,
    ) -> Result<ProjectFile, ApiError> {
        let segments = file_segments(["projects", project_id, "blob", commit], path);
        self.get_json(&segments, &[]).await
    }

    /// List a directory at a commit. An empty `path` lists the root.
    #[instrument(skip(self))]
    pub async fn get_project_commit_dir(
        &self,
        project_id: &str,
        commit: &str,
        path: &str,
    ) -> Result<FileTree, ApiError> {
        let mut segments = file_segments(["projects", project_id, "tree", commit], path);
        if segments.len() == 4 {
            // The node lists the root at `tree/{commit}/`
            segments.push("");
        }
        self.get_json(&segments, &[]).await
    }
}

/// Resource prefix followed by the non-empty `/`-separated parts of a repository path.
fn file_segments<'a>(prefix: [&'a str; 4], path: &'a str) -> Vec<&'a str> {
    prefix
        .into_iter()
        .chain(path.split('/').filter(|part| !part.is_empty()))
        .collect()
}
