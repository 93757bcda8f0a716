//! Conversions from node entities to orchestrator entities.
//!
//! All conversions are pure: the same input always yields the same output.

use radicle_node_sdk::{NodeInfo, Patch, ProjectDescriptor, ProjectFile, SessionInfo};

use crate::model::{FileMeta, ForgeRemoteId, Perm, PullRequest, Repo, ScmKind, User};

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;

/// Owner reported for every repository; the node has no per-repo ownership.
pub const REPO_OWNER: &str = "radicle";

/// Prefix of node repository IDs.
pub const RAD_ID_PREFIX: &str = "rad:";

/// Radicle logo, used as avatar for users, repositories and pipelines.
pub const RADICLE_AVATAR: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAACwAAAAsBAMAAADsqkcyAAAAElBMVEUAAAAzM91VVf/09PT/Vf////+iehdrAAAAAXRSTlMAQObYZgAAAAFiS0dEBfhv6ccAAABTSURBVCjPY2AAAiUlBjhAYlNFGMFBEaSasKAgBFNbWAkFUFMYxDQGAgRNbWEXFwRNLWFBrIA6wgxg8yGRC8JQoSEhDEuUaGmKSsKQZIOSpigXBgAOHTr5ND3M6gAAAABJRU5ErkJggg==";

/// Strip the `rad:` prefix from a node repository ID.
pub fn remote_id(raw_id: &str) -> ForgeRemoteId {
    ForgeRemoteId::new(raw_id.strip_prefix(RAD_ID_PREFIX).unwrap_or(raw_id))
}

/// Converts node entities into orchestrator entities.
#[derive(Debug, Clone)]
pub struct Converter {
    node_url: String,
}

impl Converter {
    /// `node_url` must already be normalized (no trailing slash).
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
        }
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Build the orchestrator user for an authorized session.
    ///
    /// The login is the session alias, falling back to the node alias.
    pub fn user(&self, node: &NodeInfo, session: &SessionInfo, token: &str) -> User {
        let login = if session.alias.is_empty() {
            node.alias()
        } else {
            session.alias.as_str()
        };

        User {
            forge_remote_id: ForgeRemoteId::new(node.node_id()),
            login: login.to_string(),
            avatar: RADICLE_AVATAR.to_string(),
            access_token: token.to_string(),
            refresh_token: token.to_string(),
        }
    }

    /// Convert a repository from either the REST API or a webhook payload.
    pub fn repo(&self, project: &impl ProjectDescriptor) -> Repo {
        let raw_id = project.raw_id();
        let remote_id = remote_id(raw_id);
        let display_name = format!("{} ({})", project.name(), raw_id);
        let forge_url = format!("{}/{}", self.node_url, remote_id);

        Repo {
            id: 0,
            owner: REPO_OWNER.to_string(),
            name: display_name.clone(),
            full_name: display_name,
            avatar: RADICLE_AVATAR.to_string(),
            clone: format!("{}.git", forge_url),
            forge_url,
            clone_ssh: String::new(),
            branch: project.default_branch().to_string(),
            hash: raw_id.to_string(),
            perm: Perm::full(),
            scm_kind: ScmKind::Git,
            pr_enabled: true,
            forge_remote_id: remote_id,
        }
    }

    /// Present a patch as a pull request.
    pub fn pull_request(&self, patch: &Patch) -> PullRequest {
        PullRequest {
            index: ForgeRemoteId::new(patch.id.as_str()),
            title: patch.title.clone(),
        }
    }

    /// Raw content of a fetched file.
    pub fn file_content(&self, file: ProjectFile) -> Vec<u8> {
        file.content.into_bytes()
    }

    /// Pair fetched content with the path it was requested under.
    pub fn file_meta(&self, path: &str, file: ProjectFile) -> FileMeta {
        FileMeta {
            name: path.to_string(),
            data: self.file_content(file),
        }
    }
}
