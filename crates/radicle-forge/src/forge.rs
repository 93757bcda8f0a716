//! The forge contract and its Radicle implementation.
//!
//! [`Forge`] is what the CI orchestrator calls. [`RadicleForge`] answers
//! each call with one or more requests to the node's HTTP daemon; it keeps no
//! state besides its configuration, so a single instance can be shared across
//! tasks.

use async_trait::async_trait;
use radicle_node_sdk::client::{CreatePatchComment, EntryKind, RepoWebhook};
use radicle_node_sdk::{ClientConfig, RadicleClient, SessionClient, WebhookRequest};
use tracing::{debug, info, instrument};

use crate::config::{AuthMode, ForgeConfig};
use crate::convert::Converter;
use crate::error::ForgeError;
use crate::hook::{HookOutcome, HookParser};
use crate::model::{
    Commit, FileMeta, ForgeRemoteId, ListOptions, Netrc, Pipeline, PipelineStatus, PullRequest,
    Repo, User,
};

#[cfg(test)]
#[path = "forge_tests.rs"]
mod tests;

/// Name the adapter registers under.
pub const FORGE_NAME: &str = "radicle";

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Login {
    /// The session is authorized.
    Authenticated(User),
    /// No session yet; send the user to this URL.
    Redirect(String),
}

/// Operations the CI orchestrator needs from a forge.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Short identifier of the forge.
    fn name(&self) -> &str;

    /// Base URL of the forge.
    fn url(&self) -> &str;

    /// Authenticate a user from a session token.
    async fn login(&self, session_token: Option<&str>) -> Result<Login, ForgeError>;

    /// Fetch a single repository.
    async fn repo(&self, user: &User, remote_id: &ForgeRemoteId) -> Result<Repo, ForgeError>;

    /// Fetch every repository the node serves.
    async fn repos(&self, user: &User) -> Result<Vec<Repo>, ForgeError>;

    /// Fetch a file at the pipeline's commit.
    async fn file(
        &self,
        user: &User,
        repo: &Repo,
        pipeline: &Pipeline,
        path: &str,
    ) -> Result<Vec<u8>, ForgeError>;

    /// Fetch a directory at the pipeline's commit, with file contents.
    async fn dir(
        &self,
        user: &User,
        repo: &Repo,
        pipeline: &Pipeline,
        path: &str,
    ) -> Result<Vec<FileMeta>, ForgeError>;

    /// Report a pipeline result.
    async fn status(&self, user: &User, repo: &Repo, pipeline: &Pipeline)
        -> Result<(), ForgeError>;

    /// Credentials for cloning.
    fn netrc(&self, user: &User, repo: &Repo) -> Result<Netrc, ForgeError>;

    /// Register the orchestrator's webhook on a repository.
    async fn activate(&self, user: &User, repo: &Repo, link: &str) -> Result<(), ForgeError>;

    /// Remove the orchestrator's webhook from a repository.
    async fn deactivate(&self, user: &User, repo: &Repo, link: &str) -> Result<(), ForgeError>;

    /// List branches.
    async fn branches(
        &self,
        user: &User,
        repo: &Repo,
        options: ListOptions,
    ) -> Result<Vec<String>, ForgeError>;

    /// Head commit of a branch.
    async fn branch_head(&self, user: &User, repo: &Repo, branch: &str)
        -> Result<Commit, ForgeError>;

    /// List open patches as pull requests.
    async fn pull_requests(
        &self,
        user: &User,
        repo: &Repo,
        options: ListOptions,
    ) -> Result<Vec<PullRequest>, ForgeError>;

    /// Turn an inbound webhook into a pipeline trigger.
    async fn hook(&self, request: &WebhookRequest) -> Result<HookOutcome, ForgeError>;
}

/// [`Forge`] backed by a Radicle node.
#[derive(Debug, Clone)]
pub struct RadicleForge {
    config: ForgeConfig,
    client: RadicleClient,
    converter: Converter,
    hook_parser: HookParser,
}

impl RadicleForge {
    /// Create an adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::Config` if the configuration is invalid.
    pub fn new(config: ForgeConfig) -> Result<Self, ForgeError> {
        let config = config.validated()?;

        let client = RadicleClient::builder(config.url.as_str())
            .config(
                ClientConfig::default()
                    .with_user_agent(config.user_agent.as_str())
                    .with_projects_page_size(config.projects_page_size),
            )
            .build()?;

        let converter = Converter::new(client.node_url());
        let hook_parser = HookParser::new(
            converter.clone(),
            config.hook_secret.as_ref().map(|secret| secret.expose_secret()),
        );

        info!(
            node = %client.node_url(),
            verify_signatures = hook_parser.verifies_signatures(),
            "Radicle forge initialized"
        );

        Ok(Self {
            config,
            client,
            converter,
            hook_parser,
        })
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// URL a user visits to obtain a session.
    pub fn login_url(&self) -> String {
        self.client.login_url(&self.config.host)
    }

    /// Link to a pipeline in the orchestrator's UI.
    pub fn pipeline_url(&self, repo: &Repo, pipeline: &Pipeline) -> String {
        format!(
            "{}/repos/{}/pipeline/{}",
            self.config.host, repo.id, pipeline.number
        )
    }

    /// Session for a user. Falls back to the configured token when the user
    /// has none.
    /// Node client for a user's call.
    ///
    /// In secret-token mode every call carries the configured token; in
    /// session mode only the user's own session token is used.
    fn session(&self, user: &User) -> SessionClient {
        let token = match &self.config.auth {
            AuthMode::SecretToken { token } => token.expose_secret().to_string(),
            AuthMode::Session => user.access_token.clone(),
        };
        self.client.session(Some(token))
    }
}

/// Comment body reporting a finished pipeline.
pub fn status_message(status: PipelineStatus, number: i64, details_url: &str) -> String {
    format!(
        "Pipeline #{} completed with result: {}. {} \n - Details: {}",
        number,
        status,
        status_glyph(status),
        details_url
    )
}

fn status_glyph(status: PipelineStatus) -> &'static str {
    match status {
        PipelineStatus::Success => "✅",
        PipelineStatus::Failure
        | PipelineStatus::Killed
        | PipelineStatus::Error
        | PipelineStatus::Blocked
        | PipelineStatus::Declined => "❌",
        PipelineStatus::Skipped => "↪️",
        PipelineStatus::Pending | PipelineStatus::Running => "⏳",
    }
}

#[async_trait]
impl Forge for RadicleForge {
    fn name(&self) -> &str {
        FORGE_NAME
    }

    fn url(&self) -> &str {
        self.client.node_url()
    }

    #[instrument(skip(self, session_token))]
    async fn login(&self, session_token: Option<&str>) -> Result<Login, ForgeError> {
        let token = match &self.config.auth {
            AuthMode::SecretToken { token } => Some(token.expose_secret().to_string()),
            AuthMode::Session => session_token
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        };

        let Some(token) = token else {
            debug!("No session token, redirecting to node login");
            return Ok(Login::Redirect(self.login_url()));
        };

        let session = self.client.session(Some(token.clone()));
        let session_info = session.get_session_info(&token).await?;
        if !session_info.is_authorized() {
            info!(status = ?session_info.status, "Session is not authorized");
            return Err(ForgeError::SessionUnauthorized);
        }

        let node = session.get_node_info().await?;
        let user = self.converter.user(&node, &session_info, &token);

        info!(login = %user.login, node_id = %user.forge_remote_id, "User logged in");
        Ok(Login::Authenticated(user))
    }

    #[instrument(skip(self, user), fields(remote_id = %remote_id))]
    async fn repo(&self, user: &User, remote_id: &ForgeRemoteId) -> Result<Repo, ForgeError> {
        let project = self
            .session(user)
            .get_project(remote_id.as_str())
            .await?;
        Ok(self.converter.repo(&project))
    }

    #[instrument(skip(self, user))]
    async fn repos(&self, user: &User) -> Result<Vec<Repo>, ForgeError> {
        let projects = self.session(user).get_projects().await?;
        debug!(count = projects.len(), "Fetched projects");

        Ok(projects
            .iter()
            .map(|project| self.converter.repo(project))
            .collect())
    }

    #[instrument(skip(self, user, repo, pipeline), fields(
        repo = %repo.forge_remote_id,
        commit = %pipeline.commit,
    ))]
    async fn file(
        &self,
        user: &User,
        repo: &Repo,
        pipeline: &Pipeline,
        path: &str,
    ) -> Result<Vec<u8>, ForgeError> {
        let file = self
            .session(user)
            .get_project_commit_file(repo.forge_remote_id.as_str(), &pipeline.commit, path)
            .await?;
        Ok(self.converter.file_content(file))
    }

    #[instrument(skip(self, user, repo, pipeline), fields(
        repo = %repo.forge_remote_id,
        commit = %pipeline.commit,
    ))]
    async fn dir(
        &self,
        user: &User,
        repo: &Repo,
        pipeline: &Pipeline,
        path: &str,
    ) -> Result<Vec<FileMeta>, ForgeError> {
        let session = self.session(user);
        let project_id = repo.forge_remote_id.as_str();
        let tree = session
            .get_project_commit_dir(project_id, &pipeline.commit, path)
            .await?;

        let mut files = Vec::with_capacity(tree.entries.len());
        for entry in tree.entries {
            let meta = match entry.kind {
                EntryKind::Blob => {
                    let file = session
                        .get_project_commit_file(project_id, &pipeline.commit, &entry.path)
                        .await?;
                    self.converter.file_meta(&entry.path, file)
                }
                EntryKind::Tree | EntryKind::Other => FileMeta {
                    name: entry.path,
                    data: Vec::new(),
                },
            };
            files.push(meta);
        }

        Ok(files)
    }

    #[instrument(skip(self, user, repo, pipeline), fields(
        repo = %repo.forge_remote_id,
        number = pipeline.number,
        status = %pipeline.status,
    ))]
    async fn status(
        &self,
        user: &User,
        repo: &Repo,
        pipeline: &Pipeline,
    ) -> Result<(), ForgeError> {
        if pipeline.status.is_in_progress() {
            debug!("Pipeline still in progress, not reporting");
            return Ok(());
        }

        let variables = pipeline
            .patch
            .as_ref()
            .ok_or(ForgeError::MissingPatchVariables)?;

        let body = status_message(
            pipeline.status,
            pipeline.number,
            &self.pipeline_url(repo, pipeline),
        );
        let comment = CreatePatchComment::new(body, variables.revision_id.as_str());

        self.session(user)
            .add_project_patch_comment(
                repo.forge_remote_id.as_str(),
                &variables.patch_id,
                &comment,
            )
            .await?;

        info!(patch = %variables.patch_id, "Reported pipeline status on patch");
        Ok(())
    }

    fn netrc(&self, user: &User, _repo: &Repo) -> Result<Netrc, ForgeError> {
        let login = if user.forge_remote_id.is_valid() {
            user.forge_remote_id.to_string()
        } else {
            self.config.node_id.clone()
        };

        Ok(Netrc {
            machine: self.client.node_url().to_string(),
            login,
            password: String::new(),
        })
    }

    #[instrument(skip(self, user, repo, link), fields(repo = %repo.forge_remote_id))]
    async fn activate(&self, user: &User, repo: &Repo, link: &str) -> Result<(), ForgeError> {
        let session = self.session(user);
        let project_id = repo.forge_remote_id.as_str();

        // Fails with the node's error if the project is unknown
        session.get_project(project_id).await?;

        if session.get_project_webhook(project_id, link).await?.is_some() {
            debug!("Webhook already registered");
            return Ok(());
        }

        let secret = self
            .config
            .hook_secret
            .as_ref()
            .map(|secret| secret.expose_secret())
            .unwrap_or_default();
        session
            .add_project_webhook(project_id, &RepoWebhook::new(project_id, link, secret))
            .await?;

        info!("Webhook registered");
        Ok(())
    }

    #[instrument(skip(self, user, repo, link), fields(repo = %repo.forge_remote_id))]
    async fn deactivate(&self, user: &User, repo: &Repo, link: &str) -> Result<(), ForgeError> {
        let session = self.session(user);
        let project_id = repo.forge_remote_id.as_str();

        let Some(webhook) = session.get_project_webhook(project_id, link).await? else {
            debug!("No webhook registered");
            return Ok(());
        };

        session.remove_project_webhook(project_id, &webhook.url).await?;

        info!("Webhook removed");
        Ok(())
    }

    async fn branches(
        &self,
        _user: &User,
        repo: &Repo,
        options: ListOptions,
    ) -> Result<Vec<String>, ForgeError> {
        // The node only announces the default branch
        if options.page > 1 {
            return Ok(Vec::new());
        }
        Ok(vec![repo.branch.clone()])
    }

    #[instrument(skip(self, user, repo), fields(repo = %repo.forge_remote_id))]
    async fn branch_head(
        &self,
        user: &User,
        repo: &Repo,
        branch: &str,
    ) -> Result<Commit, ForgeError> {
        if repo.branch != branch {
            return Err(ForgeError::BranchNotFound {
                branch: branch.to_string(),
            });
        }

        let commits = self
            .session(user)
            .get_project_commits(
                repo.forge_remote_id.as_str(),
                radicle_node_sdk::ListOptions::new(0, 1),
            )
            .await?;

        let head = commits.into_iter().next().ok_or(ForgeError::EmptyBranch)?;
        Ok(Commit {
            sha: head.id,
            forge_url: String::new(),
        })
    }

    #[instrument(skip(self, user, repo), fields(repo = %repo.forge_remote_id))]
    async fn pull_requests(
        &self,
        user: &User,
        repo: &Repo,
        options: ListOptions,
    ) -> Result<Vec<PullRequest>, ForgeError> {
        let patches = self
            .session(user)
            .get_project_patches(repo.forge_remote_id.as_str(), options.into())
            .await?;

        Ok(patches
            .iter()
            .map(|patch| self.converter.pull_request(patch))
            .collect())
    }

    async fn hook(&self, request: &WebhookRequest) -> Result<HookOutcome, ForgeError> {
        self.hook_parser.parse(request)
    }
}
