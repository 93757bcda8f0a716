//! Repository webhook registration.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{client::SessionClient, error::ApiError};

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;

/// Content type requested for webhook deliveries.
pub const WEBHOOK_CONTENT_TYPE: &str = "application/json";

/// A webhook registered on a repository.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepoWebhook {
    pub repo_id: String,
    pub url: String,
    pub secret: String,
    pub content_type: String,
}

impl RepoWebhook {
    /// Create a JSON webhook for `repo_id` delivering to `url`.
    pub fn new(repo_id: impl Into<String>, url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            repo_id: repo_id.into(),
            url: url.into(),
            secret: secret.into(),
            content_type: WEBHOOK_CONTENT_TYPE.to_string(),
        }
    }
}

// Security: don't expose the shared secret in debug output
impl std::fmt::Debug for RepoWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoWebhook")
            .field("repo_id", &self.repo_id)
            .field("url", &self.url)
            .field("secret", &"<REDACTED>")
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl SessionClient {
    /// Register a webhook on a project.
    #[instrument(skip(self, webhook), fields(url = %webhook.url))]
    pub async fn add_project_webhook(
        &self,
        project_id: &str,
        webhook: &RepoWebhook,
    ) -> Result<(), ApiError> {
        self.execute(
            Method::POST,
            &["projects", project_id, "webhooks"],
            &[],
            Some(webhook),
        )
        .await
    }

    /// List the webhooks registered on a project.
    #[instrument(skip(self))]
    pub async fn get_project_webhooks(&self, project_id: &str) -> Result<Vec<RepoWebhook>, ApiError> {
        self.get_json(&["projects", project_id, "webhooks"], &[])
            .await
    }

    /// Find the first webhook whose URL starts with `url_prefix`.
    #[instrument(skip(self))]
    pub async fn get_project_webhook(
        &self,
        project_id: &str,
        url_prefix: &str,
    ) -> Result<Option<RepoWebhook>, ApiError> {
        let webhooks = self.get_project_webhooks(project_id).await?;
        let found = webhooks
            .into_iter()
            .find(|webhook| webhook.url.starts_with(url_prefix));

        debug!(found = found.is_some(), "Looked up project webhook");
        Ok(found)
    }

    /// Remove the webhook delivering to `url`.
    #[instrument(skip(self))]
    pub async fn remove_project_webhook(&self, project_id: &str, url: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &["projects", project_id, "webhooks"],
            &[("url", url.to_string())],
            None::<&()>,
        )
        .await
    }
}
