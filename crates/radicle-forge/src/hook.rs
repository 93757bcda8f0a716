//! Webhook normalization.
//!
//! Turns a node webhook into a repository and a pipeline trigger:
//!
//! 1. If a hook secret is configured, the `x-radicle-signature` header must
//!    match the HMAC-SHA256 of the raw body. Nothing is parsed otherwise.
//! 2. The `x-radicle-event-type` header selects the parser. Anything other
//!    than `push` or `patch` is [`HookOutcome::Ignored`].
//! 3. The payload's repository goes through the [`Converter`].

use radicle_node_sdk::client::Commit;
use radicle_node_sdk::{EventType, PatchPayload, PushPayload, SignatureValidator, WebhookRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::convert::{Converter, RADICLE_AVATAR};
use crate::error::ForgeError;
use crate::model::{PatchVariables, Pipeline, PipelineEvent, Repo};

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;

/// Result of handling a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HookOutcome {
    /// The event should start a pipeline.
    Triggered { repo: Repo, pipeline: Pipeline },
    /// The event type is not one the adapter acts on.
    Ignored { event: String },
}

impl HookOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }
}

/// Parses node webhooks.
#[derive(Debug, Clone)]
pub struct HookParser {
    converter: Converter,
    validator: Option<SignatureValidator>,
}

impl HookParser {
    /// Create a parser. Signatures are checked only when `secret` is given.
    pub fn new(converter: Converter, secret: Option<&str>) -> Self {
        Self {
            converter,
            validator: secret.map(SignatureValidator::new),
        }
    }

    pub fn verifies_signatures(&self) -> bool {
        self.validator.is_some()
    }

    /// Verify, dispatch and parse a webhook.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` when a secret is configured and the signature
    ///   header is missing or wrong
    /// - `MalformedPayload` when the body does not decode
    /// - `EmptyPush` / `EmptyPatch` when there is nothing to build
    #[instrument(skip(self, request), fields(
        event_type = request.event_type().unwrap_or_default(),
        payload_size = request.payload().len(),
    ))]
    pub fn parse(&self, request: &WebhookRequest) -> Result<HookOutcome, ForgeError> {
        self.verify_signature(request)?;

        let header = request.event_type().unwrap_or_default();
        let outcome = match EventType::from_header(header) {
            Some(EventType::Push) => self.parse_push(request.payload())?,
            Some(EventType::Patch) => self.parse_patch(request.payload())?,
            None => {
                debug!(event = header, "Ignoring webhook event");
                return Ok(HookOutcome::Ignored {
                    event: header.to_string(),
                });
            }
        };

        if let HookOutcome::Triggered { repo, pipeline } = &outcome {
            info!(
                repo = %repo.forge_remote_id,
                event = ?pipeline.event,
                commit = %pipeline.commit,
                "Webhook produced pipeline trigger"
            );
        }

        Ok(outcome)
    }

    fn verify_signature(&self, request: &WebhookRequest) -> Result<(), ForgeError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };

        let Some(signature) = request.signature() else {
            warn!("Webhook signature header missing");
            return Err(ForgeError::InvalidSignature);
        };

        if !validator.validate(request.payload(), signature)? {
            warn!("Webhook signature mismatch");
            return Err(ForgeError::InvalidSignature);
        }

        Ok(())
    }

    /// Build a push pipeline. The last commit is representative.
    pub fn parse_push(&self, payload: &[u8]) -> Result<HookOutcome, ForgeError> {
        let hook: PushPayload = decode(EventType::Push, payload)?;
        let repo = self.converter.repo(&hook.repository);

        let last_commit = hook.commits.last().ok_or(ForgeError::EmptyPush)?;

        let pipeline = Pipeline {
            event: PipelineEvent::Push,
            commit: hook.after.clone(),
            branch: hook.after.clone(),
            git_ref: hook.after.clone(),
            author: hook.author.alias.clone(),
            avatar: RADICLE_AVATAR.to_string(),
            message: last_commit.title.clone(),
            timestamp: last_commit.timestamp.unix(),
            sender: last_commit.author.name.clone(),
            email: last_commit.author.email.clone(),
            forge_url: last_commit.url.clone(),
            changed_files: changed_files(&hook.commits),
            ..Default::default()
        };

        Ok(HookOutcome::Triggered { repo, pipeline })
    }

    /// Build a pull-request pipeline. The last revision is representative.
    pub fn parse_patch(&self, payload: &[u8]) -> Result<HookOutcome, ForgeError> {
        let hook: PatchPayload = decode(EventType::Patch, payload)?;
        let repo = self.converter.repo(&hook.repository);

        let patch = &hook.patch;
        let last_revision = patch.latest_revision().ok_or(ForgeError::EmptyPatch)?;

        let pipeline = Pipeline {
            event: PipelineEvent::PullRequest,
            commit: patch.after.clone(),
            branch: patch.id.clone(),
            git_ref: patch.after.clone(),
            refspec: format!("refs/patches/{}:refs/heads/{}", patch.after, repo.branch),
            author: patch.author.alias.clone(),
            avatar: RADICLE_AVATAR.to_string(),
            message: patch.title.clone(),
            timestamp: last_revision.timestamp.unix(),
            sender: patch.author.id.clone(),
            email: patch.author.alias.clone(),
            forge_url: patch.url.clone(),
            changed_files: changed_files(&patch.commits),
            pr_labels: patch.labels.clone(),
            patch: Some(PatchVariables::new(
                patch.id.as_str(),
                last_revision.id.as_str(),
            )),
            ..Default::default()
        };

        Ok(HookOutcome::Triggered { repo, pipeline })
    }
}

fn decode<T: DeserializeOwned>(event: EventType, payload: &[u8]) -> Result<T, ForgeError> {
    serde_json::from_slice(payload).map_err(|source| ForgeError::MalformedPayload {
        event: event.to_string(),
        source,
    })
}

/// Files touched across all commits, in payload order, duplicates kept.
fn changed_files(commits: &[Commit]) -> Vec<String> {
    commits
        .iter()
        .flat_map(Commit::changed_files)
        .cloned()
        .collect()
}
