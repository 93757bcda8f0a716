//! # Radicle Node SDK
//!
//! Typed access to a Radicle node's HTTP daemon.
//!
//! This SDK provides:
//! - A REST client for node, session, project, patch and webhook endpoints
//! - Wire types that tolerate field renames across daemon versions
//! - Webhook payload types and HMAC-SHA256 signature validation
//!
//! # Examples
//!
//! ## Listing projects
//!
//! ```rust,no_run
//! use radicle_node_sdk::client::RadicleClient;
//!
//! # async fn example() -> Result<(), radicle_node_sdk::ApiError> {
//! let client = RadicleClient::builder("http://127.0.0.1:8080").build()?;
//! let session = client.session(Some("session-token".to_string()));
//!
//! for project in session.get_projects().await? {
//!     println!("{} ({})", project.name, project.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Checking a webhook signature
//!
//! ```rust
//! use radicle_node_sdk::webhook::SignatureValidator;
//!
//! let validator = SignatureValidator::new("secret");
//! let body = br#"{"action":"created"}"#;
//! let signature = validator.sign(body).unwrap();
//! assert!(validator.validate(body, &signature).unwrap());
//! ```

pub mod client;
pub mod error;
pub mod events;
pub mod timestamp;
pub mod webhook;

// Re-export commonly used types at crate root for convenience
pub use error::{ApiError, ValidationError};

pub use client::{
    ClientConfig, CreatePatchComment, EntryKind, FileTree, ListOptions, NodeInfo, Patch,
    ProjectDescriptor, ProjectFile, RadicleClient, RepoWebhook, Repository, SessionClient,
    SessionInfo, TreeEntry,
};
pub use events::{EventType, HookRepository, PatchPayload, PushPayload};
pub use timestamp::Timestamp;
pub use webhook::{SignatureValidator, WebhookRequest};
