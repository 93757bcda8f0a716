//! # Radicle Forge
//!
//! Forge adapter connecting a CI orchestrator to a Radicle node.
//!
//! The orchestrator sees repositories, users, pull requests and pipeline
//! triggers; the node has projects, sessions, patches and webhooks. This
//! crate translates between the two:
//!
//! - [`convert`]: node entities to orchestrator entities
//! - [`hook`]: inbound webhooks to pipeline triggers
//! - [`forge`]: the [`Forge`] contract, implemented by [`RadicleForge`]
//!
//! Node access goes through [`radicle_node_sdk`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use radicle_forge::{Forge, ForgeConfig, Login, RadicleForge};
//!
//! # async fn example() -> Result<(), radicle_forge::ForgeError> {
//! let config = ForgeConfig::new("http://127.0.0.1:8080", "https://ci.example.com")
//!     .with_hook_secret("shared-secret");
//! let forge = RadicleForge::new(config)?;
//!
//! match forge.login(Some("session-id")).await? {
//!     Login::Authenticated(user) => {
//!         for repo in forge.repos(&user).await? {
//!             println!("{}", repo.full_name);
//!         }
//!     }
//!     Login::Redirect(url) => println!("Log in at {}", url),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod forge;
pub mod hook;
pub mod model;
pub mod secret;

pub use config::{AuthMode, ConfigError, ForgeConfig};
pub use convert::{Converter, RADICLE_AVATAR};
pub use error::{ErrorKind, ForgeError};
pub use forge::{Forge, Login, RadicleForge, FORGE_NAME};
pub use hook::{HookOutcome, HookParser};
pub use model::{
    Commit, FileMeta, ForgeRemoteId, ListOptions, Netrc, PatchVariables, Perm, Pipeline,
    PipelineEvent, PipelineStatus, PullRequest, Repo, ScmKind, User,
};
pub use secret::SecretValue;
