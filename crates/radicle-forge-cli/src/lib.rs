//! # Radicle Forge CLI
//!
//! Command-line front end for the Radicle forge adapter.
//!
//! The commands exercise the adapter against a live node without a CI
//! orchestrator in front of it:
//! - `node`: identity of the configured node
//! - `login`, `repos`, `patches`: the same calls the orchestrator makes
//! - `hook`: run a captured webhook delivery through the normalizer
//! - `config`: validate and show the resolved configuration
//!
//! Results go to stdout, logs go to stderr.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use radicle_forge::{
    ConfigError, Forge, ForgeConfig, ForgeError, ForgeRemoteId, ListOptions, Login, RadicleForge,
    User,
};
use radicle_node_sdk::webhook::{EVENT_TYPE_HEADER, SIGNATURE_HEADER};
use radicle_node_sdk::{ClientConfig, RadicleClient, WebhookRequest};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

// ============================================================================
// CLI Structure
// ============================================================================

/// Radicle forge adapter CLI
#[derive(Debug, Parser)]
#[command(name = "radicle-forge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Talk to a Radicle node the way a CI orchestrator does")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "RADICLE_FORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the node's ID and alias
    Node,

    /// Resolve a session to a user
    Login {
        /// Session ID issued by the node
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List repositories visible to the session
    Repos {
        /// Session ID issued by the node
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List open patches of a repository
    Patches {
        /// Repository ID, with or without the `rad:` prefix
        #[arg(short, long)]
        repo: String,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Patches per page
        #[arg(long, default_value = "30")]
        per_page: u32,

        /// Session ID issued by the node
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Normalize a captured webhook delivery
    Hook {
        /// Value of the event type header
        #[arg(short, long)]
        event_type: String,

        /// Value of the signature header
        #[arg(long)]
        signature: Option<String>,

        /// File holding the raw request body
        #[arg(short, long)]
        payload: PathBuf,
    },

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

// ============================================================================
// Error Types
// ============================================================================

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Forge error: {0}")]
    Forge(#[from] ForgeError),

    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::Forge(_) => 2,
            Self::CommandFailed { .. } => 3,
            Self::InvalidArgument { .. } => 4,
            Self::Io(_) => 5,
            Self::Serialization { .. } => 6,
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse arguments, set up logging and run the selected command.
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let output = run(cli).await?;
    println!("{}", output);
    Ok(())
}

/// Run a parsed command and return what should be printed.
pub async fn run(cli: Cli) -> Result<String, CliError> {
    let format = cli.format;

    match cli.command {
        Commands::Config { show } => execute_config_command(cli.config.as_deref(), show, format),
        Commands::Node => {
            let config = load_configuration(cli.config.as_deref())?;
            execute_node_command(&config, format).await
        }
        Commands::Login { session } => {
            let forge = RadicleForge::new(load_configuration(cli.config.as_deref())?)?;
            execute_login_command(&forge, session.as_deref(), format).await
        }
        Commands::Repos { session } => {
            let forge = RadicleForge::new(load_configuration(cli.config.as_deref())?)?;
            execute_repos_command(&forge, session.as_deref(), format).await
        }
        Commands::Patches {
            repo,
            page,
            per_page,
            session,
        } => {
            let forge = RadicleForge::new(load_configuration(cli.config.as_deref())?)?;
            let options = list_options(page, per_page)?;
            execute_patches_command(&forge, &repo, options, session.as_deref(), format).await
        }
        Commands::Hook {
            event_type,
            signature,
            payload,
        } => {
            let forge = RadicleForge::new(load_configuration(cli.config.as_deref())?)?;
            execute_hook_command(&forge, &event_type, signature, &payload, format).await
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over `--log-level`.
fn initialize_logging(cli: &Cli) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .map_err(|e| CliError::InvalidArgument {
            arg: "log-level".to_string(),
            message: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| CliError::CommandFailed {
        message: format!("failed to initialize logging: {}", e),
    })
}

fn load_configuration(path: Option<&Path>) -> Result<ForgeConfig, ConfigError> {
    let config = ForgeConfig::load(path)?;
    debug!(url = %config.url, host = %config.host, "Configuration loaded");
    Ok(config)
}

fn list_options(page: u32, per_page: u32) -> Result<ListOptions, CliError> {
    if page == 0 {
        return Err(CliError::InvalidArgument {
            arg: "page".to_string(),
            message: "pages start at 1".to_string(),
        });
    }
    if per_page == 0 {
        return Err(CliError::InvalidArgument {
            arg: "per-page".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(ListOptions { page, per_page })
}

// ============================================================================
// Commands
// ============================================================================

fn execute_config_command(
    path: Option<&Path>,
    show: bool,
    format: OutputFormat,
) -> Result<String, CliError> {
    let config = load_configuration(path)?;
    info!("Configuration is valid");

    if !show {
        return Ok("Configuration is valid".to_string());
    }

    match format {
        OutputFormat::Text | OutputFormat::Yaml => to_yaml(&config),
        OutputFormat::Json => to_json(&config),
    }
}

async fn execute_node_command(
    config: &ForgeConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let client = RadicleClient::builder(config.url.as_str())
        .config(ClientConfig::default().with_user_agent(config.user_agent.as_str()))
        .build()
        .map_err(ForgeError::from)?;

    let token = config.auth.secret_token().map(|t| t.expose_secret().to_string());
    let node = client
        .session(token)
        .get_node_info()
        .await
        .map_err(ForgeError::from)?;

    #[derive(Serialize)]
    struct NodeSummary<'a> {
        id: &'a str,
        alias: &'a str,
    }

    let summary = NodeSummary {
        id: node.node_id(),
        alias: node.alias(),
    };

    render(&summary, format, |s| format!("{} ({})", s.id, s.alias))
}

async fn execute_login_command(
    forge: &RadicleForge,
    session: Option<&str>,
    format: OutputFormat,
) -> Result<String, CliError> {
    match forge.login(session).await? {
        Login::Authenticated(user) => render(&user, format, |u| {
            format!("Logged in as {} ({})", u.login, u.forge_remote_id)
        }),
        Login::Redirect(url) => render(&url, format, |u| format!("Log in at {}", u)),
    }
}

async fn execute_repos_command(
    forge: &RadicleForge,
    session: Option<&str>,
    format: OutputFormat,
) -> Result<String, CliError> {
    let user = authenticate(forge, session).await?;
    let repos = forge.repos(&user).await?;
    info!(count = repos.len(), "Listed repositories");

    render(&repos, format, |repos| {
        repos
            .iter()
            .map(|r| format!("{}\t{}", r.forge_remote_id, r.name))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn execute_patches_command(
    forge: &RadicleForge,
    repo_id: &str,
    options: ListOptions,
    session: Option<&str>,
    format: OutputFormat,
) -> Result<String, CliError> {
    let user = authenticate(forge, session).await?;
    let remote_id = parse_repo_id(repo_id);
    let repo = forge.repo(&user, &remote_id).await?;
    let pulls = forge.pull_requests(&user, &repo, options).await?;

    render(&pulls, format, |pulls| {
        pulls
            .iter()
            .map(|p| format!("{}\t{}", p.index, p.title))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn execute_hook_command(
    forge: &RadicleForge,
    event_type: &str,
    signature: Option<String>,
    payload: &Path,
    format: OutputFormat,
) -> Result<String, CliError> {
    let body = std::fs::read(payload)?;

    let mut headers = HashMap::new();
    headers.insert(EVENT_TYPE_HEADER.to_string(), event_type.to_string());
    if let Some(signature) = signature {
        headers.insert(SIGNATURE_HEADER.to_string(), signature);
    }

    let request = WebhookRequest::new(headers, Bytes::from(body));
    let outcome = forge.hook(&request).await?;

    match format {
        OutputFormat::Yaml => to_yaml(&outcome),
        OutputFormat::Text | OutputFormat::Json => to_json(&outcome),
    }
}

async fn authenticate(forge: &RadicleForge, session: Option<&str>) -> Result<User, CliError> {
    match forge.login(session).await? {
        Login::Authenticated(user) => Ok(user),
        Login::Redirect(url) => Err(CliError::CommandFailed {
            message: format!("not authenticated, log in at {}", url),
        }),
    }
}

// ============================================================================
// Output
// ============================================================================

fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => to_json(value),
        OutputFormat::Yaml => to_yaml(value),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Serialization {
        message: e.to_string(),
    })
}

fn to_yaml<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_yaml::to_string(value).map_err(|e| CliError::Serialization {
        message: e.to_string(),
    })
}

/// Strip the `rad:` prefix so IDs can be passed the way `rad` prints them.
pub fn parse_repo_id(value: &str) -> ForgeRemoteId {
    radicle_forge::convert::remote_id(value)
}
