//! Console runner for the tasker session engine.
//!
//! Usage:
//!
//! ```text
//! tasker --config <path> [--as <identity>]
//! ```
//!
//! Every stdin line becomes one event for the chosen identity, which
//! defaults to the configured admin. Lines starting with `/` are commands,
//! lines starting with `!` carry inline-button data such as `!Start|1`, and
//! anything else is menu text. Rendered messages are printed to stdout and
//! logs go to stderr, filtered by `RUST_LOG`.

use std::env;
use std::sync::Arc;

use mockable::DefaultClock;
use tasker::chat::adapters::ConsoleGateway;
use tasker::chat::{Dispatcher, InboundEvent};
use tasker::config::{Config, ConfigError};
use tasker::storage::{self, StorageError};
use tasker::task::adapters::InMemoryTaskRepository;
use tasker::task::adapters::postgres::PostgresTaskRepository;
use tasker::task::ports::TaskRepository;
use tasker::user::adapters::InMemoryUserRepository;
use tasker::user::adapters::postgres::PostgresUserRepository;
use tasker::user::domain::{DisplayName, UserDomainError, UserId};
use tasker::user::ports::UserRepository;
use tasker::user::services::AccessServiceError;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the runner.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid identity: {0}")]
    Identity(#[from] UserDomainError),
    #[error("admin provisioning failed: {0}")]
    Provision(#[from] AccessServiceError),
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

#[derive(Debug)]
struct Args {
    config_path: String,
    identity: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();
    run_cli().await.map_err(Into::into)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_cli() -> Result<(), CliError> {
    let args = parse_args(env::args())?;
    let config = Config::load(&args.config_path)?;
    let identity = match args.identity {
        Some(raw) => UserId::new(raw)?,
        None => config.admin_identity()?,
    };

    match config.database.url.as_deref() {
        Some(url) => {
            let pool = storage::connect_pool(url, config.database.pool_size)?;
            storage::apply_schema(&pool).await?;
            info!("using PostgreSQL storage");
            run(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresTaskRepository::new(pool)),
                &config,
                identity,
            )
            .await
        }
        None => {
            info!("using in-memory storage");
            run(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTaskRepository::new()),
                &config,
                identity,
            )
            .await
        }
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let mut config_path = None;
    let mut identity = None;
    let mut remaining = args.skip(1);
    while let Some(flag) = remaining.next() {
        match flag.as_str() {
            "--config" => {
                let path = remaining
                    .next()
                    .ok_or_else(|| CliError::InvalidArgs("--config needs a path".to_owned()))?;
                config_path = Some(path);
            }
            "--as" => {
                let raw = remaining
                    .next()
                    .ok_or_else(|| CliError::InvalidArgs("--as needs an identity".to_owned()))?;
                let parsed = raw
                    .parse::<i64>()
                    .map_err(|_| CliError::InvalidArgs(format!("'{raw}' is not an identity")))?;
                identity = Some(parsed);
            }
            other => {
                return Err(CliError::InvalidArgs(format!(
                    "unknown argument '{other}'; expected --config <path> [--as <identity>]"
                )));
            }
        }
    }
    let Some(path) = config_path else {
        return Err(CliError::InvalidArgs("--config is required".to_owned()));
    };
    Ok(Args {
        config_path: path,
        identity,
    })
}

async fn run<U, T>(
    users: Arc<U>,
    tasks: Arc<T>,
    config: &Config,
    identity: UserId,
) -> Result<(), CliError>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
{
    let gateway = Arc::new(ConsoleGateway::new(tokio::io::stdout()));
    let dispatcher = Dispatcher::new(users, tasks, gateway, Arc::new(DefaultClock));
    dispatcher
        .access()
        .provision_admin(config.admin_identity()?, config.admin_name())
        .await?;
    info!(identity = %identity, "console session ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(event) = parse_line(identity, &line) {
            dispatcher.handle(event).await;
        }
    }
    info!("input closed");
    Ok(())
}

fn parse_line(identity: UserId, line: &str) -> Option<InboundEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let event = if trimmed.starts_with('/') {
        InboundEvent::command(identity, trimmed)
    } else if let Some(data) = trimmed.strip_prefix('!') {
        InboundEvent::callback(identity, data)
    } else {
        InboundEvent::text(identity, trimmed)
    };
    Some(event.with_sender(DisplayName::new("Console", identity.to_string())))
}
