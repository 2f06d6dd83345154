use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use todo_web_service::config::{
    parse_origins, DEFAULT_DB_PATH, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_WORKER_COUNT,
};
use todo_web_service::{ServerConfig, StorageBackend};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(about = "Todo list HTTP server")]
#[command(version)]
struct Cli {
    /// Interface to bind
    #[arg(long, env = "TODO_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(long, env = "TODO_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Storage backend (memory or sqlite)
    #[arg(long, env = "TODO_STORAGE", default_value_t = StorageBackend::Sqlite)]
    storage: StorageBackend,

    /// SQLite database file, used with the sqlite backend
    #[arg(long, env = "TODO_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// HTTP worker threads
    #[arg(long, env = "TODO_WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// Comma-separated CORS origins; "*" allows any origin
    #[arg(long, env = "TODO_ALLOWED_ORIGINS")]
    allowed_origins: Option<String>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host,
            port: self.port,
            workers: self.workers,
            storage: self.storage,
            db_path: self.db_path,
            allowed_origins: self
                .allowed_origins
                .as_deref()
                .map(parse_origins)
                .unwrap_or(defaults.allowed_origins),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Cli::parse().into_config();
    tracing::info!(
        "Starting todo server (storage: {}, bind: {})",
        config.storage,
        config.bind_address()
    );

    let store = todo_web_service::build_store(&config)
        .await
        .context("failed to open todo storage")?;

    todo_web_service::run(config, store)
        .await
        .map_err(|e| anyhow!(e))
}
