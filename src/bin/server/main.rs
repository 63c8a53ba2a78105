use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use bunny_storage_adapter::{
    adapters::outbound::storage::StorageEndpoints,
    app::{AppBuilder, AppConfig, SettingsBackend},
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bunny-offload-server")]
#[command(about = "Serves the Bunny.net storage provider actions over HTTP", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Shared secret action requests must send as `nonce`
    #[arg(long, env = "BUNNY_ACTION_TOKEN")]
    action_token: Option<String>,

    /// URL scheme for storage requests
    #[arg(long, env = "BUNNY_STORAGE_SCHEME", default_value = "https")]
    storage_scheme: String,

    /// Storage API host, without region
    #[arg(long, env = "BUNNY_STORAGE_HOST", default_value = "storage.bunnycdn.com")]
    storage_host: String,

    /// Base URL of the account API used for purges
    #[arg(long, env = "BUNNY_API_BASE", default_value = "https://api.bunny.net")]
    api_base: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "BUNNY_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Directory for temporary upload buffers
    #[arg(long, env = "BUNNY_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> AppConfig {
        AppConfig {
            endpoints: StorageEndpoints {
                scheme: self.storage_scheme.clone(),
                storage_host: self.storage_host.clone(),
                api_base: self.api_base.clone(),
            },
            request_timeout: Duration::from_secs(self.timeout_secs),
            temp_dir: self.temp_dir.clone().unwrap_or_else(std::env::temp_dir),
            settings_backend: SettingsBackend::Environment,
            action_token: self.action_token.clone(),
        }
    }

    fn init_logging(&self) -> Result<()> {
        let level = match self.log_level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::INFO,
        };

        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(level)
            .try_init()
            .context("Failed to initialize logging")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting Bunny offload server");

    let app = AppBuilder::new()
        .with_config(cli.to_app_config())
        .build()
        .context("Failed to build application")?;

    if cli.action_token.is_none() {
        warn!(token = %app.action_token, "No action token configured, generated one");
    }

    let router = app.router();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}
