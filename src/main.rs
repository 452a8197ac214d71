use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anton::api::{build_router, state::AppState};
use anton::config::Settings;
use anton::storage;

#[derive(Parser)]
#[command(name = "anton")]
#[command(about = "Player registry REST service")]
#[command(version)]
struct Cli {
    /// Path to settings file
    #[arg(long, default_value = "./anton.toml")]
    config: PathBuf,

    /// Log filter (overrides log.min_filter from settings)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides server.port)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Print the effective settings and exit
    Config,
}

fn init_tracing(directive: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validated per command, after any CLI overrides
    let mut settings = Settings::load(Some(cli.config.as_path()))?;

    let directive = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.log.min_filter.clone());
    init_tracing(&directive, cli.json_logs);

    tracing::info!("Starting anton v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            settings.validate()?;
            tracing::info!("Settings: {:?}", settings);

            let store = storage::connect(&settings).await?;
            let addr = settings.bind_addr();
            let mut app = build_router(AppState::new(store, settings));
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Player API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Config => {
            settings.validate()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
