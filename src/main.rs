use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracksim::api;
use tracksim::config::GenConfig;
use tracksim::gen::Generator;
use tracksim::store::OverrideStore;

#[derive(Parser)]
#[command(name = "tracksim")]
#[command(about = "Deterministic mock Jira/Tempo services")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the mock Jira service
    ServeJira {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8443")]
        port: u16,
    },
    /// Start the mock Tempo service
    ServeTempo {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8444")]
        port: u16,
    },
    /// Print the dataset shape for the configured seed
    Stats,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracksim=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(app: axum::Router, port: u16, service: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    tracing::info!("{service} listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = GenConfig::from_env();
    let engine = Arc::new(Generator::new(config));

    let stats = engine.stats();
    tracing::info!(
        seed = %stats.seed,
        projects = stats.total_projects,
        users = stats.num_users,
        "dataset configured"
    );

    match cli.command {
        Some(Commands::ServeJira { port }) => {
            let store = OverrideStore::open_default("jira")?;
            let app = api::create_jira_router(engine, store);
            serve(app, port, "mock jira").await?;
        }
        Some(Commands::ServeTempo { port }) => {
            let store = OverrideStore::open_default("tempo")?;
            let app = api::create_tempo_router(engine, store);
            serve(app, port, "mock tempo").await?;
        }
        Some(Commands::Stats) => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        None => {
            // Default: the jira service on its usual port.
            let store = OverrideStore::open_default("jira")?;
            let app = api::create_jira_router(engine, store);
            serve(app, 8443, "mock jira").await?;
        }
    }

    Ok(())
}
