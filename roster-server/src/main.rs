//! Roster - team membership and reviewer assignment service

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roster_core::{Backend, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Roster: team membership and pull request reviewer assignment
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Listen address (overrides config and env)
    #[arg(long, global = true, env = "ROSTER_BIND")]
    bind: Option<String>,

    /// SQLite database path (overrides config and env)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,

    /// Show current configuration
    Config,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config =
        Config::load_with_overrides(cli.config.as_deref(), cli.bind.clone(), cli.database.clone())?;

    if cli.verbose {
        tracing::debug!(
            bind = %config.server.bind,
            backend = ?config.database.backend,
            max_reviewers = config.assignment.policy.max_reviewers,
            "Configuration loaded"
        );
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await?,
        Commands::Version => {
            println!("roster {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Config => print_config(&config, cli.config.as_deref()),
    }

    Ok(())
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let engine = roster_server::build_engine(config).await?;
    let app = roster_server::router(engine);

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "Roster listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Roster stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

fn print_config(config: &Config, explicit_path: Option<&std::path::Path>) {
    println!("Roster Configuration");
    println!("====================");
    println!();
    println!("Server:");
    println!("  bind: {}", config.server.bind);
    println!();
    println!("Database:");
    match config.database.backend {
        Backend::Sqlite => {
            println!("  backend: sqlite");
            println!("  path: {}", config.database.path.display());
        }
        Backend::Memory => println!("  backend: memory"),
    }
    println!("  max_connections: {}", config.database.max_connections);
    println!(
        "  acquire_timeout: {}s",
        config.database.acquire_timeout.as_secs()
    );
    println!();
    println!("Assignment:");
    println!("  max_reviewers: {}", config.assignment.policy.max_reviewers);
    match config.assignment.seed {
        Some(seed) => println!("  seed: {}", seed),
        None => println!("  seed: (random)"),
    }
    println!();

    let path = explicit_path
        .map(std::path::Path::to_path_buf)
        .or_else(Config::default_config_path);
    if let Some(path) = path {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
