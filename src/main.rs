use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use aimate::ui::install_panic_hook;
use aimate::{util, App, AppServices, Config};
use anyhow::{Context, Result};
use clap::Parser;

/// Terminal front-end for the aiMate chat client
#[derive(Debug, Parser)]
#[command(name = "aimate", version, about)]
struct Cli {
    /// Data directory (default: ~/.aimate)
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data dir>/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir);

    // Initialize logging to file (<data dir>/logs/aimate.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let config = match cli.config {
        Some(path) => Config::load_from(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    tracing::info!(config = %config.config_path.display(), "Starting aiMate");

    install_panic_hook();

    let services = AppServices::local(&config);
    let mut app = App::new(config, services);
    app.run().await
}
