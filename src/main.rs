//! FlavorLineTool - a command-line client for Flavortown and Hackatime
//!
//! Lists and searches Flavortown users and projects, shows the shop,
//! creates and edits your own projects, and reports Hackatime coding time.
//!
//! Exit codes:
//!   0 - Success (including searches with failed pages, declined
//!       confirmations and scans cancelled with Ctrl-C)
//!   1 - Fatal error (missing credentials, invalid input, failed request)

mod api;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod search;
mod store;
mod ui;

use anyhow::{Context as _, Result};
use cli::Args;
use commands::Context;
use config::Config;
use error::AppError;
use store::JsonFileStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        ui::error(&format!("Error: {}", e));
        std::process::exit(1);
    }

    // --init-config runs before logging is set up
    if args.init_config {
        return handle_init_config(&args);
    }

    init_logging(&args);

    info!("flavor v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Command failed: {:#}", e);
        ui::error(&format!("Error: {}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: write a default settings file.
fn handle_init_config(args: &Args) -> Result<()> {
    let path = match args.config.clone().or_else(Config::default_path) {
        Some(path) => path,
        None => anyhow::bail!("Cannot determine home directory for the settings file"),
    };

    if path.exists() {
        ui::warning(&format!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        ));
        std::process::exit(1);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    ui::success(&format!("Created {} with default settings.", path.display()));
    println!("   Edit it to change service URLs, timeouts and search pacing.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load settings, open the credential store and run the command.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    debug!("Flavortown at {}", config.api.flavortown_url);

    let store = JsonFileStore::open_default()?;
    let store_path = store.path().to_path_buf();
    debug!("Data store at {}", store_path.display());

    let ctx = Context {
        config,
        store: Box::new(store),
        show_progress: !args.quiet,
    };

    let Some(command) = args.command else {
        anyhow::bail!("No command given. Run 'flavor --help' for usage.");
    };
    if let Err(e) = commands::dispatch(command, &ctx).await {
        if let AppError::MissingSetting { key, .. } = &e {
            debug!("Setting '{}' is not set in {}", key, store_path.display());
        }
        return Err(e.into());
    }
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config file");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
