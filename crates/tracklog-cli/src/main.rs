//! Tracklog CLI
//!
//! Command-line interface for tracklog

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracklog_core::logging_facility;
use tracklog_engine::{Config, ConfigOverrides};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tracklog")]
#[command(about = "Tracklog - Track library change history and play reports", long_about = None)]
struct Cli {
    /// Data directory (default: $TRACKLOG_DATA_DIR, else the per-user data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Database file (default: <data-dir>/tracklog.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Library export file (default: <data-dir>/library.json, or $TRACKLOG_LIBRARY)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Log profile: development or production
    #[arg(long, global = true)]
    log_profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Record library changes since the last update
    Update(commands::update::UpdateArgs),
    /// Show recent changes
    Log(commands::log::LogArgs),
    /// Group and rank changes over a trailing timeframe
    Report(commands::report::ReportArgs),
    /// Write a launchd agent that runs `update` periodically
    CreateLaunchagent(commands::launchagent::LaunchAgentArgs),
}

fn main() {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        data_dir: cli.data_dir,
        db_path: cli.db,
        library_path: cli.library,
        log_profile: cli.log_profile,
    };

    let config = match Config::load(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    logging_facility::init(config.log_profile);

    let result = match cli.command {
        Commands::Update(args) => commands::update::execute(args, &config),
        Commands::Log(args) => commands::log::execute(args, &config),
        Commands::Report(args) => commands::report::execute(args, &config),
        Commands::CreateLaunchagent(args) => commands::launchagent::execute(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
