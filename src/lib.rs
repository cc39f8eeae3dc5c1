//! rdoselog library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::time::resolve_now;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Sync => cli::commands::sync::handle(cfg),
        Commands::List { .. } => {
            let now = resolve_now(cli.now.as_deref())?;
            cli::commands::list::handle(&cli.command, cfg, &now)
        }
        Commands::Mark { .. } => cli::commands::mark::handle(&cli.command, cfg),
        Commands::Note { .. } => cli::commands::note::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Command-line paths are relative to the working directory.
fn absolute(path: &str) -> AppResult<String> {
    let expanded = utils::path::expand_tilde(path);
    Ok(std::path::absolute(expanded)?.to_string_lossy().to_string())
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // test mode never reads the user's config file
    let mut cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = absolute(custom_db)?;
    }
    if let Some(custom_prescription) = &cli.prescription {
        cfg.prescription = absolute(custom_prescription)?;
    }

    dispatch(&cli, &cfg)
}
