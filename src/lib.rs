pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::goal::Goal;
use anyhow::Result;
use providers::Sources;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Plan,
    Simulate(Goal),
    Rebalance(Goal),
    Deadline(String),
    Budget,
    Milestones,
    Pay { goal: String, amount: f64 },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("avec starting...");

    let (config, path) = match config_path {
        Some(path) => (AppConfig::load_from_path(path)?, PathBuf::from(path)),
        None => (AppConfig::load()?, AppConfig::default_config_path()?),
    };
    debug!("Loaded config: {config:#?}");

    let sources = Sources::from_config(&config, Some(path))?;
    let symbol = config.currency_symbol.as_str();

    match command {
        AppCommand::Plan => cli::plan::run(&sources, symbol).await,
        AppCommand::Simulate(goal) => cli::simulate::run_simulate(&sources, &goal, symbol).await,
        AppCommand::Rebalance(goal) => cli::simulate::run_rebalance(&sources, &goal, symbol).await,
        AppCommand::Deadline(name) => cli::deadline::run(&sources, &name, symbol).await,
        AppCommand::Budget => cli::budget::run(&sources, symbol).await,
        AppCommand::Milestones => cli::milestones::run(&sources, &config).await,
        AppCommand::Pay { goal, amount } => cli::pay::run(&sources, &goal, amount, symbol).await,
    }
}
