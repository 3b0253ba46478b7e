mod aggregate;
mod chart;
mod cli;
mod commands;
mod export;
mod metrics;
mod model;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inventory(args) => commands::inventory::run(args),
        Commands::Entity(args) => commands::entity::run(args),
        Commands::Score(args) => commands::score::run(args),
        Commands::Volatility(args) => commands::volatility::run(args),
        Commands::Text(args) => commands::text::run(args),
        Commands::Style(args) => commands::style::run(args),
        Commands::Overview(args) => commands::overview::run(args),
        Commands::All(args) => commands::all::run(args),
        Commands::Status(args) => commands::status::run(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
