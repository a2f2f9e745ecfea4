//! Perfcalc CLI - Command-line interface for portfolio performance analytics.
//!
//! # Usage
//!
//! ```bash
//! # Time-weighted return for one or more accounts
//! perfcalc twr --input accounts.json
//!
//! # Risk metrics for a valuation series
//! perfcalc risk --input valuations.json --rolling
//!
//! # Contribution by holding
//! perfcalc contribution --input holdings.json
//!
//! # Brinson attribution against a benchmark
//! perfcalc attribution --input source.json --portfolio GROWTH --benchmark INDEX \
//!     --start 2024-01-01 --end 2024-12-31
//!
//! # How a cash-flow kind is treated
//! perfcalc classify client-contribution
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod input;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = cli.format;
    let config = input::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Twr(args) => commands::twr::execute(args, &config, format)?,
        Commands::Risk(args) => commands::risk::execute(args, &config, format)?,
        Commands::Contribution(args) => commands::contribution::execute(args, format)?,
        Commands::Attribution(args) => commands::attribution::execute(args, format)?,
        Commands::Classify(args) => commands::classify::execute(args, format)?,
        Commands::Config(args) => commands::config::execute(args, &config, format)?,
    }

    Ok(())
}

/// Logs go to stderr so they never mix with command output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,perfcalc=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
