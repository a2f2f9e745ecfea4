//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    AttributionArgs, ClassifyArgs, ConfigArgs, ContributionArgs, RiskArgs, TwrArgs,
};

/// Perfcalc - Portfolio performance and risk analytics CLI
#[derive(Parser)]
#[command(name = "perfcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Analytics configuration file (TOML)
    #[arg(short, long, global = true, env = "PERFCALC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log calculation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Time-weighted return with external cash-flow sub-periods
    Twr(TwrArgs),

    /// Volatility, Sharpe ratio, drawdowns and VaR for a valuation series
    Risk(RiskArgs),

    /// Contribution of each holding to portfolio return
    Contribution(ContributionArgs),

    /// Brinson attribution of active return against a benchmark
    Attribution(AttributionArgs),

    /// Show how cash-flow kinds are treated in TWR
    Classify(ClassifyArgs),

    /// Inspect and validate analytics configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the headline value)
    Minimal,
}
