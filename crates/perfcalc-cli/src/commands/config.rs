//! Config command implementation.
//!
//! Shows, scaffolds and validates the analytics configuration file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use perfcalc_analytics::AnalyticsConfig;

use crate::cli::OutputFormat;
use crate::input::load_config;
use crate::output::{print_document, print_header, print_output, Metric};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print a default configuration file
    Init,

    /// Check a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the TOML file
    pub path: PathBuf,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, config: &AnalyticsConfig, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(config, format),
        ConfigCommand::Init => {
            print!("{}", toml::to_string_pretty(&AnalyticsConfig::default())?);
            Ok(())
        }
        ConfigCommand::Validate(validate) => {
            let loaded = load_config(Some(&validate.path))?;
            eprintln!("{} {} is valid", "✓".green(), validate.path.display());
            show(&loaded, format)
        }
    }
}

fn show(config: &AnalyticsConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_document(config),
        OutputFormat::Minimal => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Csv => {
            if format == OutputFormat::Table {
                print_header("Analytics Configuration");
            }
            print_output(&entries(config), format)
        }
    }
}

fn entries(config: &AnalyticsConfig) -> Vec<Metric> {
    vec![
        Metric::new("risk_free_rate", config.risk_free_rate.to_string()),
        Metric::new("var_confidence", config.var_confidence.to_string()),
        Metric::new("rolling_window", config.rolling_window.to_string()),
        Metric::new("days_per_year", config.days_per_year.to_string()),
        Metric::new("parallel", config.parallel.to_string()),
        Metric::new("parallel_threshold", config.parallel_threshold.to_string()),
    ]
}
