//! Contribution command implementation.
//!
//! Breaks portfolio return down by holding.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use perfcalc_analytics::contribution::{analyze_contributions, InstrumentContribution};

use crate::cli::OutputFormat;
use crate::input::{read_json, ContributionDocument};
use crate::output::{format_bps, format_percent, print_document, print_header, print_output, Metric};

/// Arguments for the contribution command.
#[derive(Args, Debug)]
pub struct ContributionArgs {
    /// JSON file with `period`, `start_holdings` and `end_holdings`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Show only the N largest contributors
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct ContributionRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Return")]
    instrument_return: String,
    #[tabled(rename = "Contribution")]
    contribution: String,
    #[tabled(rename = "Gain/Loss")]
    absolute: String,
    #[tabled(rename = "Share of Gain")]
    share: String,
}

impl From<&InstrumentContribution> for ContributionRow {
    fn from(i: &InstrumentContribution) -> Self {
        Self {
            ticker: i.ticker.clone(),
            name: i.name.clone(),
            weight: format_percent(i.weight),
            instrument_return: format_percent(i.instrument_return),
            contribution: format_bps(i.contribution),
            absolute: format!("{:.2}", i.absolute_contribution),
            share: format_percent(i.percentage_contribution),
        }
    }
}

/// Execute the contribution command.
pub fn execute(args: ContributionArgs, format: OutputFormat) -> Result<()> {
    let document: ContributionDocument = read_json(&args.input)?;
    let analysis = analyze_contributions(
        &document.start_holdings,
        &document.end_holdings,
        document.period,
    )?;

    let shown = args.top.unwrap_or(analysis.instruments.len());
    let rows: Vec<ContributionRow> = analysis
        .instruments
        .iter()
        .take(shown)
        .map(ContributionRow::from)
        .collect();

    match format {
        OutputFormat::Json => print_document(&analysis)?,
        OutputFormat::Csv => print_output(&rows, format)?,
        OutputFormat::Minimal => println!("{}", analysis.total_return),
        OutputFormat::Table => {
            print_header(&format!("Contribution Analysis: {}", analysis.period));
            let summary = vec![
                Metric::decimal("Start Value", analysis.start_value, 2),
                Metric::decimal("End Value", analysis.end_value, 2),
                Metric::percent("Total Return", analysis.total_return),
                Metric::percent("Annualized Return", analysis.annualized_return),
                Metric::new(
                    "Top Contributor",
                    format!(
                        "{} ({})",
                        analysis.top_contributor.ticker,
                        format_bps(analysis.top_contributor.contribution)
                    ),
                ),
                Metric::new(
                    "Worst Contributor",
                    format!(
                        "{} ({})",
                        analysis.worst_contributor.ticker,
                        format_bps(analysis.worst_contributor.contribution)
                    ),
                ),
            ];
            print_output(&summary, format)?;

            print_header("By Holding");
            print_output(&rows, format)?;
        }
    }

    Ok(())
}
