//! TWR command implementation.
//!
//! Calculates time-weighted returns for one or more accounts.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use perfcalc_analytics::twr::{AccountTwr, TwrCalculator};
use perfcalc_analytics::AnalyticsConfig;

use crate::cli::OutputFormat;
use crate::input::{read_json, TwrDocument};
use crate::output::{format_percent, print_document, print_header, print_output, print_warning};

/// Arguments for the twr command.
#[derive(Args, Debug)]
pub struct TwrArgs {
    /// JSON file with one account or a list of accounts
    #[arg(short, long)]
    pub input: PathBuf,

    /// Show the sub-period breakdown
    #[arg(long)]
    pub sub_periods: bool,
}

/// One account's headline figures.
#[derive(Debug, Clone, Serialize, Tabled)]
struct TwrRow {
    #[tabled(rename = "Account")]
    account_id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "TWR")]
    total_return: String,
    #[tabled(rename = "Annualized")]
    annualized_return: String,
    #[tabled(rename = "Sub-periods")]
    sub_periods: usize,
    #[tabled(rename = "External Flows")]
    external_flows: usize,
    #[tabled(rename = "Dropped")]
    dropped: usize,
}

impl From<&AccountTwr> for TwrRow {
    fn from(account: &AccountTwr) -> Self {
        Self {
            account_id: account.account_id.clone(),
            period: account.result.period.to_string(),
            total_return: format_percent(account.result.total_return),
            annualized_return: format_percent(account.annualized_return),
            sub_periods: account.result.sub_periods.len(),
            external_flows: account.result.external_flow_count,
            dropped: account.result.dropped_sub_periods,
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct SubPeriodRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Start Value")]
    start_value: String,
    #[tabled(rename = "End Value")]
    end_value: String,
    #[tabled(rename = "Income/Fees")]
    performance_flows: String,
    #[tabled(rename = "Return")]
    period_return: String,
}

/// Execute the twr command.
pub fn execute(args: TwrArgs, config: &AnalyticsConfig, format: OutputFormat) -> Result<()> {
    let document: TwrDocument = read_json(&args.input)?;
    let requests = document.into_requests();

    let calculator = TwrCalculator::new(config.clone());
    let results = calculator.calculate_many(&requests);

    for account in results.iter().filter(|a| a.result.dropped_sub_periods > 0) {
        print_warning(&format!(
            "{}: {} sub-period(s) dropped for missing valuations",
            account.account_id, account.result.dropped_sub_periods
        ));
    }

    match format {
        OutputFormat::Json => print_document(&results)?,
        OutputFormat::Minimal => {
            for account in &results {
                println!("{}\t{}", account.account_id, account.result.total_return);
            }
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let rows: Vec<TwrRow> = results.iter().map(TwrRow::from).collect();
            if format == OutputFormat::Table {
                print_header("Time-Weighted Return");
            }
            print_output(&rows, format)?;

            if args.sub_periods && format == OutputFormat::Table {
                for account in &results {
                    print_sub_periods(account, format)?;
                }
            }
        }
    }

    Ok(())
}

fn print_sub_periods(account: &AccountTwr, format: OutputFormat) -> Result<()> {
    let rows: Vec<SubPeriodRow> = account
        .result
        .sub_periods
        .iter()
        .map(|sp| SubPeriodRow {
            start: sp.start_date.to_string(),
            end: sp.end_date.to_string(),
            start_value: format!("{:.2}", sp.start_value),
            end_value: format!("{:.2}", sp.end_value),
            performance_flows: format!("{:.2}", sp.total_performance_flow()),
            period_return: format_percent(sp.period_return),
        })
        .collect();

    print_header(&format!("Sub-periods: {}", account.account_id));
    print_output(&rows, format)
}
