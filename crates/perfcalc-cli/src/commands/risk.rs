//! Risk command implementation.
//!
//! Calculates risk metrics for a valuation series.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use perfcalc_analytics::risk::{RiskCalculator, RiskReport};
use perfcalc_analytics::AnalyticsConfig;

use crate::cli::OutputFormat;
use crate::input::{read_json, RiskDocument};
use crate::output::{format_percent, print_document, print_header, print_output, Metric};

/// Arguments for the risk command.
#[derive(Args, Debug)]
pub struct RiskArgs {
    /// JSON file with a `valuations` array
    #[arg(short, long)]
    pub input: PathBuf,

    /// Show drawdown periods
    #[arg(long)]
    pub drawdowns: bool,

    /// Show rolling volatility
    #[arg(long)]
    pub rolling: bool,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct DrawdownRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Days")]
    days: i64,
    #[tabled(rename = "Max Drawdown")]
    max_drawdown: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct RollingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Volatility")]
    volatility: String,
}

/// Execute the risk command.
pub fn execute(args: RiskArgs, config: &AnalyticsConfig, format: OutputFormat) -> Result<()> {
    let mut document: RiskDocument = read_json(&args.input)?;
    document.valuations.sort_by_key(|v| v.date);

    let values: Vec<_> = document.valuations.iter().map(|v| v.value).collect();
    let dates: Vec<_> = document.valuations.iter().map(|v| v.date).collect();

    let calculator = RiskCalculator::new(config.clone())?;
    let report = calculator.calculate(&values, &dates)?;

    match format {
        OutputFormat::Json => print_document(&report)?,
        OutputFormat::Minimal => {
            println!(
                "Volatility: {}, Sharpe: {:.4}, Max Drawdown: {}",
                format_percent(report.metrics.annualized_volatility),
                report.metrics.sharpe_ratio,
                format_percent(report.metrics.maximum_drawdown)
            );
        }
        OutputFormat::Table | OutputFormat::Csv => {
            if format == OutputFormat::Table {
                print_header("Risk Metrics");
            }
            print_output(&summary(&report), format)?;

            if format == OutputFormat::Table {
                print_assessment(&report);
                if args.drawdowns {
                    print_drawdowns(&report, format)?;
                }
                if args.rolling {
                    print_rolling(&report, config.rolling_window, format)?;
                }
            }
        }
    }

    Ok(())
}

fn summary(report: &RiskReport) -> Vec<Metric> {
    let m = &report.metrics;
    let var_label = format!(
        "VaR ({}%)",
        (report.var_confidence * Decimal::ONE_HUNDRED).normalize()
    );
    vec![
        Metric::percent("Annualized Return", m.annualized_return),
        Metric::percent("Annualized Volatility", m.annualized_volatility),
        Metric::decimal("Sharpe Ratio", m.sharpe_ratio, 4),
        Metric::percent("Maximum Drawdown", m.maximum_drawdown),
        Metric::percent("Current Drawdown", m.current_drawdown),
        Metric::percent("VaR (95%)", m.value_at_risk_95),
        Metric::percent(var_label, report.value_at_risk),
        Metric::percent("Risk-Free Rate", report.risk_free_rate),
        Metric::new("Drawdown Periods", m.drawdown_periods.len().to_string()),
        Metric::new(
            "Recovered",
            report.recovered_drawdowns().count().to_string(),
        ),
        Metric::new(
            "Risk Profile",
            report
                .profile
                .map_or_else(|| "n/a".to_string(), |p| p.to_string()),
        ),
    ]
}

fn print_assessment(report: &RiskReport) {
    let a = &report.assessment;
    print_header("Assessment");
    println!("{} (score {})", a.overall_assessment, a.risk_score);
    for factor in &a.positive_factors {
        println!("  + {factor}");
    }
    for warning in &a.warnings {
        println!("  - {warning}");
    }
}

fn print_drawdowns(report: &RiskReport, format: OutputFormat) -> Result<()> {
    let rows: Vec<DrawdownRow> = report
        .metrics
        .drawdown_periods
        .iter()
        .map(|p| DrawdownRow {
            start: p.start_date.to_string(),
            end: p.end_date.to_string(),
            days: p.duration_days,
            max_drawdown: format_percent(p.max_drawdown),
        })
        .collect();

    print_header("Drawdown Periods");
    print_output(&rows, format)
}

fn print_rolling(report: &RiskReport, window: usize, format: OutputFormat) -> Result<()> {
    let rows: Vec<RollingRow> = report
        .rolling_volatility
        .iter()
        .map(|p| RollingRow {
            date: p.date.to_string(),
            volatility: format_percent(p.annualized_volatility),
        })
        .collect();

    print_header(&format!("Rolling Volatility ({window} returns)"));
    print_output(&rows, format)
}
