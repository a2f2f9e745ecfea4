//! Attribution command implementation.
//!
//! Decomposes active return into allocation, selection and interaction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use perfcalc_analytics::attribution::{
    attribute, sector_attribution, InMemorySource, SectorHolding, SourceDocument,
};

use crate::cli::OutputFormat;
use crate::commands::parse_date;
use crate::error::CliError;
use crate::input::read_json;
use crate::output::{format_bps, format_percent, print_document, print_header, print_output, Metric};

/// Arguments for the attribution command.
#[derive(Args, Debug)]
pub struct AttributionArgs {
    /// JSON file with portfolios, benchmarks and prices (or sector holdings with --sector)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Portfolio identifier
    #[arg(short, long, required_unless_present = "sector")]
    pub portfolio: Option<String>,

    /// Benchmark identifier
    #[arg(short, long, required_unless_present = "sector")]
    pub benchmark: Option<String>,

    /// Period start date (YYYY-MM-DD)
    #[arg(long, required_unless_present = "sector")]
    pub start: Option<String>,

    /// Period end date (YYYY-MM-DD)
    #[arg(long, required_unless_present = "sector")]
    pub end: Option<String>,

    /// Sector-level attribution from pre-computed weights and returns
    #[arg(long)]
    pub sector: bool,
}

/// Input for `--sector`.
#[derive(Debug, Clone, Deserialize)]
struct SectorDocument {
    portfolio: Vec<SectorHolding>,
    benchmark: Vec<SectorHolding>,
    #[serde(default)]
    portfolio_return: Option<Decimal>,
    #[serde(default)]
    benchmark_return: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct EffectRow {
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Port Wt")]
    portfolio_weight: String,
    #[tabled(rename = "Bench Wt")]
    benchmark_weight: String,
    #[tabled(rename = "Port Ret")]
    portfolio_return: String,
    #[tabled(rename = "Bench Ret")]
    benchmark_return: String,
    #[tabled(rename = "Allocation")]
    allocation: String,
    #[tabled(rename = "Selection")]
    selection: String,
    #[tabled(rename = "Interaction")]
    interaction: String,
    #[tabled(rename = "Total")]
    total: String,
}

struct Totals {
    portfolio_return: Decimal,
    benchmark_return: Decimal,
    active_return: Decimal,
    allocation: Decimal,
    selection: Decimal,
    interaction: Decimal,
}

/// Execute the attribution command.
pub fn execute(args: AttributionArgs, format: OutputFormat) -> Result<()> {
    if args.sector {
        return execute_sector(&args, format);
    }

    let portfolio = required(args.portfolio.as_deref(), "--portfolio")?;
    let benchmark = required(args.benchmark.as_deref(), "--benchmark")?;
    let start = parse_date(required(args.start.as_deref(), "--start")?)?;
    let end = parse_date(required(args.end.as_deref(), "--end")?)?;

    let document: SourceDocument = read_json(&args.input)?;
    let source = InMemorySource::from(document);
    let result = attribute(&source, portfolio, benchmark, start, end)?;

    if format == OutputFormat::Json {
        return print_document(&result);
    }

    let rows: Vec<EffectRow> = result
        .by_instrument
        .iter()
        .map(|r| EffectRow {
            segment: r.instrument_id.clone(),
            portfolio_weight: format_percent(r.portfolio_weight),
            benchmark_weight: format_percent(r.benchmark_weight),
            portfolio_return: format_percent(r.instrument_return),
            benchmark_return: format_percent(r.benchmark_return),
            allocation: format_bps(r.allocation_effect),
            selection: format_bps(r.selection_effect),
            interaction: format_bps(r.interaction_effect),
            total: format_bps(r.total_effect),
        })
        .collect();

    let totals = Totals {
        portfolio_return: result.portfolio_return,
        benchmark_return: result.benchmark_return,
        active_return: result.active_return,
        allocation: result.total_allocation,
        selection: result.total_selection,
        interaction: result.total_interaction,
    };
    render(&format!("Attribution: {portfolio} vs {benchmark}"), &rows, &totals, format)
}

fn execute_sector(args: &AttributionArgs, format: OutputFormat) -> Result<()> {
    let document: SectorDocument = read_json(&args.input)?;
    let weighted = |holdings: &[SectorHolding]| -> Decimal {
        holdings.iter().fold(Decimal::ZERO, |acc, h| {
            acc.saturating_add(h.weight.saturating_mul(h.holding_return))
        })
    };
    let portfolio_return = document
        .portfolio_return
        .unwrap_or_else(|| weighted(&document.portfolio));
    let benchmark_return = document
        .benchmark_return
        .unwrap_or_else(|| weighted(&document.benchmark));

    let result = sector_attribution(
        &document.portfolio,
        &document.benchmark,
        portfolio_return,
        benchmark_return,
    );

    if format == OutputFormat::Json {
        return print_document(&result);
    }

    let rows: Vec<EffectRow> = result
        .sectors
        .iter()
        .map(|s| EffectRow {
            segment: s.sector.clone(),
            portfolio_weight: format_percent(s.portfolio_weight),
            benchmark_weight: format_percent(s.benchmark_weight),
            portfolio_return: format_percent(s.portfolio_return),
            benchmark_return: format_percent(s.benchmark_return),
            allocation: format_bps(s.allocation_effect),
            selection: format_bps(s.selection_effect),
            interaction: format_bps(s.interaction_effect),
            total: format_bps(s.total_effect),
        })
        .collect();

    let totals = Totals {
        portfolio_return: result.portfolio_return,
        benchmark_return: result.benchmark_return,
        active_return: result.active_return,
        allocation: result.total_allocation,
        selection: result.total_selection,
        interaction: result.total_interaction,
    };
    render("Sector Attribution", &rows, &totals, format)
}

fn render(title: &str, rows: &[EffectRow], totals: &Totals, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Minimal => println!("{}", totals.active_return),
        OutputFormat::Csv => print_output(rows, format)?,
        _ => {
            print_header(title);
            let summary = vec![
                Metric::percent("Portfolio Return", totals.portfolio_return),
                Metric::percent("Benchmark Return", totals.benchmark_return),
                Metric::bps("Active Return", totals.active_return),
                Metric::bps("Allocation", totals.allocation),
                Metric::bps("Selection", totals.selection),
                Metric::bps("Interaction", totals.interaction),
            ];
            print_output(&summary, OutputFormat::Table)?;

            print_header("Effects");
            print_output(rows, OutputFormat::Table)?;
        }
    }
    Ok(())
}

fn required<'a>(value: Option<&'a str>, flag: &str) -> Result<&'a str, CliError> {
    value.ok_or_else(|| CliError::MissingArgument(flag.to_string()))
}
