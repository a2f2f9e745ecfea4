//! Classify command implementation.
//!
//! Shows how cash-flow kinds are categorised for TWR.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use perfcalc_core::{CashFlowClassifier, CashFlowKind};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_header, print_output};

/// Arguments for the classify command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Cash-flow kinds to classify (e.g. Dividend, client-contribution)
    #[arg(required_unless_present = "all")]
    pub kinds: Vec<String>,

    /// List every known kind
    #[arg(long, conflicts_with = "kinds")]
    pub all: bool,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct ClassificationRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Splits Sub-period")]
    splits_sub_period: bool,
}

impl From<CashFlowKind> for ClassificationRow {
    fn from(kind: CashFlowKind) -> Self {
        Self {
            kind: kind.name().to_string(),
            category: CashFlowClassifier::classify(kind).to_string(),
            splits_sub_period: CashFlowClassifier::is_external(kind),
        }
    }
}

/// Execute the classify command.
pub fn execute(args: ClassifyArgs, format: OutputFormat) -> Result<()> {
    let kinds = if args.all {
        CashFlowKind::ALL.to_vec()
    } else {
        parse_kinds(&args.kinds)?
    };
    let rows: Vec<ClassificationRow> = kinds.into_iter().map(ClassificationRow::from).collect();

    match format {
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{}\t{}", row.kind, row.category);
            }
        }
        OutputFormat::Table => {
            print_header("Cash Flow Classification");
            print_output(&rows, format)?;
        }
        _ => print_output(&rows, format)?,
    }
    Ok(())
}

fn parse_kinds(names: &[String]) -> Result<Vec<CashFlowKind>, CliError> {
    names
        .iter()
        .map(|name| {
            name.parse::<CashFlowKind>()
                .map_err(|_| CliError::UnknownKind(name.clone()))
        })
        .collect()
}
