//! Rendering of command results.
//!
//! Every command builds a list of `Tabled + Serialize` rows and hands it to
//! [`print_output`]; whole result documents go through [`print_document`].

use std::io::Write;

use colored::Colorize;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

const BASIS_POINTS: Decimal = dec!(10_000);

/// Renders rows in the requested format.
///
/// `Minimal` writes the first row's fields tab-separated with no header.
pub fn print_output<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No results.");
            } else {
                let table = Table::new(rows)
                    .with(Style::rounded())
                    .with(Modify::new(Columns::first()).with(Alignment::left()))
                    .to_string();
                println!("{table}");
            }
            Ok(())
        }
        OutputFormat::Json => print_document(&rows),
        OutputFormat::Csv => write_delimited(rows, b',', true),
        OutputFormat::Minimal => write_delimited(&rows[..rows.len().min(1)], b'\t', false),
    }
}

/// Prints a whole result document as pretty JSON.
pub fn print_document<T: Serialize + ?Sized>(document: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

fn write_delimited<T: Serialize>(rows: &[T], delimiter: u8, headers: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(headers)
        .from_writer(stdout.lock());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// `0.199` → `19.9000%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.4}%", value.saturating_mul(Decimal::ONE_HUNDRED))
}

/// `0.0125` → `125.00 bps`.
pub fn format_bps(value: Decimal) -> String {
    format!("{:.2} bps", value.saturating_mul(BASIS_POINTS))
}

/// Writes a yellow warning line to stderr.
pub fn print_warning(message: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{} {message}", "⚠".yellow());
}

/// Prints an underlined section title.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// One labelled figure in a summary table.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct Metric {
    #[tabled(rename = "Metric")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A plain decimal rounded to `places`.
    pub fn decimal(label: impl Into<String>, value: Decimal, places: u32) -> Self {
        Self::new(label, value.round_dp(places).to_string())
    }

    pub fn percent(label: impl Into<String>, value: Decimal) -> Self {
        Self::new(label, format_percent(value))
    }

    pub fn bps(label: impl Into<String>, value: Decimal) -> Self {
        Self::new(label, format_bps(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.199)), "19.9000%");
        assert_eq!(format_percent(dec!(-0.02)), "-2.0000%");
    }

    #[test]
    fn test_format_bps() {
        assert_eq!(format_bps(dec!(0.0125)), "125.00 bps");
        assert_eq!(format_bps(dec!(-0.0008)), "-8.00 bps");
    }

    #[test]
    fn test_format_saturates_at_decimal_max() {
        let max = format!("{:.4}%", Decimal::MAX);
        assert_eq!(format_percent(Decimal::MAX), max);
        assert!(format_bps(Decimal::MIN).starts_with('-'));
    }

    #[test]
    fn test_metric_decimal_rounds() {
        assert_eq!(Metric::decimal("Sharpe Ratio", dec!(1.23456), 3).value, "1.235");
        assert_eq!(Metric::decimal("End Value", dec!(1760), 2).value, "1760");
    }
}
