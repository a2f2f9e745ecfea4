//! Portfolio-level contribution analysis over matched start and end holdings.

use std::collections::HashMap;

use perfcalc_core::DateRange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::position::{
    calculate_contribution, percentage_contribution, portfolio_return, top_and_worst_contributors,
    ContributionSummary,
};
use crate::error::AnalyticsResult;
use crate::twr::annualize;

/// A holding valued in base currency on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValue {
    /// Matching key between the start and end snapshots.
    pub ticker: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Units held, if known.
    #[serde(default)]
    pub units: Option<Decimal>,
    /// Price per unit in the instrument currency, if known.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Base-currency value.
    pub value: Decimal,
}

impl HoldingValue {
    /// Creates a holding with only a ticker and value.
    #[must_use]
    pub fn new(ticker: impl Into<String>, value: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            units: None,
            price: None,
            value,
        }
    }
}

/// One instrument's line in a [`ContributionAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentContribution {
    /// Instrument ticker.
    pub ticker: String,
    /// Display name from the start snapshot.
    pub name: String,
    /// Base-currency value at the start.
    pub start_value: Decimal,
    /// Base-currency value at the end.
    pub end_value: Decimal,
    /// Weight at the start of the period.
    pub weight: Decimal,
    /// Instrument return over the period.
    pub instrument_return: Decimal,
    /// Contribution to portfolio return.
    pub contribution: Decimal,
    /// Gain or loss in base currency.
    pub absolute_contribution: Decimal,
    /// Share of the portfolio's absolute gain.
    pub percentage_contribution: Decimal,
}

/// Contribution breakdown for a portfolio over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionAnalysis {
    /// Measurement period.
    pub period: DateRange,
    /// Inclusive day count of the period.
    pub days: i64,
    /// Sum of start holding values.
    pub start_value: Decimal,
    /// Sum of end holding values.
    pub end_value: Decimal,
    /// `(end − start) / start` over the whole portfolio.
    pub total_return: Decimal,
    /// `total_return` annualised over `days`.
    pub annualized_return: Decimal,
    /// Per-instrument lines, highest contribution first.
    pub instruments: Vec<InstrumentContribution>,
    /// Highest contributor.
    pub top_contributor: ContributionSummary,
    /// Lowest contributor.
    pub worst_contributor: ContributionSummary,
}

/// Builds a contribution analysis from start and end holding snapshots.
///
/// Holdings are matched by ticker; a start holding with no end counterpart is
/// left out of the breakdown but still counts towards the portfolio totals.
/// If a ticker repeats in the end snapshot, the first occurrence is used.
///
/// # Errors
///
/// Returns an error only if the annualisation fails, i.e. the portfolio lost
/// more than its whole value.
pub fn analyze_contributions(
    start_holdings: &[HoldingValue],
    end_holdings: &[HoldingValue],
    period: DateRange,
) -> AnalyticsResult<ContributionAnalysis> {
    let start_value: Decimal = start_holdings.iter().map(|h| h.value).sum();
    let end_value: Decimal = end_holdings.iter().map(|h| h.value).sum();
    let total_return = portfolio_return(start_value, end_value);
    let total_absolute = end_value - start_value;

    let mut end_by_ticker: HashMap<&str, &HoldingValue> =
        HashMap::with_capacity(end_holdings.len());
    for holding in end_holdings {
        end_by_ticker.entry(holding.ticker.as_str()).or_insert(holding);
    }

    let mut instruments: Vec<InstrumentContribution> = start_holdings
        .iter()
        .filter_map(|start| {
            let end = end_by_ticker.get(start.ticker.as_str())?;
            let c = calculate_contribution(start.value, end.value, start_value, end_value);
            Some(InstrumentContribution {
                ticker: start.ticker.clone(),
                name: start.name.clone(),
                start_value: start.value,
                end_value: end.value,
                weight: c.weight,
                instrument_return: c.instrument_return,
                contribution: c.contribution,
                absolute_contribution: c.absolute_contribution,
                percentage_contribution: percentage_contribution(
                    c.absolute_contribution,
                    total_absolute,
                ),
            })
        })
        .collect();

    let pairs: Vec<(&str, Decimal)> = instruments
        .iter()
        .map(|i| (i.ticker.as_str(), i.contribution))
        .collect();
    let (top_contributor, worst_contributor) = top_and_worst_contributors(&pairs);

    // stable sort keeps input order among equal contributions
    instruments.sort_by(|a, b| b.contribution.cmp(&a.contribution));

    let days = period.days();
    let annualized_return = annualize(total_return, days)?;

    tracing::debug!(
        period = %period,
        instruments = instruments.len(),
        unmatched = start_holdings.len() - instruments.len(),
        %total_return,
        "calculated contribution analysis"
    );

    Ok(ContributionAnalysis {
        period,
        days,
        start_value,
        end_value,
        total_return,
        annualized_return,
        instruments,
        top_contributor,
        worst_contributor,
    })
}
