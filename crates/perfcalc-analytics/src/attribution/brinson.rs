//! Instrument-level Brinson attribution.

use std::collections::{HashMap, HashSet};

use perfcalc_core::{Date, DateRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::source::{AttributionSource, PortfolioPosition};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Weights and returns for one instrument, the input to [`attribute_segments`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentInput {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Weight in the portfolio at the start of the period.
    pub portfolio_weight: Decimal,
    /// Weight in the benchmark.
    pub benchmark_weight: Decimal,
    /// Return earned by the portfolio's holding.
    pub instrument_return: Decimal,
    /// Return of the benchmark's holding.
    pub benchmark_return: Decimal,
}

/// Attribution effects for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionResult {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Portfolio weight `wp`.
    pub portfolio_weight: Decimal,
    /// Benchmark weight `wb`.
    pub benchmark_weight: Decimal,
    /// Portfolio return `rp`.
    pub instrument_return: Decimal,
    /// Benchmark return `rb`.
    pub benchmark_return: Decimal,
    /// `(wp − wb) × rb`.
    pub allocation_effect: Decimal,
    /// `wb × (rp − rb)`.
    pub selection_effect: Decimal,
    /// `(wp − wb) × (rp − rb)`.
    pub interaction_effect: Decimal,
    /// Sum of the three effects.
    pub total_effect: Decimal,
}

impl AttributionResult {
    /// Computes the effects for one segment.
    #[must_use]
    pub fn from_segment(segment: &SegmentInput) -> Self {
        let active_weight = segment
            .portfolio_weight
            .saturating_sub(segment.benchmark_weight);
        let return_gap = segment
            .instrument_return
            .saturating_sub(segment.benchmark_return);

        let allocation_effect = active_weight.saturating_mul(segment.benchmark_return);
        let selection_effect = segment.benchmark_weight.saturating_mul(return_gap);
        let interaction_effect = active_weight.saturating_mul(return_gap);

        Self {
            instrument_id: segment.instrument_id.clone(),
            portfolio_weight: segment.portfolio_weight,
            benchmark_weight: segment.benchmark_weight,
            instrument_return: segment.instrument_return,
            benchmark_return: segment.benchmark_return,
            allocation_effect,
            selection_effect,
            interaction_effect,
            total_effect: allocation_effect
                .saturating_add(selection_effect)
                .saturating_add(interaction_effect),
        }
    }
}

/// Portfolio-level attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionAnalysisResult {
    /// `Σ wp × rp`.
    pub portfolio_return: Decimal,
    /// `Σ wb × rb`.
    pub benchmark_return: Decimal,
    /// `portfolio_return − benchmark_return`.
    pub active_return: Decimal,
    /// Sum of allocation effects.
    pub total_allocation: Decimal,
    /// Sum of selection effects.
    pub total_selection: Decimal,
    /// Sum of interaction effects.
    pub total_interaction: Decimal,
    /// Sum of all effects; equals `active_return`.
    pub total_effect: Decimal,
    /// Per-instrument effects.
    pub by_instrument: Vec<AttributionResult>,
}

/// Decomposes active return over pre-computed segments.
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::attribution::{attribute_segments, SegmentInput};
/// use rust_decimal_macros::dec;
///
/// let segments = [SegmentInput {
///     instrument_id: "EQ".into(),
///     portfolio_weight: dec!(1),
///     benchmark_weight: dec!(1),
///     instrument_return: dec!(0.08),
///     benchmark_return: dec!(0.05),
/// }];
/// let result = attribute_segments(&segments);
/// assert_eq!(result.total_selection, dec!(0.03));
/// assert_eq!(result.total_effect, result.active_return);
/// ```
#[must_use]
pub fn attribute_segments(segments: &[SegmentInput]) -> AttributionAnalysisResult {
    let by_instrument: Vec<AttributionResult> =
        segments.iter().map(AttributionResult::from_segment).collect();

    let mut result = AttributionAnalysisResult::default();
    for r in &by_instrument {
        result.portfolio_return = result
            .portfolio_return
            .saturating_add(r.portfolio_weight.saturating_mul(r.instrument_return));
        result.benchmark_return = result
            .benchmark_return
            .saturating_add(r.benchmark_weight.saturating_mul(r.benchmark_return));
        result.total_allocation = result.total_allocation.saturating_add(r.allocation_effect);
        result.total_selection = result.total_selection.saturating_add(r.selection_effect);
        result.total_interaction = result
            .total_interaction
            .saturating_add(r.interaction_effect);
    }
    result.active_return = result.portfolio_return.saturating_sub(result.benchmark_return);
    result.total_effect = result
        .total_allocation
        .saturating_add(result.total_selection)
        .saturating_add(result.total_interaction);
    result.by_instrument = by_instrument;
    result
}

/// Attributes a portfolio's active return against a benchmark over `[start, end]`.
///
/// Positions in the same instrument are merged, summing units, so each
/// instrument is attributed once. Portfolio weights come from position value
/// (units × start price) over total portfolio value at `start`. Benchmark weights are the stored
/// constituent weights. Instrument returns come from prices at `start` and
/// `end`; a benchmark return with no benchmark price falls back to the
/// instrument return. Benchmark constituents the portfolio does not hold are
/// attributed with zero portfolio weight and the benchmark return as their
/// instrument return. A missing price yields a zero return and a warning.
///
/// # Errors
///
/// - `AnalyticsError::NotFound` if the portfolio or the benchmark is unknown
/// - `AnalyticsError::Core` if `end` is before `start`
pub fn attribute<S: AttributionSource + ?Sized>(
    source: &S,
    portfolio_id: &str,
    benchmark_id: &str,
    start: Date,
    end: Date,
) -> AnalyticsResult<AttributionAnalysisResult> {
    let period = DateRange::new(start, end)?;

    let portfolio = source
        .portfolio(portfolio_id)
        .ok_or_else(|| AnalyticsError::not_found("Portfolio", portfolio_id))?;
    let benchmark = source
        .benchmark(benchmark_id)
        .ok_or_else(|| AnalyticsError::not_found("Benchmark", benchmark_id))?;

    let mut benchmark_weights: HashMap<&str, Decimal> = HashMap::new();
    for c in &benchmark.constituents {
        benchmark_weights.entry(c.instrument_id.as_str()).or_insert(c.weight);
    }

    let holdings = merge_positions(&portfolio.positions);
    let start_values: Vec<Decimal> = holdings
        .iter()
        .map(|&(id, units)| start_value(source, id, units, start))
        .collect();
    let total_value = start_values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .unwrap_or_else(|| {
            tracing::warn!(
                portfolio = portfolio_id,
                "portfolio value overflows; weights set to zero"
            );
            Decimal::ZERO
        });

    let mut segments = Vec::with_capacity(holdings.len() + benchmark.constituents.len());

    for (&(id, _), value) in holdings.iter().zip(&start_values) {
        let portfolio_weight = if total_value > Decimal::ZERO {
            value.checked_div(total_value).unwrap_or_default()
        } else {
            Decimal::ZERO
        };
        let instrument_return =
            price_return(id, source.price(id, start), source.price(id, end), period);
        let benchmark_return = match (
            source.benchmark_price(benchmark_id, id, start),
            source.benchmark_price(benchmark_id, id, end),
        ) {
            (Some(s), Some(e)) => price_return(id, Some(s), Some(e), period),
            _ => instrument_return,
        };

        segments.push(SegmentInput {
            instrument_id: id.to_string(),
            portfolio_weight,
            benchmark_weight: benchmark_weights.get(id).copied().unwrap_or(Decimal::ZERO),
            instrument_return,
            benchmark_return,
        });
    }

    let mut seen: HashSet<&str> = holdings.iter().map(|&(id, _)| id).collect();

    for constituent in &benchmark.constituents {
        let id = constituent.instrument_id.as_str();
        if !seen.insert(id) {
            continue;
        }
        let benchmark_return = price_return(
            id,
            source.benchmark_price(benchmark_id, id, start),
            source.benchmark_price(benchmark_id, id, end),
            period,
        );
        segments.push(SegmentInput {
            instrument_id: id.to_string(),
            portfolio_weight: Decimal::ZERO,
            benchmark_weight: constituent.weight,
            instrument_return: benchmark_return,
            benchmark_return,
        });
    }

    let result = attribute_segments(&segments);

    tracing::debug!(
        portfolio = portfolio_id,
        benchmark = benchmark_id,
        period = %period,
        instruments = result.by_instrument.len(),
        active_return = %result.active_return,
        "calculated attribution"
    );

    Ok(result)
}

/// Units per instrument in order of first appearance.
fn merge_positions(positions: &[PortfolioPosition]) -> Vec<(&str, Decimal)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut holdings: Vec<(&str, Decimal)> = Vec::with_capacity(positions.len());
    for p in positions {
        let id = p.instrument_id.as_str();
        match index.get(id) {
            Some(&i) => holdings[i].1 = holdings[i].1.saturating_add(p.units),
            None => {
                index.insert(id, holdings.len());
                holdings.push((id, p.units));
            }
        }
    }
    holdings
}

fn start_value<S: AttributionSource + ?Sized>(
    source: &S,
    id: &str,
    units: Decimal,
    start: Date,
) -> Decimal {
    let Some(price) = source.price(id, start) else {
        tracing::warn!(
            instrument = id,
            date = %start,
            "missing start price; position valued at zero"
        );
        return Decimal::ZERO;
    };
    units.checked_mul(price).unwrap_or_else(|| {
        tracing::warn!(instrument = id, %units, %price, "position value overflows; valued at zero");
        Decimal::ZERO
    })
}

fn price_return(
    id: &str,
    start: Option<Decimal>,
    end: Option<Decimal>,
    period: DateRange,
) -> Decimal {
    match (start, end) {
        (Some(s), Some(e)) if s > Decimal::ZERO => {
            crate::math::simple_return(s, e, Decimal::ZERO).unwrap_or_else(|| {
                tracing::warn!(
                    instrument = id,
                    period = %period,
                    "price return overflows; set to zero"
                );
                Decimal::ZERO
            })
        }
        _ => {
            tracing::warn!(
                instrument = id,
                period = %period,
                "missing or non-positive price; return set to zero"
            );
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::source::{
        BenchmarkConstituent, BenchmarkRecord, InMemorySource, PortfolioPosition, PortfolioRecord,
    };
    use rust_decimal_macros::dec;

    fn start() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    fn end() -> Date {
        Date::from_ymd(2025, 3, 31).unwrap()
    }

    fn segment(id: &str, wp: Decimal, wb: Decimal, rp: Decimal, rb: Decimal) -> SegmentInput {
        SegmentInput {
            instrument_id: id.to_string(),
            portfolio_weight: wp,
            benchmark_weight: wb,
            instrument_return: rp,
            benchmark_return: rb,
        }
    }

    #[test]
    fn test_segment_effects() {
        let input = segment("A", dec!(0.6), dec!(0.5), dec!(0.10), dec!(0.08));
        let r = AttributionResult::from_segment(&input);
        assert_eq!(r.allocation_effect, dec!(0.008));
        assert_eq!(r.selection_effect, dec!(0.01));
        assert_eq!(r.interaction_effect, dec!(0.002));
        assert_eq!(r.total_effect, dec!(0.02));
    }

    #[test]
    fn test_two_instrument_identity() {
        let segments = [
            segment("A", dec!(0.6), dec!(0.5), dec!(0.10), dec!(0.08)),
            segment("B", dec!(0.4), dec!(0.5), dec!(-0.05), dec!(-0.02)),
        ];
        let result = attribute_segments(&segments);

        assert_eq!(result.portfolio_return, dec!(0.04));
        assert_eq!(result.benchmark_return, dec!(0.03));
        assert_eq!(result.active_return, dec!(0.01));
        assert_eq!(result.total_effect, result.active_return);
    }

    fn position(id: &str, units: Decimal) -> PortfolioPosition {
        PortfolioPosition {
            instrument_id: id.into(),
            units,
        }
    }

    fn constituent(id: &str, weight: Decimal) -> BenchmarkConstituent {
        BenchmarkConstituent {
            instrument_id: id.into(),
            weight,
        }
    }

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with_portfolio(PortfolioRecord {
                id: "P1".into(),
                positions: vec![position("EQ", dec!(60)), position("FI", dec!(40))],
            })
            .with_benchmark(BenchmarkRecord {
                id: "BM".into(),
                constituents: vec![
                    constituent("EQ", dec!(0.5)),
                    constituent("FI", dec!(0.3)),
                    constituent("RE", dec!(0.2)),
                ],
            })
            .with_price("EQ", start(), dec!(10))
            .with_price("EQ", end(), dec!(11))
            .with_price("FI", start(), dec!(10))
            .with_price("FI", end(), dec!(9.8))
            .with_price("RE", start(), dec!(50))
            .with_price("RE", end(), dec!(52))
    }

    #[test]
    fn test_attribute_from_source() {
        let result = attribute(&source(), "P1", "BM", start(), end()).unwrap();
        assert_eq!(result.by_instrument.len(), 3);

        let eq = &result.by_instrument[0];
        assert_eq!(eq.portfolio_weight, dec!(0.6));
        assert_eq!(eq.benchmark_weight, dec!(0.5));
        assert_eq!(eq.instrument_return, dec!(0.1));

        let re = &result.by_instrument[2];
        assert_eq!(re.instrument_id, "RE");
        assert_eq!(re.portfolio_weight, Decimal::ZERO);
        assert_eq!(re.benchmark_return, dec!(0.04));
        assert_eq!(re.selection_effect, Decimal::ZERO);

        // 0.6 * 0.1 + 0.4 * -0.02
        assert_eq!(result.portfolio_return, dec!(0.052));
        // 0.5 * 0.1 + 0.3 * -0.02 + 0.2 * 0.04
        assert_eq!(result.benchmark_return, dec!(0.052));
        assert_eq!(result.total_effect, result.active_return);
    }

    #[test]
    fn test_attribute_not_found() {
        let err = attribute(&source(), "NOPE", "BM", start(), end()).unwrap_err();
        assert_eq!(err, AnalyticsError::not_found("Portfolio", "NOPE"));

        let err = attribute(&source(), "P1", "NOPE", start(), end()).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::NotFound { ref entity, .. } if entity == "Benchmark"
        ));
    }

    #[test]
    fn test_attribute_missing_price_is_zero_return() {
        let source = source()
            .with_price("XX", start(), dec!(1))
            .with_portfolio(PortfolioRecord {
                id: "P2".into(),
                positions: vec![position("XX", dec!(5))],
            });
        let result = attribute(&source, "P2", "BM", start(), end()).unwrap();
        assert_eq!(result.by_instrument[0].instrument_return, Decimal::ZERO);
        assert_eq!(result.by_instrument[0].portfolio_weight, Decimal::ONE);
        assert_eq!(result.total_effect, result.active_return);
    }

    #[test]
    fn test_attribute_merges_lots_of_one_instrument() {
        let source = InMemorySource::new()
            .with_portfolio(PortfolioRecord {
                id: "LOTS".into(),
                positions: vec![position("EQ", dec!(50)), position("EQ", dec!(50))],
            })
            .with_benchmark(BenchmarkRecord {
                id: "EQ-ONLY".into(),
                constituents: vec![constituent("EQ", Decimal::ONE)],
            })
            .with_price("EQ", start(), dec!(10))
            .with_price("EQ", end(), dec!(11));

        let result = attribute(&source, "LOTS", "EQ-ONLY", start(), end()).unwrap();
        assert_eq!(result.by_instrument.len(), 1);
        assert_eq!(result.by_instrument[0].portfolio_weight, Decimal::ONE);
        assert_eq!(result.portfolio_return, dec!(0.1));
        assert_eq!(result.benchmark_return, dec!(0.1));
        assert_eq!(result.active_return, Decimal::ZERO);
        assert_eq!(result.total_effect, Decimal::ZERO);
    }

    #[test]
    fn test_attribute_dust_start_price_does_not_panic() {
        let source = source()
            .with_price("DUST", start(), Decimal::new(1, 28))
            .with_price("DUST", end(), dec!(100))
            .with_portfolio(PortfolioRecord {
                id: "P3".into(),
                positions: vec![position("DUST", dec!(1)), position("EQ", dec!(1))],
            });
        let result = attribute(&source, "P3", "BM", start(), end()).unwrap();
        assert_eq!(result.by_instrument[0].instrument_return, Decimal::ZERO);
        assert_eq!(result.by_instrument[1].instrument_return, dec!(0.1));
    }

    #[test]
    fn test_attribute_rejects_inverted_dates() {
        let err = attribute(&source(), "P1", "BM", end(), start()).unwrap_err();
        assert!(matches!(err, AnalyticsError::Core(_)));
    }
}
