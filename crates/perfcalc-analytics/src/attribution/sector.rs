//! Sector-level Brinson-Fachler attribution.
//!
//! Holdings are grouped by sector on each side. Allocation is measured
//! against the total benchmark return, so overweighting a sector that beat
//! the benchmark is rewarded even if the sector itself fell.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A weighted holding tagged with its sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorHolding {
    /// Security identifier.
    pub security: String,
    /// Sector the security belongs to.
    pub sector: String,
    /// Weight in its portfolio or benchmark.
    pub weight: Decimal,
    /// Return over the period.
    #[serde(rename = "return")]
    pub holding_return: Decimal,
}

impl SectorHolding {
    /// Creates a sector holding.
    #[must_use]
    pub fn new(
        security: impl Into<String>,
        sector: impl Into<String>,
        weight: Decimal,
        holding_return: Decimal,
    ) -> Self {
        Self {
            security: security.into(),
            sector: sector.into(),
            weight,
            holding_return,
        }
    }
}

/// Effects for one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorAttribution {
    /// Sector name.
    pub sector: String,
    /// Portfolio weight in the sector.
    pub portfolio_weight: Decimal,
    /// Benchmark weight in the sector.
    pub benchmark_weight: Decimal,
    /// Weight-averaged portfolio return in the sector.
    pub portfolio_return: Decimal,
    /// Weight-averaged benchmark return in the sector.
    pub benchmark_return: Decimal,
    /// `(wp − wb) × (rb_s − rb_total)`.
    pub allocation_effect: Decimal,
    /// `wb × (rp_s − rb_s)`.
    pub selection_effect: Decimal,
    /// `(wp − wb) × (rp_s − rb_s)`.
    pub interaction_effect: Decimal,
    /// Sum of the three effects.
    pub total_effect: Decimal,
}

/// Sector attribution for a portfolio against a benchmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorAttributionResult {
    /// Total portfolio return supplied by the caller.
    pub portfolio_return: Decimal,
    /// Total benchmark return supplied by the caller.
    pub benchmark_return: Decimal,
    /// `portfolio_return − benchmark_return`.
    pub active_return: Decimal,
    /// Sum of allocation effects.
    pub total_allocation: Decimal,
    /// Sum of selection effects.
    pub total_selection: Decimal,
    /// Sum of interaction effects.
    pub total_interaction: Decimal,
    /// Sum of all effects.
    pub total_effect: Decimal,
    /// Per-sector effects in first-appearance order.
    pub sectors: Vec<SectorAttribution>,
}

#[derive(Default)]
struct SideTotals {
    weight: Decimal,
    weighted_return: Decimal,
}

impl SideTotals {
    fn add(&mut self, holding: &SectorHolding) {
        self.weight += holding.weight;
        self.weighted_return += holding.weight * holding.holding_return;
    }

    fn average_return(&self) -> Decimal {
        self.weighted_return
            .checked_div(self.weight)
            .unwrap_or_default()
    }
}

/// Brinson-Fachler attribution by sector.
///
/// Sectors appear in the order they are first seen, portfolio holdings
/// first. A sector missing from one side has zero weight and zero return on
/// that side.
///
/// When both sides' weights sum to one and the supplied totals are the
/// weighted sums of the holdings, `total_effect` equals `active_return`.
#[must_use]
pub fn sector_attribution(
    portfolio: &[SectorHolding],
    benchmark: &[SectorHolding],
    portfolio_return: Decimal,
    benchmark_return: Decimal,
) -> SectorAttributionResult {
    let mut order: Vec<&str> = Vec::new();
    let portfolio_slots: Vec<usize> =
        portfolio.iter().map(|h| slot(&mut order, &h.sector)).collect();
    let benchmark_slots: Vec<usize> =
        benchmark.iter().map(|h| slot(&mut order, &h.sector)).collect();

    let mut sides: Vec<(SideTotals, SideTotals)> = Vec::new();
    sides.resize_with(order.len(), Default::default);

    for (holding, i) in portfolio.iter().zip(portfolio_slots) {
        sides[i].0.add(holding);
    }
    for (holding, i) in benchmark.iter().zip(benchmark_slots) {
        sides[i].1.add(holding);
    }

    let mut result = SectorAttributionResult {
        portfolio_return,
        benchmark_return,
        active_return: portfolio_return - benchmark_return,
        ..SectorAttributionResult::default()
    };

    for (sector, (p, b)) in order.into_iter().zip(sides) {
        let rp = p.average_return();
        let rb = b.average_return();
        let active_weight = p.weight - b.weight;

        let allocation_effect = active_weight * (rb - benchmark_return);
        let selection_effect = b.weight * (rp - rb);
        let interaction_effect = active_weight * (rp - rb);
        let total_effect = allocation_effect + selection_effect + interaction_effect;

        result.total_allocation += allocation_effect;
        result.total_selection += selection_effect;
        result.total_interaction += interaction_effect;
        result.sectors.push(SectorAttribution {
            sector: sector.to_string(),
            portfolio_weight: p.weight,
            benchmark_weight: b.weight,
            portfolio_return: rp,
            benchmark_return: rb,
            allocation_effect,
            selection_effect,
            interaction_effect,
            total_effect,
        });
    }
    result.total_effect =
        result.total_allocation + result.total_selection + result.total_interaction;

    tracing::debug!(
        sectors = result.sectors.len(),
        active_return = %result.active_return,
        total_effect = %result.total_effect,
        "calculated sector attribution"
    );

    result
}

fn slot<'a>(order: &mut Vec<&'a str>, sector: &'a str) -> usize {
    if let Some(i) = order.iter().position(|s| *s == sector) {
        return i;
    }
    order.push(sector);
    order.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn weighted_sum(holdings: &[SectorHolding]) -> Decimal {
        holdings.iter().map(|h| h.weight * h.holding_return).sum()
    }

    #[test]
    fn test_two_sector_identity() {
        let portfolio = vec![
            SectorHolding::new("AAPL", "Tech", dec!(0.4), dec!(0.12)),
            SectorHolding::new("MSFT", "Tech", dec!(0.2), dec!(0.06)),
            SectorHolding::new("XOM", "Energy", dec!(0.4), dec!(-0.03)),
        ];
        let benchmark = vec![
            SectorHolding::new("XOM", "Energy", dec!(0.5), dec!(-0.03)),
            SectorHolding::new("AAPL", "Tech", dec!(0.5), dec!(0.12)),
        ];
        let rp = weighted_sum(&portfolio);
        let rb = weighted_sum(&benchmark);

        let result = sector_attribution(&portfolio, &benchmark, rp, rb);

        assert_eq!(result.sectors.len(), 2);
        assert_eq!(result.sectors[0].sector, "Tech");
        assert_eq!(result.sectors[1].sector, "Energy");

        let tech = &result.sectors[0];
        assert_eq!(tech.portfolio_weight, dec!(0.6));
        assert_eq!(tech.portfolio_return, dec!(0.1));
        assert_eq!(tech.benchmark_return, dec!(0.12));

        assert_eq!(result.total_effect, result.active_return);
    }

    #[test]
    fn test_sector_missing_from_portfolio() {
        let portfolio = vec![SectorHolding::new("A", "Tech", dec!(1), dec!(0.05))];
        let benchmark = vec![
            SectorHolding::new("A", "Tech", dec!(0.5), dec!(0.05)),
            SectorHolding::new("B", "Utilities", dec!(0.5), dec!(0.01)),
        ];

        let result = sector_attribution(&portfolio, &benchmark, dec!(0.05), dec!(0.03));
        let utilities = &result.sectors[1];
        assert_eq!(utilities.portfolio_weight, Decimal::ZERO);
        assert_eq!(utilities.portfolio_return, Decimal::ZERO);
        // (0 − 0.5) × (0.01 − 0.03)
        assert_eq!(utilities.allocation_effect, dec!(0.01));
        assert_eq!(utilities.selection_effect + utilities.interaction_effect, Decimal::ZERO);
        assert_eq!(result.total_effect, dec!(0.02));
    }

    #[test]
    fn test_empty_inputs() {
        let result = sector_attribution(&[], &[], Decimal::ZERO, Decimal::ZERO);
        assert!(result.sectors.is_empty());
        assert_eq!(result.total_effect, Decimal::ZERO);
    }
}
