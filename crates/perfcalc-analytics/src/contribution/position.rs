//! Per-position contribution arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::math;

/// A position's weight, return and contribution to the portfolio return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// Start value as a share of the portfolio start value.
    pub weight: Decimal,
    /// `(end − start) / start` for the position.
    pub instrument_return: Decimal,
    /// `weight × instrument_return`.
    pub contribution: Decimal,
    /// `end − start` in base currency.
    pub absolute_contribution: Decimal,
}

/// A named contribution, used for the top and worst contributors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSummary {
    /// Instrument ticker; empty for the no-data sentinel.
    pub ticker: String,
    /// Contribution to portfolio return.
    pub contribution: Decimal,
}

impl ContributionSummary {
    /// Creates a summary.
    #[must_use]
    pub fn new(ticker: impl Into<String>, contribution: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            contribution,
        }
    }
}

/// Computes a position's contribution to the portfolio return.
///
/// # Arguments
///
/// * `position_start` - Position value at the start of the period
/// * `position_end` - Position value at the end of the period
/// * `portfolio_start` - Total portfolio value at the start
/// * `portfolio_end` - Total portfolio value at the end (carried for symmetry; unused)
///
/// # Returns
///
/// All zeros when `portfolio_start` is not positive. The instrument return is
/// zero when `position_start` is not positive. Any figure that overflows the
/// decimal range is reported as zero.
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::contribution::calculate_contribution;
/// use rust_decimal_macros::dec;
///
/// let c = calculate_contribution(dec!(600), dec!(660), dec!(1000), dec!(1040));
/// assert_eq!(c.weight, dec!(0.6));
/// assert_eq!(c.contribution, dec!(0.06));
/// ```
#[must_use]
pub fn calculate_contribution(
    position_start: Decimal,
    position_end: Decimal,
    portfolio_start: Decimal,
    _portfolio_end: Decimal,
) -> ContributionResult {
    if portfolio_start <= Decimal::ZERO {
        return ContributionResult::default();
    }

    let weight = position_start.checked_div(portfolio_start);
    let instrument_return = if position_start > Decimal::ZERO {
        math::simple_return(position_start, position_end, Decimal::ZERO)
    } else {
        Some(Decimal::ZERO)
    };
    let contribution = weight
        .zip(instrument_return)
        .and_then(|(w, r)| w.checked_mul(r));
    let absolute_contribution = position_end.checked_sub(position_start);

    if contribution.is_none() || absolute_contribution.is_none() {
        tracing::warn!(
            %position_start,
            %position_end,
            %portfolio_start,
            "contribution overflows; reported as zero"
        );
    }

    ContributionResult {
        weight: weight.unwrap_or_default(),
        instrument_return: instrument_return.unwrap_or_default(),
        contribution: contribution.unwrap_or_default(),
        absolute_contribution: absolute_contribution.unwrap_or_default(),
    }
}

/// Share of the portfolio's absolute gain attributable to one position.
///
/// Zero when the total is zero or the share overflows.
#[must_use]
pub fn percentage_contribution(absolute: Decimal, total_absolute: Decimal) -> Decimal {
    absolute.checked_div(total_absolute).unwrap_or_default()
}

/// Simple portfolio return `(end − start) / start`; zero when `start ≤ 0`
/// or the return overflows.
#[must_use]
pub fn portfolio_return(start: Decimal, end: Decimal) -> Decimal {
    if start <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    math::simple_return(start, end, Decimal::ZERO).unwrap_or_default()
}

/// Highest and lowest contributions.
///
/// Ties go to the first entry encountered. Empty input gives two empty-named
/// zero sentinels.
#[must_use]
pub fn top_and_worst_contributors<S: AsRef<str>>(
    contributions: &[(S, Decimal)],
) -> (ContributionSummary, ContributionSummary) {
    let Some((first, rest)) = contributions.split_first() else {
        return (ContributionSummary::default(), ContributionSummary::default());
    };

    let (top, worst) = rest.iter().fold((first, first), |(top, worst), entry| {
        (
            if entry.1 > top.1 { entry } else { top },
            if entry.1 < worst.1 { entry } else { worst },
        )
    });

    (
        ContributionSummary::new(top.0.as_ref(), top.1),
        ContributionSummary::new(worst.0.as_ref(), worst.1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_two_position_identity() {
        let a = calculate_contribution(dec!(600), dec!(660), dec!(1000), dec!(1040));
        let b = calculate_contribution(dec!(400), dec!(380), dec!(1000), dec!(1040));

        assert_eq!(a.contribution, dec!(0.06));
        assert_eq!(b.contribution, dec!(-0.02));
        assert_eq!(b.absolute_contribution, dec!(-20));
        assert_eq!(
            a.contribution + b.contribution,
            portfolio_return(dec!(1000), dec!(1040))
        );
    }

    #[test]
    fn test_dust_start_values_degrade_to_zero() {
        let dust = Decimal::new(1, 28);
        let c = calculate_contribution(dust, dec!(100), dust, dec!(100));
        assert_eq!(c.weight, Decimal::ONE);
        assert_eq!(c.instrument_return, Decimal::ZERO);
        assert_eq!(c.contribution, Decimal::ZERO);
        assert_eq!(c.absolute_contribution, dec!(100) - dust);

        let c = calculate_contribution(dec!(100), dec!(100), dust, dec!(100));
        assert_eq!(c.weight, Decimal::ZERO);
        assert_eq!(c.contribution, Decimal::ZERO);

        assert_eq!(portfolio_return(dust, dec!(100)), Decimal::ZERO);
        assert_eq!(percentage_contribution(dec!(100), dust), Decimal::ZERO);
    }

    #[test]
    fn test_zero_portfolio_start() {
        let c = calculate_contribution(dec!(100), dec!(110), Decimal::ZERO, dec!(110));
        assert_eq!(c, ContributionResult::default());
    }

    #[test]
    fn test_zero_position_start() {
        let c = calculate_contribution(Decimal::ZERO, dec!(50), dec!(1000), dec!(1050));
        assert_eq!(c.weight, Decimal::ZERO);
        assert_eq!(c.instrument_return, Decimal::ZERO);
        assert_eq!(c.absolute_contribution, dec!(50));
    }

    #[test]
    fn test_percentage_contribution() {
        assert_eq!(percentage_contribution(dec!(60), dec!(40)), dec!(1.5));
        assert_eq!(percentage_contribution(dec!(60), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_portfolio_return() {
        assert_eq!(portfolio_return(dec!(1000), dec!(1040)), dec!(0.04));
        assert_eq!(portfolio_return(Decimal::ZERO, dec!(1040)), Decimal::ZERO);
    }

    #[test]
    fn test_top_and_worst() {
        let entries = [
            ("AAA", dec!(0.01)),
            ("BBB", dec!(0.03)),
            ("CCC", dec!(-0.02)),
            ("DDD", dec!(0.03)),
            ("EEE", dec!(-0.02)),
        ];
        let (top, worst) = top_and_worst_contributors(&entries);
        assert_eq!(top, ContributionSummary::new("BBB", dec!(0.03)));
        assert_eq!(worst, ContributionSummary::new("CCC", dec!(-0.02)));
    }

    #[test]
    fn test_top_and_worst_empty() {
        let (top, worst) = top_and_worst_contributors::<&str>(&[]);
        assert_eq!(top.ticker, "");
        assert_eq!(top.contribution, Decimal::ZERO);
        assert_eq!(worst, ContributionSummary::default());
    }
}
