//! Volatility, Sharpe ratio, drawdown and VaR from a valuation series.

use perfcalc_core::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::drawdown::{drawdown_analysis, DrawdownPeriod};
use super::var::var_at;
use crate::config::{DAYS_PER_YEAR, DEFAULT_VAR_CONFIDENCE};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::math;

/// Risk metrics for a valuation series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetricsResult {
    /// Population volatility of periodic returns, annualised.
    pub annualized_volatility: Decimal,
    /// `(annualized_return − risk_free_rate) / annualized_volatility`.
    pub sharpe_ratio: Decimal,
    /// Largest peak-to-trough decline.
    pub maximum_drawdown: Decimal,
    /// Decline of the last value from the running peak.
    pub current_drawdown: Decimal,
    /// Historical VaR at 95% confidence, as a positive fraction.
    pub value_at_risk_95: Decimal,
    /// Mean periodic return, annualised arithmetically.
    pub annualized_return: Decimal,
    /// Drawdown periods in chronological order.
    pub drawdown_periods: Vec<DrawdownPeriod>,
}

/// Simple returns between adjacent values, skipping pairs whose earlier
/// value is not positive or whose return overflows the decimal range.
#[must_use]
pub fn periodic_returns(values: &[Decimal]) -> Vec<Decimal> {
    values
        .windows(2)
        .filter(|pair| pair[0] > Decimal::ZERO)
        .filter_map(|pair| {
            let r = math::simple_return(pair[0], pair[1], Decimal::ZERO);
            if r.is_none() {
                tracing::warn!(from = %pair[0], to = %pair[1], "return overflows; pair skipped");
            }
            r
        })
        .collect()
}

/// Average spacing between observations in whole days, at least 1.
///
/// Integer division, so a weekly series with one irregular gap still reads
/// as weekly.
#[must_use]
pub fn average_spacing_days(dates: &[Date]) -> i64 {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if dates.len() >= 2 => {
            let observations = i64::try_from(dates.len() - 1).unwrap_or(i64::MAX);
            (first.days_between(last) / observations).max(1)
        }
        _ => 1,
    }
}

/// Calculates risk metrics with the 95% VaR and a 365.25-day year.
///
/// Degenerate input (fewer than two values, or mismatched slice lengths)
/// gives the all-zero result.
///
/// # Arguments
///
/// * `values` - Portfolio values in date order
/// * `dates` - Observation dates, one per value
/// * `risk_free_rate` - Annual risk-free rate for the Sharpe ratio
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::risk::calculate_risk_metrics;
/// use perfcalc_core::Date;
/// use rust_decimal_macros::dec;
///
/// let d0 = Date::from_ymd(2025, 1, 1).unwrap();
/// let dates: Vec<Date> = (0..5).map(|i| d0.add_days(i)).collect();
/// let values = [dec!(100), dec!(90), dec!(95), dec!(80), dec!(120)];
///
/// let metrics = calculate_risk_metrics(&values, &dates, dec!(0.02));
/// assert_eq!(metrics.maximum_drawdown, dec!(0.2));
/// assert_eq!(metrics.drawdown_periods.len(), 1);
/// ```
#[must_use]
pub fn calculate_risk_metrics(
    values: &[Decimal],
    dates: &[Date],
    risk_free_rate: Decimal,
) -> RiskMetricsResult {
    try_calculate_risk_metrics(values, dates, risk_free_rate)
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Strict form of [`calculate_risk_metrics`].
///
/// # Returns
///
/// `Ok(None)` when there are fewer than two observations.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidArgument` if `values` and `dates` differ
/// in length, or if an annualised figure overflows the decimal range.
pub fn try_calculate_risk_metrics(
    values: &[Decimal],
    dates: &[Date],
    risk_free_rate: Decimal,
) -> AnalyticsResult<Option<RiskMetricsResult>> {
    if values.len() != dates.len() {
        return Err(AnalyticsError::invalid_argument(format!(
            "{} values but {} dates",
            values.len(),
            dates.len()
        )));
    }
    if values.len() < 2 {
        return Ok(None);
    }
    compute(values, dates, risk_free_rate, DAYS_PER_YEAR, DEFAULT_VAR_CONFIDENCE).map(Some)
}

fn overflow(figure: &str) -> AnalyticsError {
    AnalyticsError::invalid_argument(format!("{figure} overflows the decimal range"))
}

/// Shared implementation; inputs already validated.
pub(crate) fn compute(
    values: &[Decimal],
    dates: &[Date],
    risk_free_rate: Decimal,
    days_per_year: Decimal,
    var_confidence: Decimal,
) -> AnalyticsResult<RiskMetricsResult> {
    let returns = periodic_returns(values);

    let periods_per_year = days_per_year
        .checked_div(Decimal::from(average_spacing_days(dates)))
        .ok_or_else(|| overflow("periods per year"))?;
    let annualized_volatility = math::population_std_dev(&returns)
        .and_then(|sd| sd.checked_mul(math::sqrt(periods_per_year)))
        .ok_or_else(|| overflow("annualized volatility"))?;
    let annualized_return = math::mean(&returns)
        .and_then(|m| m.checked_mul(periods_per_year))
        .ok_or_else(|| overflow("annualized return"))?;

    let sharpe_ratio = if annualized_volatility.is_zero() {
        Decimal::ZERO
    } else {
        annualized_return
            .checked_sub(risk_free_rate)
            .and_then(|excess| excess.checked_div(annualized_volatility))
            .ok_or_else(|| overflow("sharpe ratio"))?
    };

    let drawdowns = drawdown_analysis(values, dates);

    tracing::debug!(
        observations = values.len(),
        returns = returns.len(),
        %annualized_volatility,
        %sharpe_ratio,
        maximum_drawdown = %drawdowns.maximum_drawdown,
        drawdown_periods = drawdowns.periods.len(),
        "calculated risk metrics"
    );

    Ok(RiskMetricsResult {
        annualized_volatility,
        sharpe_ratio,
        maximum_drawdown: drawdowns.maximum_drawdown,
        current_drawdown: drawdowns.current_drawdown,
        value_at_risk_95: var_at(&returns, var_confidence),
        annualized_return,
        drawdown_periods: drawdowns.periods,
    })
}
