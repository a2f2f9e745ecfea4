//! Historical Value-at-Risk.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Historical VaR of a return series at `confidence`.
///
/// Sorts the returns ascending and takes the one at index
/// `floor((1 − confidence) × n)`, clamped to the series, as a positive loss.
///
/// # Arguments
///
/// * `returns` - Periodic returns
/// * `confidence` - Confidence level (e.g., 0.95 for 95%)
///
/// # Returns
///
/// The VaR as a positive fraction; zero for an empty series.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidArgument` unless `0 < confidence < 1`.
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::risk::historical_var;
/// use rust_decimal_macros::dec;
///
/// let returns = [dec!(0.01), dec!(-0.05), dec!(0.04), dec!(-0.02), dec!(0.03)];
/// assert_eq!(historical_var(&returns, dec!(0.95)).unwrap(), dec!(0.05));
/// ```
pub fn historical_var(returns: &[Decimal], confidence: Decimal) -> AnalyticsResult<Decimal> {
    if confidence <= Decimal::ZERO || confidence >= Decimal::ONE {
        return Err(AnalyticsError::invalid_argument(format!(
            "confidence level must be between 0 and 1, got {confidence}"
        )));
    }
    Ok(var_at(returns, confidence))
}

/// Unchecked VaR; callers guarantee `confidence` is in range.
pub(crate) fn var_at(returns: &[Decimal], confidence: Decimal) -> Decimal {
    if returns.is_empty() {
        return Decimal::ZERO;
    }

    let mut sorted = returns.to_vec();
    sorted.sort();

    let n = sorted.len();
    let index = ((Decimal::ONE - confidence) * Decimal::from(n))
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(n - 1);

    sorted[index].abs()
}
