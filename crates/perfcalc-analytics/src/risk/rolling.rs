//! Rolling annualised volatility.

use perfcalc_core::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metrics::periodic_returns;
use crate::config::DAYS_PER_YEAR;
use crate::math;

/// Annualised volatility of the return window ending at `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingVolatilityPoint {
    /// Date the window is reported against.
    pub date: Date,
    /// Window volatility scaled by `sqrt(365.25)`.
    pub annualized_volatility: Decimal,
}

/// Rolling volatility over windows of `window` returns.
///
/// For every `i` in `window..returns.len()` the population volatility of
/// `returns[i − window..i]` is reported against `dates[i]`. A zero window, or
/// a series too short to fill one window, gives an empty result.
#[must_use]
pub fn rolling_volatility(
    values: &[Decimal],
    dates: &[Date],
    window: usize,
) -> Vec<RollingVolatilityPoint> {
    rolling_volatility_with_basis(values, dates, window, DAYS_PER_YEAR)
}

/// [`rolling_volatility`] with an explicit days-per-year basis.
#[must_use]
pub fn rolling_volatility_with_basis(
    values: &[Decimal],
    dates: &[Date],
    window: usize,
    days_per_year: Decimal,
) -> Vec<RollingVolatilityPoint> {
    if window == 0 {
        return Vec::new();
    }

    let returns = periodic_returns(values);
    let scale = math::sqrt(days_per_year);

    (window..returns.len())
        .map_while(|i| dates.get(i).map(|date| (i, *date)))
        .filter_map(|(i, date)| {
            let volatility = math::population_std_dev(&returns[i - window..i])
                .and_then(|sd| sd.checked_mul(scale));
            if volatility.is_none() {
                tracing::warn!(date = %date, "rolling volatility overflows; point skipped");
            }
            volatility.map(|annualized_volatility| RollingVolatilityPoint {
                date,
                annualized_volatility,
            })
        })
        .collect()
}
