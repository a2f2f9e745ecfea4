//! Geometric linking and annualisation of returns.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::DAYS_PER_YEAR;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::math;

/// Links periodic returns geometrically: `Π(1 + rᵢ) − 1`.
///
/// # Errors
///
/// Returns `AnalyticsError::MissingData` if `returns` is empty and
/// `AnalyticsError::InvalidArgument` if the product overflows.
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::twr::chain;
/// use rust_decimal_macros::dec;
///
/// let total = chain(&[dec!(0.10), dec!(-0.05)]).unwrap();
/// assert_eq!(total, dec!(0.045));
/// ```
pub fn chain(returns: &[Decimal]) -> AnalyticsResult<Decimal> {
    if returns.is_empty() {
        return Err(AnalyticsError::missing_data(
            "at least one sub-period return is required",
        ));
    }
    math::link(returns).ok_or_else(|| {
        AnalyticsError::invalid_argument("linked return overflows the decimal range")
    })
}

/// Converts a cumulative return over `days` calendar days into an annual rate.
///
/// Uses `(1 + total_return)^(365.25 / days) − 1`.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidArgument` if `days` is not positive or the
/// result is not a real number (total return below −100%).
pub fn annualize(total_return: Decimal, days: i64) -> AnalyticsResult<Decimal> {
    annualize_with_basis(total_return, days, DAYS_PER_YEAR)
}

/// [`annualize`] with an explicit days-per-year basis.
pub fn annualize_with_basis(
    total_return: Decimal,
    days: i64,
    days_per_year: Decimal,
) -> AnalyticsResult<Decimal> {
    if days <= 0 {
        return Err(AnalyticsError::invalid_argument(format!(
            "days must be positive, got {days}"
        )));
    }
    let exponent = days_per_year / Decimal::from(days);
    Decimal::ONE
        .checked_add(total_return)
        .and_then(|growth| math::powf(growth, exponent))
        .and_then(|growth| growth.checked_sub(Decimal::ONE))
        .ok_or_else(|| {
            AnalyticsError::invalid_argument(format!(
                "cannot annualize a total return of {total_return}"
            ))
        })
}

/// A sub-period with a pre-computed net external flow.
///
/// For callers that have already bracketed their flows and only need the
/// arithmetic, with no cash-flow classification involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimpleSubPeriod {
    start_value: Decimal,
    end_value: Decimal,
    net_flow: Decimal,
}

impl SimpleSubPeriod {
    /// Creates a sub-period.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidArgument` if `start_value` is not positive.
    pub fn new(
        start_value: Decimal,
        end_value: Decimal,
        net_flow: Decimal,
    ) -> AnalyticsResult<Self> {
        if start_value <= Decimal::ZERO {
            return Err(AnalyticsError::invalid_argument(format!(
                "start value must be positive, got {start_value}"
            )));
        }
        Ok(Self {
            start_value,
            end_value,
            net_flow,
        })
    }

    /// Opening value.
    #[must_use]
    pub fn start_value(&self) -> Decimal {
        self.start_value
    }

    /// Closing value.
    #[must_use]
    pub fn end_value(&self) -> Decimal {
        self.end_value
    }

    /// Net flow during the sub-period.
    #[must_use]
    pub fn net_flow(&self) -> Decimal {
        self.net_flow
    }

    /// `(end − start − net_flow) / start`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidArgument` if the return overflows the
    /// decimal range.
    pub fn period_return(&self) -> AnalyticsResult<Decimal> {
        math::simple_return(self.start_value, self.end_value, self.net_flow).ok_or_else(|| {
            AnalyticsError::invalid_argument(format!(
                "return on a start value of {} overflows the decimal range",
                self.start_value
            ))
        })
    }
}

/// Chains the returns of pre-built sub-periods.
///
/// # Errors
///
/// Returns `AnalyticsError::MissingData` if `periods` is empty and
/// `AnalyticsError::InvalidArgument` if any return overflows.
pub fn time_weighted_return(periods: &[SimpleSubPeriod]) -> AnalyticsResult<Decimal> {
    let returns = periods
        .iter()
        .map(SimpleSubPeriod::period_return)
        .collect::<AnalyticsResult<Vec<_>>>()?;
    chain(&returns)
}
