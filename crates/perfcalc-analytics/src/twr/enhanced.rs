//! Cash-flow aware time-weighted return.

use perfcalc_core::{CashFlow, CashFlowCategory, Date, DateRange, ValuationPoint};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::linking::annualize_with_basis;
use super::subperiods::{self, SubPeriod};
use crate::config::DAYS_PER_YEAR;
use crate::math;

/// Return of a single sub-period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPeriodReturn {
    /// First day of the sub-period.
    pub start_date: Date,
    /// Last day of the sub-period.
    pub end_date: Date,
    /// Opening valuation.
    pub start_value: Decimal,
    /// Closing valuation.
    pub end_value: Decimal,
    /// `(end − start − performance flows) / start`.
    #[serde(rename = "return")]
    pub period_return: Decimal,
    /// Calendar days from start to end date.
    pub days: i64,
    /// Performance-influencing flows inside the sub-period.
    pub performance_flows: Vec<CashFlow>,
}

impl SubPeriodReturn {
    /// Sum of the performance flows.
    #[must_use]
    pub fn total_performance_flow(&self) -> Decimal {
        self.performance_flows.iter().map(CashFlow::amount).sum()
    }
}

/// Result of [`calculate_enhanced_twr`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedTwrResult {
    /// Measurement period.
    pub period: DateRange,
    /// Geometrically linked return over all sub-periods.
    pub total_return: Decimal,
    /// Per sub-period breakdown, in date order.
    pub sub_periods: Vec<SubPeriodReturn>,
    /// External flows supplied.
    pub external_flow_count: usize,
    /// Performance-influencing flows supplied.
    pub performance_flow_count: usize,
    /// Boundaries skipped for lack of a valuation.
    #[serde(default)]
    pub dropped_sub_periods: usize,
}

impl EnhancedTwrResult {
    /// Sum of sub-period day counts.
    #[must_use]
    pub fn total_days(&self) -> i64 {
        self.sub_periods.iter().map(|sp| sp.days).sum()
    }

    /// Annualised total return on a 365.25-day year.
    ///
    /// Zero when there are no sub-periods or they span no days.
    #[must_use]
    pub fn annualized_return(&self) -> Decimal {
        self.annualized_return_with_basis(DAYS_PER_YEAR)
    }

    /// Annualised total return on an explicit days-per-year basis.
    #[must_use]
    pub fn annualized_return_with_basis(&self, days_per_year: Decimal) -> Decimal {
        if self.sub_periods.is_empty() {
            return Decimal::ZERO;
        }
        annualize_with_basis(self.total_return, self.total_days(), days_per_year)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Computes the return of one sub-period, net of its performance flows.
///
/// A non-positive opening value yields a zero return, as does a return too
/// large to represent (a dust-sized opening value).
#[must_use]
pub fn sub_period_return(sub_period: &SubPeriod) -> SubPeriodReturn {
    let flows = sub_period.total_performance_flow();
    let period_return = if sub_period.start_value > Decimal::ZERO {
        math::simple_return(sub_period.start_value, sub_period.end_value, flows)
            .unwrap_or_else(|| {
                tracing::warn!(
                    start = %sub_period.start_date,
                    end = %sub_period.end_date,
                    start_value = %sub_period.start_value,
                    "sub-period return overflows; set to zero"
                );
                Decimal::ZERO
            })
    } else {
        Decimal::ZERO
    };

    SubPeriodReturn {
        start_date: sub_period.start_date,
        end_date: sub_period.end_date,
        start_value: sub_period.start_value,
        end_value: sub_period.end_value,
        period_return,
        days: sub_period.start_date.days_between(&sub_period.end_date),
        performance_flows: sub_period.performance_flows.clone(),
    }
}

/// Calculates a time-weighted return with category-aware cash-flow treatment.
///
/// External flows split the period into sub-periods, performance-influencing
/// flows are deducted inside each sub-period's numerator, and internal flows
/// are ignored.
///
/// # Arguments
///
/// * `valuations` - Portfolio values over the period
/// * `cash_flows` - Classified cash flows of every category
/// * `period` - Measurement period
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::twr::calculate_enhanced_twr;
/// use perfcalc_core::{Date, DateRange, ValuationPoint};
/// use rust_decimal_macros::dec;
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 12, 31).unwrap();
/// let valuations = [
///     ValuationPoint::new(start, dec!(1000)),
///     ValuationPoint::new(end, dec!(1080)),
/// ];
///
/// let result = calculate_enhanced_twr(&valuations, &[], DateRange::new(start, end).unwrap());
/// assert_eq!(result.total_return, dec!(0.08));
/// ```
#[must_use]
pub fn calculate_enhanced_twr(
    valuations: &[ValuationPoint],
    cash_flows: &[CashFlow],
    period: DateRange,
) -> EnhancedTwrResult {
    let mut external: Vec<CashFlow> = Vec::new();
    let mut performance: Vec<CashFlow> = Vec::new();
    for cf in cash_flows {
        match cf.category() {
            CashFlowCategory::ExternalFlow => external.push(cf.clone()),
            CashFlowCategory::PerformanceInfluencing => performance.push(cf.clone()),
            CashFlowCategory::Internal => {}
        }
    }
    external.sort_by_key(CashFlow::date);
    performance.sort_by_key(CashFlow::date);

    let partition = subperiods::build(valuations, &external, period);

    let sub_periods: Vec<SubPeriodReturn> = partition
        .sub_periods
        .into_iter()
        .map(|sp| sub_period_return(&sp.with_performance_flows(&performance)))
        .collect();

    let total_return = math::link(sub_periods.iter().map(|sp| &sp.period_return))
        .unwrap_or_else(|| {
            tracing::warn!(period = %period, "linked return overflows; total set to zero");
            Decimal::ZERO
        });

    tracing::debug!(
        period = %period,
        sub_periods = sub_periods.len(),
        dropped = partition.dropped,
        external_flows = external.len(),
        performance_flows = performance.len(),
        %total_return,
        "calculated enhanced TWR"
    );

    EnhancedTwrResult {
        period,
        total_return,
        sub_periods,
        external_flow_count: external.len(),
        performance_flow_count: performance.len(),
        dropped_sub_periods: partition.dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use perfcalc_core::CashFlowKind;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    fn d(month: u32, day: u32) -> Date {
        Date::from_ymd(2025, month, day).unwrap()
    }

    #[test]
    fn test_sub_period_return_deducts_performance_flows() {
        let dividend = CashFlow::classified(d(1, 15), dec!(20), CashFlowKind::Dividend);
        let sp = SubPeriod::new(d(1, 1), d(1, 31), dec!(1000), dec!(1050))
            .with_performance_flows(&[dividend]);

        let r = sub_period_return(&sp);
        assert_eq!(r.period_return, dec!(0.03));
        assert_eq!(r.days, 30);
        assert_eq!(r.total_performance_flow(), dec!(20));
    }

    #[test]
    fn test_sub_period_return_zero_start() {
        let sp = SubPeriod::new(d(1, 1), d(1, 31), Decimal::ZERO, dec!(1050));
        assert_eq!(sub_period_return(&sp).period_return, Decimal::ZERO);

        let sp = SubPeriod::new(d(1, 1), d(1, 31), dec!(-10), dec!(1050));
        assert_eq!(sub_period_return(&sp).period_return, Decimal::ZERO);
    }

    #[test]
    fn test_dust_start_value_gives_zero_return() {
        let period = DateRange::new(d(1, 1), d(1, 31)).unwrap();
        let valuations = vec![
            ValuationPoint::new(d(1, 1), Decimal::new(1, 28)),
            ValuationPoint::new(d(1, 31), dec!(100)),
        ];
        let result = calculate_enhanced_twr(&valuations, &[], period);
        assert_eq!(result.sub_periods.len(), 1);
        assert_eq!(result.sub_periods[0].period_return, Decimal::ZERO);
        assert_eq!(result.total_return, Decimal::ZERO);
    }

    #[test]
    fn test_enhanced_twr_with_contribution() {
        let period = DateRange::new(d(1, 1), d(1, 31)).unwrap();
        let valuations = vec![
            ValuationPoint::new(d(1, 1), dec!(1000)),
            ValuationPoint::new(d(1, 14), dec!(1100)),
            ValuationPoint::new(d(1, 16), dec!(1600)),
            ValuationPoint::new(d(1, 31), dec!(1680)),
        ];
        let flows = vec![
            CashFlow::classified(d(1, 15), dec!(500), CashFlowKind::ClientContribution),
            CashFlow::classified(d(1, 20), dec!(16), CashFlowKind::Dividend),
            CashFlow::classified(d(1, 21), dec!(300), CashFlowKind::InternalTransfer),
        ];

        let result = calculate_enhanced_twr(&valuations, &flows, period);
        assert_eq!(result.external_flow_count, 1);
        assert_eq!(result.performance_flow_count, 1);
        assert_eq!(result.dropped_sub_periods, 0);
        assert_eq!(result.sub_periods.len(), 2);

        assert_eq!(result.sub_periods[0].period_return, dec!(0.1));
        // (1680 - 1600 - 16) / 1600
        assert_eq!(result.sub_periods[1].period_return, dec!(0.04));
        assert_eq!(result.total_return, dec!(0.144));
        // 13 + 15
        assert_eq!(result.total_days(), 28);
    }

    #[test]
    fn test_enhanced_twr_no_valuations() {
        let period = DateRange::new(d(1, 1), d(1, 31)).unwrap();
        let result = calculate_enhanced_twr(&[], &[], period);
        assert!(result.sub_periods.is_empty());
        assert_eq!(result.total_return, Decimal::ZERO);
        assert_eq!(result.annualized_return(), Decimal::ZERO);
        assert_eq!(result.dropped_sub_periods, 1);
    }

    #[test]
    fn test_annualized_return() {
        let period = DateRange::new(d(1, 1), d(12, 31)).unwrap();
        let valuations = vec![
            ValuationPoint::new(d(1, 1), dec!(1000)),
            ValuationPoint::new(d(12, 31), dec!(1100)),
        ];
        let result = calculate_enhanced_twr(&valuations, &[], period);
        assert_eq!(result.total_days(), 364);
        let expected = 1.1f64.powf(365.25 / 364.0) - 1.0;
        assert_relative_eq!(
            result.annualized_return().to_f64().unwrap(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_single_day_period_has_zero_annualized_return() {
        let day = d(3, 3);
        let period = DateRange::new(day, day).unwrap();
        let valuations = vec![ValuationPoint::new(day, dec!(500))];
        let result = calculate_enhanced_twr(&valuations, &[], period);
        assert_eq!(result.sub_periods.len(), 1);
        assert_eq!(result.total_days(), 0);
        assert_eq!(result.annualized_return(), Decimal::ZERO);
    }
}
