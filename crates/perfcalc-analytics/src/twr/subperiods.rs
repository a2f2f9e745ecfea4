//! Partitioning a valuation series at external cash-flow dates.

use perfcalc_core::{CashFlow, Date, DateRange, ValuationPoint};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A maximal interval that contains no external cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPeriod {
    /// First day of the sub-period.
    pub start_date: Date,
    /// Last day of the sub-period.
    pub end_date: Date,
    /// Opening valuation.
    pub start_value: Decimal,
    /// Closing valuation.
    pub end_value: Decimal,
    /// Performance-influencing flows dated inside `[start_date, end_date]`.
    #[serde(default)]
    pub performance_flows: Vec<CashFlow>,
}

impl SubPeriod {
    /// Creates a sub-period with no performance flows attached.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, start_value: Decimal, end_value: Decimal) -> Self {
        Self {
            start_date,
            end_date,
            start_value,
            end_value,
            performance_flows: Vec::new(),
        }
    }

    /// Attaches the flows from `flows` that fall inside this sub-period.
    #[must_use]
    pub fn with_performance_flows<'a>(
        mut self,
        flows: impl IntoIterator<Item = &'a CashFlow>,
    ) -> Self {
        self.performance_flows = flows
            .into_iter()
            .filter(|cf| cf.date() >= self.start_date && cf.date() <= self.end_date)
            .cloned()
            .collect();
        self
    }

    /// Sum of attached performance flows.
    #[must_use]
    pub fn total_performance_flow(&self) -> Decimal {
        self.performance_flows.iter().map(CashFlow::amount).sum()
    }
}

/// Output of [`build`]: the sub-periods plus the number of boundaries that
/// had to be skipped because no valuation was available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubPeriodPartition {
    /// Ordered sub-periods.
    pub sub_periods: Vec<SubPeriod>,
    /// Boundaries that produced no sub-period.
    pub dropped: usize,
}

/// Splits `period` into sub-periods at each external flow date.
///
/// Valuations are sorted by date before use. For every external flow dated
/// strictly after the current start and on or before `period.end()`, a
/// sub-period is closed at the latest valuation strictly before the flow,
/// opened at the first valuation on or after the current start, and the next
/// sub-period begins the day after the flow. A final sub-period runs from the
/// current start to `period.end()`.
///
/// # Arguments
///
/// * `valuations` - Portfolio values, in any order
/// * `external_flows` - Flows that break the period; other categories are ignored
/// * `period` - Measurement period
///
/// # Returns
///
/// The partition. A sub-period with no usable valuation is skipped, logged at
/// `warn` level and counted in [`SubPeriodPartition::dropped`].
#[must_use]
pub fn build(
    valuations: &[ValuationPoint],
    external_flows: &[CashFlow],
    period: DateRange,
) -> SubPeriodPartition {
    let mut ordered = valuations.to_vec();
    ordered.sort_by_key(|v| v.date);

    let mut flows: Vec<&CashFlow> = external_flows.iter().filter(|cf| cf.is_external()).collect();
    flows.sort_by_key(|cf| cf.date());

    let first_on_or_after = |date: Date| ordered.iter().find(|v| v.date >= date);

    let mut partition = SubPeriodPartition::default();
    let mut current_start = period.start();

    for flow in flows {
        if flow.date() <= current_start || flow.date() > period.end() {
            continue;
        }

        let closing = ordered.iter().rev().find(|v| v.date < flow.date());
        match (first_on_or_after(current_start), closing) {
            (Some(open), Some(close)) => {
                warn_if_inverted(open, close);
                partition.sub_periods.push(SubPeriod::new(
                    current_start,
                    close.date,
                    open.value,
                    close.value,
                ));
            }
            _ => {
                tracing::warn!(
                    start = %current_start,
                    flow_date = %flow.date(),
                    "no valuation available for sub-period boundary; sub-period dropped"
                );
                partition.dropped += 1;
            }
        }

        current_start = flow.date().add_days(1);
    }

    let closing = ordered.iter().rev().find(|v| v.date <= period.end());
    match (first_on_or_after(current_start), closing) {
        (Some(open), Some(close)) => {
            warn_if_inverted(open, close);
            partition.sub_periods.push(SubPeriod::new(
                current_start,
                period.end(),
                open.value,
                close.value,
            ));
        }
        _ => {
            tracing::warn!(
                start = %current_start,
                end = %period.end(),
                "no valuation available for final sub-period; sub-period dropped"
            );
            partition.dropped += 1;
        }
    }

    partition
}

fn warn_if_inverted(open: &ValuationPoint, close: &ValuationPoint) -> bool {
    let inverted = open.date > close.date;
    if inverted {
        tracing::warn!(
            opening = %open.date,
            closing = %close.date,
            "opening valuation is dated after the closing valuation"
        );
    }
    inverted
}

/// Convenience wrapper around [`build`] that discards the drop count.
#[must_use]
pub fn build_sub_periods(
    valuations: &[ValuationPoint],
    external_flows: &[CashFlow],
    period: DateRange,
) -> Vec<SubPeriod> {
    build(valuations, external_flows, period).sub_periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfcalc_core::CashFlowKind;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> Date {
        Date::from_ymd(2025, 1, day).unwrap()
    }

    fn vp(day: u32, value: Decimal) -> ValuationPoint {
        ValuationPoint::new(d(day), value)
    }

    #[test]
    fn test_no_external_flows_single_sub_period() {
        let period = DateRange::new(d(1), d(31)).unwrap();
        let valuations = vec![vp(1, dec!(1000)), vp(15, dec!(1020)), vp(31, dec!(1050))];

        let partition = build(&valuations, &[], period);
        assert_eq!(partition.dropped, 0);
        assert_eq!(partition.sub_periods.len(), 1);

        let sp = &partition.sub_periods[0];
        assert_eq!(sp.start_date, d(1));
        assert_eq!(sp.end_date, d(31));
        assert_eq!(sp.start_value, dec!(1000));
        assert_eq!(sp.end_value, dec!(1050));
    }

    #[test]
    fn test_split_at_external_flow() {
        let period = DateRange::new(d(1), d(31)).unwrap();
        let valuations = vec![
            vp(31, dec!(1650)),
            vp(1, dec!(1000)),
            vp(14, dec!(1100)),
            vp(15, dec!(1600)),
        ];
        let flows = vec![CashFlow::classified(d(15), dec!(500), CashFlowKind::ClientContribution)];

        let sub_periods = build_sub_periods(&valuations, &flows, period);
        assert_eq!(sub_periods.len(), 2);

        assert_eq!(sub_periods[0].start_date, d(1));
        assert_eq!(sub_periods[0].end_date, d(14));
        assert_eq!(sub_periods[0].start_value, dec!(1000));
        assert_eq!(sub_periods[0].end_value, dec!(1100));

        assert_eq!(sub_periods[1].start_date, d(16));
        assert_eq!(sub_periods[1].end_date, d(31));
        assert_eq!(sub_periods[1].start_value, dec!(1650));
        assert_eq!(sub_periods[1].end_value, dec!(1650));
    }

    #[test]
    fn test_flow_on_period_start_is_ignored() {
        let period = DateRange::new(d(1), d(10)).unwrap();
        let valuations = vec![vp(1, dec!(100)), vp(10, dec!(110))];
        let flows = vec![CashFlow::classified(d(1), dec!(50), CashFlowKind::TransferIn)];

        let partition = build(&valuations, &flows, period);
        assert_eq!(partition.sub_periods.len(), 1);
        assert_eq!(partition.sub_periods[0].start_date, d(1));
    }

    #[test]
    fn test_flow_after_period_end_is_ignored() {
        let period = DateRange::new(d(1), d(10)).unwrap();
        let valuations = vec![vp(1, dec!(100)), vp(10, dec!(110))];
        let flows = vec![CashFlow::classified(d(20), dec!(50), CashFlowKind::TransferIn)];

        assert_eq!(build(&valuations, &flows, period).sub_periods.len(), 1);
    }

    #[test]
    fn test_non_external_flows_do_not_split() {
        let period = DateRange::new(d(1), d(10)).unwrap();
        let valuations = vec![vp(1, dec!(100)), vp(10, dec!(110))];
        let flows = vec![
            CashFlow::classified(d(5), dec!(3), CashFlowKind::Dividend),
            CashFlow::classified(d(6), dec!(40), CashFlowKind::CashSweep),
        ];

        assert_eq!(build(&valuations, &flows, period).sub_periods.len(), 1);
    }

    #[test]
    fn test_sparse_valuations_are_counted_as_dropped() {
        let period = DateRange::new(d(5), d(10)).unwrap();
        // nothing before the flow date
        let valuations = vec![vp(8, dec!(100)), vp(10, dec!(105))];
        let flows = vec![CashFlow::classified(d(7), dec!(50), CashFlowKind::ClientContribution)];

        let partition = build(&valuations, &flows, period);
        assert_eq!(partition.dropped, 1);
        assert_eq!(partition.sub_periods.len(), 1);
        assert_eq!(partition.sub_periods[0].start_date, d(8));
    }

    #[test]
    fn test_opening_after_closing_is_kept() {
        let period = DateRange::new(d(1), d(20)).unwrap();
        let valuations = vec![vp(1, dec!(100)), vp(12, dec!(150)), vp(20, dec!(160))];
        let flows = vec![
            CashFlow::classified(d(5), dec!(10), CashFlowKind::ClientContribution),
            CashFlow::classified(d(10), dec!(10), CashFlowKind::ClientContribution),
        ];

        let partition = build(&valuations, &flows, period);
        assert_eq!(partition.dropped, 0);
        assert_eq!(partition.sub_periods.len(), 3);

        // opens on the day-12 valuation but closes on the day-1 one
        let sp = &partition.sub_periods[1];
        assert_eq!(sp.start_date, d(6));
        assert_eq!(sp.start_value, dec!(150));
        assert_eq!(sp.end_value, dec!(100));
    }

    #[test]
    fn test_inverted_boundary_detection() {
        assert!(warn_if_inverted(&vp(12, dec!(150)), &vp(1, dec!(100))));
        assert!(!warn_if_inverted(&vp(1, dec!(100)), &vp(1, dec!(100))));
        assert!(!warn_if_inverted(&vp(1, dec!(100)), &vp(12, dec!(150))));
    }

    #[test]
    fn test_empty_valuations() {
        let period = DateRange::new(d(1), d(10)).unwrap();
        let partition = build(&[], &[], period);
        assert!(partition.sub_periods.is_empty());
        assert_eq!(partition.dropped, 1);
    }

    #[test]
    fn test_attach_performance_flows() {
        let sp = SubPeriod::new(d(1), d(10), dec!(100), dec!(110));
        let flows = vec![
            CashFlow::classified(d(1), dec!(2), CashFlowKind::Dividend),
            CashFlow::classified(d(10), dec!(-1), CashFlowKind::ManagementFee),
            CashFlow::classified(d(11), dec!(5), CashFlowKind::Dividend),
        ];

        let sp = sp.with_performance_flows(&flows);
        assert_eq!(sp.performance_flows.len(), 2);
        assert_eq!(sp.total_performance_flow(), dec!(1));
    }
}
