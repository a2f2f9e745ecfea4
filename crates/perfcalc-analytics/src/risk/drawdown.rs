//! Peak-to-trough drawdown detection.
//!
//! Drawdowns are found with an explicit left fold over the value series:
//! [`DrawdownState::step`] consumes one observation and returns the next
//! state, and [`DrawdownState::finish`] closes any open period.

use perfcalc_core::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous stretch spent below a running peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownPeriod {
    /// Date of the peak the decline started from.
    pub start_date: Date,
    /// Last date before a new peak, or the final date if still open.
    pub end_date: Date,
    /// Deepest decline within the period, as a fraction of the peak.
    pub max_drawdown: Decimal,
    /// Inclusive calendar days, `end − start + 1`.
    pub duration_days: i64,
}

impl DrawdownPeriod {
    /// Creates a period, deriving the inclusive duration from the dates.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, max_drawdown: Decimal) -> Self {
        Self {
            start_date,
            end_date,
            max_drawdown,
            duration_days: start_date.days_between(&end_date) + 1,
        }
    }

    /// True if the period ended before `as_of`.
    #[must_use]
    pub fn is_recovered(&self, as_of: Date) -> bool {
        self.end_date < as_of
    }
}

/// Output of [`drawdown_analysis`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownAnalysis {
    /// Largest drawdown anywhere in the series.
    pub maximum_drawdown: Decimal,
    /// Drawdown of the final observation against the final peak.
    pub current_drawdown: Decimal,
    /// Drawdown periods in chronological order.
    pub periods: Vec<DrawdownPeriod>,
}

/// Where the series stands relative to its running peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawdownPhase {
    /// The last observation set or matched no open decline.
    AtOrAbovePeak,
    /// Below the peak since `start`, with the deepest decline so far.
    InDrawdown {
        /// Peak date the decline is measured from.
        start: Date,
        /// Deepest decline in this period.
        max: Decimal,
    },
}

/// Accumulator for the drawdown fold.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownState {
    peak: Decimal,
    peak_date: Date,
    last_value: Decimal,
    last_date: Date,
    phase: DrawdownPhase,
    maximum_drawdown: Decimal,
    periods: Vec<DrawdownPeriod>,
}

impl DrawdownState {
    /// Starts the fold with the first observation as the running peak.
    #[must_use]
    pub fn new(value: Decimal, date: Date) -> Self {
        Self {
            peak: value,
            peak_date: date,
            last_value: value,
            last_date: date,
            phase: DrawdownPhase::AtOrAbovePeak,
            maximum_drawdown: Decimal::ZERO,
            periods: Vec::new(),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DrawdownPhase {
        self.phase
    }

    /// Running peak value.
    #[must_use]
    pub fn peak(&self) -> Decimal {
        self.peak
    }

    /// Consumes one observation.
    ///
    /// A value strictly above the peak closes any open period at the previous
    /// date and becomes the new peak. Any other value opens a period at the
    /// peak date if none is open and deepens its maximum.
    #[must_use]
    pub fn step(mut self, value: Decimal, date: Date) -> Self {
        if value > self.peak {
            if let DrawdownPhase::InDrawdown { start, max } = self.phase {
                self.periods
                    .push(DrawdownPeriod::new(start, self.last_date, max));
            }
            self.phase = DrawdownPhase::AtOrAbovePeak;
            self.peak = value;
            self.peak_date = date;
        } else {
            let drawdown = decline_from(self.peak, value);
            let (start, max) = match self.phase {
                DrawdownPhase::InDrawdown { start, max } => (start, max.max(drawdown)),
                DrawdownPhase::AtOrAbovePeak => (self.peak_date, drawdown),
            };
            self.phase = DrawdownPhase::InDrawdown { start, max };
            self.maximum_drawdown = self.maximum_drawdown.max(drawdown);
        }

        self.last_value = value;
        self.last_date = date;
        self
    }

    /// Ends the fold, emitting an open period up to the last date.
    #[must_use]
    pub fn finish(mut self) -> DrawdownAnalysis {
        if let DrawdownPhase::InDrawdown { start, max } = self.phase {
            self.periods
                .push(DrawdownPeriod::new(start, self.last_date, max));
        }

        let current_drawdown = if self.last_value < self.peak {
            decline_from(self.peak, self.last_value)
        } else {
            Decimal::ZERO
        };

        DrawdownAnalysis {
            maximum_drawdown: self.maximum_drawdown,
            current_drawdown,
            periods: self.periods,
        }
    }
}

fn decline_from(peak: Decimal, value: Decimal) -> Decimal {
    if peak <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    peak.checked_sub(value)
        .and_then(|decline| decline.checked_div(peak))
        .unwrap_or_else(|| {
            tracing::warn!(%peak, %value, "drawdown overflows; saturated");
            Decimal::MAX
        })
}

/// Decomposes a value series into drawdown periods.
///
/// Empty input, or slices of different lengths, give an empty analysis.
///
/// # Example
///
/// ```rust
/// use perfcalc_analytics::risk::drawdown_analysis;
/// use perfcalc_core::Date;
/// use rust_decimal_macros::dec;
///
/// let d0 = Date::from_ymd(2025, 1, 1).unwrap();
/// let dates: Vec<Date> = (0..5).map(|i| d0.add_days(i)).collect();
/// let values = [dec!(100), dec!(90), dec!(95), dec!(80), dec!(120)];
///
/// let analysis = drawdown_analysis(&values, &dates);
/// assert_eq!(analysis.maximum_drawdown, dec!(0.2));
/// assert_eq!(analysis.periods.len(), 1);
/// assert_eq!(analysis.periods[0].duration_days, 4);
/// ```
#[must_use]
pub fn drawdown_analysis(values: &[Decimal], dates: &[Date]) -> DrawdownAnalysis {
    if values.is_empty() || values.len() != dates.len() {
        return DrawdownAnalysis::default();
    }

    let initial = DrawdownState::new(values[0], dates[0]);
    values
        .iter()
        .zip(dates)
        .skip(1)
        .fold(initial, |state, (value, date)| state.step(*value, *date))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dates(n: i64) -> Vec<Date> {
        let d0 = Date::from_ymd(2025, 1, 1).unwrap();
        (0..n).map(|i| d0.add_days(i)).collect()
    }

    #[test]
    fn test_decline_from() {
        assert_eq!(decline_from(dec!(100), dec!(80)), dec!(0.2));
        assert_eq!(decline_from(Decimal::ZERO, dec!(-5)), Decimal::ZERO);
        assert_eq!(decline_from(Decimal::new(1, 28), Decimal::MIN), Decimal::MAX);
    }

    #[test]
    fn test_single_recovered_drawdown() {
        let dates = dates(5);
        let values = [dec!(100), dec!(90), dec!(95), dec!(80), dec!(120)];

        let analysis = drawdown_analysis(&values, &dates);
        assert_eq!(analysis.maximum_drawdown, dec!(0.2));
        assert_eq!(analysis.current_drawdown, Decimal::ZERO);
        assert_eq!(analysis.periods.len(), 1);

        let period = analysis.periods[0];
        assert_eq!(period.start_date, dates[0]);
        assert_eq!(period.end_date, dates[3]);
        assert_eq!(period.duration_days, 4);
        assert_eq!(period.max_drawdown, dec!(0.2));
        assert!(period.is_recovered(dates[4]));
    }

    #[test]
    fn test_open_drawdown_at_end() {
        let dates = dates(4);
        let values = [dec!(100), dec!(110), dec!(99), dec!(104.5)];

        let analysis = drawdown_analysis(&values, &dates);
        assert_eq!(analysis.periods.len(), 1);

        let period = analysis.periods[0];
        assert_eq!(period.start_date, dates[1]);
        assert_eq!(period.end_date, dates[3]);
        assert_eq!(period.max_drawdown, dec!(0.1));
        assert!(!period.is_recovered(dates[3]));
        assert_eq!(analysis.current_drawdown, dec!(0.05));
    }

    #[test]
    fn test_multiple_periods() {
        let dates = dates(7);
        let values = [
            dec!(100),
            dec!(95),
            dec!(101),
            dec!(101),
            dec!(90.9),
            dec!(102),
            dec!(103),
        ];

        let analysis = drawdown_analysis(&values, &dates);
        assert_eq!(analysis.periods.len(), 2);
        assert_eq!(analysis.periods[0].max_drawdown, dec!(0.05));
        // equal-to-peak value opens the second period at the peak date
        assert_eq!(analysis.periods[1].start_date, dates[2]);
        assert_eq!(analysis.periods[1].end_date, dates[4]);
        assert_eq!(analysis.periods[1].max_drawdown, dec!(0.1));
        assert_eq!(analysis.maximum_drawdown, dec!(0.1));
        assert!(analysis.periods[0].end_date < analysis.periods[1].start_date);
    }

    #[test]
    fn test_monotonic_rise_has_no_periods() {
        let dates = dates(4);
        let values = [dec!(1), dec!(2), dec!(3), dec!(4)];
        let analysis = drawdown_analysis(&values, &dates);
        assert!(analysis.periods.is_empty());
        assert_eq!(analysis.maximum_drawdown, Decimal::ZERO);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(drawdown_analysis(&[], &[]), DrawdownAnalysis::default());
        assert_eq!(
            drawdown_analysis(&[dec!(1), dec!(2)], &dates(1)),
            DrawdownAnalysis::default()
        );
    }

    #[test]
    fn test_zero_peak_does_not_divide() {
        let dates = dates(3);
        let analysis = drawdown_analysis(&[dec!(0), dec!(0), dec!(0)], &dates);
        assert_eq!(analysis.maximum_drawdown, Decimal::ZERO);
        assert_eq!(analysis.periods.len(), 1);
    }

    #[test]
    fn test_step_phases() {
        let d = dates(3);
        let state = DrawdownState::new(dec!(100), d[0]);
        assert_eq!(state.phase(), DrawdownPhase::AtOrAbovePeak);

        let state = state.step(dec!(80), d[1]);
        assert_eq!(
            state.phase(),
            DrawdownPhase::InDrawdown {
                start: d[0],
                max: dec!(0.2)
            }
        );

        let state = state.step(dec!(120), d[2]);
        assert_eq!(state.phase(), DrawdownPhase::AtOrAbovePeak);
        assert_eq!(state.peak(), dec!(120));
    }
}
