//! Risk analytics for portfolio valuation series.
//!
//! This module provides:
//!
//! - **Volatility**: population standard deviation of periodic returns, annualised
//! - **Sharpe ratio**: excess annualised return per unit of volatility
//! - **Drawdowns**: maximum, current and a full period decomposition
//! - **VaR**: historical Value at Risk
//! - **Rolling volatility**: fixed-window volatility series for charting
//! - **Assessment**: categories, a 1-10 score and a risk profile
//!
//! # Example
//!
//! ```rust,ignore
//! use perfcalc_analytics::risk::*;
//!
//! let metrics = calculate_risk_metrics(&values, &dates, dec!(0.02));
//! let assessment = RiskAssessment::from_metrics(&metrics);
//! println!("Sharpe: {} ({})", metrics.sharpe_ratio, assessment.sharpe_category);
//! ```

pub mod assessment;
pub mod drawdown;
mod metrics;
mod rolling;
mod var;

pub use assessment::{
    risk_score, DrawdownCategory, RiskAssessment, RiskProfile, SharpeCategory, VolatilityCategory,
};
pub use drawdown::{
    drawdown_analysis, DrawdownAnalysis, DrawdownPeriod, DrawdownPhase, DrawdownState,
};
pub use metrics::{
    average_spacing_days, calculate_risk_metrics, periodic_returns, try_calculate_risk_metrics,
    RiskMetricsResult,
};
pub use rolling::{rolling_volatility, rolling_volatility_with_basis, RollingVolatilityPoint};
pub use var::historical_var;

use perfcalc_core::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{AnalyticsConfig, DEFAULT_VAR_CONFIDENCE};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Everything the risk calculator reports for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Core metrics; `value_at_risk_95` is always at 95%.
    pub metrics: RiskMetricsResult,
    /// Confidence level used for `value_at_risk`.
    pub var_confidence: Decimal,
    /// Historical VaR at the configured confidence.
    pub value_at_risk: Decimal,
    /// Risk-free rate used for the Sharpe ratio.
    pub risk_free_rate: Decimal,
    /// Rolling volatility at the configured window.
    pub rolling_volatility: Vec<RollingVolatilityPoint>,
    /// Qualitative reading of the metrics.
    pub assessment: RiskAssessment,
    /// Profile implied by volatility and drawdown; `None` without data.
    pub profile: Option<RiskProfile>,
    /// Last observation date, used to mark drawdowns as recovered.
    pub as_of: Option<Date>,
}

impl RiskReport {
    /// Drawdown periods that ended before the last observation.
    pub fn recovered_drawdowns(&self) -> impl Iterator<Item = &DrawdownPeriod> {
        let as_of = self.as_of;
        self.metrics
            .drawdown_periods
            .iter()
            .filter(move |p| as_of.is_some_and(|d| p.is_recovered(d)))
    }
}

/// Risk calculator driven by an [`AnalyticsConfig`].
///
/// Uses the configured risk-free rate, VaR confidence, rolling window and
/// days-per-year basis.
#[derive(Debug, Clone, Default)]
pub struct RiskCalculator {
    config: AnalyticsConfig,
}

impl RiskCalculator {
    /// Creates a calculator.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: AnalyticsConfig) -> AnalyticsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Computes the full report for a valuation series.
    ///
    /// Fewer than two observations give zero metrics with an
    /// "insufficient data" assessment.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidArgument` if `values` and `dates`
    /// differ in length, or if an annualised figure overflows.
    pub fn calculate(&self, values: &[Decimal], dates: &[Date]) -> AnalyticsResult<RiskReport> {
        if values.len() != dates.len() {
            return Err(AnalyticsError::invalid_argument(format!(
                "{} values but {} dates",
                values.len(),
                dates.len()
            )));
        }

        if values.len() < 2 {
            tracing::warn!(observations = values.len(), "too few observations for risk metrics");
            return Ok(RiskReport {
                metrics: RiskMetricsResult::default(),
                var_confidence: self.config.var_confidence,
                value_at_risk: Decimal::ZERO,
                risk_free_rate: self.config.risk_free_rate,
                rolling_volatility: Vec::new(),
                assessment: RiskAssessment::insufficient_data(),
                profile: None,
                as_of: dates.last().copied(),
            });
        }

        let metrics = metrics::compute(
            values,
            dates,
            self.config.risk_free_rate,
            self.config.days_per_year,
            DEFAULT_VAR_CONFIDENCE,
        )?;
        let value_at_risk = historical_var(&periodic_returns(values), self.config.var_confidence)?;
        let rolling = rolling_volatility_with_basis(
            values,
            dates,
            self.config.rolling_window,
            self.config.days_per_year,
        );

        Ok(RiskReport {
            assessment: RiskAssessment::from_metrics(&metrics),
            profile: Some(RiskProfile::classify(&metrics)),
            metrics,
            var_confidence: self.config.var_confidence,
            value_at_risk,
            risk_free_rate: self.config.risk_free_rate,
            rolling_volatility: rolling,
            as_of: dates.last().copied(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn daily(n: i64) -> Vec<Date> {
        let d0 = Date::from_ymd(2025, 1, 1).unwrap();
        (0..n).map(|i| d0.add_days(i)).collect()
    }

    #[test]
    fn test_calculator_rejects_invalid_config() {
        let config = AnalyticsConfig::default().with_rolling_window(0);
        assert!(matches!(
            RiskCalculator::new(config),
            Err(AnalyticsError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_report_matches_free_function() {
        let values = [dec!(100), dec!(90), dec!(95), dec!(80), dec!(120)];
        let dates = daily(5);
        let config = AnalyticsConfig::default().with_rolling_window(2);
        let calculator = RiskCalculator::new(config).unwrap();

        let report = calculator.calculate(&values, &dates).unwrap();
        assert_eq!(report.metrics, calculate_risk_metrics(&values, &dates, dec!(0.02)));
        assert_eq!(report.value_at_risk, report.metrics.value_at_risk_95);
        assert_eq!(report.rolling_volatility.len(), 2);
        assert_eq!(report.profile, Some(RiskProfile::Aggressive));
        assert_eq!(report.recovered_drawdowns().count(), 1);
    }

    #[test]
    fn test_report_extreme_swings_are_an_error() {
        let values = [dec!(0.0000000001), dec!(100000), dec!(0.0000000001), dec!(100000)];
        let result = RiskCalculator::default().calculate(&values, &daily(4));
        assert!(matches!(result, Err(AnalyticsError::InvalidArgument { .. })));
    }

    #[test]
    fn test_report_insufficient_data() {
        let calculator = RiskCalculator::default();
        let report = calculator.calculate(&[dec!(100)], &daily(1)).unwrap();
        assert_eq!(report.metrics, RiskMetricsResult::default());
        assert_eq!(report.profile, None);
        assert_eq!(report.assessment.warnings.len(), 1);
    }

    #[test]
    fn test_report_length_mismatch() {
        let calculator = RiskCalculator::default();
        assert!(calculator.calculate(&[dec!(1), dec!(2)], &daily(3)).is_err());
    }
}
