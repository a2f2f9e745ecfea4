//! Configuration for performance and risk analytics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Default annual risk-free rate used for the Sharpe ratio (2%).
pub const DEFAULT_RISK_FREE_RATE: Decimal = dec!(0.02);

/// Default VaR confidence level (95%).
pub const DEFAULT_VAR_CONFIDENCE: Decimal = dec!(0.95);

/// Default rolling-volatility window, in return observations.
pub const DEFAULT_ROLLING_WINDOW: usize = 30;

/// Calendar days per year used for annualisation.
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Configuration for analytics computation.
///
/// Controls the risk parameters and parallel fan-out. Every field has a
/// default, so partial TOML/JSON documents deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Annual risk-free rate for the Sharpe ratio.
    pub risk_free_rate: Decimal,

    /// Confidence level for historical VaR, strictly between 0 and 1.
    pub var_confidence: Decimal,

    /// Number of returns in each rolling-volatility window.
    pub rolling_window: usize,

    /// Days per year used when annualising.
    pub days_per_year: Decimal,

    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum item count to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            days_per_year: DAYS_PER_YEAR,
            parallel: true,
            parallel_threshold: 100,
        }
    }
}

impl AnalyticsConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: Decimal) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Sets the VaR confidence level.
    #[must_use]
    pub fn with_var_confidence(mut self, confidence: Decimal) -> Self {
        self.var_confidence = confidence;
        self
    }

    /// Sets the rolling-volatility window.
    #[must_use]
    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    /// Sets the annualisation basis.
    #[must_use]
    pub fn with_days_per_year(mut self, days: Decimal) -> Self {
        self.days_per_year = days;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Checks every field against its valid domain.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.var_confidence <= Decimal::ZERO || self.var_confidence >= Decimal::ONE {
            return Err(AnalyticsError::invalid_config(
                "var_confidence",
                format!("{} is not strictly between 0 and 1", self.var_confidence),
            ));
        }
        if self.days_per_year <= Decimal::ZERO {
            return Err(AnalyticsError::invalid_config(
                "days_per_year",
                "must be positive",
            ));
        }
        if self.rolling_window == 0 {
            return Err(AnalyticsError::invalid_config(
                "rolling_window",
                "must be at least 1",
            ));
        }
        if self.risk_free_rate <= Decimal::NEGATIVE_ONE {
            return Err(AnalyticsError::invalid_config(
                "risk_free_rate",
                "must be greater than -100%",
            ));
        }
        Ok(())
    }
}
