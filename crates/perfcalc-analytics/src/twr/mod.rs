//! Time-weighted return.
//!
//! - [`subperiods`]: splitting a valuation series at external cash flows
//! - [`chain`], [`annualize`]: geometric linking and annualisation
//! - [`calculate_enhanced_twr`]: the full cash-flow aware calculation
//! - [`TwrCalculator`]: config-carrying front end with multi-account fan-out

mod enhanced;
mod linking;
pub mod subperiods;

pub use enhanced::{
    calculate_enhanced_twr, sub_period_return, EnhancedTwrResult, SubPeriodReturn,
};
pub use linking::{annualize, annualize_with_basis, chain, time_weighted_return, SimpleSubPeriod};
pub use subperiods::{build, build_sub_periods, SubPeriod, SubPeriodPartition};

use perfcalc_core::{CashFlow, DateRange, ValuationPoint};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::parallel::maybe_parallel_map;

/// Inputs for one account's TWR calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwrRequest {
    /// Caller-side identifier, echoed in the output.
    pub account_id: String,
    /// Measurement period.
    pub period: DateRange,
    /// Portfolio valuations.
    pub valuations: Vec<ValuationPoint>,
    /// Classified cash flows.
    #[serde(default)]
    pub cash_flows: Vec<CashFlow>,
}

/// TWR result tagged with its account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTwr {
    /// Account identifier from the request.
    pub account_id: String,
    /// The calculation result.
    pub result: EnhancedTwrResult,
    /// Annualised return on the configured basis.
    pub annualized_return: Decimal,
}

/// Time-weighted return calculator.
///
/// Wraps [`calculate_enhanced_twr`] with an [`AnalyticsConfig`] that supplies
/// the annualisation basis and decides when to fan out in parallel.
///
/// # Example
///
/// ```rust,ignore
/// let calculator = TwrCalculator::new(AnalyticsConfig::default());
/// let results = calculator.calculate_many(&requests);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TwrCalculator {
    config: AnalyticsConfig,
}

impl TwrCalculator {
    /// Creates a calculator with the given configuration.
    #[must_use]
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Calculates the TWR of a single account.
    #[must_use]
    pub fn calculate(
        &self,
        valuations: &[ValuationPoint],
        cash_flows: &[CashFlow],
        period: DateRange,
    ) -> EnhancedTwrResult {
        calculate_enhanced_twr(valuations, cash_flows, period)
    }

    /// Annualises a result on the configured days-per-year basis.
    #[must_use]
    pub fn annualized(&self, result: &EnhancedTwrResult) -> Decimal {
        result.annualized_return_with_basis(self.config.days_per_year)
    }

    /// Calculates every request, in parallel above the configured threshold.
    ///
    /// Output order matches input order.
    #[must_use]
    pub fn calculate_many(&self, requests: &[TwrRequest]) -> Vec<AccountTwr> {
        tracing::debug!(
            accounts = requests.len(),
            parallel = self.config.should_parallelize(requests.len()),
            "calculating TWR for accounts"
        );

        maybe_parallel_map(requests, &self.config, |req| {
            let result = self.calculate(&req.valuations, &req.cash_flows, req.period);
            let annualized_return = self.annualized(&result);
            AccountTwr {
                account_id: req.account_id.clone(),
                result,
                annualized_return,
            }
        })
    }
}
