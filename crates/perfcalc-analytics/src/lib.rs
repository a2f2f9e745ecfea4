//! # Perfcalc Analytics
//!
//! Performance and risk calculators for investment portfolios.
//!
//! This crate turns the valuation series and classified cash flows from
//! `perfcalc-core` into performance figures.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: every calculation is stateless with explicit inputs
//! - **Exact arithmetic**: returns and weights are `rust_decimal::Decimal`
//! - **Zero results for degenerate input**: empty series or non-positive
//!   start values give zero figures, not errors
//! - **Config-driven parallelism**: optional rayon fan-out over accounts
//!
//! ## Features
//!
//! - **Time-weighted return**: sub-periods split at external flows, geometric
//!   linking, annualisation
//! - **Risk metrics**: annualised volatility, Sharpe ratio, drawdown periods,
//!   historical VaR, rolling volatility, qualitative assessment
//! - **Contribution**: per-holding contribution to portfolio return
//! - **Attribution**: Brinson allocation, selection and interaction effects
//!   per instrument and per sector
//!
//! ## Quick Start
//!
//! ```rust
//! use perfcalc_analytics::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let d = |day| Date::from_ymd(2025, 1, day).unwrap();
//! let valuations = [
//!     ValuationPoint::new(d(1), dec!(1000)),
//!     ValuationPoint::new(d(31), dec!(1100)),
//! ];
//! let period = DateRange::new(d(1), d(31)).unwrap();
//!
//! let result = calculate_enhanced_twr(&valuations, &[], period);
//! assert_eq!(result.total_return, dec!(0.1));
//! ```
//!
//! ## Module Overview
//!
//! - [`twr`] - Sub-periods, linking and the TWR calculator
//! - [`risk`] - Volatility, Sharpe, drawdowns, VaR and risk assessment
//! - [`contribution`] - Holding contribution analysis
//! - [`attribution`] - Brinson attribution and the data source seam
//! - [`config`] - Calculator configuration
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based fan-out in [`twr::TwrCalculator::calculate_many`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod attribution;
pub mod config;
pub mod contribution;
pub mod error;
pub(crate) mod math;
pub mod parallel;
pub mod risk;
pub mod twr;

// Re-export error types at crate root
pub use error::{AnalyticsError, AnalyticsResult};

// Re-export configuration
pub use config::AnalyticsConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::attribution::{
        attribute, attribute_segments, sector_attribution, AttributionAnalysisResult,
        AttributionSource, InMemorySource, SectorHolding, SegmentInput,
    };
    pub use crate::config::AnalyticsConfig;
    pub use crate::contribution::{analyze_contributions, calculate_contribution, HoldingValue};
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::risk::{
        calculate_risk_metrics, drawdown_analysis, historical_var, rolling_volatility,
        RiskAssessment, RiskCalculator, RiskMetricsResult,
    };
    pub use crate::twr::{
        annualize, build_sub_periods, calculate_enhanced_twr, chain, EnhancedTwrResult,
        TwrCalculator,
    };

    pub use perfcalc_core::prelude::*;
}
