//! Contribution analysis: how much each holding added to portfolio return.
//!
//! A holding's contribution is its start-of-period weight times its return,
//! so contributions sum to the portfolio return when weights share the same
//! portfolio start value.

mod analysis;
mod position;

pub use analysis::{
    analyze_contributions, ContributionAnalysis, HoldingValue, InstrumentContribution,
};
pub use position::{
    calculate_contribution, percentage_contribution, portfolio_return, top_and_worst_contributors,
    ContributionResult, ContributionSummary,
};
