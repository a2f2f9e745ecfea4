//! Domain types for performance measurement.
//!
//! - [`Date`], [`DateRange`]: calendar dates and inclusive periods
//! - [`ValuationPoint`]: base-currency portfolio value on a date
//! - [`CashFlow`], [`CashFlowKind`], [`CashFlowCategory`]: categorised cash movements
//! - [`CashFlowClassifier`]: kind-to-category table

mod cashflow;
mod classifier;
mod date;
mod valuation;

pub use cashflow::{CashFlow, CashFlowCategory, CashFlowKind};
pub use classifier::CashFlowClassifier;
pub use date::{Date, DateRange};
pub use valuation::ValuationPoint;
