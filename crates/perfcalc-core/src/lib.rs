//! # Perfcalc Core
//!
//! Core types for the Perfcalc portfolio performance analytics library.
//!
//! This crate provides the building blocks the calculators in
//! `perfcalc-analytics` consume:
//!
//! - **Dates**: [`Date`] and the inclusive [`DateRange`]
//! - **Valuations**: [`ValuationPoint`], a base-currency portfolio value on a date
//! - **Cash flows**: [`CashFlow`] with its [`CashFlowKind`] and the
//!   [`CashFlowCategory`] that decides how a TWR calculation treats it
//! - **Classification**: [`CashFlowClassifier`], the fixed kind-to-category table
//!
//! ## Example
//!
//! ```rust
//! use perfcalc_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let date = Date::from_ymd(2025, 3, 14).unwrap();
//! let flow = CashFlow::classified(date, dec!(-5000), CashFlowKind::ClientWithdrawal);
//! assert_eq!(flow.category(), CashFlowCategory::ExternalFlow);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        CashFlow, CashFlowCategory, CashFlowClassifier, CashFlowKind, Date, DateRange,
        ValuationPoint,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{
    CashFlow, CashFlowCategory, CashFlowClassifier, CashFlowKind, Date, DateRange, ValuationPoint,
};
