//! Portfolio valuation points.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Date;

/// A portfolio's base-currency value on a given date.
///
/// Values are expected to be already converted to the reporting currency
/// and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValuationPoint {
    /// Valuation date (end of day).
    pub date: Date,
    /// Portfolio value in base currency.
    pub value: Decimal,
}

impl ValuationPoint {
    /// Creates a new valuation point.
    #[must_use]
    pub fn new(date: Date, value: Decimal) -> Self {
        Self { date, value }
    }
}
