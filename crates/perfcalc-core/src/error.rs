//! Error types for the core domain types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing core domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid or unparseable calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Date range whose end precedes its start.
    #[error("Invalid date range: start date {start} must be on or before end date {end}")]
    InvalidDateRange {
        /// Requested start date (ISO format).
        start: String,
        /// Requested end date (ISO format).
        end: String,
    },

    /// Cash-flow kind name that is not part of the classification table.
    #[error("Unknown cash flow kind: {name}")]
    UnknownCashFlowKind {
        /// The unrecognised name.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid date range error.
    #[must_use]
    pub fn invalid_date_range(start: impl ToString, end: impl ToString) -> Self {
        Self::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Creates an unknown cash-flow kind error.
    #[must_use]
    pub fn unknown_kind(name: impl Into<String>) -> Self {
        Self::UnknownCashFlowKind { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));

        let err = CoreError::invalid_date_range("2025-02-01", "2025-01-01");
        assert!(err.to_string().contains("2025-02-01"));
        assert!(err.to_string().contains("2025-01-01"));
    }

    #[test]
    fn test_unknown_kind() {
        let err = CoreError::unknown_kind("Bonus");
        assert_eq!(err.to_string(), "Unknown cash flow kind: Bonus");
    }
}
