//! Error types for performance analytics.
//!
//! Degenerate inputs (empty series, non-positive start values) are not errors:
//! the calculators return zero-valued results for them. The variants here are
//! reserved for calculations that cannot produce a meaningful answer.

use perfcalc_core::CoreError;
use thiserror::Error;

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors that can occur during analytics calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Required data is absent, e.g. chaining zero sub-periods.
    #[error("Missing data: {reason}")]
    MissingData {
        /// What was missing.
        reason: String,
    },

    /// A referenced record could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record (portfolio, benchmark, ...).
        entity: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// An argument is outside its valid domain.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected.
        reason: String,
    },

    /// A configuration value is outside its valid domain.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        /// Offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Error bubbled up from the core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AnalyticsError {
    /// Create a missing data error.
    #[must_use]
    pub fn missing_data(reason: impl Into<String>) -> Self {
        Self::MissingData {
            reason: reason.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for the "insufficient data" family the API layer reports to users.
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::MissingData { .. } | Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::missing_data("at least one sub-period is required");
        assert!(err.to_string().contains("sub-period"));

        let err = AnalyticsError::not_found("Benchmark", "MSCI-WORLD");
        assert_eq!(err.to_string(), "Benchmark not found: MSCI-WORLD");

        let err = AnalyticsError::invalid_config("var_confidence", "must be in (0, 1)");
        assert!(err.to_string().contains("var_confidence"));
    }

    #[test]
    fn test_insufficient_data_family() {
        assert!(AnalyticsError::missing_data("x").is_insufficient_data());
        assert!(AnalyticsError::not_found("Portfolio", "P1").is_insufficient_data());
        assert!(!AnalyticsError::invalid_argument("days must be positive").is_insufficient_data());
    }

    #[test]
    fn test_from_core_error() {
        let err: AnalyticsError = CoreError::invalid_date("bad").into();
        assert!(matches!(err, AnalyticsError::Core(_)));
    }
}
