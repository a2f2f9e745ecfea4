//! CLI command implementations.

pub mod attribution;
pub mod classify;
pub mod config;
pub mod contribution;
pub mod risk;
pub mod twr;

// Re-export submodules for convenience
pub use attribution::AttributionArgs;
pub use classify::ClassifyArgs;
pub use config::ConfigArgs;
pub use contribution::ContributionArgs;
pub use risk::RiskArgs;
pub use twr::TwrArgs;

use perfcalc_core::Date;

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29").unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert!(matches!(parse_date("2023-02-29"), Err(CliError::InvalidDate(_))));
        assert!(matches!(parse_date("29/02/2024"), Err(CliError::InvalidDate(_))));
    }
}
