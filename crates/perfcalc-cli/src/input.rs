//! Input documents and configuration loading.

use std::path::Path;

use perfcalc_analytics::contribution::HoldingValue;
use perfcalc_analytics::twr::TwrRequest;
use perfcalc_analytics::AnalyticsConfig;
use perfcalc_core::{CashFlow, CashFlowCategory, CashFlowKind, Date, DateRange, ValuationPoint};
use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};

use crate::error::{CliError, CliResult};

/// Loads the analytics configuration, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> CliResult<AnalyticsConfig> {
    let Some(path) = path else {
        return Ok(AnalyticsConfig::default());
    };

    let content = read_to_string(path)?;
    let config: AnalyticsConfig =
        toml::from_str(&content).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(path = %path.display(), "loaded analytics configuration");
    Ok(config)
}

/// Reads and parses a JSON input document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_to_string(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// A cash flow as written in an input file.
///
/// The category may be omitted, in which case it comes from the
/// classification table.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowInput {
    pub date: Date,
    pub amount: Decimal,
    #[serde(deserialize_with = "any_case_kind")]
    pub kind: CashFlowKind,
    #[serde(default)]
    pub category: Option<CashFlowCategory>,
    #[serde(default)]
    pub description: String,
}

fn any_case_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CashFlowKind, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(de::Error::custom)
}

impl From<FlowInput> for CashFlow {
    fn from(flow: FlowInput) -> Self {
        let cf = match flow.category {
            Some(category) => CashFlow::new(flow.date, flow.amount, flow.kind, category),
            None => CashFlow::classified(flow.date, flow.amount, flow.kind),
        };
        cf.with_description(flow.description)
    }
}

/// One account in a `twr` input file.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInput {
    pub account_id: String,
    pub period: DateRange,
    pub valuations: Vec<ValuationPoint>,
    #[serde(default)]
    pub cash_flows: Vec<FlowInput>,
}

impl From<AccountInput> for TwrRequest {
    fn from(account: AccountInput) -> Self {
        TwrRequest {
            account_id: account.account_id,
            period: account.period,
            valuations: account.valuations,
            cash_flows: account.cash_flows.into_iter().map(CashFlow::from).collect(),
        }
    }
}

/// A `twr` input file: a single account or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TwrDocument {
    Many(Vec<AccountInput>),
    One(AccountInput),
}

impl TwrDocument {
    pub fn into_requests(self) -> Vec<TwrRequest> {
        match self {
            TwrDocument::Many(accounts) => accounts.into_iter().map(TwrRequest::from).collect(),
            TwrDocument::One(account) => vec![account.into()],
        }
    }
}

/// A `risk` input file.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskDocument {
    pub valuations: Vec<ValuationPoint>,
}

/// A `contribution` input file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionDocument {
    pub period: DateRange,
    pub start_holdings: Vec<HoldingValue>,
    pub end_holdings: Vec<HoldingValue>,
}
