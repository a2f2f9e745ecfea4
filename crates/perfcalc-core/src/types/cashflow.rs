//! Cash flow types for performance measurement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::classifier::CashFlowClassifier;
use super::Date;
use crate::error::CoreError;

/// Kind of cash movement recorded against an account.
///
/// The kind is what the book of record stores; the TWR treatment is derived
/// from it through [`CashFlowClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowKind {
    // Performance-influencing: stay inside the sub-period numerator
    /// Cash dividend received
    Dividend,
    /// Dividend automatically reinvested
    DividendReinvested,
    /// Bond coupon payment
    BondCoupon,
    /// Interest on cash balances
    InterestEarned,
    /// Proceeds attributable to a realised gain or loss
    RealizedGainLoss,
    /// Management fee (net-of-fee returns)
    ManagementFee,
    /// Custody fee
    CustodyFee,
    /// Commissions and other trading costs
    TransactionCost,
    /// Withholding tax on income
    TaxWithholding,
    /// Withholding tax reclaimed
    TaxReclaim,
    /// FX revaluation adjustment
    ForeignExchangeGainLoss,

    // External: client-driven, break TWR sub-periods
    /// Client deposits cash
    ClientContribution,
    /// Client withdraws cash
    ClientWithdrawal,
    /// Income paid out to the client
    IncomeDistribution,
    /// Securities or cash transferred in
    TransferIn,
    /// Securities or cash transferred out
    TransferOut,
    /// Return of capital (REIT/MLP)
    ReturnOfCapital,
    /// Private-markets capital call
    CapitalCall,
    /// Performance fee paid to an external party
    PerformanceFeePayment,
    /// Tax paid on behalf of the client
    EstimatedTaxPayment,

    // Internal: no effect on portfolio TWR
    /// Transfer between sleeves of the same portfolio
    InternalTransfer,
    /// Automatic cash management sweep
    CashSweep,
    /// Trade settlement correction
    SettlementAdjustment,
    /// Bond accrued interest adjustment
    AccruedInterestAdjustment,
}

impl CashFlowKind {
    /// Every kind, in declaration order.
    pub const ALL: [CashFlowKind; 24] = [
        CashFlowKind::Dividend,
        CashFlowKind::DividendReinvested,
        CashFlowKind::BondCoupon,
        CashFlowKind::InterestEarned,
        CashFlowKind::RealizedGainLoss,
        CashFlowKind::ManagementFee,
        CashFlowKind::CustodyFee,
        CashFlowKind::TransactionCost,
        CashFlowKind::TaxWithholding,
        CashFlowKind::TaxReclaim,
        CashFlowKind::ForeignExchangeGainLoss,
        CashFlowKind::ClientContribution,
        CashFlowKind::ClientWithdrawal,
        CashFlowKind::IncomeDistribution,
        CashFlowKind::TransferIn,
        CashFlowKind::TransferOut,
        CashFlowKind::ReturnOfCapital,
        CashFlowKind::CapitalCall,
        CashFlowKind::PerformanceFeePayment,
        CashFlowKind::EstimatedTaxPayment,
        CashFlowKind::InternalTransfer,
        CashFlowKind::CashSweep,
        CashFlowKind::SettlementAdjustment,
        CashFlowKind::AccruedInterestAdjustment,
    ];

    /// Returns the variant name, e.g. `"ClientContribution"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CashFlowKind::Dividend => "Dividend",
            CashFlowKind::DividendReinvested => "DividendReinvested",
            CashFlowKind::BondCoupon => "BondCoupon",
            CashFlowKind::InterestEarned => "InterestEarned",
            CashFlowKind::RealizedGainLoss => "RealizedGainLoss",
            CashFlowKind::ManagementFee => "ManagementFee",
            CashFlowKind::CustodyFee => "CustodyFee",
            CashFlowKind::TransactionCost => "TransactionCost",
            CashFlowKind::TaxWithholding => "TaxWithholding",
            CashFlowKind::TaxReclaim => "TaxReclaim",
            CashFlowKind::ForeignExchangeGainLoss => "ForeignExchangeGainLoss",
            CashFlowKind::ClientContribution => "ClientContribution",
            CashFlowKind::ClientWithdrawal => "ClientWithdrawal",
            CashFlowKind::IncomeDistribution => "IncomeDistribution",
            CashFlowKind::TransferIn => "TransferIn",
            CashFlowKind::TransferOut => "TransferOut",
            CashFlowKind::ReturnOfCapital => "ReturnOfCapital",
            CashFlowKind::CapitalCall => "CapitalCall",
            CashFlowKind::PerformanceFeePayment => "PerformanceFeePayment",
            CashFlowKind::EstimatedTaxPayment => "EstimatedTaxPayment",
            CashFlowKind::InternalTransfer => "InternalTransfer",
            CashFlowKind::CashSweep => "CashSweep",
            CashFlowKind::SettlementAdjustment => "SettlementAdjustment",
            CashFlowKind::AccruedInterestAdjustment => "AccruedInterestAdjustment",
        }
    }
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CashFlowKind {
    type Err = CoreError;

    /// Parses a kind from its variant name. Case, `_` and `-` are ignored, so
    /// `ClientContribution`, `client_contribution` and `client-contribution`
    /// all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        CashFlowKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| CoreError::unknown_kind(s))
    }
}

/// TWR treatment category for a cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowCategory {
    /// Kept in the sub-period return numerator (income, fees, costs).
    PerformanceInfluencing,
    /// Client-driven capital movement; breaks TWR sub-periods.
    ExternalFlow,
    /// Accounting movement with no effect on portfolio TWR.
    Internal,
}

impl fmt::Display for CashFlowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowCategory::PerformanceInfluencing => "Performance-influencing",
            CashFlowCategory::ExternalFlow => "External flow",
            CashFlowCategory::Internal => "Internal",
        };
        write!(f, "{name}")
    }
}

/// A dated, categorised cash flow.
///
/// `amount` is signed: inflows are positive, outflows negative. The category
/// is fixed at construction and never re-derived by the calculators.
///
/// # Example
///
/// ```rust
/// use perfcalc_core::types::{CashFlow, CashFlowCategory, CashFlowKind, Date};
/// use rust_decimal_macros::dec;
///
/// let cf = CashFlow::classified(
///     Date::from_ymd(2025, 6, 15).unwrap(),
///     dec!(125.40),
///     CashFlowKind::Dividend,
/// );
/// assert_eq!(cf.category(), CashFlowCategory::PerformanceInfluencing);
/// assert_eq!(cf.amount(), dec!(125.40));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    date: Date,
    amount: Decimal,
    kind: CashFlowKind,
    category: CashFlowCategory,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
}

impl CashFlow {
    /// Creates a cash flow with an explicitly assigned category.
    #[must_use]
    pub fn new(
        date: Date,
        amount: Decimal,
        kind: CashFlowKind,
        category: CashFlowCategory,
    ) -> Self {
        Self {
            date,
            amount,
            kind,
            category,
            description: String::new(),
        }
    }

    /// Creates a cash flow whose category comes from the classification table.
    #[must_use]
    pub fn classified(date: Date, amount: Decimal, kind: CashFlowKind) -> Self {
        Self::new(date, amount, kind, CashFlowClassifier::classify(kind))
    }

    /// Attaches a free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Date the flow was booked.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Signed amount in base currency.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Recorded kind.
    #[must_use]
    pub fn kind(&self) -> CashFlowKind {
        self.kind
    }

    /// Assigned TWR treatment.
    #[must_use]
    pub fn category(&self) -> CashFlowCategory {
        self.category
    }

    /// Free-text description (may be empty).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True if the flow breaks TWR sub-periods.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.category == CashFlowCategory::ExternalFlow
    }

    /// True if the flow stays in the sub-period numerator.
    #[must_use]
    pub fn is_performance_influencing(&self) -> bool {
        self.category == CashFlowCategory::PerformanceInfluencing
    }
}
