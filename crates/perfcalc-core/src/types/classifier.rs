//! Cash flow classification for performance calculation.
//!
//! Maps each [`CashFlowKind`] to the [`CashFlowCategory`] that decides its
//! TWR treatment. Only external flows (money crossing the portfolio
//! boundary at the client's instruction) break sub-periods.

use super::{CashFlowCategory, CashFlowKind};

/// Fixed classification table for cash-flow kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowClassifier;

impl CashFlowClassifier {
    /// Classifies a cash-flow kind.
    ///
    /// Performance-influencing:
    /// - dividends, coupons, interest, realised gain/loss
    /// - management and custody fees, transaction costs
    /// - withholding tax and reclaims, FX gain/loss
    ///
    /// External:
    /// - client contributions and withdrawals, income distributions
    /// - transfers in/out, return of capital, capital calls
    /// - performance-fee payments, estimated tax payments
    ///
    /// Internal:
    /// - sleeve transfers, cash sweeps, settlement and accrued-interest adjustments
    #[must_use]
    pub const fn classify(kind: CashFlowKind) -> CashFlowCategory {
        match kind {
            CashFlowKind::Dividend
            | CashFlowKind::DividendReinvested
            | CashFlowKind::BondCoupon
            | CashFlowKind::InterestEarned
            | CashFlowKind::RealizedGainLoss
            | CashFlowKind::ManagementFee
            | CashFlowKind::CustodyFee
            | CashFlowKind::TransactionCost
            | CashFlowKind::TaxWithholding
            | CashFlowKind::TaxReclaim
            | CashFlowKind::ForeignExchangeGainLoss => CashFlowCategory::PerformanceInfluencing,

            CashFlowKind::ClientContribution
            | CashFlowKind::ClientWithdrawal
            | CashFlowKind::IncomeDistribution
            | CashFlowKind::TransferIn
            | CashFlowKind::TransferOut
            | CashFlowKind::ReturnOfCapital
            | CashFlowKind::CapitalCall
            | CashFlowKind::PerformanceFeePayment
            | CashFlowKind::EstimatedTaxPayment => CashFlowCategory::ExternalFlow,

            CashFlowKind::InternalTransfer
            | CashFlowKind::CashSweep
            | CashFlowKind::SettlementAdjustment
            | CashFlowKind::AccruedInterestAdjustment => CashFlowCategory::Internal,
        }
    }

    /// Check if a kind breaks TWR sub-periods
    #[must_use]
    pub const fn is_external(kind: CashFlowKind) -> bool {
        matches!(Self::classify(kind), CashFlowCategory::ExternalFlow)
    }

    /// Check if a kind stays in the sub-period numerator
    #[must_use]
    pub const fn is_performance_influencing(kind: CashFlowKind) -> bool {
        matches!(
            Self::classify(kind),
            CashFlowCategory::PerformanceInfluencing
        )
    }
}
