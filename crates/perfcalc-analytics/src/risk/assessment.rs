//! Qualitative reading of a [`RiskMetricsResult`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::metrics::RiskMetricsResult;

/// Volatility band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityCategory {
    /// Below 5%.
    Low,
    /// 5% to 15%.
    Medium,
    /// 15% and above.
    High,
}

impl VolatilityCategory {
    /// Bands an annualised volatility.
    #[must_use]
    pub fn from_volatility(volatility: Decimal) -> Self {
        if volatility < dec!(0.05) {
            Self::Low
        } else if volatility < dec!(0.15) {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Sharpe ratio band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SharpeCategory {
    /// Below 0.5.
    Poor,
    /// 0.5 to 1.
    Fair,
    /// 1 to 2.
    Good,
    /// 2 and above.
    Excellent,
}

impl SharpeCategory {
    /// Bands a Sharpe ratio.
    #[must_use]
    pub fn from_sharpe(sharpe: Decimal) -> Self {
        if sharpe < dec!(0.5) {
            Self::Poor
        } else if sharpe < Decimal::ONE {
            Self::Fair
        } else if sharpe < dec!(2) {
            Self::Good
        } else {
            Self::Excellent
        }
    }
}

/// Maximum drawdown band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawdownCategory {
    /// Below 5%.
    Minimal,
    /// 5% to 15%.
    Moderate,
    /// 15% and above.
    Severe,
}

impl DrawdownCategory {
    /// Bands a maximum drawdown.
    #[must_use]
    pub fn from_drawdown(drawdown: Decimal) -> Self {
        if drawdown < dec!(0.05) {
            Self::Minimal
        } else if drawdown < dec!(0.15) {
            Self::Moderate
        } else {
            Self::Severe
        }
    }
}

macro_rules! display_as_debug {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        })*
    };
}

display_as_debug!(VolatilityCategory, SharpeCategory, DrawdownCategory, RiskProfile);

/// Investor risk profile implied by volatility and drawdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    /// Volatility under 8% and drawdown under 10%.
    Conservative,
    /// Volatility under 15% and drawdown under 20%.
    Moderate,
    /// Anything riskier.
    Aggressive,
}

impl RiskProfile {
    /// Classifies a metrics result.
    #[must_use]
    pub fn classify(metrics: &RiskMetricsResult) -> Self {
        let vol = metrics.annualized_volatility;
        let mdd = metrics.maximum_drawdown;
        if vol < dec!(0.08) && mdd < dec!(0.10) {
            Self::Conservative
        } else if vol < dec!(0.15) && mdd < dec!(0.20) {
            Self::Moderate
        } else {
            Self::Aggressive
        }
    }
}

/// Categories, score and commentary derived from risk metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Volatility band.
    pub volatility_category: VolatilityCategory,
    /// Sharpe ratio band.
    pub sharpe_category: SharpeCategory,
    /// Drawdown band.
    pub drawdown_category: DrawdownCategory,
    /// 1 (riskiest) to 10 (safest).
    pub risk_score: Decimal,
    /// One-line summary keyed off the score.
    pub overall_assessment: String,
    /// Concerns raised by the metrics.
    pub warnings: Vec<String>,
    /// Strengths shown by the metrics.
    pub positive_factors: Vec<String>,
}

impl RiskAssessment {
    /// Builds an assessment from computed metrics.
    #[must_use]
    pub fn from_metrics(metrics: &RiskMetricsResult) -> Self {
        let vol = metrics.annualized_volatility;
        let sharpe = metrics.sharpe_ratio;
        let mdd = metrics.maximum_drawdown;

        let mut warnings = Vec::new();
        let mut positive_factors = Vec::new();

        if vol > dec!(0.20) {
            warnings.push("High volatility indicates significant price swings".to_string());
        } else if vol < dec!(0.08) {
            positive_factors.push("Low volatility suggests stable returns".to_string());
        }

        if sharpe > Decimal::ONE {
            positive_factors.push("Strong risk-adjusted returns".to_string());
        } else if sharpe < dec!(0.5) {
            warnings.push("Poor risk-adjusted performance".to_string());
        }

        if mdd > dec!(0.20) {
            warnings.push("Large drawdowns may test investor patience".to_string());
        } else if mdd < dec!(0.10) {
            positive_factors.push("Controlled downside risk".to_string());
        }

        if metrics.current_drawdown > dec!(0.05) {
            warnings.push("Currently experiencing a drawdown period".to_string());
        }

        let risk_score = risk_score(metrics);

        Self {
            volatility_category: VolatilityCategory::from_volatility(vol),
            sharpe_category: SharpeCategory::from_sharpe(sharpe),
            drawdown_category: DrawdownCategory::from_drawdown(mdd),
            risk_score,
            overall_assessment: overall_assessment(risk_score).to_string(),
            warnings,
            positive_factors,
        }
    }

    /// Assessment reported when there are too few observations to measure risk.
    #[must_use]
    pub fn insufficient_data() -> Self {
        Self {
            volatility_category: VolatilityCategory::Low,
            sharpe_category: SharpeCategory::Poor,
            drawdown_category: DrawdownCategory::Minimal,
            risk_score: Decimal::ZERO,
            overall_assessment: "Insufficient data for risk analysis".to_string(),
            warnings: vec![
                "Not enough historical data to calculate reliable risk metrics".to_string(),
            ],
            positive_factors: Vec::new(),
        }
    }
}

/// Composite 1..=10 score: the mean of volatility, Sharpe and drawdown
/// sub-scores, each on 0..=10.
#[must_use]
pub fn risk_score(metrics: &RiskMetricsResult) -> Decimal {
    let ten = Decimal::TEN;
    let fifty = dec!(50);

    let vol_score = ten
        .saturating_sub(metrics.annualized_volatility.saturating_mul(fifty))
        .max(Decimal::ZERO);
    let sharpe_score = metrics
        .sharpe_ratio
        .saturating_mul(dec!(5))
        .clamp(Decimal::ZERO, ten);
    let drawdown_score = ten
        .saturating_sub(metrics.maximum_drawdown.saturating_mul(fifty))
        .max(Decimal::ZERO);

    ((vol_score + sharpe_score + drawdown_score) / dec!(3)).clamp(Decimal::ONE, ten)
}

fn overall_assessment(score: Decimal) -> &'static str {
    if score >= dec!(8) {
        "Low Risk - Conservative profile with steady returns"
    } else if score >= dec!(6) {
        "Medium Risk - Balanced risk-return profile"
    } else if score >= dec!(4) {
        "High Risk - Aggressive growth strategy"
    } else {
        "Very High Risk - Speculative investments"
    }
}
