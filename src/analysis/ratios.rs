//! Investment ratios derived from one year's NOI, financing and cash figures

use serde::{Deserialize, Serialize};

/// Convert a plain-number percent (`7.0`) to a fraction (`0.07`)
#[inline]
pub fn pct(percent: f64) -> f64 {
    percent / 100.0
}

/// Division that yields `0` whenever the denominator is zero or the result
/// would not be finite.
///
/// Every ratio in the crate goes through here so a zero price, rent,
/// investment or debt service reads as `0`, never `NaN` or infinity.
#[inline]
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Figures the year-one ratio set is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioInputs {
    pub purchase_price: f64,
    pub fair_market_value: f64,
    pub gross_annual_rent: f64,
    pub effective_gross_income: f64,
    pub total_expenses: f64,
    pub noi: f64,
    pub annual_debt_service: f64,
    pub annual_cash_flow: f64,
    pub total_cash_invested: f64,
    /// Principal repaid over the first twelve payments, from the amortization schedule
    pub principal_paid_year_one: f64,
    pub appreciation_percent: f64,
    pub total_loan_principal: f64,
}

/// Year-one ratio set. Percent-valued fields are plain-number percents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickAnalysis {
    pub cap_rate_purchase: f64,
    pub cap_rate_market: f64,
    pub cash_on_cash_roi: f64,
    pub equity_roi: f64,
    pub appreciation_roi: f64,
    pub total_roi: f64,
    pub gross_rent_multiplier: f64,
    pub debt_coverage_ratio: f64,
    pub break_even_ratio: f64,
    pub debt_yield: f64,
    pub loan_to_value: f64,
    pub loan_to_purchase_price: f64,
    /// Monthly gross rent as percent of price (the "1% rule")
    pub rent_to_price: f64,
}

/// Compute the full year-one ratio set
pub fn calculate_ratios(inputs: &RatioInputs) -> QuickAnalysis {
    let invested = inputs.total_cash_invested;

    let cash_on_cash_roi = safe_divide(inputs.annual_cash_flow, invested) * 100.0;
    let equity_roi = safe_divide(inputs.principal_paid_year_one, invested) * 100.0;
    let appreciation_gain = inputs.fair_market_value * pct(inputs.appreciation_percent);
    let appreciation_roi = safe_divide(appreciation_gain, invested) * 100.0;

    QuickAnalysis {
        cap_rate_purchase: safe_divide(inputs.noi, inputs.purchase_price) * 100.0,
        cap_rate_market: safe_divide(inputs.noi, inputs.fair_market_value) * 100.0,
        cash_on_cash_roi,
        equity_roi,
        appreciation_roi,
        total_roi: cash_on_cash_roi + equity_roi + appreciation_roi,
        gross_rent_multiplier: safe_divide(inputs.purchase_price, inputs.gross_annual_rent),
        debt_coverage_ratio: safe_divide(inputs.noi, inputs.annual_debt_service),
        break_even_ratio: safe_divide(
            inputs.total_expenses + inputs.annual_debt_service,
            inputs.effective_gross_income,
        ) * 100.0,
        debt_yield: safe_divide(inputs.noi, inputs.total_loan_principal) * 100.0,
        loan_to_value: safe_divide(inputs.total_loan_principal, inputs.fair_market_value) * 100.0,
        loan_to_purchase_price: safe_divide(inputs.total_loan_principal, inputs.purchase_price) * 100.0,
        rent_to_price: safe_divide(inputs.gross_annual_rent / 12.0, inputs.purchase_price) * 100.0,
    }
}
