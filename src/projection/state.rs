//! State carried from one projection year to the next

use crate::financing::Financing;
use crate::property::ResolvedParameters;

/// Everything a projection year needs from the year before it
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current projection year (1-indexed; 0 before the first year)
    pub year: u32,

    /// Property value at the end of the current year
    pub property_value: f64,

    /// First-lien balance at the end of the current year
    pub first_lien_balance: f64,

    /// Second-lien balance at the end of the current year
    pub second_lien_balance: f64,

    /// Pre-tax cash flow summed over years 1..=year
    pub cumulative_cash_flow: f64,
}

impl ProjectionState {
    /// Initialize state at purchase, before the first projection year
    pub fn at_purchase(params: &ResolvedParameters, financing: &Financing) -> Self {
        Self {
            year: 0,
            property_value: params.fair_market_value,
            first_lien_balance: financing.first_lien.principal,
            second_lien_balance: financing.second_lien.map_or(0.0, |l| l.principal),
            cumulative_cash_flow: 0.0,
        }
    }

    /// Advance to the next year and apply one year of appreciation
    pub fn advance_year(&mut self, appreciation: f64) {
        self.year += 1;
        self.property_value *= 1.0 + appreciation;
    }

    /// Combined balance across liens
    pub fn loan_balance(&self) -> f64 {
        self.first_lien_balance + self.second_lien_balance
    }

    /// Property value less outstanding debt
    pub fn equity(&self) -> f64 {
        self.property_value - self.loan_balance()
    }
}
