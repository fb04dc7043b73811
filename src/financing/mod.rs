//! Purchase cost and financing resolution
//!
//! Turns resolved purchase and loan inputs into the real purchase price,
//! lien principals, monthly debt service and cash required at closing.

pub mod amortization;

use log::debug;
use serde::{Deserialize, Serialize};

pub use amortization::{amortization_schedule, amortize_one_year, amortize_to_payoff, ScheduleRow, YearAmortization};

use crate::analysis::pct;
use crate::error::{AnalysisError, Result};
use crate::property::{ClosingCostItem, ClosingCosts, LienTerms, ResolvedParameters};

/// Longest amortization term accepted for any lien
pub const MAX_AMORTIZATION_YEARS: u32 = 100;

/// Purchase price build-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCosts {
    pub purchase_price: f64,
    pub repair_costs: f64,
    pub repair_contingency: f64,
    /// Closing cost lines actually applied (a single percent line when not itemized)
    pub closing_cost_items: Vec<ClosingCostItem>,
    pub closing_costs: f64,
    /// Price + repairs + contingency + closing costs
    pub real_purchase_price: f64,
}

/// An amortizing loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lien {
    /// Financed principal, including any fee rolled into the loan
    pub principal: f64,
    pub interest_rate_percent: f64,
    pub amortization_years: u32,
    pub monthly_payment: f64,
}

impl Lien {
    fn from_terms(principal: f64, terms: &LienTerms, field: &str) -> Result<Self> {
        let monthly_payment = monthly_payment(principal, terms.interest_rate_percent, terms.amortization_years);
        if !monthly_payment.is_finite() {
            return Err(AnalysisError::DegeneratePayment {
                field: field.to_string(),
            });
        }

        Ok(Self {
            principal,
            interest_rate_percent: terms.interest_rate_percent,
            amortization_years: terms.amortization_years,
            monthly_payment,
        })
    }

    pub fn monthly_rate(&self) -> f64 {
        pct(self.interest_rate_percent) / 12.0
    }

    pub fn annual_payment(&self) -> f64 {
        self.monthly_payment * 12.0
    }
}

/// Loan structure and cash requirement for the purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    /// First-lien principal before mortgage insurance
    pub first_lien_base_principal: f64,
    pub mortgage_insurance: f64,
    pub first_lien: Lien,
    pub second_lien: Option<Lien>,
    /// Purchase price not covered by the liens
    pub down_payment: f64,
    pub deposits: f64,
    pub prorated_credits: f64,
    pub cash_to_close: f64,
}

impl Financing {
    /// Sum of financed principal across liens
    pub fn total_principal(&self) -> f64 {
        self.first_lien.principal + self.second_lien.map_or(0.0, |l| l.principal)
    }

    pub fn monthly_debt_service(&self) -> f64 {
        self.first_lien.monthly_payment + self.second_lien.map_or(0.0, |l| l.monthly_payment)
    }

    pub fn annual_debt_service(&self) -> f64 {
        self.monthly_debt_service() * 12.0
    }

    pub fn liens(&self) -> impl Iterator<Item = &Lien> {
        std::iter::once(&self.first_lien).chain(self.second_lien.as_ref())
    }
}

/// Standard amortizing-loan payment.
///
/// `payment = P r (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and
/// `n` the number of monthly payments. A zero rate repays principal evenly;
/// a zero term yields no payment. Returns NaN when the term cannot be
/// counted in months.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    if principal == 0.0 || term_years == 0 {
        return 0.0;
    }
    // Terms too long to count in months have no meaningful payment
    let Some(n) = term_years.checked_mul(12) else {
        return f64::NAN;
    };

    let r = pct(annual_rate_percent) / 12.0;
    if r == 0.0 {
        return principal / n as f64;
    }

    let growth = (1.0 + r).powf(n as f64);
    principal * r * growth / (growth - 1.0)
}

/// Build the real purchase price from price, repairs and closing costs
pub fn resolve_purchase_costs(params: &ResolvedParameters) -> PurchaseCosts {
    let repair_contingency = params.repair_costs * pct(params.repair_contingency_percent);

    let closing_cost_items = match &params.closing_costs {
        ClosingCosts::Itemized(items) => items.clone(),
        ClosingCosts::Percent(percent) => vec![ClosingCostItem::new(
            format!("Closing costs ({}% of price)", percent),
            params.purchase_price * pct(*percent),
        )],
    };
    let closing_costs: f64 = closing_cost_items.iter().map(|item| item.amount).sum();

    PurchaseCosts {
        purchase_price: params.purchase_price,
        repair_costs: params.repair_costs,
        repair_contingency,
        closing_cost_items,
        closing_costs,
        real_purchase_price: params.purchase_price + params.repair_costs + repair_contingency + closing_costs,
    }
}

/// Resolve liens, payments and cash to close
pub fn resolve_financing(params: &ResolvedParameters, costs: &PurchaseCosts) -> Result<Financing> {
    let base_principal = params.first_lien.principal;
    let mortgage_insurance = base_principal * pct(params.mortgage_insurance_percent);

    let first_lien = Lien::from_terms(
        base_principal + mortgage_insurance,
        &params.first_lien,
        "financing.first_lien",
    )?;
    let second_lien = params
        .second_lien
        .as_ref()
        .map(|terms| Lien::from_terms(terms.principal, terms, "financing.second_lien"))
        .transpose()?;

    let second_principal = second_lien.map_or(0.0, |l| l.principal);
    let cash_to_close = costs.real_purchase_price - base_principal - second_principal + params.deposits
        - params.prorated_credits;

    debug!(
        "Financing: principal={:.2} payment={:.2} cash_to_close={:.2}",
        first_lien.principal, first_lien.monthly_payment, cash_to_close
    );

    Ok(Financing {
        first_lien_base_principal: base_principal,
        mortgage_insurance,
        first_lien,
        second_lien,
        down_payment: params.purchase_price - base_principal - second_principal,
        deposits: params.deposits,
        prorated_credits: params.prorated_credits,
        cash_to_close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::Defaults;
    use crate::property::{FinancingTerms, PropertyParameters, SecondLien};
    use approx::assert_abs_diff_eq;

    fn resolved(params: &PropertyParameters) -> ResolvedParameters {
        ResolvedParameters::resolve(params, &Defaults::standard()).unwrap()
    }

    #[test]
    fn test_standard_payment() {
        let payment = monthly_payment(240_000.0, 7.0, 30);
        assert_abs_diff_eq!(payment, 1_596.73, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_payment() {
        assert_abs_diff_eq!(monthly_payment(36_000.0, 0.0, 3), 1_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_term_payment() {
        assert_eq!(monthly_payment(100_000.0, 7.0, 0), 0.0);
    }

    #[test]
    fn test_huge_term_payment_is_not_finite() {
        // Month count overflows u32
        assert!(monthly_payment(240_000.0, 7.0, 400_000_000).is_nan());
        // Month count fits but the growth factor does not
        assert!(!monthly_payment(240_000.0, 7.0, 200_000_000).is_finite());
    }

    #[test]
    fn test_longest_term_payment() {
        let payment = monthly_payment(240_000.0, 7.0, MAX_AMORTIZATION_YEARS);
        // Barely above interest-only
        assert!(payment > 1_400.0 && payment < 1_402.0);
    }

    #[test]
    fn test_percent_closing_costs() {
        let r = resolved(&PropertyParameters {
            repair_costs: 10_000.0,
            repair_contingency_percent: Some(10.0),
            ..PropertyParameters::new(300_000.0, 30_000.0)
        });
        let costs = resolve_purchase_costs(&r);

        assert_abs_diff_eq!(costs.closing_costs, 9_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(costs.repair_contingency, 1_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(costs.real_purchase_price, 320_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_itemized_closing_costs() {
        let r = resolved(&PropertyParameters {
            closing_cost_items: vec![
                ClosingCostItem::new("Title", 1_200.0),
                ClosingCostItem::new("Lender", 2_300.0),
            ],
            ..PropertyParameters::new(300_000.0, 30_000.0)
        });
        let costs = resolve_purchase_costs(&r);

        assert_eq!(costs.closing_cost_items.len(), 2);
        assert_abs_diff_eq!(costs.closing_costs, 3_500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(costs.real_purchase_price, 303_500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cash_to_close() {
        let r = resolved(&PropertyParameters {
            deposits: 1_000.0,
            prorated_credits: 400.0,
            ..PropertyParameters::new(300_000.0, 30_000.0)
        });
        let costs = resolve_purchase_costs(&r);
        let financing = resolve_financing(&r, &costs).unwrap();

        assert_abs_diff_eq!(financing.first_lien.principal, 240_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(financing.down_payment, 60_000.0, epsilon = 1e-9);
        // 309,000 real price - 240,000 loan + 1,000 deposits - 400 credits
        assert_abs_diff_eq!(financing.cash_to_close, 69_600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mortgage_insurance_is_financed() {
        let r = resolved(&PropertyParameters {
            financing: FinancingTerms {
                loan_to_value_percent: Some(96.5),
                mortgage_insurance_percent: Some(1.75),
                ..Default::default()
            },
            ..PropertyParameters::new(200_000.0, 24_000.0)
        });
        let costs = resolve_purchase_costs(&r);
        let financing = resolve_financing(&r, &costs).unwrap();

        assert_abs_diff_eq!(financing.first_lien_base_principal, 193_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(financing.mortgage_insurance, 3_377.5, epsilon = 1e-9);
        assert_abs_diff_eq!(financing.first_lien.principal, 196_377.5, epsilon = 1e-9);
        // The financed fee does not reduce cash needed
        assert_abs_diff_eq!(financing.cash_to_close, 206_000.0 - 193_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_second_lien_adds_debt_service() {
        let r = resolved(&PropertyParameters {
            financing: FinancingTerms {
                second_lien: Some(SecondLien {
                    principal: 30_000.0,
                    interest_rate_percent: 0.0,
                    amortization_years: 10,
                }),
                ..Default::default()
            },
            ..PropertyParameters::new(300_000.0, 30_000.0)
        });
        let costs = resolve_purchase_costs(&r);
        let financing = resolve_financing(&r, &costs).unwrap();

        assert_abs_diff_eq!(
            financing.monthly_debt_service(),
            financing.first_lien.monthly_payment + 250.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(financing.total_principal(), 270_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(financing.cash_to_close, 309_000.0 - 270_000.0, epsilon = 1e-9);
        assert_eq!(financing.liens().count(), 2);
    }

    #[test]
    fn test_overflowing_payment_is_error() {
        let r = resolved(&PropertyParameters {
            financing: FinancingTerms {
                interest_rate_percent: Some(1e308),
                ..Default::default()
            },
            ..PropertyParameters::new(300_000.0, 30_000.0)
        });
        let costs = resolve_purchase_costs(&r);
        assert!(matches!(
            resolve_financing(&r, &costs),
            Err(AnalysisError::DegeneratePayment { .. })
        ));
    }

    #[test]
    fn test_no_financing() {
        let r = resolved(&PropertyParameters {
            financing: FinancingTerms {
                loan_to_value_percent: Some(0.0),
                ..Default::default()
            },
            ..PropertyParameters::new(300_000.0, 30_000.0)
        });
        let costs = resolve_purchase_costs(&r);
        let financing = resolve_financing(&r, &costs).unwrap();

        assert_eq!(financing.first_lien.principal, 0.0);
        assert_eq!(financing.monthly_debt_service(), 0.0);
        assert_abs_diff_eq!(financing.cash_to_close, costs.real_purchase_price, epsilon = 1e-9);
    }
}
