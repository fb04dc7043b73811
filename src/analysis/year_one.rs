//! Year-one snapshot of a property's purchase, financing and operations

use log::warn;
use serde::{Deserialize, Serialize};

use super::ratios::{calculate_ratios, safe_divide, QuickAnalysis, RatioInputs};
use crate::financing::{amortize_one_year, Financing, PurchaseCosts};
use crate::operations::{aggregate_expenses, aggregate_income, ExpenseBasis, ExpenseBreakdown, IncomeBreakdown};
use crate::property::ResolvedParameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub property_id: String,
    pub purchase_price: f64,
    pub fair_market_value: f64,
    pub number_of_units: u32,
    pub price_per_unit: f64,
    pub monthly_rent_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingSummary {
    pub first_lien_principal: f64,
    pub mortgage_insurance: f64,
    pub first_lien_monthly_payment: f64,
    pub second_lien_principal: f64,
    pub second_lien_monthly_payment: f64,
    pub total_principal: f64,
    pub monthly_debt_service: f64,
    pub annual_debt_service: f64,
    pub cash_to_close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetOperatingIncome {
    pub annual: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashRequirements {
    pub down_payment: f64,
    pub closing_costs: f64,
    pub repair_costs: f64,
    pub repair_contingency: f64,
    pub deposits: f64,
    pub prorated_credits: f64,
    pub total_cash_invested: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub annual: f64,
    pub monthly: f64,
    pub monthly_per_unit: f64,
}

/// Single-year analysis, organized into the sub-groups consumers index by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOneAnalysis {
    pub property_info: PropertyInfo,
    pub purchase: PurchaseCosts,
    pub financing: FinancingSummary,
    pub income: IncomeBreakdown,
    pub expenses: ExpenseBreakdown,
    pub noi: NetOperatingIncome,
    pub cash_requirements: CashRequirements,
    pub cashflow: CashFlowSummary,
    pub quick_analysis: QuickAnalysis,
    /// Principal repaid across all liens over the first twelve payments
    pub principal_paid_year_one: f64,
}

impl YearOneAnalysis {
    pub fn calculate(params: &ResolvedParameters, purchase: &PurchaseCosts, financing: &Financing) -> Self {
        let units = params.number_of_units as f64;

        let income = aggregate_income(
            params.gross_annual_rent,
            params.other_annual_income,
            params.vacancy_rate_percent,
        );
        let expenses = aggregate_expenses(
            &params.expenses,
            ExpenseBasis {
                gross_rent: income.gross_rent,
                operating_income: income.effective_gross_income,
                growth_factor: 1.0,
            },
        );

        let noi = income.effective_gross_income - expenses.total;
        let annual_debt_service = financing.annual_debt_service();
        let annual_cash_flow = noi - annual_debt_service;

        let principal_paid_year_one: f64 = financing
            .liens()
            .map(|lien| amortize_one_year(lien.principal, lien.monthly_rate(), lien.monthly_payment).principal)
            .sum();

        let quick_analysis = calculate_ratios(&RatioInputs {
            purchase_price: params.purchase_price,
            fair_market_value: params.fair_market_value,
            gross_annual_rent: params.gross_annual_rent,
            effective_gross_income: income.effective_gross_income,
            total_expenses: expenses.total,
            noi,
            annual_debt_service,
            annual_cash_flow,
            total_cash_invested: financing.cash_to_close,
            principal_paid_year_one,
            appreciation_percent: params.appreciation_percent,
            total_loan_principal: financing.total_principal(),
        });

        if annual_cash_flow < 0.0 {
            warn!(
                "Property '{}' has negative year-one cash flow ({:.2})",
                params.property_id, annual_cash_flow
            );
        }
        if annual_debt_service > 0.0 && quick_analysis.debt_coverage_ratio < 1.0 {
            warn!(
                "Property '{}' cannot cover debt service from NOI (DCR {:.2})",
                params.property_id, quick_analysis.debt_coverage_ratio
            );
        }

        let second = financing.second_lien;

        Self {
            property_info: PropertyInfo {
                property_id: params.property_id.clone(),
                purchase_price: params.purchase_price,
                fair_market_value: params.fair_market_value,
                number_of_units: params.number_of_units,
                price_per_unit: safe_divide(params.purchase_price, units),
                monthly_rent_per_unit: safe_divide(params.gross_annual_rent / 12.0, units),
            },
            purchase: purchase.clone(),
            financing: FinancingSummary {
                first_lien_principal: financing.first_lien.principal,
                mortgage_insurance: financing.mortgage_insurance,
                first_lien_monthly_payment: financing.first_lien.monthly_payment,
                second_lien_principal: second.map_or(0.0, |l| l.principal),
                second_lien_monthly_payment: second.map_or(0.0, |l| l.monthly_payment),
                total_principal: financing.total_principal(),
                monthly_debt_service: financing.monthly_debt_service(),
                annual_debt_service,
                cash_to_close: financing.cash_to_close,
            },
            income,
            expenses,
            noi: NetOperatingIncome {
                annual: noi,
                monthly: noi / 12.0,
            },
            cash_requirements: CashRequirements {
                down_payment: financing.down_payment,
                closing_costs: purchase.closing_costs,
                repair_costs: purchase.repair_costs,
                repair_contingency: purchase.repair_contingency,
                deposits: financing.deposits,
                prorated_credits: financing.prorated_credits,
                total_cash_invested: financing.cash_to_close,
            },
            cashflow: CashFlowSummary {
                annual: annual_cash_flow,
                monthly: annual_cash_flow / 12.0,
                monthly_per_unit: safe_divide(annual_cash_flow / 12.0, units),
            },
            quick_analysis,
            principal_paid_year_one,
        }
    }
}
