//! Projection output structures

use serde::{Deserialize, Serialize};

use super::irr::solve_irr;
use crate::operations::ExpenseBreakdown;

/// A single year of projection output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    // Timing
    pub year: u32,

    // Value
    pub property_value: f64,

    // Income
    pub gross_rent: f64,
    pub other_income: f64,
    pub vacancy_loss: f64,
    pub operating_income: f64,

    // Expenses
    pub property_tax: f64,
    pub insurance: f64,
    pub management: f64,
    pub maintenance: f64,
    pub capital_expenditures: f64,
    pub hoa: f64,
    pub utilities: f64,
    pub other_expenses: f64,
    pub total_expenses: f64,

    pub noi: f64,

    // Debt
    pub loan_payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub loan_balance: f64,

    // Cash flow and tax
    pub cash_flow: f64,
    pub depreciation: f64,
    pub tax_savings: f64,
    pub post_tax_cash_flow: f64,

    // Exit
    pub total_equity: f64,
    pub sale_proceeds: f64,
    pub cumulative_cash_flow: f64,
    pub total_profit: f64,

    // Returns (percent)
    pub cap_rate_purchase: f64,
    pub cap_rate_market: f64,
    pub cash_on_cash: f64,
    pub return_on_equity: f64,
    pub return_on_investment: f64,
    pub irr: f64,
}

impl ProjectionRow {
    /// Create an empty row for the given year
    pub fn new(year: u32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    /// Copy the year's expense lines into the row
    pub fn set_expenses(&mut self, expenses: &ExpenseBreakdown) {
        self.property_tax = expenses.property_tax;
        self.insurance = expenses.insurance;
        self.management = expenses.management;
        self.maintenance = expenses.maintenance;
        self.capital_expenditures = expenses.capital_expenditures;
        self.hoa = expenses.hoa;
        self.utilities = expenses.utilities;
        self.other_expenses = expenses.other;
        self.total_expenses = expenses.total;
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Property identifier
    pub property_id: String,

    /// Cash required at purchase; the basis of every return metric
    pub total_cash_invested: f64,

    /// Yearly rows, index 0 = year 1
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionResult {
    pub fn new(property_id: String, total_cash_invested: f64) -> Self {
        Self {
            property_id,
            total_cash_invested,
            rows: Vec::new(),
        }
    }

    /// Add a projection row
    pub fn add_row(&mut self, row: ProjectionRow) {
        self.rows.push(row);
    }

    /// Row for a 1-indexed year
    pub fn year(&self, year: u32) -> Option<&ProjectionRow> {
        year.checked_sub(1).and_then(|idx| self.rows.get(idx as usize))
    }

    /// Investor cash flows if sold at the end of `year`:
    /// the initial investment, each year's pre-tax cash flow, and the sale proceeds
    pub fn exit_cash_flows(&self, year: u32) -> Option<Vec<f64>> {
        let exit = self.year(year)?;
        let mut flows = Vec::with_capacity(year as usize + 1);
        flows.push(-self.total_cash_invested);
        flows.extend(self.rows[..year as usize].iter().map(|r| r.cash_flow));
        if let Some(last) = flows.last_mut() {
            *last += exit.sale_proceeds;
        }
        Some(flows)
    }

    /// Discounted IRR (percent) of selling at the end of `year`.
    ///
    /// Unlike the row `irr`, which compounds the total return as one lump
    /// sum, this solves for the rate that discounts each year's cash flow
    /// to the initial investment.
    pub fn discounted_irr(&self, year: u32) -> Option<f64> {
        let flows = self.exit_cash_flows(year)?;
        solve_irr(&flows).map(|rate| rate * 100.0)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_cash_flow: f64 = self.rows.iter().map(|r| r.cash_flow).sum();
        let total_post_tax_cash_flow: f64 = self.rows.iter().map(|r| r.post_tax_cash_flow).sum();
        let total_principal_paid: f64 = self.rows.iter().map(|r| r.principal_paid).sum();
        let total_interest_paid: f64 = self.rows.iter().map(|r| r.interest_paid).sum();

        let last = self.rows.last();
        let years = self.rows.len() as u32;

        ProjectionSummary {
            years,
            total_cash_invested: self.total_cash_invested,
            total_cash_flow,
            total_post_tax_cash_flow,
            total_principal_paid,
            total_interest_paid,
            final_property_value: last.map(|r| r.property_value).unwrap_or(0.0),
            final_loan_balance: last.map(|r| r.loan_balance).unwrap_or(0.0),
            final_equity: last.map(|r| r.total_equity).unwrap_or(0.0),
            final_sale_proceeds: last.map(|r| r.sale_proceeds).unwrap_or(0.0),
            final_total_profit: last.map(|r| r.total_profit).unwrap_or(0.0),
            final_irr: last.map(|r| r.irr).unwrap_or(0.0),
            final_discounted_irr: self.discounted_irr(years),
            loan_payoff_year: self
                .rows
                .iter()
                .find(|r| r.loan_balance <= 0.0 && r.principal_paid > 0.0)
                .map(|r| r.year),
            first_positive_cash_flow_year: self.rows.iter().find(|r| r.cash_flow > 0.0).map(|r| r.year),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub total_cash_invested: f64,
    pub total_cash_flow: f64,
    pub total_post_tax_cash_flow: f64,
    pub total_principal_paid: f64,
    pub total_interest_paid: f64,
    pub final_property_value: f64,
    pub final_loan_balance: f64,
    pub final_equity: f64,
    pub final_sale_proceeds: f64,
    pub final_total_profit: f64,
    pub final_irr: f64,
    pub final_discounted_irr: Option<f64>,
    pub loan_payoff_year: Option<u32>,
    pub first_positive_cash_flow_year: Option<u32>,
}
