//! Core projection engine for yearly hold-period projections

use log::{debug, trace};

use super::cashflows::{ProjectionResult, ProjectionRow};
use super::irr::approximate_irr;
use super::state::ProjectionState;
use crate::analysis::{pct, safe_divide};
use crate::financing::{amortize_one_year, amortize_to_payoff, Financing, PurchaseCosts, YearAmortization};
use crate::operations::{aggregate_expenses, aggregate_income, ExpenseBasis};
use crate::property::ResolvedParameters;

/// Default hold period in years
pub const DEFAULT_PROJECTION_YEARS: u32 = 30;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub projection_years: u32,

    /// Flat rate applied to deductible expenses, interest and depreciation (percent)
    pub tax_rate_percent: f64,

    /// Share of property value that can be depreciated, i.e. excluding land (percent)
    pub depreciable_percent: f64,

    /// Straight-line depreciation life in years
    pub depreciation_years: f64,

    /// Stop charging a lien's payment once its balance reaches zero.
    /// Off by default: every year carries `monthly payment x 12`.
    pub stop_payments_at_payoff: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projection_years: DEFAULT_PROJECTION_YEARS,
            tax_rate_percent: 25.0,
            depreciable_percent: 85.0,
            depreciation_years: 27.5,
            stop_payments_at_payoff: false,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection for a single property.
    ///
    /// Years are computed strictly in order; each year reads only the
    /// property value, loan balances and running cash flow left by the
    /// year before it.
    pub fn project_property(
        &self,
        params: &ResolvedParameters,
        purchase: &PurchaseCosts,
        financing: &Financing,
    ) -> ProjectionResult {
        let mut result = ProjectionResult::new(params.property_id.clone(), financing.cash_to_close);
        let mut state = ProjectionState::at_purchase(params, financing);

        debug!(
            "Projecting '{}' over {} years (real price {:.2}, invested {:.2})",
            params.property_id, self.config.projection_years, purchase.real_purchase_price, financing.cash_to_close
        );

        for _year in 1..=self.config.projection_years {
            state.advance_year(pct(params.appreciation_percent));

            let row = self.calculate_year(params, financing, &mut state);
            trace!(
                "Year {}: value={:.2} noi={:.2} cash_flow={:.2} balance={:.2}",
                row.year, row.property_value, row.noi, row.cash_flow, row.loan_balance
            );
            result.add_row(row);
        }

        result
    }

    /// Calculate a single projection year
    fn calculate_year(&self, params: &ResolvedParameters, financing: &Financing, state: &mut ProjectionState) -> ProjectionRow {
        let mut row = ProjectionRow::new(state.year);
        let elapsed = (state.year - 1) as i32;
        row.property_value = state.property_value;

        // Rent and expenses grow from the year-one base; no growth until year 2
        let rent_growth = (1.0 + pct(params.rent_growth_percent)).powi(elapsed);
        let expense_growth = (1.0 + pct(params.expense_growth_percent)).powi(elapsed);

        let income = aggregate_income(
            params.gross_annual_rent * rent_growth,
            params.other_annual_income * rent_growth,
            params.vacancy_rate_percent,
        );
        row.gross_rent = income.gross_rent;
        row.other_income = income.other_income;
        row.vacancy_loss = income.vacancy_loss;
        row.operating_income = income.effective_gross_income;

        let expenses = aggregate_expenses(
            &params.expenses,
            ExpenseBasis {
                gross_rent: income.gross_rent,
                operating_income: income.effective_gross_income,
                growth_factor: expense_growth,
            },
        );
        row.set_expenses(&expenses);
        row.noi = row.operating_income - row.total_expenses;

        self.amortize_year(financing, state, &mut row);
        row.cash_flow = row.noi - row.loan_payment;

        self.apply_taxes(&mut row);
        self.calculate_exit(params, financing, state, &mut row);

        row
    }

    /// Step every lien through the year and record the debt columns
    fn amortize_year(&self, financing: &Financing, state: &mut ProjectionState, row: &mut ProjectionRow) {
        let first = &financing.first_lien;
        let first_year = self.step_lien(state.first_lien_balance, first.monthly_rate(), first.monthly_payment);
        state.first_lien_balance = first_year.end_balance;

        row.loan_payment = first_year.debt_service;
        row.principal_paid = first_year.principal;
        row.interest_paid = first_year.interest;

        if let Some(second) = &financing.second_lien {
            let second_year = self.step_lien(state.second_lien_balance, second.monthly_rate(), second.monthly_payment);
            state.second_lien_balance = second_year.end_balance;

            row.loan_payment += second_year.debt_service;
            row.principal_paid += second_year.principal;
            row.interest_paid += second_year.interest;
        }

        row.loan_balance = state.loan_balance();
    }

    fn step_lien(&self, balance: f64, monthly_rate: f64, monthly_payment: f64) -> YearAmortization {
        if self.config.stop_payments_at_payoff {
            amortize_to_payoff(balance, monthly_rate, monthly_payment)
        } else {
            amortize_one_year(balance, monthly_rate, monthly_payment)
        }
    }

    /// Depreciation and the tax shield it creates together with expenses and interest
    fn apply_taxes(&self, row: &mut ProjectionRow) {
        row.depreciation = if row.year as f64 <= self.config.depreciation_years {
            safe_divide(
                row.property_value * pct(self.config.depreciable_percent),
                self.config.depreciation_years,
            )
        } else {
            0.0
        };

        row.tax_savings = (row.total_expenses + row.interest_paid + row.depreciation) * pct(self.config.tax_rate_percent);
        row.post_tax_cash_flow = row.cash_flow + row.tax_savings;
    }

    /// Equity, sale economics and the return metrics as of this year
    fn calculate_exit(
        &self,
        params: &ResolvedParameters,
        financing: &Financing,
        state: &mut ProjectionState,
        row: &mut ProjectionRow,
    ) {
        let invested = financing.cash_to_close;

        state.cumulative_cash_flow += row.cash_flow;

        row.total_equity = state.equity();
        row.sale_proceeds = row.property_value * (1.0 - pct(params.selling_cost_percent)) - row.loan_balance;
        row.cumulative_cash_flow = state.cumulative_cash_flow;
        row.total_profit = row.sale_proceeds + row.cumulative_cash_flow - invested;

        row.cap_rate_purchase = safe_divide(row.noi, params.purchase_price) * 100.0;
        row.cap_rate_market = safe_divide(row.noi, row.property_value) * 100.0;
        row.cash_on_cash = safe_divide(row.cash_flow, invested) * 100.0;
        row.return_on_equity = safe_divide(row.cash_flow, row.total_equity) * 100.0;
        row.return_on_investment = safe_divide(row.cash_flow + row.principal_paid, invested) * 100.0;
        row.irr = approximate_irr(row.sale_proceeds, row.cumulative_cash_flow, invested, row.year);
    }
}
