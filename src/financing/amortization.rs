//! Monthly loan amortization

use serde::{Deserialize, Serialize};

use super::{Lien, MAX_AMORTIZATION_YEARS};

/// Balances below half a cent are treated as paid off
const PAYOFF_TOLERANCE: f64 = 0.005;

/// Principal/interest split for one year of payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearAmortization {
    pub start_balance: f64,
    pub end_balance: f64,
    pub principal: f64,
    pub interest: f64,
    /// Payments charged over the year
    pub debt_service: f64,
    pub months_paid: u32,
}

/// Advance a balance through twelve monthly payments.
///
/// Each month accrues `balance x monthly_rate` of interest and applies the
/// rest of the payment to principal; the balance is clamped at zero. The
/// payment is charged every month, so `principal + interest` always equals
/// `monthly_payment x 12`, including years after the loan is paid off.
pub fn amortize_one_year(balance: f64, monthly_rate: f64, monthly_payment: f64) -> YearAmortization {
    step_year(balance, monthly_rate, monthly_payment, false)
}

/// Like [`amortize_one_year`], but stops charging once the balance reaches
/// zero. Debt service for the year covers only months with an outstanding
/// balance.
pub fn amortize_to_payoff(balance: f64, monthly_rate: f64, monthly_payment: f64) -> YearAmortization {
    step_year(balance, monthly_rate, monthly_payment, true)
}

fn step_year(balance: f64, monthly_rate: f64, monthly_payment: f64, stop_at_payoff: bool) -> YearAmortization {
    let start_balance = balance;
    let mut balance = balance;
    let mut principal = 0.0;
    let mut interest = 0.0;
    let mut months_paid = 0;

    for _month in 0..12 {
        if stop_at_payoff && balance <= 0.0 {
            break;
        }

        let month_interest = balance * monthly_rate;
        let month_principal = monthly_payment - month_interest;

        balance = (balance - month_principal).max(0.0);
        if balance < PAYOFF_TOLERANCE {
            balance = 0.0;
        }

        interest += month_interest;
        principal += month_principal;
        months_paid += 1;
    }

    YearAmortization {
        start_balance,
        end_balance: balance,
        principal,
        interest,
        debt_service: monthly_payment * months_paid as f64,
        months_paid,
    }
}

/// One month of a full amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

/// Month-by-month schedule over the lien's full term
pub fn amortization_schedule(lien: &Lien) -> Vec<ScheduleRow> {
    let months = lien.amortization_years.saturating_mul(12);
    let rate = lien.monthly_rate();
    let mut balance = lien.principal;
    let mut rows = Vec::with_capacity(months.min(MAX_AMORTIZATION_YEARS * 12) as usize);

    for month in 1..=months {
        if balance <= 0.0 {
            break;
        }

        let interest = balance * rate;
        let principal = lien.monthly_payment - interest;
        balance = (balance - principal).max(0.0);
        if balance < PAYOFF_TOLERANCE {
            balance = 0.0;
        }

        rows.push(ScheduleRow {
            month,
            payment: lien.monthly_payment,
            principal,
            interest,
            balance,
        });
    }

    rows
}
