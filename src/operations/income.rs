//! Effective gross income after vacancy

use serde::{Deserialize, Serialize};

use crate::analysis::pct;

/// Income roll-up for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub gross_rent: f64,
    pub other_income: f64,
    pub total_gross_income: f64,
    pub vacancy_loss: f64,
    /// Operating income: total gross income less vacancy
    pub effective_gross_income: f64,
}

/// Apply vacancy to total income.
///
/// Vacancy is charged against rent and other income together, so parking or
/// laundry income is assumed to go vacant with the unit.
pub fn aggregate_income(gross_rent: f64, other_income: f64, vacancy_rate_percent: f64) -> IncomeBreakdown {
    let total_gross_income = gross_rent + other_income;
    let vacancy_loss = total_gross_income * pct(vacancy_rate_percent);

    IncomeBreakdown {
        gross_rent,
        other_income,
        total_gross_income,
        vacancy_loss,
        effective_gross_income: total_gross_income - vacancy_loss,
    }
}
