//! Operating expense lines
//!
//! Fixed-dollar categories (tax, insurance, HOA, utilities, other) escalate
//! with the expense growth factor. Percent categories follow their basis:
//! management is charged on operating income (post-vacancy), maintenance and
//! CapEx on gross rent.

use serde::{Deserialize, Serialize};

use crate::analysis::pct;

/// The fixed set of operating expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    PropertyTax,
    Insurance,
    Management,
    Maintenance,
    CapitalExpenditures,
    Hoa,
    Utilities,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::PropertyTax,
        ExpenseCategory::Insurance,
        ExpenseCategory::Management,
        ExpenseCategory::Maintenance,
        ExpenseCategory::CapitalExpenditures,
        ExpenseCategory::Hoa,
        ExpenseCategory::Utilities,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::PropertyTax => "Property Tax",
            ExpenseCategory::Insurance => "Insurance",
            ExpenseCategory::Management => "Management",
            ExpenseCategory::Maintenance => "Maintenance",
            ExpenseCategory::CapitalExpenditures => "CapEx",
            ExpenseCategory::Hoa => "HOA",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

/// Resolved expense rules: annual dollars for fixed lines, percents for the rest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSchedule {
    pub property_tax: f64,
    pub insurance: f64,
    pub management_percent: f64,
    pub maintenance_percent: f64,
    pub capex_percent: f64,
    pub hoa: f64,
    pub utilities: f64,
    pub other: f64,
}

/// The amounts a year's percent and fixed lines are computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseBasis {
    pub gross_rent: f64,
    /// Income after vacancy
    pub operating_income: f64,
    /// Escalation applied to fixed-dollar lines, `(1 + g)^(year - 1)`
    pub growth_factor: f64,
}

/// One named expense amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub category: ExpenseCategory,
    pub amount: f64,
}

/// A year's expense lines and their total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub property_tax: f64,
    pub insurance: f64,
    pub management: f64,
    pub maintenance: f64,
    pub capital_expenditures: f64,
    pub hoa: f64,
    pub utilities: f64,
    pub other: f64,
    pub total: f64,
}

impl ExpenseBreakdown {
    pub fn amount(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::PropertyTax => self.property_tax,
            ExpenseCategory::Insurance => self.insurance,
            ExpenseCategory::Management => self.management,
            ExpenseCategory::Maintenance => self.maintenance,
            ExpenseCategory::CapitalExpenditures => self.capital_expenditures,
            ExpenseCategory::Hoa => self.hoa,
            ExpenseCategory::Utilities => self.utilities,
            ExpenseCategory::Other => self.other,
        }
    }

    /// Expense lines in display order
    pub fn lines(&self) -> Vec<ExpenseLine> {
        ExpenseCategory::ALL
            .iter()
            .map(|&category| ExpenseLine {
                category,
                amount: self.amount(category),
            })
            .collect()
    }
}

/// Compute every expense line for the given basis
pub fn aggregate_expenses(schedule: &ExpenseSchedule, basis: ExpenseBasis) -> ExpenseBreakdown {
    let growth = basis.growth_factor;

    let mut breakdown = ExpenseBreakdown {
        property_tax: schedule.property_tax * growth,
        insurance: schedule.insurance * growth,
        management: basis.operating_income * pct(schedule.management_percent),
        maintenance: basis.gross_rent * pct(schedule.maintenance_percent),
        capital_expenditures: basis.gross_rent * pct(schedule.capex_percent),
        hoa: schedule.hoa * growth,
        utilities: schedule.utilities * growth,
        other: schedule.other * growth,
        total: 0.0,
    };
    breakdown.total = ExpenseCategory::ALL.iter().map(|&c| breakdown.amount(c)).sum();
    breakdown
}
