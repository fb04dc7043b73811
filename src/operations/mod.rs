//! Income and operating expense aggregation for one year's rent and expense basis

mod expenses;
mod income;

pub use expenses::{aggregate_expenses, ExpenseBasis, ExpenseBreakdown, ExpenseCategory, ExpenseLine, ExpenseSchedule};
pub use income::{aggregate_income, IncomeBreakdown};
