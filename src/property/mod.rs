//! Property input records, default resolution and portfolio loading

mod data;
mod resolved;
pub mod loader;

pub use data::{
    ClosingCostItem, FinancingTerms, GrowthAssumptions, OperatingExpenses, OtherIncome, PropertyParameters,
    SecondLien,
};
pub use loader::{load_properties, load_properties_from_reader, PortfolioLoad};
pub use resolved::{ClosingCosts, LienTerms, ResolvedParameters};
