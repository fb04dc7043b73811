//! Rental Projection - buy-and-hold rental property analysis
//!
//! This library provides:
//! - Purchase cost, financing and cash-to-close resolution
//! - Year-one income, expense, NOI and investment ratio analysis
//! - Year-by-year hold-period projection of cash flow, equity, taxes and returns
//! - Batch and sensitivity runs over many properties or input variants

pub mod error;
pub mod assumptions;
pub mod property;
pub mod operations;
pub mod financing;
pub mod analysis;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{AnalysisError, LoadError};
pub use assumptions::Defaults;
pub use property::PropertyParameters;
pub use analysis::{analyze, analyze_with_config, thirty_year_projection, year_one_analysis, PropertyAnalysis, YearOneAnalysis};
pub use projection::{ProjectionEngine, ProjectionConfig, ProjectionResult, ProjectionRow, ProjectionSummary};
pub use scenario::{ScenarioRunner, SensitivityField, SensitivityPoint};
