//! Year-by-year hold-period projection

mod state;
mod engine;
mod cashflows;
mod irr;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionConfig, DEFAULT_PROJECTION_YEARS};
pub use cashflows::{ProjectionRow, ProjectionResult, ProjectionSummary};
pub use irr::{approximate_irr, solve_irr};
