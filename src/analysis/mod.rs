//! Entry points: year-one snapshot and hold-period projection for a property

mod ratios;
mod year_one;

pub use ratios::{calculate_ratios, pct, safe_divide, QuickAnalysis, RatioInputs};
pub use year_one::{CashFlowSummary, CashRequirements, FinancingSummary, NetOperatingIncome, PropertyInfo, YearOneAnalysis};

use serde::{Deserialize, Serialize};

use crate::assumptions::Defaults;
use crate::error::Result;
use crate::financing::{resolve_financing, resolve_purchase_costs, Financing, PurchaseCosts};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionRow, ProjectionSummary};
use crate::property::{PropertyParameters, ResolvedParameters};

/// Year-one snapshot, full projection and its summary for one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    pub year_one: YearOneAnalysis,
    pub projection: ProjectionResult,
    pub summary: ProjectionSummary,
}

/// Resolve, validate and price a property; everything downstream is infallible
fn prepare(params: &PropertyParameters, defaults: &Defaults) -> Result<(ResolvedParameters, PurchaseCosts, Financing)> {
    let resolved = ResolvedParameters::resolve(params, defaults)?;
    let purchase = resolve_purchase_costs(&resolved);
    let financing = resolve_financing(&resolved, &purchase)?;
    Ok((resolved, purchase, financing))
}

/// Year-one analysis for a property
pub fn year_one_analysis(params: &PropertyParameters, defaults: &Defaults) -> Result<YearOneAnalysis> {
    let (resolved, purchase, financing) = prepare(params, defaults)?;
    Ok(YearOneAnalysis::calculate(&resolved, &purchase, &financing))
}

/// The standard 30-year projection, index 0 = year 1
pub fn thirty_year_projection(params: &PropertyParameters, defaults: &Defaults) -> Result<Vec<ProjectionRow>> {
    let (resolved, purchase, financing) = prepare(params, defaults)?;
    let engine = ProjectionEngine::default();
    Ok(engine.project_property(&resolved, &purchase, &financing).rows)
}

/// Full analysis with the standard projection settings
pub fn analyze(params: &PropertyParameters, defaults: &Defaults) -> Result<PropertyAnalysis> {
    analyze_with_config(params, defaults, &ProjectionConfig::default())
}

/// Full analysis with custom projection settings
pub fn analyze_with_config(
    params: &PropertyParameters,
    defaults: &Defaults,
    config: &ProjectionConfig,
) -> Result<PropertyAnalysis> {
    let (resolved, purchase, financing) = prepare(params, defaults)?;

    let year_one = YearOneAnalysis::calculate(&resolved, &purchase, &financing);
    let projection = ProjectionEngine::new(config.clone()).project_property(&resolved, &purchase, &financing);
    let summary = projection.summary();

    Ok(PropertyAnalysis {
        year_one,
        projection,
        summary,
    })
}
