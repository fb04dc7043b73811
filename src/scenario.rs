//! Scenario runner for batch and sensitivity analyses
//!
//! Holds one set of defaults and projection settings, then runs many
//! properties (or many variants of one property) against them.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{analyze_with_config, PropertyAnalysis};
use crate::assumptions::Defaults;
use crate::error::Result;
use crate::projection::ProjectionConfig;
use crate::property::PropertyParameters;

/// An input a sensitivity run can vary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensitivityField {
    InterestRate,
    LoanToValue,
    Appreciation,
    RentGrowth,
    Vacancy,
    PurchasePrice,
}

impl SensitivityField {
    /// Copy of `params` with this field set to `value`
    pub fn apply(&self, params: &PropertyParameters, value: f64) -> PropertyParameters {
        let mut adjusted = params.clone();
        match self {
            SensitivityField::InterestRate => adjusted.financing.interest_rate_percent = Some(value),
            SensitivityField::LoanToValue => {
                adjusted.financing.loan_to_value_percent = Some(value);
                adjusted.financing.principal = None;
            }
            SensitivityField::Appreciation => adjusted.growth.appreciation_percent = Some(value),
            SensitivityField::RentGrowth => adjusted.growth.rent_growth_percent = Some(value),
            SensitivityField::Vacancy => adjusted.vacancy_rate_percent = Some(value),
            SensitivityField::PurchasePrice => adjusted.purchase_price = Some(value),
        }
        adjusted
    }
}

/// One point of a sensitivity run
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityPoint {
    pub value: f64,
    pub analysis: Result<PropertyAnalysis>,
}

/// Pre-configured runner for repeated analyses
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let points = runner.sensitivity(&property, SensitivityField::InterestRate, &[5.0, 6.0, 7.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    defaults: Defaults,
    config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with the standard defaults and a 30-year projection
    pub fn new() -> Self {
        Self::with_defaults(Defaults::standard())
    }

    /// Create runner with user settings
    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            defaults,
            config: ProjectionConfig::default(),
        }
    }

    /// Replace the projection settings
    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Analyze a single property
    pub fn run(&self, params: &PropertyParameters) -> Result<PropertyAnalysis> {
        analyze_with_config(params, &self.defaults, &self.config)
    }

    /// Analyze many properties in parallel; results keep the input order
    pub fn run_batch(&self, properties: &[PropertyParameters]) -> Vec<Result<PropertyAnalysis>> {
        info!("Running batch of {} properties", properties.len());
        properties.par_iter().map(|params| self.run(params)).collect()
    }

    /// Re-run one property with `field` set to each of `values`
    pub fn sensitivity(
        &self,
        params: &PropertyParameters,
        field: SensitivityField,
        values: &[f64],
    ) -> Vec<SensitivityPoint> {
        values
            .par_iter()
            .map(|&value| SensitivityPoint {
                value,
                analysis: self.run(&field.apply(params, value)),
            })
            .collect()
    }

    /// Get reference to the defaults for inspection
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Get mutable reference to the defaults for customization
    pub fn defaults_mut(&mut self) -> &mut Defaults {
        &mut self.defaults
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use approx::assert_abs_diff_eq;

    fn test_property() -> PropertyParameters {
        PropertyParameters {
            property_id: "test".to_string(),
            ..PropertyParameters::new(250_000.0, 27_000.0)
        }
    }

    #[test]
    fn test_batch_keeps_order_and_errors() {
        let runner = ScenarioRunner::new();
        let properties = vec![
            test_property(),
            PropertyParameters::new(-5.0, 10_000.0),
            PropertyParameters {
                property_id: "third".to_string(),
                ..PropertyParameters::new(400_000.0, 42_000.0)
            },
        ];

        let results = runner.run_batch(&properties);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().projection.property_id, "test");
        assert!(matches!(results[1], Err(AnalysisError::Negative { .. })));
        assert_eq!(results[2].as_ref().unwrap().projection.property_id, "third");
    }

    #[test]
    fn test_interest_rate_sensitivity() {
        let runner = ScenarioRunner::new();
        let points = runner.sensitivity(&test_property(), SensitivityField::InterestRate, &[5.0, 6.0, 7.0]);
        assert_eq!(points.len(), 3);

        let cash_flows: Vec<f64> = points
            .iter()
            .map(|p| p.analysis.as_ref().unwrap().year_one.cashflow.annual)
            .collect();

        // Higher rates mean higher debt service and lower cash flow
        assert!(cash_flows[0] > cash_flows[1]);
        assert!(cash_flows[1] > cash_flows[2]);
    }

    #[test]
    fn test_runner_uses_its_defaults() {
        let mut runner = ScenarioRunner::new();
        runner.defaults_mut().vacancy_rate = 10.0;

        let analysis = runner.run(&test_property()).unwrap();
        assert_abs_diff_eq!(analysis.year_one.income.vacancy_loss, 2_700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_runner_config_horizon() {
        let runner = ScenarioRunner::new().with_config(ProjectionConfig {
            projection_years: 5,
            ..Default::default()
        });
        assert_eq!(runner.run(&test_property()).unwrap().projection.rows.len(), 5);
    }

    #[test]
    fn test_ltv_sensitivity_clears_explicit_principal() {
        let mut params = test_property();
        params.financing.principal = Some(100_000.0);
        let adjusted = SensitivityField::LoanToValue.apply(&params, 50.0);
        assert_eq!(adjusted.financing.principal, None);
        assert_eq!(adjusted.financing.loan_to_value_percent, Some(50.0));
    }
}
