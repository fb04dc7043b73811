//! AWS Lambda handler for single-property analysis
//!
//! Accepts a property (and optional default settings) as a JSON event and
//! returns the year-one analysis, the full projection and its summary.

use chrono::{DateTime, Utc};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use rental_projection::{analyze, Defaults, PropertyAnalysis, PropertyParameters};
use serde::{Deserialize, Serialize};

/// Input for one analysis
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub property: PropertyParameters,

    /// Settings overriding the standard defaults; missing keys keep the standard value
    #[serde(default)]
    pub defaults: Option<Defaults>,
}

/// Validation failure reported back to the caller
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub field: String,
    pub message: String,
}

/// Output from the analysis
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PropertyAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub execution_time_ms: u64,
}

async fn handler(event: LambdaEvent<AnalysisRequest>) -> Result<AnalysisResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;
    let defaults = request.defaults.unwrap_or_default();

    info!("Analyzing property '{}'", request.property.property_id);

    let (analysis, error) = match analyze(&request.property, &defaults) {
        Ok(analysis) => (Some(analysis), None),
        Err(e) => {
            warn!("Rejected property '{}': {}", request.property.property_id, e);
            (
                None,
                Some(ErrorBody {
                    field: e.field().to_string(),
                    message: e.to_string(),
                }),
            )
        }
    };

    Ok(AnalysisResponse {
        generated_at: Utc::now(),
        analysis,
        error,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
