//! Error types for parameter validation and input loading

use thiserror::Error;

/// Result alias for analysis entry points
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Input that cannot produce an analysis.
///
/// Raised before any computation starts, so a caller never receives a
/// projection built from bad numbers. Every variant names the offending
/// field with a dotted path (e.g. `financing.interest_rate_percent`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("{field} is not a finite number")]
    NonFinite { field: String },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },

    #[error("{field} is not a usable amortization term (1 to 100 years)")]
    InvalidTerm { field: String },

    #[error("{field} is required")]
    MissingField { field: String },

    #[error("monthly payment for {field} could not be computed")]
    DegeneratePayment { field: String },
}

impl AnalysisError {
    /// Dotted path of the field that failed validation
    pub fn field(&self) -> &str {
        match self {
            AnalysisError::NonFinite { field }
            | AnalysisError::Negative { field, .. }
            | AnalysisError::InvalidTerm { field }
            | AnalysisError::MissingField { field }
            | AnalysisError::DegeneratePayment { field } => field,
        }
    }
}

/// Failure while reading settings or property files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("setting '{name}' has an unusable value {value}")]
    InvalidSetting { name: String, value: f64 },

    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: AnalysisError,
    },
}
