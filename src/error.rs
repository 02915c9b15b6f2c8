use thiserror::Error;

/// Hard failures only. Missing or invalid readings are data, not errors,
/// and are reported through `CompositeScore` instead.
#[derive(Error, Debug)]
pub enum PhiError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type PhiResult<T> = Result<T, PhiError>;
