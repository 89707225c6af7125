use thiserror::Error;

/// Why a lookup produced no value.
///
/// None of these are fatal: callers turn them into a "no data" state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The region is not part of the dataset.
    #[error("State data not available: {0}")]
    RegionNotFound(String),

    /// The region exists but its forecast has no entry for the date.
    #[error("Predicted data not available for {region} on {date}")]
    NoForecast { region: String, date: String },

    /// The date token is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The result is mathematically undefined (e.g. division by zero).
    #[error("undefined result for {0}")]
    Undefined(String),
}

/// Errors raised while loading a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV row that cannot be turned into an observation.
    #[error("invalid row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}
