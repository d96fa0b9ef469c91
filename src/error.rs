use thiserror::Error;

/// Failures at the I/O edges of the crate. The analytics engine itself
/// never fails; it degrades to zero/empty values instead.
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported data file format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
    #[error("Project data must be a JSON array or an object with a \"projects\" array")]
    UnexpectedJsonShape,
}

/// A status or type label that matches none of the known synonyms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Unrecognized project status: {0}")]
    UnknownStatus(String),
    #[error("Unrecognized project type: {0}")]
    UnknownType(String),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
