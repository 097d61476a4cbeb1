use thiserror::Error;

/// Errors surfaced by the data service, config loading and report export.
///
/// The transformation core itself never fails; it only ever sees a
/// well-formed `FilterState` and the static catalogs.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("Segment with ID {0} not found")]
    SegmentNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, InsightsError>;
