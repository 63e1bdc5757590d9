use thiserror::Error;

/// Errors raised when validating an OHLCV series at the indicator boundary
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("insufficient data: {required} bars required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("non-monotonic timestamp at index {index}")]
    NonMonotonicTimestamp { index: usize },

    #[error("duplicate timestamp {timestamp} at index {index}")]
    DuplicateTimestamp { timestamp: i64, index: usize },

    #[error("non-positive {field} price at index {index}")]
    NonPositivePrice { field: &'static str, index: usize },

    #[error("negative volume at index {index}")]
    NegativeVolume { index: usize },
}

/// Errors raised by ensemble training and inference
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("insufficient training data: {required} bars required, got {actual}")]
    InsufficientTrainingData { required: usize, actual: usize },

    #[error("{stage} training failed: {reason}")]
    TrainingFailed { stage: &'static str, reason: String },

    #[error("{stage} prediction failed: {reason}")]
    PredictionFailed { stage: &'static str, reason: String },

    #[error("model member not trained: {member}")]
    MissingModel { member: &'static str },
}

/// Errors raised by the model bundle store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no persisted model bundle found at {path}")]
    NotFound { path: String },

    #[error("persisted model bundle is corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("model store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
