// Error types for the driver and aggregation pipeline

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while driving a run or aggregating its results
#[derive(Debug, Error)]
pub enum CoreError {
    /// Aggregation was asked to summarize an empty outcome sequence
    #[error("no outcomes to aggregate")]
    NoData,

    /// Driver configuration that cannot produce a meaningful run
    #[error("invalid driver configuration: {0}")]
    InvalidConfig(String),
}
