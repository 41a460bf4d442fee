//! Configuration errors.

use crate::timing::TimingError;
use thiserror::Error;

/// Errors that can occur when building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("default signal timing is invalid: {0}")]
    InvalidTiming(#[from] TimingError),

    #[error("history capacity {requested} exceeds the maximum of {max}")]
    HistoryCapacityTooLarge { requested: usize, max: usize },

    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
