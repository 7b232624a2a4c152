//! Errors from the persistence boundary
//!
//! The session core itself has no failure modes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read or write history: {0}")]
    Csv(#[from] csv::Error),
}
