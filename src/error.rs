//! Crate-wide error types.

use thiserror::Error;

pub type ProfgateResult<T> = Result<T, ProfgateError>;

#[derive(Debug, Error)]
pub enum ProfgateError {
    #[error("invalid write mode: {0:?}")]
    InvalidMode(String),

    #[error("invalid sort key: {0:?}")]
    InvalidSortKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
