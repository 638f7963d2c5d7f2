use thiserror::Error;

/// Result type for key presentation operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Every candidate was dropped because it is expired, revoked or disabled
    #[error("all matching keys are marked expired/revoked")]
    NoUsableKeys,

    #[error("invalid sort order: {0}")]
    InvalidSortKeys(String),

    #[error("entry format: {0}")]
    Format(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),
}
