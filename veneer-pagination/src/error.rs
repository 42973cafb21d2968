//! Error types for the pagination model.

use thiserror::Error;

/// Result type alias for pagination operations.
pub type PaginationResult<T> = Result<T, PaginationError>;

/// Errors that can occur when configuring pagination.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// Pager count must be an odd number between 5 and 21.
    #[error("invalid pager count {0}: expected an odd number between 5 and 21")]
    InvalidPagerCount(u32),

    /// Configuration JSON could not be parsed.
    #[error("invalid pagination config: {0}")]
    Config(#[from] serde_json::Error),
}
