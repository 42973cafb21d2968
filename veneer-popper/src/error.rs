//! Error types for positioning operations.

use thiserror::Error;

/// Result type for positioning operations.
pub type PopperResult<T> = Result<T, PopperError>;

/// Errors that can occur in positioning operations.
///
/// None of these escape the overlay lifecycle: the engine degrades to
/// "overlay not shown" and logs instead.
#[derive(Debug, Error)]
pub enum PopperError {
    /// Placement string is not one of the 12 canonical positions.
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// Overlay configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A node operation failed in the host document.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}
