//! # Error Types
//!
//! This module defines error types used throughout the brailleart library.

use thiserror::Error;

/// Main error type for brailleart operations
#[derive(Debug, Error)]
pub enum BrailleError {
    /// Pixel buffer does not match its stated dimensions
    #[error("Invalid pixel grid: {0}")]
    InvalidGrid(String),

    /// The stored upload could not be decoded as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Server startup or runtime failure (bind, accept)
    #[error("Server error: {0}")]
    Server(String),

    /// A blocking worker panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for BrailleError {
    fn from(e: image::ImageError) -> Self {
        BrailleError::Decode(e.to_string())
    }
}
