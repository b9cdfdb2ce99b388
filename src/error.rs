//! # Error Types
//!
//! Binding failures and out-of-range numbers never surface here: they are
//! resolved to empty strings and clamped values. What remains are input
//! validation problems reported back to the caller before encoding starts.

use thiserror::Error;

/// Main error type for printcraft operations
#[derive(Debug, Error)]
pub enum PrintcraftError {
    /// Printer profile failed validation (negative or oversized width)
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Template document is malformed
    #[error("Template error: {0}")]
    Template(String),

    /// JSON parse error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PrintcraftError>;
