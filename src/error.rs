//! Error types for validator configuration

use thiserror::Error;

/// Result type for operations that can reject a configuration
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Raised when a number format cannot be constructed.
///
/// Malformed input values are never errors: they are reported as
/// `false` / [`Rejection`](crate::number_validator::Rejection).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Precision must be at least one digit
    #[error("precision must be a positive number, got {0}")]
    NonPositivePrecision(i64),

    /// Scale must be non-negative and strictly less than precision
    #[error("scale must be a non-negative number less than precision ({precision}), got {scale}")]
    ScaleOutOfRange { precision: i64, scale: i64 },

    /// Text is not in `N(m)` / `N(m.k)` notation
    #[error("invalid number format notation: {0:?}")]
    InvalidNotation(String),
}
