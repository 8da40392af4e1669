//! Error types for cell-level configuration.

use thiserror::Error;

/// Errors raised while configuring how cell literals are escaped.
#[derive(Error, Debug)]
pub enum EscapingError {
    #[error(
        "string_escaping must be one of 'default', 'off', 'full' or a predicate, got '{0}'"
    )]
    UnknownPolicy(String),

    #[error("invalid string_escaping pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
