//! Error types for sheetframe core.

use sheetframe_engine::EscapingError;
use thiserror::Error;

/// Errors that can occur while reading or writing a worksheet.
#[derive(Error, Debug)]
pub enum SheetframeError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] EscapingError),

    #[error("Invalid option `{option}`: {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },

    #[error("Table parser version {found} is too old (requires >= {required})")]
    DependencyVersion { found: String, required: String },

    #[error("Worksheet client error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Config file error: {0}")]
    Config(#[from] toml::de::Error),
}

impl SheetframeError {
    /// Wrap a worksheet client failure without altering it.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SheetframeError::Transport(Box::new(err))
    }

    pub(crate) fn invalid(option: &'static str, message: impl Into<String>) -> Self {
        SheetframeError::InvalidOption {
            option,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetframeError>;
