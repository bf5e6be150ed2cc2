//! Error types for model parsing.

use thiserror::Error;

/// Errors raised when parsing model values from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Code type name not recognised.
    #[error("unknown code type: {value}")]
    UnknownCodeType { value: String },

    /// Source category name not recognised.
    #[error("unknown source category: {value}")]
    UnknownSourceCategory { value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
