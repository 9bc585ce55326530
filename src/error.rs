//! Error types shared by the builder, validator, query layer and rule compiler.

use thiserror::Error;

/// Errors raised while building, validating or querying a network model.
#[derive(Debug, Error)]
pub enum GniError {
    /// The document root is missing or the document cannot be parsed.
    #[error("fatal input: {0}")]
    FatalInput(String),

    /// A caller handed in something the operation cannot work with.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// The model is well formed but semantically invalid.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A value exceeds the length the enforcement tooling accepts.
    #[error("value too long for {field}: {len} > {max}")]
    ValueTooLong {
        field: String,
        len: usize,
        max: usize,
    },

    /// A single security rule could not be translated.
    #[error("rule conversion failed: {0}")]
    ConversionFailure(String),

    #[error("resource exhausted: {0}")]
    ResourceExhaustion(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GniError>;

impl GniError {
    /// Shorthand used by the validator.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        GniError::Validation(msg.into())
    }

    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        GniError::ConversionFailure(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_too_long_message() {
        let e = GniError::ValueTooLong {
            field: "instance.name".to_string(),
            len: 40,
            max: 32,
        };
        assert_eq!(e.to_string(), "value too long for instance.name: 40 > 32");
    }

    #[test]
    fn test_validation_helper() {
        let e = GniError::validation("no enabled CLC IP set");
        assert!(matches!(e, GniError::Validation(_)));
        assert_eq!(e.to_string(), "validation failed: no enabled CLC IP set");
    }
}
