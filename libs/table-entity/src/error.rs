use std::fmt;

use crate::value::EdmType;

/// Error kind for conversion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Schema,
    Validation,
    Conversion,
    Config,
}

/// Conversion error. Aborts the whole encode/decode; nothing partial is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "type {type_name} does not have PartitionKey and RowKey properties, \
         which are required for this conversion"
    )]
    Schema { type_name: String },

    #[error("required property {field} on type {type_name} is null")]
    Validation { field: String, type_name: String },

    #[error("failed to convert column '{column}' into type {type_name}: {source}")]
    Conversion {
        column: String,
        type_name: String,
        #[source]
        source: FieldError,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InvalidInput(_) => ErrorKind::InvalidInput,
            ConvertError::Schema { .. } => ErrorKind::Schema,
            ConvertError::Validation { .. } => ErrorKind::Validation,
            ConvertError::Conversion { .. } => ErrorKind::Conversion,
            ConvertError::Config(_) => ErrorKind::Config,
        }
    }

    /// Add context to the error.
    ///
    /// Message-carrying variants get `"context: original message"`;
    /// structured variants are returned unchanged.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        match self {
            ConvertError::InvalidInput(msg) => ConvertError::InvalidInput(format!("{ctx}: {msg}")),
            ConvertError::Config(msg) => ConvertError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}

/// Failure reading or writing a single field, before column/type context is attached.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("expected {expected} column, found {found}")]
    TypeMismatch { expected: EdmType, found: EdmType },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no field at index {0}")]
    UnknownField(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_message_variants() {
        let err = ConvertError::InvalidInput("missing RowKey".into()).with_context("odata payload");
        assert_eq!(err.to_string(), "invalid input: odata payload: missing RowKey");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn context_keeps_structured_variants() {
        let err = ConvertError::Schema { type_name: "Book".into() }.with_context("ignored");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().starts_with("type Book does not have"));
    }

    #[test]
    fn conversion_exposes_source() {
        let err = ConvertError::Conversion {
            column: "chapters".into(),
            type_name: "Vec<Chapter>".into(),
            source: FieldError::TypeMismatch { expected: EdmType::String, found: EdmType::Int32 },
        };
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("expected Edm.String column, found Edm.Int32"));
    }
}
