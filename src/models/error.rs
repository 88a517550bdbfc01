use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown kind: {0}")]
    UnknownKind(String),

    #[error("invalid value for attribute '{attr}': expected {expected}, got {got}")]
    InvalidValue {
        attr: String,
        expected: &'static str,
        got: String,
    },

    #[error("attribute '{0}' cannot be updated")]
    ReservedAttribute(String),

    #[error("unknown attribute '{attr}' for {kind}")]
    UnknownAttribute { kind: String, attr: String },

    #[error("invalid timestamp '{value}' for '{field}'")]
    InvalidTimestamp { field: &'static str, value: String },
}
