use thiserror::Error;

/// Errors from editing a draft. The draft is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("project category cannot be empty")]
    EmptyCategory,
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl DraftError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        DraftError::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
