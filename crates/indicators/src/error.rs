use thiserror::Error;

/// Errors surfaced by indicator construction and registry operations.
///
/// Per-tick anomalies are never errors: malformed ticks are absorbed inside
/// `update` and numeric degeneracies resolve to neutral values.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// `create` was called with a type name that has no registered factory.
    #[error("indicator type not found: {0}")]
    UnknownType(String),

    /// A semantically-required construction parameter was invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// `register` was called with an already-registered type name.
    #[error("indicator type already registered: {0}")]
    DuplicateType(String),
}

impl IndicatorError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
