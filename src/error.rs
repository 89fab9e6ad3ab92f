use thiserror::Error;

use crate::parse::ParseError;

/// Unified error type covering expression parsing, evaluation, and rule
/// validation.
///
/// Every variant carries a human-readable message via [`Display`](std::fmt::Display)
/// and maps to a stable machine-readable [`ErrorCode`] via [`EngineError::code()`],
/// so callers can branch on the code and surface the message as-is.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The expression could not be parsed or evaluated.
    #[error("{message}")]
    InvalidExpression { message: String },

    /// An expression referenced a parameter that is absent from the supplied
    /// parameter map.
    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    /// A rule condition named an operator outside the supported set.
    #[error("Invalid condition operator: {operator}")]
    InvalidOperator { operator: String },

    /// An input was rejected before evaluation began.
    #[error("{message}")]
    Validation { message: String },
}

impl EngineError {
    pub(crate) fn invalid_expression(message: impl Into<String>) -> Self {
        EngineError::InvalidExpression {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            EngineError::InvalidExpression { .. } => ErrorCode::InvalidExpression,
            EngineError::ParameterNotFound { .. } => ErrorCode::RuleValidationFailed,
            EngineError::InvalidOperator { .. } => ErrorCode::InvalidOperator,
            EngineError::Validation { .. } => ErrorCode::ValidationError,
        }
    }
}

impl From<ParseError> for EngineError {
    fn from(err: ParseError) -> Self {
        EngineError::InvalidExpression {
            message: err.to_string(),
        }
    }
}

/// Machine-readable error codes, suitable for API payloads and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidExpression,
    RuleValidationFailed,
    InvalidOperator,
    ValidationError,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidExpression => "INVALID_EXPRESSION",
            ErrorCode::RuleValidationFailed => "RULE_VALIDATION_FAILED",
            ErrorCode::InvalidOperator => "INVALID_OPERATOR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
