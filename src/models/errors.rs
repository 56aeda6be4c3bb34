use serde::Serialize;
use thiserror::Error;

/// One violated field constraint, reported back to the caller verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String
}

impl FieldViolation {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string()
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing request body")]
    MissingBody,
    #[error("Request body is not valid JSON: {reason}")]
    MalformedJson {
        reason: String
    },
    #[error("Invalid transaction data: {} field violation(s)", .violations.len())]
    InvalidFields {
        violations: Vec<FieldViolation>
    }
}

impl ValidationError {
    pub fn malformed_json(error: &serde_json::Error) -> Self {
        Self::MalformedJson { reason: error.to_string() }
    }

    pub fn invalid_fields(violations: Vec<FieldViolation>) -> Self {
        Self::InvalidFields { violations }
    }

    /// The violated fields, empty for non-schema failures.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::InvalidFields { violations } => violations,
            _ => &[]
        }
    }
}
