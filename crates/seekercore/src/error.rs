use crate::schema::FieldKind;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeekerError {
    #[error("Invalid input: {0}")]
    EmptyInput(String),

    #[error("Unknown flow: {0}")]
    UnknownFlow(String),

    #[error("Flow already registered: {0}")]
    DuplicateFlow(String),

    #[error("Invalid input for flow '{flow}': {violation}")]
    InvalidInput {
        flow: String,
        violation: SchemaViolation,
    },

    #[error("Prompt for flow '{flow}' has no value for placeholder '{variable}'")]
    MissingVariable { flow: String, variable: String },

    #[error("Malformed model response for flow '{flow}': {message}")]
    ModelResponseMalformed { flow: String, message: String },

    #[error("Model output for flow '{flow}' failed validation: {violation}")]
    InvalidModelOutput {
        flow: String,
        violation: SchemaViolation,
    },

    #[error("Model call for flow '{flow}' failed: {source}")]
    ModelCallFailed {
        flow: String,
        #[source]
        source: ModelError,
    },
}

impl SeekerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeekerError::EmptyInput(_) => ErrorKind::EmptyInput,
            SeekerError::UnknownFlow(_) => ErrorKind::UnknownFlow,
            SeekerError::DuplicateFlow(_) => ErrorKind::DuplicateFlow,
            SeekerError::InvalidInput { .. } => ErrorKind::InvalidInput,
            SeekerError::MissingVariable { .. } => ErrorKind::MissingVariable,
            SeekerError::ModelResponseMalformed { .. } => ErrorKind::ModelResponseMalformed,
            SeekerError::InvalidModelOutput { .. } => ErrorKind::InvalidModelOutput,
            SeekerError::ModelCallFailed { .. } => ErrorKind::ModelCallFailed,
        }
    }

    /// Name of the flow the error belongs to, if any
    pub fn flow(&self) -> Option<&str> {
        match self {
            SeekerError::EmptyInput(_) | SeekerError::DuplicateFlow(_) => None,
            SeekerError::UnknownFlow(flow) => Some(flow),
            SeekerError::InvalidInput { flow, .. }
            | SeekerError::MissingVariable { flow, .. }
            | SeekerError::ModelResponseMalformed { flow, .. }
            | SeekerError::InvalidModelOutput { flow, .. }
            | SeekerError::ModelCallFailed { flow, .. } => Some(flow),
        }
    }
}

/// Stable discriminant of a [`SeekerError`] for presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    UnknownFlow,
    DuplicateFlow,
    InvalidInput,
    MissingVariable,
    ModelResponseMalformed,
    InvalidModelOutput,
    ModelCallFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::UnknownFlow => "unknown_flow",
            ErrorKind::DuplicateFlow => "duplicate_flow",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::MissingVariable => "missing_variable",
            ErrorKind::ModelResponseMalformed => "model_response_malformed",
            ErrorKind::InvalidModelOutput => "invalid_model_output",
            ErrorKind::ModelCallFailed => "model_call_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First schema violation found in a candidate value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    /// JSON-path style location, rooted at `$`
    pub path: String,
    pub reason: ViolationReason,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViolationReason {
    #[error("expected an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("required field is missing")]
    MissingField,

    #[error("expected {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Unrepresentable(String),
}

impl ViolationReason {
    pub(crate) fn wrong_kind(expected: &FieldKind, found: &'static str) -> Self {
        ViolationReason::WrongKind {
            expected: expected.label(),
            found,
        }
    }
}

/// Failure reported by a model adapter itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model adapter is not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Model API error: {0}")]
    Api(String),

    #[error("Model returned no content")]
    EmptyResponse,
}
