//! Core abstractions for the seeker prompt pipeline
//!
//! This crate provides the types every other component depends on: schema
//! descriptors and their validator, prompt templates, flow definitions, the
//! model adapter seam, execution events and the error kinds. It performs no
//! I/O of its own.

mod error;
pub mod events;
mod flow;
mod model;
mod prompt;
mod schema;
pub mod testing;

pub use error::{ErrorKind, ModelError, SchemaViolation, SeekerError, ViolationReason};
pub use events::*;
pub use flow::FlowDefinition;
pub use model::{parse_payload, ModelAdapter, ModelPayload};
pub use prompt::{variables_from, MissingVariable, PromptTemplate, Variables};
pub use schema::{validate, FieldDescriptor, FieldKind, Schema};

/// Result of a single flow, pipeline or facade call
pub type ExecutionResult<T> = std::result::Result<T, SeekerError>;
