//! Flow execution runtime
//!
//! This crate provides the registry of flow definitions, the executor that
//! runs a single flow against a model adapter, and the composer that chains
//! flows into pipelines.

mod executor;
mod pipeline;
mod registry;
mod runtime;

pub use executor::FlowExecutor;
pub use pipeline::{Fallback, Pipeline, PipelineLink, PipelineStep, StageOutput};
pub use registry::FlowRegistry;
pub use runtime::{RuntimeConfig, SeekerRuntime};
