// crates/seekerruntime/tests/registry_test.rs

use seekercore::{FieldDescriptor, FlowDefinition, PromptTemplate, Schema, SeekerError};
use seekerruntime::FlowRegistry;
use std::sync::Arc;

fn definition(name: &str) -> FlowDefinition {
    FlowDefinition::new(
        name,
        Schema::new().with_field(FieldDescriptor::string("query").describe("The search query.")),
        Schema::new().with_field(FieldDescriptor::string_array("queries")),
        PromptTemplate::new("Query: {{query}}").with_default("engine", "Google"),
    )
    .with_description("test flow")
}

#[test]
fn test_register_then_lookup_returns_identical_definition() {
    let mut registry = FlowRegistry::new();
    registry.register(definition("generate-optimized-queries")).unwrap();

    let found = registry.lookup("generate-optimized-queries").unwrap();
    assert_eq!(*found, definition("generate-optimized-queries"));

    let again = registry.lookup("generate-optimized-queries").unwrap();
    assert!(Arc::ptr_eq(&found, &again));
}

#[test]
fn test_duplicate_registration_fails() {
    let mut registry = FlowRegistry::new();
    registry.register(definition("analyze-input")).unwrap();

    let err = registry.register(definition("analyze-input")).unwrap_err();
    assert_eq!(err, SeekerError::DuplicateFlow("analyze-input".to_string()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_lookup_unknown_flow() {
    let registry = FlowRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(
        registry.lookup("nope").unwrap_err(),
        SeekerError::UnknownFlow("nope".to_string())
    );
}

#[test]
fn test_flows_listed_in_registration_order() {
    let mut registry = FlowRegistry::new();
    for name in ["b-flow", "a-flow", "c-flow"] {
        registry.register(definition(name)).unwrap();
    }

    assert_eq!(registry.list_flows(), ["b-flow", "a-flow", "c-flow"]);
    let names: Vec<_> = registry.definitions().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["b-flow", "a-flow", "c-flow"]);
}

#[test]
fn test_shared_registry_lookups_across_threads() {
    let mut registry = FlowRegistry::new();
    registry.register(definition("analyze-input")).unwrap();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            std::thread::spawn(move || registry.lookup("analyze-input").is_ok())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
