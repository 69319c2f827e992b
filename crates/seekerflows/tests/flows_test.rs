// crates/seekerflows/tests/flows_test.rs

use seekercore::{validate, SeekerError};
use seekerflows::{
    analyze_then_optimize, register_all_flows, ANALYZE_INPUT, GENERATE_OPTIMIZED_QUERIES,
    OSINT_OBJECTIVES, STRATEGIC_QUERY_MODULES, SUGGEST_RELATED_TERMS,
};
use seekerruntime::FlowRegistry;
use serde_json::json;

fn registry() -> FlowRegistry {
    let mut registry = FlowRegistry::new();
    register_all_flows(&mut registry).unwrap();
    registry
}

#[test]
fn test_all_flows_registered_in_order() {
    assert_eq!(
        registry().list_flows(),
        [
            ANALYZE_INPUT,
            GENERATE_OPTIMIZED_QUERIES,
            SUGGEST_RELATED_TERMS,
            STRATEGIC_QUERY_MODULES
        ]
    );
}

#[test]
fn test_registering_twice_fails() {
    let mut registry = registry();
    let err = register_all_flows(&mut registry).unwrap_err();
    assert_eq!(err, SeekerError::DuplicateFlow(ANALYZE_INPUT.to_string()));
}

#[test]
fn test_field_contracts() {
    let registry = registry();
    let cases = [
        (ANALYZE_INPUT, vec!["input"], vec!["entities", "concepts", "informationNeeds", "querySuggestions"]),
        (GENERATE_OPTIMIZED_QUERIES, vec!["query"], vec!["googleQueries", "yandexQueries"]),
        (SUGGEST_RELATED_TERMS, vec!["searchTerm"], vec!["relatedTerms", "alternativeStrategies"]),
        (STRATEGIC_QUERY_MODULES, vec!["objective", "context"], vec!["queries"]),
    ];

    for (name, inputs, outputs) in cases {
        let flow = registry.lookup(name).unwrap();
        assert_eq!(flow.input_schema.field_names(), inputs, "{name} inputs");
        assert_eq!(flow.output_schema.field_names(), outputs, "{name} outputs");
        assert!(flow.output_schema.fields().iter().all(|f| f.required));
    }
}

#[test]
fn test_every_placeholder_is_an_input_field() {
    let registry = registry();
    for flow in registry.definitions() {
        for placeholder in flow.prompt.placeholders() {
            assert!(
                flow.input_schema.field(placeholder).is_some(),
                "{} uses unknown placeholder {}",
                flow.name,
                placeholder
            );
        }
    }
}

#[test]
fn test_validated_output_revalidates_unchanged() {
    let registry = registry();
    let flow = registry.lookup(ANALYZE_INPUT).unwrap();
    let candidate = json!({
        "entities": ["Project Aurora"],
        "concepts": ["infrastructure"],
        "informationNeeds": "who funds it",
        "querySuggestions": []
    });

    let once = validate(&flow.output_schema, candidate.clone()).unwrap();
    let twice = validate(&flow.output_schema, once.clone()).unwrap();
    assert_eq!(once, candidate);
    assert_eq!(twice, once);
}

#[test]
fn test_pipeline_chains_analyze_into_optimize() {
    assert_eq!(
        analyze_then_optimize().flows(),
        vec![ANALYZE_INPUT, GENERATE_OPTIMIZED_QUERIES]
    );
}

#[test]
fn test_objectives_catalogue() {
    assert_eq!(OSINT_OBJECTIVES.len(), 7);
    assert!(OSINT_OBJECTIVES.contains(&"Metadata Discovery"));
}
