// crates/seekerruntime/tests/executor_test.rs

use seekercore::testing::ScriptedModel;
use seekercore::{
    ErrorKind, ExecutionEvent, FieldDescriptor, FlowDefinition, ModelError, PromptTemplate,
    Schema, SeekerError,
};
use seekerruntime::{FlowExecutor, FlowRegistry, RuntimeConfig, SeekerRuntime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

fn related_terms_flow() -> FlowDefinition {
    FlowDefinition::new(
        "suggest-related-terms",
        Schema::new().with_field(FieldDescriptor::string("searchTerm")),
        Schema::new()
            .with_field(FieldDescriptor::string_array("relatedTerms"))
            .with_field(FieldDescriptor::string_array("alternativeStrategies")),
        PromptTemplate::new("Initial search term: {{searchTerm}}"),
    )
}

fn runtime_with(model: Arc<ScriptedModel>) -> SeekerRuntime {
    init_tracing();
    let mut registry = FlowRegistry::new();
    registry.register(related_terms_flow()).unwrap();
    SeekerRuntime::new(registry, model)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelatedInput {
    search_term: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RelatedOutput {
    related_terms: Vec<String>,
    alternative_strategies: Vec<String>,
}

#[tokio::test]
async fn test_execute_returns_validated_output() {
    let model = Arc::new(ScriptedModel::new().respond_with(json!({
        "relatedTerms": ["aurora borealis"],
        "alternativeStrategies": ["search archived press releases"],
        "confidence": "high"
    })));
    let runtime = runtime_with(model.clone());

    let output = runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .await
        .unwrap();

    assert_eq!(output["relatedTerms"], json!(["aurora borealis"]));
    // unknown fields pass through
    assert_eq!(output["confidence"], "high");
    assert_eq!(model.calls(), 1);
    assert_eq!(model.prompts()[0], "Initial search term: aurora");
}

#[tokio::test]
async fn test_execute_typed_round_trips_structs() {
    let model = Arc::new(ScriptedModel::new().respond_with(
        "```json\n{\"relatedTerms\": [\"a\"], \"alternativeStrategies\": []}\n```",
    ));
    let runtime = runtime_with(model);

    let output: RelatedOutput = runtime
        .executor()
        .execute_typed(
            "suggest-related-terms",
            &RelatedInput {
                search_term: "aurora".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        output,
        RelatedOutput {
            related_terms: vec!["a".to_string()],
            alternative_strategies: vec![],
        }
    );
}

#[tokio::test]
async fn test_unknown_flow_makes_no_model_call() {
    let model = Arc::new(ScriptedModel::new());
    let runtime = runtime_with(model.clone());

    let err = runtime
        .executor()
        .execute("missing-flow", json!({}))
        .await
        .unwrap_err();

    assert_eq!(err, SeekerError::UnknownFlow("missing-flow".to_string()));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_model_call() {
    let model = Arc::new(ScriptedModel::new());
    let runtime = runtime_with(model.clone());

    let err = runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": 7}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    match err {
        SeekerError::InvalidInput { violation, .. } => assert_eq!(violation.path, "$.searchTerm"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_missing_prompt_variable() {
    init_tracing();
    let mut registry = FlowRegistry::new();
    registry
        .register(FlowDefinition::new(
            "needs-context",
            Schema::new().with_field(FieldDescriptor::string("context").optional()),
            Schema::new(),
            PromptTemplate::new("Context: {{context}}"),
        ))
        .unwrap();
    let model = Arc::new(ScriptedModel::new());
    let runtime = SeekerRuntime::new(registry, model.clone());

    let err = runtime
        .executor()
        .execute("needs-context", json!({}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SeekerError::MissingVariable {
            flow: "needs-context".to_string(),
            variable: "context".to_string(),
        }
    );
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_model_failure_is_not_retried() {
    let model = Arc::new(
        ScriptedModel::new()
            .fail_with(ModelError::Timeout { seconds: 60 })
            .respond_with(json!({"relatedTerms": [], "alternativeStrategies": []})),
    );
    let runtime = runtime_with(model.clone());

    let err = runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ModelCallFailed);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_unparseable_response_is_malformed() {
    let model = Arc::new(ScriptedModel::new().respond_with("Sorry, I can't help with that."));
    let runtime = runtime_with(model);

    let err = runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ModelResponseMalformed);
}

#[tokio::test]
async fn test_partial_output_is_rejected() {
    let model = Arc::new(ScriptedModel::new().respond_with(json!({"relatedTerms": ["a"]})));
    let runtime = runtime_with(model);

    let err = runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .await
        .unwrap_err();

    match err {
        SeekerError::InvalidModelOutput { violation, .. } => {
            assert_eq!(violation.path, "$.alternativeStrategies")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_render_does_not_call_model() {
    let model = Arc::new(ScriptedModel::new());
    let runtime = runtime_with(model.clone());

    let prompt = runtime
        .executor()
        .render("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .unwrap();

    assert_eq!(prompt, "Initial search term: aurora");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_events_are_emitted_in_order() {
    let model = Arc::new(ScriptedModel::new().respond_with(json!({
        "relatedTerms": [],
        "alternativeStrategies": []
    })));
    let runtime = runtime_with(model);
    let mut events = runtime.subscribe_events();

    runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .await
        .unwrap();

    let started = events.recv().await.unwrap();
    let invoked = events.recv().await.unwrap();
    let completed = events.recv().await.unwrap();

    assert!(matches!(started, ExecutionEvent::FlowStarted { .. }));
    assert!(matches!(invoked, ExecutionEvent::ModelInvoked { ref model, .. } if model == "scripted"));
    assert!(matches!(completed, ExecutionEvent::FlowCompleted { .. }));
    assert_eq!(started.execution_id(), completed.execution_id());
    assert_eq!(completed.flow(), "suggest-related-terms");
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let model = Arc::new(
        ScriptedModel::new()
            .respond_with(json!({"relatedTerms": ["one"], "alternativeStrategies": []}))
            .respond_with(json!({"relatedTerms": ["two"], "alternativeStrategies": []})),
    );
    let runtime = runtime_with(model.clone());
    let executor: Arc<FlowExecutor> = runtime.executor().clone();

    let (a, b) = tokio::join!(
        executor.execute("suggest-related-terms", json!({"searchTerm": "a"})),
        executor.execute("suggest-related-terms", json!({"searchTerm": "b"})),
    );

    let mut terms = vec![
        a.unwrap()["relatedTerms"][0].as_str().unwrap().to_string(),
        b.unwrap()["relatedTerms"][0].as_str().unwrap().to_string(),
    ];
    terms.sort();
    assert_eq!(terms, vec!["one", "two"]);
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_zero_event_buffer_is_usable() {
    let model = Arc::new(
        ScriptedModel::new().respond_with(json!({"relatedTerms": [], "alternativeStrategies": []})),
    );
    let mut registry = FlowRegistry::new();
    registry.register(related_terms_flow()).unwrap();
    let runtime = SeekerRuntime::with_config(registry, model, RuntimeConfig { event_buffer_size: 0 });

    let result = runtime
        .executor()
        .execute("suggest-related-terms", json!({"searchTerm": "aurora"}))
        .await;
    assert!(result.is_ok());
}
