use crate::{FlowExecutor, FlowRegistry};
use seekercore::{EventBus, ExecutionEvent, ModelAdapter};
use std::sync::Arc;

/// Wires a populated registry, a model adapter and the event bus together
pub struct SeekerRuntime {
    registry: Arc<FlowRegistry>,
    executor: Arc<FlowExecutor>,
    event_bus: Arc<EventBus>,
}

impl SeekerRuntime {
    /// Create a runtime with default settings
    pub fn new(registry: FlowRegistry, model: Arc<dyn ModelAdapter>) -> Self {
        Self::with_config(registry, model, RuntimeConfig::default())
    }

    pub fn with_config(
        registry: FlowRegistry,
        model: Arc<dyn ModelAdapter>,
        config: RuntimeConfig,
    ) -> Self {
        let registry = Arc::new(registry);
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));
        let executor = Arc::new(FlowExecutor::new(
            registry.clone(),
            model,
            event_bus.clone(),
        ));

        tracing::info!(
            "Runtime initialized with {} flows: {}",
            registry.len(),
            registry.list_flows().join(", ")
        );

        Self {
            registry,
            executor,
            event_bus,
        }
    }

    pub fn registry(&self) -> &Arc<FlowRegistry> {
        &self.registry
    }

    pub fn executor(&self) -> &Arc<FlowExecutor> {
        &self.executor
    }

    /// Subscribe to execution events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<ExecutionEvent> {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}

/// Configuration for the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 1000,
        }
    }
}
