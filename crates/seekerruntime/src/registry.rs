use seekercore::{ExecutionResult, FlowDefinition, SeekerError};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available flows.
///
/// Populated once at startup and then shared behind an `Arc`; lookups take
/// `&self` and never lock.
pub struct FlowRegistry {
    flows: HashMap<String, Arc<FlowDefinition>>,
    order: Vec<String>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self {
            flows: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a flow definition; names must be unique
    pub fn register(&mut self, definition: FlowDefinition) -> ExecutionResult<()> {
        if self.flows.contains_key(&definition.name) {
            return Err(SeekerError::DuplicateFlow(definition.name));
        }
        tracing::info!("Registering flow: {}", definition.name);
        self.order.push(definition.name.clone());
        self.flows
            .insert(definition.name.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> ExecutionResult<Arc<FlowDefinition>> {
        self.flows
            .get(name)
            .cloned()
            .ok_or_else(|| SeekerError::UnknownFlow(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    /// Flow names in registration order
    pub fn list_flows(&self) -> &[String] {
        &self.order
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<FlowDefinition>> {
        self.order.iter().filter_map(|name| self.flows.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
