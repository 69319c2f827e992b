use crate::ErrorKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

pub type ExecutionId = Uuid;

/// Events emitted while a flow runs
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ExecutionEvent {
    FlowStarted {
        execution_id: ExecutionId,
        flow: String,
        timestamp: DateTime<Utc>,
    },
    ModelInvoked {
        execution_id: ExecutionId,
        flow: String,
        model: String,
        prompt_chars: usize,
        timestamp: DateTime<Utc>,
    },
    FlowCompleted {
        execution_id: ExecutionId,
        flow: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    FlowFailed {
        execution_id: ExecutionId,
        flow: String,
        kind: ErrorKind,
        error: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

impl ExecutionEvent {
    pub fn execution_id(&self) -> ExecutionId {
        match self {
            ExecutionEvent::FlowStarted { execution_id, .. }
            | ExecutionEvent::ModelInvoked { execution_id, .. }
            | ExecutionEvent::FlowCompleted { execution_id, .. }
            | ExecutionEvent::FlowFailed { execution_id, .. } => *execution_id,
        }
    }

    pub fn flow(&self) -> &str {
        match self {
            ExecutionEvent::FlowStarted { flow, .. }
            | ExecutionEvent::ModelInvoked { flow, .. }
            | ExecutionEvent::FlowCompleted { flow, .. }
            | ExecutionEvent::FlowFailed { flow, .. } => flow,
        }
    }
}

/// Emitter bound to one flow execution
#[derive(Clone)]
pub struct EventEmitter {
    execution_id: ExecutionId,
    flow: String,
    sender: broadcast::Sender<ExecutionEvent>,
}

impl EventEmitter {
    pub fn new(
        execution_id: ExecutionId,
        flow: impl Into<String>,
        sender: broadcast::Sender<ExecutionEvent>,
    ) -> Self {
        Self {
            execution_id,
            flow: flow.into(),
            sender,
        }
    }

    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    fn send(&self, event: ExecutionEvent) {
        // no subscribers is not an error
        let _ = self.sender.send(event);
    }

    pub fn started(&self) {
        self.send(ExecutionEvent::FlowStarted {
            execution_id: self.execution_id,
            flow: self.flow.clone(),
            timestamp: Utc::now(),
        });
    }

    pub fn model_invoked(&self, model: &str, prompt_chars: usize) {
        self.send(ExecutionEvent::ModelInvoked {
            execution_id: self.execution_id,
            flow: self.flow.clone(),
            model: model.to_string(),
            prompt_chars,
            timestamp: Utc::now(),
        });
    }

    pub fn completed(&self, duration_ms: u64) {
        self.send(ExecutionEvent::FlowCompleted {
            execution_id: self.execution_id,
            flow: self.flow.clone(),
            duration_ms,
            timestamp: Utc::now(),
        });
    }

    pub fn failed(&self, kind: ErrorKind, error: impl Into<String>, duration_ms: u64) {
        self.send(ExecutionEvent::FlowFailed {
            execution_id: self.execution_id,
            flow: self.flow.clone(),
            kind,
            error: error.into(),
            duration_ms,
            timestamp: Utc::now(),
        });
    }
}

/// Process-wide event bus
pub struct EventBus {
    sender: broadcast::Sender<ExecutionEvent>,
}

impl EventBus {
    /// A zero capacity is raised to one
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: ExecutionEvent) {
        let _ = self.sender.send(event);
    }

    pub fn create_emitter(&self, flow: impl Into<String>) -> EventEmitter {
        EventEmitter::new(ExecutionId::new_v4(), flow, self.sender.clone())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
