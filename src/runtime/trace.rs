//! Diagnostic sink for intermediate conversion values.

use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Preprocessed { input_len: usize, output_len: usize },
    Parsed { node_count: usize },
    AuthorResolved(String),
    TitleResolved(String),
    StructureResolved(Vec<String>),
    ChunksFound { count: usize },
    UnitBuilt { reference: String },
    Finished { units: usize },
}

impl TraceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TraceEvent::Preprocessed { .. } => "preprocessed",
            TraceEvent::Parsed { .. } => "parsed",
            TraceEvent::AuthorResolved(_) => "author_resolved",
            TraceEvent::TitleResolved(_) => "title_resolved",
            TraceEvent::StructureResolved(_) => "structure_resolved",
            TraceEvent::ChunksFound { .. } => "chunks_found",
            TraceEvent::UnitBuilt { .. } => "unit_built",
            TraceEvent::Finished { .. } => "finished",
        }
    }
}

pub trait TraceSink: Send + Sync {
    fn record(&self, event: TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn record(&self, _event: TraceEvent) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrace;

impl TraceSink for TracingTrace {
    fn record(&self, event: TraceEvent) {
        tracing::debug!("[Tess] {}: {:?}", event.name(), event);
    }
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TraceSink for RecordingTrace {
    fn record(&self, event: TraceEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
