//! Progress events for a human-readable trace of a run.

use crate::interpreter::UnparsedReason;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Run started with this user request
    Request { request: String },
    /// Iteration `step` (1-based) of at most `max_steps`
    StepStarted { step: usize, max_steps: usize },
    /// Combined prompt about to be sent
    Prompt { prompt: String },
    /// Model output as recorded in history
    ModelOutput { text: String, truncated: bool },
    /// Observation line as recorded in history
    Observation { text: String },
    Finished { answer: String },
    Aborted { reason: UnparsedReason },
    BudgetExhausted { steps: usize },
}

/// Receiver of progress events
pub trait EventSink {
    fn emit(&mut self, event: AgentEvent);
}

impl<F> EventSink for F
where
    F: FnMut(AgentEvent),
{
    fn emit(&mut self, event: AgentEvent) {
        self(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl EventSink for Silent {
    fn emit(&mut self, _event: AgentEvent) {}
}
