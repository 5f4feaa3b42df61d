//! ReAct Loop Implementation
//!
//! This crate implements the ReAct (Reasoning + Acting) loop for a
//! single agent that answers with a plain-text grammar:
//!
//! ```text
//! Thought: <reasoning>
//! Action: tool_name(key="value", ...)   or   finish(answer="...")
//! ```
//!
//! The loop follows the pattern:
//! 1. Think: the model reads the prompt history and writes one Thought/Action block
//! 2. Act: the action is parsed and dispatched to a registered tool
//! 3. Observe: the tool result is appended to the history as `Observation: ...`
//! 4. Repeat until `finish`, an unparsable turn, or the step budget

pub mod agent;
pub mod dispatch;
pub mod event;
pub mod history;
pub mod interpreter;
pub mod parser;
pub mod prompt;

pub use agent::{react_ask, AgentRun, Outcome, ReActStepTrace, ReactAgent, ReactOptions};
pub use dispatch::{dispatch, Observation};
pub use event::{AgentEvent, EventSink, Silent};
pub use history::PromptHistory;
pub use interpreter::{interpret, parse_kwargs, Action, FinishPolicy, UnparsedReason};
pub use parser::{parse_output, ParsedStep};
pub use prompt::{build_system_prompt, travel_request};

// Re-export common types
pub use llm::{LLMClient, LLMConfig};
pub use toolkit::{Tool, ToolArgs, ToolRegistry};

use error::{CompassError, Result};

/// Text-in/text-out language model used by the loop
pub trait ModelClient {
    /// Complete `prompt` under `system_prompt`
    fn generate(&self, prompt: &str, system_prompt: &str) -> Result<String>;
}

impl ModelClient for LLMClient {
    fn generate(&self, prompt: &str, system_prompt: &str) -> Result<String> {
        self.chat_system_user(system_prompt, prompt)
            .map_err(|e| CompassError::llm(format!("{e:#}")))
    }
}

impl<M: ModelClient + ?Sized> ModelClient for &M {
    fn generate(&self, prompt: &str, system_prompt: &str) -> Result<String> {
        (**self).generate(prompt, system_prompt)
    }
}

impl<M: ModelClient + ?Sized> ModelClient for Box<M> {
    fn generate(&self, prompt: &str, system_prompt: &str) -> Result<String> {
        (**self).generate(prompt, system_prompt)
    }
}
