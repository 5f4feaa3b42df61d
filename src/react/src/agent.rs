//! ReAct Agent Implementation
//!
//! Each iteration: prompt the model with the whole history, keep the first
//! Thought/Action block, interpret the action, then either stop (finish or
//! unparsable turn) or dispatch the tool call and record the observation.
//! The loop stops after `max_steps` dispatched tool calls.

use crate::dispatch::dispatch;
use crate::event::{AgentEvent, EventSink, Silent};
use crate::history::PromptHistory;
use crate::interpreter::{interpret, Action, FinishPolicy, UnparsedReason};
use crate::parser::parse_output;
use crate::prompt::{build_system_prompt, travel_request};
use crate::ModelClient;
use error::Result;
use serde::{Deserialize, Serialize};
use toolkit::ToolRegistry;

// ============================================================================
// Agent Options
// ============================================================================

/// Options for configuring the ReAct agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactOptions {
    /// Maximum number of tool-dispatch iterations (values below 1 count as 1)
    pub max_steps: usize,

    /// Handling of `finish` actions without a readable answer
    pub finish_policy: FinishPolicy,
}

impl Default for ReactOptions {
    fn default() -> Self {
        Self {
            max_steps: 5,
            finish_policy: FinishPolicy::Lenient,
        }
    }
}

// ============================================================================
// Run Results
// ============================================================================

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Finish { answer: String },
    Abort { reason: UnparsedReason },
    BudgetExhausted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReActStepTrace {
    /// 1-based iteration number
    pub step: usize,
    /// Model output as recorded in history
    pub model_output: String,
    pub action: Action,
    /// Observation line, present only for tool calls
    pub observation: Option<String>,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub outcome: Outcome,
    pub history: PromptHistory,
    pub traces: Vec<ReActStepTrace>,
}

impl AgentRun {
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Finish { answer } => Some(answer),
            _ => None,
        }
    }

    /// Number of iterations performed
    pub fn steps(&self) -> usize {
        self.traces.len()
    }
}

// ============================================================================
// ReAct Agent
// ============================================================================

/// A ReAct agent that can reason and act using tools
pub struct ReactAgent<M> {
    model: M,
    registry: ToolRegistry,
    system_prompt: String,
    options: ReactOptions,
}

impl<M: ModelClient> ReactAgent<M> {
    /// Create a new ReAct agent; the system prompt lists the registry's tools
    pub fn new(model: M, registry: ToolRegistry, options: ReactOptions) -> Self {
        let system_prompt = build_system_prompt(&registry);
        Self {
            model,
            registry,
            system_prompt,
            options,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ReactOptions {
        &self.options
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Ask for today's weather in `topic` and an attraction that suits it
    pub fn run_agent(&self, topic: &str, sink: &mut impl EventSink) -> Result<AgentRun> {
        self.run(&travel_request(topic), sink)
    }

    /// Run the loop for one user request with a fresh history.
    ///
    /// Model-client and tool failures are returned as `Err`; every other
    /// ending is an `Outcome`.
    pub fn run(&self, request: &str, sink: &mut impl EventSink) -> Result<AgentRun> {
        let max_steps = self.options.max_steps.max(1);
        let mut history = PromptHistory::new(request);
        let mut traces = Vec::new();

        tracing::info!(max_steps, "starting ReAct run");
        sink.emit(AgentEvent::Request {
            request: request.to_string(),
        });

        for step in 1..=max_steps {
            sink.emit(AgentEvent::StepStarted { step, max_steps });

            let prompt = history.render();
            tracing::debug!(step, prompt = %prompt, "prompting model");
            sink.emit(AgentEvent::Prompt {
                prompt: prompt.clone(),
            });

            let raw = self
                .model
                .generate(&prompt, &self.system_prompt)
                .map_err(|e| {
                    tracing::error!(step, error = %e, "model call failed");
                    e
                })?;
            tracing::debug!(step, raw = %raw, "model output");

            let parsed = parse_output(&raw);
            if parsed.truncated {
                tracing::warn!(step, "discarded extra Thought/Action blocks from model output");
            }
            sink.emit(AgentEvent::ModelOutput {
                text: parsed.thought_action_text.clone(),
                truncated: parsed.truncated,
            });
            history.push(parsed.thought_action_text.clone());

            let action = interpret(parsed.action_line.as_deref(), self.options.finish_policy);
            let mut trace = ReActStepTrace {
                step,
                model_output: parsed.thought_action_text,
                action: action.clone(),
                observation: None,
            };

            match action {
                Action::Unparsed(reason) => {
                    tracing::warn!(step, %reason, "aborting run");
                    traces.push(trace);
                    sink.emit(AgentEvent::Aborted {
                        reason: reason.clone(),
                    });
                    return Ok(AgentRun {
                        outcome: Outcome::Abort { reason },
                        history,
                        traces,
                    });
                }
                Action::Finish { answer } => {
                    tracing::info!(step, "run finished");
                    traces.push(trace);
                    sink.emit(AgentEvent::Finished {
                        answer: answer.clone(),
                    });
                    return Ok(AgentRun {
                        outcome: Outcome::Finish { answer },
                        history,
                        traces,
                    });
                }
                Action::ToolCall { name, args } => {
                    let observation =
                        dispatch(&self.registry, &name, &args).map_err(|e| {
                            tracing::error!(step, tool = %name, error = %e, "tool execution failed");
                            e
                        })?;
                    let line = observation.to_string();

                    sink.emit(AgentEvent::Observation { text: line.clone() });
                    history.push(line.clone());
                    trace.observation = Some(line);
                    traces.push(trace);
                }
            }
        }

        tracing::info!(max_steps, "step budget exhausted");
        sink.emit(AgentEvent::BudgetExhausted { steps: max_steps });
        Ok(AgentRun {
            outcome: Outcome::BudgetExhausted,
            history,
            traces,
        })
    }
}

// ============================================================================
// Convenience Function
// ============================================================================

/// Run one request without collecting progress events
pub fn react_ask<M: ModelClient>(
    model: M,
    registry: ToolRegistry,
    options: ReactOptions,
    request: &str,
) -> Result<AgentRun> {
    ReactAgent::new(model, registry, options).run(request, &mut Silent)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Replies with the same text on every call
    struct Fixed {
        reply: &'static str,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
            }
        }
    }

    impl ModelClient for Fixed {
        fn generate(&self, _prompt: &str, _system_prompt: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.reply.to_string())
        }
    }

    #[test]
    fn test_react_options_default() {
        let opt = ReactOptions::default();
        assert_eq!(opt.max_steps, 5);
        assert_eq!(opt.finish_policy, FinishPolicy::Lenient);
    }

    #[test]
    fn zero_steps_still_runs_once() {
        let options = ReactOptions {
            max_steps: 0,
            ..Default::default()
        };
        let agent = ReactAgent::new(
            Fixed::new("Thought: t\nAction: nowhere(to=\"go\")"),
            ToolRegistry::new(),
            options,
        );
        let run = agent.run("hi", &mut Silent).unwrap();

        assert_eq!(run.outcome, Outcome::BudgetExhausted);
        assert_eq!(agent.model().calls.get(), 1);
        assert_eq!(run.history.len(), 3);
    }

    #[test]
    fn react_ask_returns_answer() {
        let run = react_ask(
            Fixed::new("Thought: known\nAction: finish(answer=\"42\")"),
            ToolRegistry::new(),
            ReactOptions::default(),
            "meaning of life?",
        )
        .unwrap();

        assert_eq!(run.answer(), Some("42"));
        assert_eq!(run.steps(), 1);
        assert_eq!(run.history.len(), 2);
    }
}
