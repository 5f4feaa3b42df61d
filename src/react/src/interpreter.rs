//! Action interpreter: action line -> `Action`.
//!
//! The grammar is deliberately loose. Only two things end a run here: no
//! action line at all, and an action that is neither `finish` nor
//! `name(...)`. Everything else is tolerated (unquoted or broken arguments
//! are skipped).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use toolkit::ToolArgs;

static FINISH_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"finish\(answer="(.*)"\)"#).expect("internal regex must be valid"));
static TOOL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\(").expect("internal regex must be valid"));
static TOOL_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.*)\)").expect("internal regex must be valid"));
static KWARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("internal regex must be valid"));

/// What to do with a `finish...` action whose answer cannot be extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishPolicy {
    /// Finish with an empty answer
    #[default]
    Lenient,
    /// Treat the turn as unparsable
    Strict,
}

/// Why a model turn could not be turned into an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnparsedReason {
    /// No `Action: ` marker in the output
    MissingAction,
    /// Action text has no `name(...)` call
    NoToolCall { action: String },
    /// `finish` without a readable `answer="..."` (strict policy only)
    MalformedFinish { action: String },
}

impl fmt::Display for UnparsedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAction => write!(f, "no Action found in model output"),
            Self::NoToolCall { action } => {
                write!(f, "could not extract a tool name or arguments from `{action}`")
            }
            Self::MalformedFinish { action } => {
                write!(f, "could not extract the answer from `{action}`")
            }
        }
    }
}

/// Interpreted action of one model turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Finish { answer: String },
    ToolCall { name: String, args: ToolArgs },
    Unparsed(UnparsedReason),
}

/// Interpret the action line of a parsed step.
pub fn interpret(action_line: Option<&str>, policy: FinishPolicy) -> Action {
    let Some(action) = action_line else {
        return Action::Unparsed(UnparsedReason::MissingAction);
    };

    if action.starts_with("finish") {
        return match FINISH_ANSWER.captures(action).and_then(|c| c.get(1)) {
            Some(answer) => Action::Finish {
                answer: answer.as_str().to_string(),
            },
            None => match policy {
                FinishPolicy::Lenient => Action::Finish {
                    answer: String::new(),
                },
                FinishPolicy::Strict => Action::Unparsed(UnparsedReason::MalformedFinish {
                    action: action.to_string(),
                }),
            },
        };
    }

    let name = TOOL_NAME.captures(action).and_then(|c| c.get(1));
    let raw_args = TOOL_ARGS.captures(action).and_then(|c| c.get(1));
    match (name, raw_args) {
        (Some(name), Some(raw_args)) => Action::ToolCall {
            name: name.as_str().to_string(),
            args: parse_kwargs(raw_args.as_str()),
        },
        _ => Action::Unparsed(UnparsedReason::NoToolCall {
            action: action.to_string(),
        }),
    }
}

/// Parse `key="value"` pairs; later duplicates win
pub fn parse_kwargs(raw: &str) -> ToolArgs {
    KWARG
        .captures_iter(raw)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}
