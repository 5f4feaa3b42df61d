//! Prompt history of a single run.

use serde::{Deserialize, Serialize};

/// Ordered prompt entries: the user request, then model outputs and
/// observations. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptHistory {
    entries: Vec<String>,
}

impl PromptHistory {
    /// Start a history with the user's request
    pub fn new(request: &str) -> Self {
        Self {
            entries: vec![format!("User request: {request}")],
        }
    }

    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }

    /// Combined prompt sent to the model
    pub fn render(&self) -> String {
        self.entries.join("\n")
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_joins_with_newlines() {
        let mut history = PromptHistory::new("weather in Paris?");
        history.push("Thought: t\nAction: get_weather(city=\"Paris\")");
        history.push("Observation: sunny");

        assert_eq!(history.len(), 3);
        assert_eq!(
            history.render(),
            "User request: weather in Paris?\nThought: t\nAction: get_weather(city=\"Paris\")\nObservation: sunny"
        );
        assert_eq!(history.last(), Some("Observation: sunny"));
    }
}
