//! Prompt templates

use toolkit::ToolRegistry;

const ROLE: &str = "You are a smart travel assistant. Your job is to analyse the user's request \
and solve it step by step with the available tools.";

const FORMAT_RULES: &str = r#"# Action format:
Your reply must strictly follow the format below. First write your reasoning, then the single action you want to take. Output exactly one Thought/Action pair per reply:
Thought: [your reasoning about what to do next]
Action: [one of the following]
- `tool_name(arg_name="arg_value")`: call one of the available tools; every argument value must be in double quotes.
- `finish(answer="final answer")`: give the final answer.

# Finishing the task:
Once you have gathered enough information to answer the user's question, you must use `finish(answer="...")` after `Action:` to give the final answer.

Never write an `Observation:` line yourself; it is provided to you after each tool call."#;

/// System prompt listing the registered tools
pub fn build_system_prompt(registry: &ToolRegistry) -> String {
    let schemas = registry.schemas();
    let tools = if schemas.is_empty() {
        "- (no tools available)".to_string()
    } else {
        schemas
            .iter()
            .map(|s| format!("- `{}`: {}", s.signature(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("{ROLE}\n\n# Available tools:\n{tools}\n\n{FORMAT_RULES}")
}

/// User request for the weather + attraction task
pub fn travel_request(city: &str) -> String {
    format!(
        "Hello, please check today's weather in {}, then recommend a suitable tourist attraction based on the weather.",
        city.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_lists_default_tools() {
        let registry = ToolRegistry::with_defaults(&config::ToolsConfig::default()).unwrap();
        let prompt = build_system_prompt(&registry);

        assert!(prompt.contains("- `get_weather(city: str)`"));
        assert!(prompt.contains("- `get_attraction(city: str, weather: str)`"));
        assert!(prompt.contains(r#"finish(answer="...")"#));
    }

    #[test]
    fn system_prompt_without_tools() {
        let prompt = build_system_prompt(&ToolRegistry::new());
        assert!(prompt.contains("(no tools available)"));
    }

    #[test]
    fn travel_request_mentions_city() {
        let req = travel_request("  Kyoto ");
        assert!(req.contains("weather in Kyoto,"));
    }
}
