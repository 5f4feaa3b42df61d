//! Tool dispatch: tool call -> observation.

use error::Result;
use std::fmt;
use toolkit::{ToolArgs, ToolRegistry};

/// Result of a tool call as fed back to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    payload: String,
}

impl Observation {
    pub fn new<S: Into<String>>(payload: S) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(format!("Error: undefined tool '{name}'"))
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observation: {}", self.payload)
    }
}

/// Invoke `name` from the registry.
///
/// Unknown tools become an error observation. Undeclared keyword arguments
/// and tool errors are returned as `Err`.
pub fn dispatch(registry: &ToolRegistry, name: &str, args: &ToolArgs) -> Result<Observation> {
    let Some(tool) = registry.get(name) else {
        tracing::warn!(tool = name, "model requested an undefined tool");
        return Ok(Observation::unknown_tool(name));
    };

    toolkit::check_declared_args(&tool.schema(), args)?;
    tracing::debug!(tool = name, ?args, "invoking tool");
    let payload = tool.invoke(args)?;
    Ok(Observation::new(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::CompassError;
    use toolkit::{Tool, ToolSchema};

    struct Echo;

    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "echo text".to_string(),
                input_schema: toolkit::string_params_schema(&[("text", "text to echo")]),
            }
        }

        fn invoke(&self, args: &ToolArgs) -> Result<String> {
            let text = toolkit::required_arg(args, "echo", "text")?;
            Ok(text.to_uppercase())
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Echo));
        registry
    }

    #[test]
    fn known_tool_payload() {
        let mut args = ToolArgs::new();
        args.insert("text".to_string(), "hi".to_string());

        let obs = dispatch(&registry(), "echo", &args).unwrap();
        assert_eq!(obs.payload(), "HI");
        assert_eq!(obs.to_string(), "Observation: HI");
    }

    #[test]
    fn unknown_tool_is_recoverable() {
        let obs = dispatch(&registry(), "get_flights", &ToolArgs::new()).unwrap();
        assert!(obs.payload().contains("get_flights"));
        assert_eq!(
            obs.to_string(),
            "Observation: Error: undefined tool 'get_flights'"
        );
    }

    #[test]
    fn blank_argument_reaches_tool() {
        let mut args = ToolArgs::new();
        args.insert("text".to_string(), String::new());

        let obs = dispatch(&registry(), "echo", &args).unwrap();
        assert_eq!(obs.to_string(), "Observation: ");
    }

    #[test]
    fn undeclared_argument_is_rejected() {
        let mut args = ToolArgs::new();
        args.insert("text".to_string(), "hi".to_string());
        args.insert("loud".to_string(), "yes".to_string());

        let err = dispatch(&registry(), "echo", &args).unwrap_err();
        assert!(matches!(err, CompassError::Validation { .. }));
        assert!(err.to_string().contains("unexpected argument `loud`"));
    }

    #[test]
    fn tool_failure_propagates() {
        let err = dispatch(&registry(), "echo", &ToolArgs::new()).unwrap_err();
        assert!(matches!(err, CompassError::Validation { .. }));
    }
}
