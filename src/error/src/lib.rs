//! Compass Error Types
//!
//! This crate provides unified error types for all Compass components.

/// Unified error type for Compass
#[derive(thiserror::Error, Debug)]
pub enum CompassError {
    #[error("Tool error ({tool}): {message}")]
    Tool { tool: String, message: String },

    #[error("LLM error: {message}")]
    Llm { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CompassError {
    pub fn tool<T: Into<String>, S: Into<String>>(tool: T, message: S) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Missing required argument for a tool call
    pub fn missing_arg(tool: &str, key: &str) -> Self {
        Self::validation(format!("{tool}: missing argument `{key}`"))
    }

    /// Keyword argument the tool does not declare
    pub fn unexpected_arg(tool: &str, key: &str) -> Self {
        Self::validation(format!("{tool}: unexpected argument `{key}`"))
    }
}

pub type Result<T> = std::result::Result<T, CompassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = CompassError::llm("timeout");
        assert!(matches!(err, CompassError::Llm { .. }));
        assert_eq!(err.to_string(), "LLM error: timeout");

        let err = CompassError::tool("get_weather", "boom");
        assert!(matches!(err, CompassError::Tool { .. }));
        assert_eq!(err.to_string(), "Tool error (get_weather): boom");
    }

    #[test]
    fn test_missing_arg_message() {
        let err = CompassError::missing_arg("get_attraction", "weather");
        assert!(matches!(err, CompassError::Validation { .. }));
        assert!(err.to_string().contains("`weather`"));

        let err = CompassError::unexpected_arg("get_weather", "country");
        assert!(matches!(err, CompassError::Validation { .. }));
        assert_eq!(
            err.to_string(),
            "Validation error: get_weather: unexpected argument `country`"
        );
    }
}
