//! Centralized configuration for Compass
//!
//! Configuration priority:
//! 1. Environment variables (a `.env` file is loaded by the binary first)
//! 2. Config file (compass.toml in the working directory or ~/.config/compass/config.toml)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the project-local config file
pub const CONFIG_FILE_NAME: &str = "compass.toml";

// ============================================================================
// Agent Configuration
// ============================================================================

/// Configuration for the ReAct loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum number of tool-dispatch iterations per query (must be >= 1)
    pub max_steps: usize,

    /// Treat a malformed `finish(...)` as an unparsable turn instead of an empty answer
    pub strict_finish: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            strict_finish: false,
        }
    }
}

// ============================================================================
// LLM Configuration
// ============================================================================

/// Configuration for the chat-completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub api_base: String,

    /// API key (loaded from environment by default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

// ============================================================================
// Tools Configuration
// ============================================================================

/// Configuration for the built-in tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Base URL of the wttr.in weather service
    pub weather_api_base: String,

    /// Base URL of the Tavily search API
    pub tavily_api_base: String,

    /// Tavily API key; `get_attraction` reports an error observation without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tavily_api_key: Option<String>,

    /// Maximum search results requested from Tavily
    pub max_search_results: usize,

    /// HTTP timeout for tool requests in seconds
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            weather_api_base: "https://wttr.in".to_string(),
            tavily_api_base: "https://api.tavily.com".to_string(),
            tavily_api_key: None,
            max_search_results: 5,
            timeout_secs: 20,
        }
    }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// Main configuration structure for Compass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// ReAct loop configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Load configuration from a file
    ///
    /// Looks for `compass.toml` in the current directory or
    /// `~/.config/compass/config.toml`
    pub fn load() -> anyhow::Result<Self> {
        if Path::new(CONFIG_FILE_NAME).is_file() {
            return Self::load_from(CONFIG_FILE_NAME);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("compass").join("config.toml");
            if config_path.is_file() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Load configuration with overrides from environment variables
    pub fn load_with_env() -> anyhow::Result<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = get("BASE_URL") {
            self.llm.api_base = base;
        }
        if let Some(model) = get("MODEL_ID") {
            self.llm.model = model;
        }
        if let Some(key) = get("TAVILY_API_KEY") {
            self.tools.tavily_api_key = Some(key);
        }
        if let Some(steps) = get("COMPASS_MAX_STEPS").and_then(|v| v.trim().parse().ok()) {
            self.agent.max_steps = steps;
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.agent.max_steps == 0 {
            anyhow::bail!("agent.max_steps must be at least 1");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
