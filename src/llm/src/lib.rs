//! LLM Adapter Layer
//!
//! Blocking client for OpenAI-compatible `/chat/completions` endpoints.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: None,
            timeout_secs: 120,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl LLMConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(v) = env::var("BASE_URL") {
            if !v.trim().is_empty() {
                cfg.api_base = v;
            }
        }

        if let Ok(v) = env::var("MODEL_ID") {
            if !v.trim().is_empty() {
                cfg.model = v;
            }
        }

        cfg.api_key = env::var("API_KEY").map_err(|_| anyhow!("missing environment var: API_KEY"))?;

        if cfg.api_key.trim().is_empty() {
            anyhow::bail!("API_KEY is empty");
        }

        Ok(cfg)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct LLMClient {
    config: LLMConfig,
    http: reqwest::blocking::Client,
}

impl LLMClient {
    pub fn new(config: LLMConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(LLMConfig::from_env()?)
    }

    pub fn config(&self) -> &LLMConfig {
        &self.config
    }

    pub fn chat(&self, messages: Vec<(String, String)>) -> Result<String> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..attempts {
            match self.chat_attempt(&messages) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(attempt = attempt + 1, error = %e, "LLM request failed");
                    last_error = Some(e);

                    if attempt + 1 < attempts {
                        std::thread::sleep(Duration::from_millis(self.config.retry_delay_ms));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("All retries exhausted")))
    }

    fn chat_attempt(&self, messages: &[(String, String)]) -> Result<String> {
        let req = build_request(&self.config, messages);

        let resp = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&req)
            .send()?;

        let status = resp.status();
        let text = resp.text().unwrap_or_default();

        if !status.is_success() {
            anyhow::bail!("LLM request failed: status={} body={}", status, text);
        }

        parse_completion(&text)
    }

    pub fn chat_system_user(&self, system: &str, user: &str) -> Result<String> {
        self.chat(vec![
            ("system".to_string(), system.to_string()),
            ("user".to_string(), user.to_string()),
        ])
    }
}

fn build_request(config: &LLMConfig, messages: &[(String, String)]) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: messages
            .iter()
            .map(|(role, content)| ChatMessage {
                role: role.clone(),
                content: content.clone(),
            })
            .collect(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        stream: false,
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("LLM response parse error: {}; body={}", e, body))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| anyhow!("LLM response has no choices"))
}
