//! Runtime configuration.
//!
//! Values come from the environment (optionally seeded from a `.env` file by
//! the binary) and can be overridden on the command line.

use crate::{
    backends::openai::DEFAULT_MODEL, builder::LLMBuilder, chat::ToolChoice,
    servicedesk::DEFAULT_API_BASE_URL,
};

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Settings shared by both assistant variants.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// Model provider API key
    pub api_key: Option<String>,
    /// Override for the model provider endpoint
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: Option<u64>,
    /// Tool rounds allowed per user turn
    pub max_tool_rounds: usize,
    /// How the model may use offered tools
    pub tool_choice: ToolChoice,
    /// Service desk REST backend
    pub api_base_url: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: None,
            max_tool_rounds: 1,
            tool_choice: ToolChoice::Auto,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AssistantConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns. Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: get(OPENAI_API_KEY_ENV),
            base_url: get(OPENAI_BASE_URL_ENV),
            model: get(OPENAI_MODEL_ENV).unwrap_or(defaults.model),
            api_base_url: get(API_BASE_URL_ENV).unwrap_or(defaults.api_base_url),
            ..defaults
        }
    }

    /// Gateway builder carrying these settings.
    pub fn llm_builder(&self) -> LLMBuilder {
        let mut builder = LLMBuilder::new()
            .model(&self.model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .tool_choice(self.tool_choice);
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(timeout) = self.timeout_seconds {
            builder = builder.timeout_seconds(timeout);
        }
        builder
    }
}
