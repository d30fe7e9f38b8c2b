//! A conversational service desk assistant built on an OpenAI-compatible chat API.
//!
//! # Overview
//! The crate keeps a linear conversation transcript, describes a fixed menu of
//! service desk operations to the model as tools, dispatches the model's tool
//! calls to a REST backend and feeds the results back before the final answer.
//!
//! - Plain chat ([`assistant::PlainAssistant`])
//! - Tool calling chat ([`assistant::ToolAssistant`])
//! - Service desk REST client ([`servicedesk::ServiceDeskClient`])
//! - Interactive loop ([`repl`], with the `cli` feature)

// Re-export for convenience
pub use async_trait::async_trait;

use serde::{Deserialize, Serialize};

/// Conversation assistants: plain chat and tool calling
pub mod assistant;

/// Chat completion backends
pub mod backends;

/// Builder pattern for configuring the gateway and tool descriptors
pub mod builder;

/// Chat-based interactions with language models
pub mod chat;

/// Runtime configuration
pub mod config;

/// Error types and handling
pub mod error;

/// REST client for the service desk backend
pub mod servicedesk;

/// Tool registry and dispatcher
pub mod tools;

/// Append-only conversation transcript
pub mod transcript;

#[cfg(feature = "cli")]
pub mod repl;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Tool call represents a function call that an LLM wants to make.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct ToolCall {
    /// The ID of the tool call.
    pub id: String,
    /// The type of the tool call (usually "function").
    #[serde(rename = "type", default = "function_call_type")]
    pub call_type: String,
    /// The function to call.
    pub function: FunctionCall,
}

/// FunctionCall contains details about which function to call and with what arguments.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct FunctionCall {
    /// The name of the function to call.
    pub name: String,
    /// The arguments to pass to the function, serialized as a JSON string.
    pub arguments: String,
}

fn function_call_type() -> String {
    "function".to_string()
}

impl std::fmt::Display for ToolCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}({})",
            self.id, self.function.name, self.function.arguments
        )
    }
}
