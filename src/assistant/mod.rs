//! Conversation assistants.
//!
//! An assistant never owns the conversation: callers keep a [`Transcript`]
//! per conversation and pass it to every exchange, so several independent
//! conversations can share one assistant.

mod function_calling;
mod plain;

pub use function_calling::ToolAssistant;
pub use plain::PlainAssistant;

use async_trait::async_trait;

use crate::{error::LLMError, transcript::Transcript};

pub const PLAIN_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const SERVICE_DESK_SYSTEM_PROMPT: &str = "You are a helpful service desk assistant capable of using tools and functions. Greet the user by asking what the problem might be and then use the available tools to help the user. If the user has a problem, try to get a knowledge item from the knowledge base to help the user. If the users problem is not solved, create an incident and assign it to the user.";

/// Prefix of the reply returned when an exchange fails.
pub const ERROR_PREFIX: &str = "An error occurred:";

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Name shown in front of replies.
    fn label(&self) -> &str;

    /// System instruction that opens every transcript.
    fn system_prompt(&self) -> &str;

    /// A fresh transcript holding only the system turn.
    fn new_transcript(&self) -> Transcript {
        Transcript::new(self.system_prompt())
    }

    /// Run one exchange: append `prompt` as a user turn, query the model and
    /// append the final assistant turn, returning its text.
    async fn try_respond(
        &self,
        transcript: &mut Transcript,
        prompt: &str,
    ) -> Result<String, LLMError>;

    /// Like [`Assistant::try_respond`], but failures become the reply text.
    async fn respond(&self, transcript: &mut Transcript, prompt: &str) -> String {
        match self.try_respond(transcript, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Exchange failed: {e}");
                format!("{ERROR_PREFIX} {e}")
            }
        }
    }
}
