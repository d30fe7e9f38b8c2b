use async_trait::async_trait;

use crate::{chat::ChatProvider, error::LLMError, transcript::Transcript};

use super::{Assistant, PLAIN_SYSTEM_PROMPT};

/// Chat without tools: every user turn gets exactly one model request.
pub struct PlainAssistant {
    provider: Box<dyn ChatProvider>,
    system: String,
}

impl PlainAssistant {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            provider,
            system: PLAIN_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the default system instruction.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }
}

#[async_trait]
impl Assistant for PlainAssistant {
    fn label(&self) -> &str {
        "Assistant"
    }

    fn system_prompt(&self) -> &str {
        &self.system
    }

    async fn try_respond(
        &self,
        transcript: &mut Transcript,
        prompt: &str,
    ) -> Result<String, LLMError> {
        transcript.append_user(prompt);

        let response = self.provider.chat(transcript.messages()).await?;
        let text = response.text().unwrap_or_default();

        transcript.append_assistant(text.clone(), None);
        Ok(text)
    }
}
