use async_trait::async_trait;

use crate::{
    chat::ChatProvider, error::LLMError, tools::ToolRegistry, transcript::Transcript,
};

use super::{Assistant, SERVICE_DESK_SYSTEM_PROMPT};

/// Chat with service desk tools.
///
/// Per user turn the model is asked once with the tool descriptors. If it
/// requests tools, each call is executed in order and recorded as an
/// (assistant tool call, tool result) pair, then the model is asked again.
/// After `max_tool_rounds` rounds the follow-up request carries no tools, so
/// the exchange always ends with a text reply.
pub struct ToolAssistant {
    provider: Box<dyn ChatProvider>,
    registry: ToolRegistry,
    system: String,
    max_tool_rounds: usize,
}

impl ToolAssistant {
    pub fn new(provider: Box<dyn ChatProvider>, registry: ToolRegistry) -> Self {
        Self {
            provider,
            registry,
            system: SERVICE_DESK_SYSTEM_PROMPT.to_string(),
            max_tool_rounds: 1,
        }
    }

    /// Replace the default system instruction.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Number of tool rounds allowed per user turn. Zero disables tools.
    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}

#[async_trait]
impl Assistant for ToolAssistant {
    fn label(&self) -> &str {
        "Function Calling Assistant"
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

        let tools = self.registry.descriptors();
        let offered = (self.max_tool_rounds > 0).then_some(tools);
        let mut response = self
            .provider
            .chat_with_tools(transcript.messages(), offered)
            .await?;

        let mut rounds = 0;
        while rounds < self.max_tool_rounds {
            let Some(calls) = response.tool_calls() else {
                break;
            };
            rounds += 1;
            log::debug!("Tool round {rounds}: {} call(s) requested", calls.len());

            for call in calls {
                let result = self.registry.dispatch(&call).await;
                let call_id = call.id.clone();
                transcript.append_assistant("", Some(vec![call]));
                transcript.append_tool_result(&call_id, result)?;
            }

            response = if rounds < self.max_tool_rounds {
                self.provider
                    .chat_with_tools(transcript.messages(), Some(tools))
                    .await?
            } else {
                self.provider.chat(transcript.messages()).await?
            };
        }

        let text = response.text().unwrap_or_default();
        transcript.append_assistant(text.clone(), None);
        Ok(text)
    }
}
