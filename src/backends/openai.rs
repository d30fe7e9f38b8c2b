//! OpenAI chat completions client.
//!
//! Speaks the `/chat/completions` wire format, so any OpenAI-compatible
//! endpoint can be targeted through `base_url`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, MessageType, Tool, ToolChoice, Usage},
    error::LLMError,
    ToolCall,
};

pub const PROVIDER_NAME: &str = "OpenAI";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o";
const CHAT_ENDPOINT: &str = "chat/completions";

/// Client for the OpenAI chat completions API.
#[derive(Debug)]
pub struct OpenAI {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
    pub tool_choice: Option<ToolChoice>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<&'a [ToolCall]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> From<&'a ChatMessage> for OpenAIChatMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        match &msg.message_type {
            MessageType::Text => OpenAIChatMessage {
                role: msg.role.as_str(),
                content: Some(&msg.content),
                tool_calls: None,
                tool_call_id: None,
            },
            MessageType::ToolUse(calls) => OpenAIChatMessage {
                role: msg.role.as_str(),
                content: (!msg.content.is_empty()).then_some(msg.content.as_str()),
                tool_calls: Some(calls),
                tool_call_id: None,
            },
            MessageType::ToolResult { call_id } => OpenAIChatMessage {
                role: msg.role.as_str(),
                content: Some(&msg.content),
                tool_calls: None,
                tool_call_id: Some(call_id),
            },
        }
    }
}

#[derive(Serialize, Debug)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Tool]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a ToolChoice>,
}

/// Decoded chat completions response
#[derive(Deserialize, Debug)]
pub struct OpenAIChatResponse {
    pub choices: Vec<OpenAIChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct OpenAIChatChoice {
    pub message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
pub struct OpenAIChatMsg {
    pub role: String,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatResponse for OpenAIChatResponse {
    fn text(&self) -> Option<String> {
        self.choices.first().and_then(|c| c.message.content.clone())
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        self.choices
            .first()
            .and_then(|c| c.message.tool_calls.clone())
            .filter(|calls| !calls.is_empty())
    }

    fn usage(&self) -> Option<Usage> {
        self.usage.clone()
    }
}

impl std::fmt::Display for OpenAIChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(choice) = self.choices.first() else {
            return Ok(());
        };
        for tool_call in choice.message.tool_calls.iter().flatten() {
            write!(f, "{tool_call}")?;
        }
        if let Some(content) = &choice.message.content {
            write!(f, "{content}")?;
        }
        Ok(())
    }
}

impl OpenAI {
    /// Creates a new OpenAI client.
    ///
    /// `base_url` defaults to the public OpenAI endpoint and `model` to `gpt-4o`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        tool_choice: Option<ToolChoice>,
    ) -> Result<Self, LLMError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        // Url::join drops the last path segment unless it ends with a slash
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|e| LLMError::InvalidRequest(format!("Invalid base URL {base_url}: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            timeout_seconds,
            tool_choice,
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        if self.api_key.is_empty() {
            return Err(LLMError::AuthError(format!(
                "Missing {PROVIDER_NAME} API key"
            )));
        }

        let tools = tools.filter(|t| !t.is_empty());
        let body = OpenAIChatRequest {
            model: &self.model,
            messages: messages.iter().map(OpenAIChatMessage::from).collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            tools,
            tool_choice: tools.and(self.tool_choice.as_ref()),
        };

        let url = self
            .base_url
            .join(CHAT_ENDPOINT)
            .map_err(|e| LLMError::HttpError(e.to_string()))?;

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("{PROVIDER_NAME} request payload: {json}");
            }
        }

        let mut request = self.client.post(url).bearer_auth(&self.api_key).json(&body);
        if let Some(timeout) = self.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        let response = request.send().await?;

        log::debug!("{PROVIDER_NAME} HTTP status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(LLMError::AuthError(format!(
                    "{PROVIDER_NAME} API returned {status}: {error_text}"
                )));
            }
            return Err(LLMError::ProviderError(format!(
                "{PROVIDER_NAME} API returned error status {status}: {error_text}"
            )));
        }

        let resp_text = response.text().await?;
        match serde_json::from_str::<OpenAIChatResponse>(&resp_text) {
            Ok(response) if response.choices.is_empty() => Err(LLMError::ResponseFormatError {
                message: format!("{PROVIDER_NAME} API returned no choices"),
                raw_response: resp_text,
            }),
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    log::debug!(
                        "{PROVIDER_NAME} usage: prompt={} completion={} total={}",
                        usage.prompt_tokens,
                        usage.completion_tokens,
                        usage.total_tokens
                    );
                }
                Ok(Box::new(response))
            }
            Err(e) => Err(LLMError::ResponseFormatError {
                message: format!("Failed to decode {PROVIDER_NAME} API response: {e}"),
                raw_response: resp_text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FunctionCall;

    #[test]
    fn base_url_gets_trailing_slash() {
        let llm = OpenAI::new("k", Some("http://localhost:9/v1".into()), None, None, None, None, None)
            .unwrap();
        assert_eq!(
            llm.base_url.join(CHAT_ENDPOINT).unwrap().as_str(),
            "http://localhost:9/v1/chat/completions"
        );
        assert_eq!(llm.model, DEFAULT_MODEL);
    }

    #[test]
    fn tool_turns_map_to_wire_shape() {
        let call = ToolCall {
            id: "call_1".into(),
            call_type: "function".into(),
            function: FunctionCall {
                name: "get_incidents".into(),
                arguments: r#"{"caller_name":"Ada"}"#.into(),
            },
        };
        let request = ChatMessage::assistant().tool_use(vec![call]).build();
        let result = ChatMessage::tool("call_1").content("No incidents found for Ada").build();

        let request = serde_json::to_value(OpenAIChatMessage::from(&request)).unwrap();
        let result = serde_json::to_value(OpenAIChatMessage::from(&result)).unwrap();

        assert_eq!(
            request,
            serde_json::json!({
                "role": "assistant",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "get_incidents", "arguments": "{\"caller_name\":\"Ada\"}"}
                }]
            })
        );
        assert_eq!(
            result,
            serde_json::json!({
                "role": "tool",
                "content": "No incidents found for Ada",
                "tool_call_id": "call_1"
            })
        );
    }

    #[test]
    fn empty_tool_call_list_counts_as_none() {
        let resp: OpenAIChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi","tool_calls":[]}}]}"#,
        )
        .unwrap();
        assert!(resp.tool_calls().is_none());
        assert_eq!(resp.text().as_deref(), Some("hi"));
    }
}
