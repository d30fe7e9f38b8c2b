//! Append-only conversation transcript.
//!
//! A [`Transcript`] always opens with the system instruction it was created
//! with. Turns are only ever appended, never removed or rewritten, and every
//! tool result must answer a tool call requested by an earlier assistant turn.

use std::collections::HashSet;

use crate::{chat::ChatMessage, error::LLMError, ToolCall};

/// Ordered log of conversation turns seeded with a system turn.
///
/// # Examples
///
/// ```rust
/// use servicedesk_assistant::transcript::Transcript;
///
/// let mut transcript = Transcript::new("You are a helpful assistant.");
/// transcript.append_user("Hello");
/// transcript.append_assistant("Hi there!", None);
///
/// assert_eq!(transcript.len(), 3);
/// assert_eq!(transcript.system().content, "You are a helpful assistant.");
/// ```
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    pending_call_ids: HashSet<String>,
}

impl Transcript {
    /// Create a transcript whose first turn is `system`.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system().content(system).build()],
            pending_call_ids: HashSet::new(),
        }
    }

    /// The fixed system turn.
    pub fn system(&self) -> &ChatMessage {
        &self.messages[0]
    }

    /// All turns in chronological order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Most recent turn.
    pub fn last(&self) -> &ChatMessage {
        // never empty: the system turn is inserted at construction
        &self.messages[self.messages.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system turn is present from construction.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user().content(text).build());
    }

    /// Append an assistant turn. When `tool_calls` is non-empty the turn is a
    /// tool request and its call identifiers become answerable by
    /// [`Transcript::append_tool_result`].
    pub fn append_assistant(&mut self, text: impl Into<String>, tool_calls: Option<Vec<ToolCall>>) {
        let builder = ChatMessage::assistant().content(text);
        let message = match tool_calls.filter(|calls| !calls.is_empty()) {
            Some(calls) => {
                self.pending_call_ids
                    .extend(calls.iter().map(|call| call.id.clone()));
                builder.tool_use(calls).build()
            }
            None => builder.build(),
        };
        self.messages.push(message);
    }

    /// Append the textual result of the tool call `call_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidRequest`] if no earlier assistant turn
    /// requested a call with that identifier.
    pub fn append_tool_result(
        &mut self,
        call_id: &str,
        text: impl Into<String>,
    ) -> Result<(), LLMError> {
        if !self.pending_call_ids.contains(call_id) {
            return Err(LLMError::InvalidRequest(format!(
                "tool result references unknown call id {call_id}"
            )));
        }
        self.messages.push(ChatMessage::tool(call_id).content(text).build());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::{ChatRole, MessageType},
        FunctionCall,
    };

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            call_type: "function".into(),
            function: FunctionCall {
                name: "get_all_knowledge_items".into(),
                arguments: "{}".into(),
            },
        }
    }

    #[test]
    fn starts_with_system_turn() {
        let transcript = Transcript::new("be helpful");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.system().role, ChatRole::System);
        assert_eq!(transcript.last(), transcript.system());
    }

    #[test]
    fn appends_in_order() {
        let mut transcript = Transcript::new("be helpful");
        transcript.append_user("hi");
        transcript.append_assistant("", Some(vec![call("c1")]));
        transcript.append_tool_result("c1", "nothing").unwrap();
        transcript.append_assistant("done", None);

        let roles: Vec<_> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::Tool,
                ChatRole::Assistant
            ]
        );
        assert_eq!(
            transcript.messages()[3].message_type,
            MessageType::ToolResult {
                call_id: "c1".into()
            }
        );
        assert_eq!(transcript.system().content, "be helpful");
    }

    #[test]
    fn rejects_result_without_matching_request() {
        let mut transcript = Transcript::new("be helpful");
        transcript.append_assistant("", Some(vec![call("c1")]));

        let err = transcript.append_tool_result("c2", "x").unwrap_err();
        assert!(err.to_string().contains("c2"));
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn empty_tool_call_list_is_plain_text() {
        let mut transcript = Transcript::new("s");
        transcript.append_assistant("hello", Some(Vec::new()));
        assert_eq!(transcript.last().message_type, MessageType::Text);
    }
}
