use serde_json::{json, Value};
use servicedesk_assistant::{
    builder::LLMBuilder,
    chat::{ChatMessage, ChatProvider, ToolChoice},
    error::LLMError,
    tools::ToolKind,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn llm_for(server: &MockServer) -> servicedesk_assistant::backends::openai::OpenAI {
    LLMBuilder::new()
        .api_key("sk-test")
        .base_url(format!("{}/v1", server.uri()))
        .model("gpt-4o")
        .max_tokens(1000)
        .temperature(0.7)
        .tool_choice(ToolChoice::Auto)
        .build()
        .expect("Failed to build LLM")
}

fn text_completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
    })
}

async fn last_request_body(server: &MockServer) -> Value {
    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    let last = requests.last().expect("at least one request");
    serde_json::from_slice(&last.body).expect("JSON body")
}

#[tokio::test]
async fn chat_sends_transcript_and_fixed_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_completion("Hi!")))
        .expect(1)
        .mount(&server)
        .await;

    let llm = llm_for(&server);
    let messages = vec![
        ChatMessage::system().content("You are a helpful assistant.").build(),
        ChatMessage::user().content("Hello.").build(),
    ];
    let response = llm.chat(&messages).await.unwrap();

    assert_eq!(response.text().as_deref(), Some("Hi!"));
    assert!(response.tool_calls().is_none());
    assert_eq!(response.usage().unwrap().total_tokens, 15);

    let body = last_request_body(&server).await;
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 1000);
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "You are a helpful assistant."},
            {"role": "user", "content": "Hello."}
        ])
    );
    // no tools offered, so no tool choice either
    assert!(body.get("tools").is_none());
    assert!(body.get("tool_choice").is_none());
}

#[tokio::test]
async fn chat_with_tools_offers_descriptors_and_decodes_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "get_incidents", "arguments": "{\"caller_name\":\"Ada\"}"}
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;

    let llm = llm_for(&server);
    let tools = vec![ToolKind::GetIncidents.descriptor()];
    let messages = vec![ChatMessage::user().content("Any tickets for Ada?").build()];
    let response = llm.chat_with_tools(&messages, Some(&tools)).await.unwrap();

    assert!(response.text().is_none());
    let calls = response.tool_calls().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_abc");
    assert_eq!(calls[0].function.name, "get_incidents");

    let body = last_request_body(&server).await;
    assert_eq!(body["tool_choice"], "auto");
    assert_eq!(body["tools"][0]["type"], "function");
    assert_eq!(body["tools"][0]["function"]["name"], "get_incidents");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .mount(&server)
        .await;

    let err = llm_for(&server)
        .chat(&[ChatMessage::user().content("hi").build()])
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::AuthError(ref m) if m.contains("bad key")), "{err}");
}

#[tokio::test]
async fn error_status_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = llm_for(&server)
        .chat(&[ChatMessage::user().content("hi").build()])
        .await
        .unwrap_err();
    match err {
        LLMError::ProviderError(message) => {
            assert!(message.contains("429"), "{message}");
            assert!(message.ends_with("rate limited"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_a_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = llm_for(&server)
        .chat(&[ChatMessage::user().content("hi").build()])
        .await
        .unwrap_err();
    match err {
        LLMError::ResponseFormatError { message, raw_response } => {
            assert!(message.contains("no choices"), "{message}");
            assert_eq!(raw_response, r#"{"choices":[]}"#);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn garbage_body_is_a_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = llm_for(&server)
        .chat(&[ChatMessage::user().content("hi").build()])
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::ResponseFormatError { .. }));
}
