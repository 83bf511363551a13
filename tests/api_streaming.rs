use commander::api::{select_chat_model, LanguageModel, ModelSelector, OpenRouterModel};
use commander::config::Config;
use commander::error::CommanderError;
use commander::models::{ChatMessage, ResponsePart, ToolCallPart};
use commander::tools::ToolRegistry;
use commander::tools::COMMANDER_TAG;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SSE_BODY: &str = concat!(
    ": OPENROUTER PROCESSING\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"Changing \"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"it now.\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_a\",\"type\":\"function\",\"function\":{\"name\":\"updateSetting\",\"arguments\":\"\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"key\\\":\\\"editor.fontSize\\\",\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"value\\\":16}\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n",
    "data: [DONE]\n\n",
);

fn model_for(server: &MockServer) -> OpenRouterModel {
    OpenRouterModel::new(
        "gpt-4o",
        "openai/gpt-4o",
        "test_api_key",
        format!("{}/v1/chat/completions", server.uri()),
        5,
    )
}

#[tokio::test]
async fn test_streamed_text_and_tool_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test_api_key"))
        .and(body_partial_json(json!({"model": "openai/gpt-4o", "stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SSE_BODY, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let model = model_for(&server);
    let tools = ToolRegistry::with_builtins().descriptors_tagged(COMMANDER_TAG);
    let messages = vec![
        ChatMessage::system("You change settings."),
        ChatMessage::user("make the font 16"),
    ];

    let stream = model.send_request(&messages, &tools).await.unwrap();
    let parts: Vec<ResponsePart> = stream.map(|part| part.unwrap()).collect().await;

    assert_eq!(
        parts,
        vec![
            ResponsePart::Text("Changing ".to_string()),
            ResponsePart::Text("it now.".to_string()),
            ResponsePart::ToolCall(ToolCallPart {
                name: "updateSetting".to_string(),
                call_id: "call_a".to_string(),
                parameters: r#"{"key":"editor.fontSize","value":16}"#.to_string(),
            }),
        ]
    );
}

#[tokio::test]
async fn test_tools_are_advertised_in_function_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "tools": [
                {"type": "function", "function": {"name": "searchSettings"}},
                {"type": "function", "function": {"name": "updateSetting"}}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n\n", "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let model = model_for(&server);
    let tools = ToolRegistry::with_builtins().descriptors_tagged(COMMANDER_TAG);
    let stream = model
        .send_request(&[ChatMessage::user("hi")], &tools)
        .await
        .unwrap();
    let parts: Vec<_> = stream.collect().await;
    assert!(parts.is_empty());
}

#[tokio::test]
async fn test_http_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let model = model_for(&server);
    let result = model.send_request(&[ChatMessage::user("hi")], &[]).await;

    match result {
        Err(CommanderError::ApiError { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid key");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected an API error"),
    }
}

#[tokio::test]
async fn test_in_band_error_ends_stream() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
        "data: {\"error\":{\"message\":\"Provider overloaded\",\"code\":503}}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let model = model_for(&server);
    let mut stream = model
        .send_request(&[ChatMessage::user("hi")], &[])
        .await
        .unwrap();

    assert_eq!(
        stream.next().await.unwrap().unwrap(),
        ResponsePart::Text("Hi".to_string())
    );
    match stream.next().await {
        Some(Err(CommanderError::ApiError { status, message })) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Provider overloaded");
        }
        other => panic!("expected in-band error, got {:?}", other.map(|r| r.is_ok())),
    }
}

#[test]
fn test_select_chat_model_requires_api_key() {
    let config = Config::default();
    let err = select_chat_model(&ModelSelector::family("gpt-4o"), &config)
        .err()
        .unwrap();
    assert!(matches!(err, CommanderError::ModelUnavailable { ref family, .. } if family == "gpt-4o"));
}

#[test]
fn test_select_chat_model_resolves_model_id() {
    let config = Config {
        api_key: Some("sk-test".to_string()),
        ..Config::default()
    };
    let model = select_chat_model(&ModelSelector::family("gpt-4o"), &config).unwrap();
    assert_eq!(model.family(), "gpt-4o");
    assert_eq!(model.model_id(), "openai/gpt-4o");

    let pinned = Config {
        api_key: Some("sk-test".to_string()),
        model_id: Some("anthropic/claude-3.5-sonnet".to_string()),
        ..Config::default()
    };
    let model = select_chat_model(&ModelSelector::family("gpt-4o"), &pinned).unwrap();
    assert_eq!(model.model_id(), "anthropic/claude-3.5-sonnet");

    let err = select_chat_model(&ModelSelector::family(""), &pinned).err().unwrap();
    assert!(matches!(err, CommanderError::ModelUnavailable { .. }));
}
