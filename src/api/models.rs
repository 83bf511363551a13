use crate::models::{ChatMessage, MessagePart};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WireMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionCall,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Maps conversation messages onto chat-completions messages.
///
/// Tool results ride in user messages internally but the endpoint expects
/// one `tool` message per result.
pub fn to_wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
    let mut wire = Vec::with_capacity(messages.len());

    for message in messages {
        let mut text = String::new();
        let mut tool_calls = Vec::new();
        let mut results = Vec::new();

        for part in &message.content {
            match part {
                MessagePart::Text { text: t } => text.push_str(t),
                MessagePart::ToolCall(call) => tool_calls.push(WireToolCall {
                    id: call.call_id.clone(),
                    tool_type: "function".to_string(),
                    function: FunctionCall {
                        name: call.name.clone(),
                        arguments: call.parameters.clone(),
                    },
                }),
                MessagePart::ToolResult { call_id, content } => results.push(WireMessage {
                    role: "tool".to_string(),
                    content: Some(content.clone()),
                    tool_calls: None,
                    tool_call_id: Some(call_id.clone()),
                }),
            }
        }

        if !text.is_empty() || !tool_calls.is_empty() || results.is_empty() {
            wire.push(WireMessage {
                role: message.role.as_str().to_string(),
                content: if text.is_empty() && !tool_calls.is_empty() {
                    None
                } else {
                    Some(text)
                },
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(tool_calls)
                },
                tool_call_id: None,
            });
        }
        wire.extend(results);
    }

    wire
}

#[derive(Deserialize)]
pub struct FunctionDelta {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[derive(Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,
    pub id: Option<String>,
    pub function: Option<FunctionDelta>,
}

#[derive(Deserialize)]
pub struct Delta {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub delta: Option<Delta>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize)]
pub struct StreamError {
    pub message: String,
    pub code: Option<Value>,
}

#[derive(Deserialize)]
pub struct StreamResponse {
    pub choices: Option<Vec<Choice>>,
    pub error: Option<StreamError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToolCallPart;
    use serde_json::json;

    #[test]
    fn test_tool_round_maps_to_tool_messages() {
        let messages = vec![
            ChatMessage::system("sys"),
            ChatMessage::user("bigger font"),
            ChatMessage::tool_calls(vec![ToolCallPart {
                name: "updateSetting".into(),
                call_id: "call_1".into(),
                parameters: r#"{"key":"editor.fontSize","value":16}"#.into(),
            }]),
            ChatMessage::tool_result("call_1", "Changed"),
            ChatMessage::user("Above is the result"),
        ];

        let wire = serde_json::to_value(to_wire_messages(&messages)).unwrap();
        assert_eq!(
            wire,
            json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "bigger font"},
                {"role": "assistant", "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "updateSetting", "arguments": "{\"key\":\"editor.fontSize\",\"value\":16}"}
                }]},
                {"role": "tool", "content": "Changed", "tool_call_id": "call_1"},
                {"role": "user", "content": "Above is the result"}
            ])
        );
    }

    #[test]
    fn test_stream_response_with_tool_call_delta() {
        let parsed: StreamResponse = serde_json::from_str(
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_9","function":{"name":"searchSettings","arguments":""}}]},"finish_reason":null}]}"#,
        )
        .unwrap();
        let choices = parsed.choices.unwrap();
        let calls = choices[0].delta.as_ref().unwrap().tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id.as_deref(), Some("call_9"));
        assert!(choices[0].finish_reason.is_none());
    }
}
