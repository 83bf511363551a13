use crate::api::models::{to_wire_messages, RequestBody};
use crate::api::streaming::{decode_stream, ResponseStream};
use crate::api::client::make_api_request;
use crate::config::Config;
use crate::error::{CommanderError, Result};
use crate::models::{ChatMessage, ToolDescriptor};
use crate::tools::format_tools_for_llm;
use std::future::Future;
use std::pin::Pin;

/// A chat model that answers with a lazy stream of response parts.
///
/// Object-safe so the orchestrator can be driven by scripted models in tests.
pub trait LanguageModel: Send + Sync {
    fn family(&self) -> &str;

    fn send_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &'a [ToolDescriptor],
    ) -> Pin<Box<dyn Future<Output = Result<ResponseStream>> + Send + 'a>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelector {
    pub family: String,
}

impl ModelSelector {
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }
}

/// Model served by an OpenAI-compatible chat-completions endpoint.
pub struct OpenRouterModel {
    family: String,
    model_id: String,
    api_key: String,
    endpoint: String,
    stream_timeout: u64,
}

impl OpenRouterModel {
    pub fn new(
        family: impl Into<String>,
        model_id: impl Into<String>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        stream_timeout: u64,
    ) -> Self {
        Self {
            family: family.into(),
            model_id: model_id.into(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            stream_timeout,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl LanguageModel for OpenRouterModel {
    fn family(&self) -> &str {
        &self.family
    }

    fn send_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &'a [ToolDescriptor],
    ) -> Pin<Box<dyn Future<Output = Result<ResponseStream>> + Send + 'a>> {
        Box::pin(async move {
            let request_body = RequestBody {
                model: self.model_id.clone(),
                messages: to_wire_messages(messages),
                stream: true,
                tools: if tools.is_empty() {
                    None
                } else {
                    Some(format_tools_for_llm(tools))
                },
            };

            tracing::debug!(
                model = %self.model_id,
                messages = request_body.messages.len(),
                tools = tools.len(),
                "Sending chat request"
            );

            let response = make_api_request(&self.api_key, &self.endpoint, &request_body).await?;
            tracing::debug!(status = %response.status(), "Chat response started");

            Ok(decode_stream(response.bytes_stream(), self.stream_timeout))
        })
    }
}

/// Picks the chat model for a turn. There is no fallback: without an API key
/// or a family the turn cannot proceed.
pub fn select_chat_model(selector: &ModelSelector, config: &Config) -> Result<OpenRouterModel> {
    if selector.family.trim().is_empty() {
        return Err(CommanderError::ModelUnavailable {
            family: selector.family.clone(),
            reason: "no model family configured".to_string(),
        });
    }

    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| CommanderError::ModelUnavailable {
            family: selector.family.clone(),
            reason: "OPENROUTER_API_KEY environment variable not set".to_string(),
        })?;

    let model_id = config
        .model_id
        .clone()
        .unwrap_or_else(|| format!("openai/{}", selector.family));

    Ok(OpenRouterModel::new(
        selector.family.clone(),
        model_id,
        api_key,
        config.api_endpoint.clone(),
        config.stream_timeout,
    ))
}
