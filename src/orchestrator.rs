use crate::api::LanguageModel;
use crate::chat::ChatSurface;
use crate::error::{CommanderError, Result};
use crate::models::{ChatMessage, ResponsePart, ToolCallPart, ToolDescriptor, ToolResult};
use crate::tools::{ToolContext, ToolRegistry};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;

/// Result of a completed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub rounds: u32,
    pub tool_calls: usize,
    /// The conversation as last sent to the model.
    pub messages: Vec<ChatMessage>,
}

/// A tool invocation started mid-stream and joined once the stream is drained.
struct PendingCall {
    call: ToolCallPart,
    result: JoinHandle<Result<ToolResult>>,
}

pub fn tool_result_notice(tool_ids: &[String]) -> String {
    format!(
        "Above is the result of calling the functions {}. The user cannot see this result, so you should explain it to the user if referencing it in your answer.",
        tool_ids.join(", ")
    )
}

/// Drives send → consume → invoke tools → resend until the model stops calling tools.
pub struct Orchestrator<'a> {
    model: &'a dyn LanguageModel,
    registry: &'a ToolRegistry,
    tools: Vec<ToolDescriptor>,
    context: ToolContext,
    max_rounds: u32,
}

impl<'a> Orchestrator<'a> {
    /// `tools` is what gets advertised; calls are resolved against the whole registry.
    pub fn new(
        model: &'a dyn LanguageModel,
        registry: &'a ToolRegistry,
        tools: Vec<ToolDescriptor>,
        context: ToolContext,
        max_rounds: u32,
    ) -> Self {
        Self {
            model,
            registry,
            tools,
            context,
            max_rounds: max_rounds.max(1),
        }
    }

    pub async fn run(
        &self,
        initial_messages: Vec<ChatMessage>,
        surface: &mut dyn ChatSurface,
    ) -> Result<TurnOutcome> {
        let mut messages = initial_messages;
        let mut rounds = 0u32;
        let mut tool_calls = 0usize;

        loop {
            if rounds >= self.max_rounds {
                tracing::warn!(rounds, "Tool calling hit the round limit");
                return Err(CommanderError::RoundLimitExceeded {
                    max_rounds: self.max_rounds,
                });
            }
            rounds += 1;

            ensure_ends_with_user(&messages)?;

            let pending = match self.consume_round(&messages, surface, rounds).await {
                Ok(pending) => pending,
                Err(e) => {
                    tracing::error!(error = %e, round = rounds, "Error invoking model with tools");
                    return Err(e);
                }
            };

            if pending.is_empty() {
                tracing::debug!(rounds, tool_calls, "Turn complete");
                return Ok(TurnOutcome {
                    rounds,
                    tool_calls,
                    messages,
                });
            }

            tool_calls += pending.len();
            append_tool_results(&mut messages, pending).await;
        }
    }

    async fn consume_round(
        &self,
        messages: &[ChatMessage],
        surface: &mut dyn ChatSurface,
        round: u32,
    ) -> Result<Vec<PendingCall>> {
        tracing::debug!(round, messages = messages.len(), "Sending round to model");
        let mut stream = self.model.send_request(messages, &self.tools).await?;
        let mut pending = Vec::new();

        while let Some(part) = stream.next().await {
            match part? {
                ResponsePart::Text(text) => surface.markdown(&text)?,
                ResponsePart::ToolCall(call) => {
                    if let Some(started) = self.start_call(call, surface)? {
                        pending.push(started);
                    }
                }
            }
        }

        Ok(pending)
    }

    /// Spawns the invocation, or returns `None` when the call is dropped.
    fn start_call(&self, call: ToolCallPart, surface: &mut dyn ChatSurface) -> Result<Option<PendingCall>> {
        let Some(tool) = self.registry.get(&call.name) else {
            tracing::debug!(tool = %call.name, call_id = %call.call_id, "Dropping call to unknown tool");
            return Ok(None);
        };

        let parameters = if tool.descriptor.parameters_schema.is_some() && !call.parameters.trim().is_empty() {
            match serde_json::from_str::<Value>(&call.parameters) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(
                        tool = %call.name,
                        parameters = %call.parameters,
                        error = %e,
                        "Failed to parse parameters for tool"
                    );
                    return Ok(None);
                }
            }
        } else {
            None
        };

        surface.progress(&format!("Calling tool: {}...", call.name))?;
        tracing::debug!(tool = %call.name, call_id = %call.call_id, "Invoking tool");

        let invocation = self
            .registry
            .invoke(&call.name, parameters, self.context.clone());

        Ok(Some(PendingCall {
            call,
            result: tokio::spawn(invocation),
        }))
    }
}

/// The model may only be asked to continue from a plain user message.
pub fn ensure_ends_with_user(messages: &[ChatMessage]) -> Result<()> {
    match messages.last() {
        Some(last) if last.is_plain_user() => Ok(()),
        Some(last) => Err(CommanderError::InvalidConversation(format!(
            "conversation ends with a {} message",
            last.role.as_str()
        ))),
        None => Err(CommanderError::InvalidConversation(
            "conversation is empty".to_string(),
        )),
    }
}

/// Joins pending calls in discovery order and appends the round's messages.
async fn append_tool_results(messages: &mut Vec<ChatMessage>, pending: Vec<PendingCall>) {
    messages.push(ChatMessage::tool_calls(
        pending.iter().map(|p| p.call.clone()).collect(),
    ));

    let mut tool_ids = Vec::with_capacity(pending.len());
    for PendingCall { call, result } in pending {
        let result = match result.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ToolResult::text(format!("Error: {}", e)),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool task did not complete");
                ToolResult::text(format!("Error: tool '{}' did not complete", call.name))
            }
        };
        tracing::debug!(
            tool = %call.name,
            call_id = %call.call_id,
            content_type = result.preferred_type().map(|t| t.mime()).unwrap_or("none"),
            "Tool result ready"
        );
        messages.push(ChatMessage::tool_result(call.call_id.clone(), result.preferred()));
        tool_ids.push(call.name);
    }

    messages.push(ChatMessage::user(tool_result_notice(&tool_ids)));
}
