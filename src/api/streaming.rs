use crate::api::models::StreamResponse;
use crate::error::{CommanderError, Result};
use crate::models::{ResponsePart, ToolCallPart};
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::collections::{BTreeMap, VecDeque};
use std::pin::Pin;
use tokio::time::{timeout, Duration};

pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<ResponsePart>> + Send>>;

#[derive(Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Incremental decoder for chat-completions server-sent events.
///
/// Text deltas are emitted as soon as they are decoded. Tool-call deltas are
/// accumulated per index and emitted once their choice finishes, on `[DONE]`,
/// or when the stream ends.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    tool_calls: BTreeMap<u32, PartialToolCall>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<ResponsePart>> {
        self.buffer.extend_from_slice(chunk);
        let mut parts = Vec::new();

        // Only complete lines are decoded; a multi-byte character may straddle chunks.
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&line);
            self.process_line(line.trim_end_matches(['\n', '\r']), &mut parts)?;
        }

        Ok(parts)
    }

    /// Drains whatever is left once the transport is exhausted.
    pub fn finish(&mut self) -> Result<Vec<ResponsePart>> {
        let mut parts = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            self.process_line(line.trim_end_matches(['\n', '\r']), &mut parts)?;
        }
        self.flush_tool_calls(&mut parts);
        self.done = true;
        Ok(parts)
    }

    fn process_line(&mut self, line: &str, parts: &mut Vec<ResponsePart>) -> Result<()> {
        if self.done || line.is_empty() || line.starts_with(':') {
            return Ok(());
        }

        let Some(colon_pos) = line.find(':') else {
            tracing::debug!(line, "Ignoring SSE line without field separator");
            return Ok(());
        };
        let field = line[..colon_pos].trim();
        let value = line[colon_pos + 1..].trim_start();

        match field {
            "data" => self.process_data(value, parts),
            "event" | "id" | "retry" => {
                tracing::trace!(field, value, "SSE metadata");
                Ok(())
            }
            _ => {
                tracing::debug!(field, "Unknown SSE field");
                Ok(())
            }
        }
    }

    fn process_data(&mut self, value: &str, parts: &mut Vec<ResponsePart>) -> Result<()> {
        if value == "[DONE]" {
            self.flush_tool_calls(parts);
            self.done = true;
            return Ok(());
        }

        let parsed = match serde_json::from_str::<StreamResponse>(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping undecodable SSE payload");
                return Ok(());
            }
        };

        if let Some(error) = parsed.error {
            let status = error
                .code
                .as_ref()
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(500);
            return Err(CommanderError::ApiError {
                status,
                message: error.message,
            });
        }

        for choice in parsed.choices.unwrap_or_default() {
            if let Some(delta) = choice.delta {
                if let Some(content) = delta.content {
                    if !content.is_empty() {
                        parts.push(ResponsePart::Text(content));
                    }
                }

                for call in delta.tool_calls.unwrap_or_default() {
                    let entry = self.tool_calls.entry(call.index).or_default();
                    if let Some(id) = call.id {
                        entry.id = id;
                    }
                    if let Some(function) = call.function {
                        if let Some(name) = function.name {
                            entry.name.push_str(&name);
                        }
                        if let Some(arguments) = function.arguments {
                            entry.arguments.push_str(&arguments);
                        }
                    }
                }
            }

            if choice.finish_reason.is_some() {
                self.flush_tool_calls(parts);
            }
        }

        Ok(())
    }

    fn flush_tool_calls(&mut self, parts: &mut Vec<ResponsePart>) {
        for (index, call) in std::mem::take(&mut self.tool_calls) {
            if call.name.is_empty() {
                tracing::warn!(index, "Dropping streamed tool call without a name");
                continue;
            }
            let call_id = if call.id.is_empty() {
                format!("call_{}", index)
            } else {
                call.id
            };
            parts.push(ResponsePart::ToolCall(ToolCallPart {
                name: call.name,
                call_id,
                parameters: call.arguments,
            }));
        }
    }
}

struct DecodeState {
    bytes: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>,
    decoder: SseDecoder,
    pending: VecDeque<ResponsePart>,
    chunk_timeout: Duration,
    finished: bool,
}

/// Turns a raw SSE byte stream into response parts.
///
/// Transport errors, in-band API errors and silence longer than
/// `timeout_secs` end the stream with an error item.
pub fn decode_stream<S, E>(bytes: S, timeout_secs: u64) -> ResponseStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<CommanderError> + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes.map(|chunk| chunk.map_err(Into::into))),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        chunk_timeout: Duration::from_secs(timeout_secs),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(part) = state.pending.pop_front() {
                return Some((Ok(part), state));
            }
            if state.finished {
                return None;
            }

            let next = match timeout(state.chunk_timeout, state.bytes.next()).await {
                Ok(next) => next,
                Err(_) => {
                    state.finished = true;
                    return Some((Err(CommanderError::Timeout), state));
                }
            };

            let decoded = match next {
                Some(Ok(chunk)) => state.decoder.push(&chunk),
                Some(Err(e)) => Err(e),
                None => {
                    state.finished = true;
                    state.decoder.finish()
                }
            };

            match decoded {
                Ok(parts) => state.pending.extend(parts),
                Err(e) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
            }

            if state.decoder.is_done() {
                state.finished = true;
            }
        }
    }))
}
