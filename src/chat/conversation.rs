use crate::models::{ChatMessage, HistoryTurn, ResponseTurnPart};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a settings commander and your goal is to update settings by using the provided tools. Make sure the setting exists. Do not update the setting if you won't change its value. Never ask the user whether they think you should update the setting, just do it.";

/// System instruction, replayed history, then the new prompt.
///
/// Response turns contribute one assistant message per markdown segment;
/// progress segments are not part of what the model said and are dropped.
pub fn build_conversation(system_prompt: &str, history: &[HistoryTurn], prompt: &str) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt)];

    for turn in history {
        match turn {
            HistoryTurn::Request { prompt } => messages.push(ChatMessage::user(prompt.clone())),
            HistoryTurn::Response { parts } => {
                for part in parts {
                    match part {
                        ResponseTurnPart::Markdown(text) => {
                            messages.push(ChatMessage::assistant(text.clone()))
                        }
                        ResponseTurnPart::Progress(_) => {}
                    }
                }
            }
        }
    }

    messages.push(ChatMessage::user(prompt));
    messages
}
