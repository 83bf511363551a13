pub mod client;
pub mod model;
pub mod models;
pub mod streaming;

pub use client::make_api_request;
pub use model::{select_chat_model, LanguageModel, ModelSelector, OpenRouterModel};
pub use models::{to_wire_messages, RequestBody};
pub use streaming::{decode_stream, ResponseStream, SseDecoder};
