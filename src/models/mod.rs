mod message;
mod response;
mod session;
mod tool;

pub use message::{ChatMessage, MessagePart, Role};
pub use response::{ResponsePart, ToolCallPart};
pub use session::{HistoryTurn, ResponseTurnPart, Session};
pub use tool::{ContentType, ToolDescriptor, ToolResult};
