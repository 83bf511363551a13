pub mod highlight;
mod output;

pub use highlight::MarkdownRenderer;
pub use output::{display_error, display_hello, TerminalSurface};
