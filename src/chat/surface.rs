use crate::error::Result;
use crate::models::ResponseTurnPart;

/// Where a turn's output is rendered.
pub trait ChatSurface: Send {
    /// Streamed model text, forwarded as it arrives.
    fn markdown(&mut self, text: &str) -> Result<()>;

    /// Out-of-band notices such as tool invocations.
    fn progress(&mut self, message: &str) -> Result<()>;

    /// Called once the turn has ended, successfully or not.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Everything rendered so far, for history replay.
    fn parts(&self) -> &[ResponseTurnPart];
}

/// Collects output in memory. Adjacent markdown fragments are merged.
#[derive(Debug, Default)]
pub struct BufferSurface {
    parts: Vec<ResponseTurnPart>,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markdown_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ResponseTurnPart::Markdown(text) => Some(text.as_str()),
                ResponseTurnPart::Progress(_) => None,
            })
            .collect()
    }

    pub fn into_parts(self) -> Vec<ResponseTurnPart> {
        self.parts
    }
}

pub(crate) fn record_markdown(parts: &mut Vec<ResponseTurnPart>, text: &str) {
    if let Some(ResponseTurnPart::Markdown(last)) = parts.last_mut() {
        last.push_str(text);
    } else {
        parts.push(ResponseTurnPart::Markdown(text.to_string()));
    }
}

impl ChatSurface for BufferSurface {
    fn markdown(&mut self, text: &str) -> Result<()> {
        record_markdown(&mut self.parts, text);
        Ok(())
    }

    fn progress(&mut self, message: &str) -> Result<()> {
        self.parts.push(ResponseTurnPart::Progress(message.to_string()));
        Ok(())
    }

    fn parts(&self) -> &[ResponseTurnPart] {
        &self.parts
    }
}
