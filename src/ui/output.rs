use crate::chat::{record_markdown, ChatSurface};
use crate::error::Result;
use crate::models::ResponseTurnPart;
use crate::ui::highlight::MarkdownRenderer;
use colored::*;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const FLUSH_INTERVAL: Duration = Duration::from_millis(50);

/// Streams the commander's answer to stdout.
pub struct TerminalSurface {
    renderer: MarkdownRenderer,
    parts: Vec<ResponseTurnPart>,
    last_flush: Instant,
    at_line_start: bool,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
            parts: Vec::new(),
            last_flush: Instant::now(),
            at_line_start: true,
        }
    }

    pub fn into_parts(self) -> Vec<ResponseTurnPart> {
        self.parts
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        print!("{}", text);
        self.at_line_start = text.ends_with('\n');
        if self.last_flush.elapsed() > FLUSH_INTERVAL {
            io::stdout().flush()?;
            self.last_flush = Instant::now();
        }
        Ok(())
    }
}

impl ChatSurface for TerminalSurface {
    fn markdown(&mut self, text: &str) -> Result<()> {
        record_markdown(&mut self.parts, text);
        let formatted = self.renderer.push(text);
        self.write(&formatted)
    }

    fn progress(&mut self, message: &str) -> Result<()> {
        self.parts.push(ResponseTurnPart::Progress(message.to_string()));
        if !self.at_line_start {
            println!();
        }
        println!("{}", message.cyan());
        self.at_line_start = true;
        io::stdout().flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let remaining = self.renderer.flush();
        if !remaining.trim_end().is_empty() {
            println!("{}", remaining.trim_end());
        } else if !self.at_line_start {
            println!();
        }
        self.at_line_start = true;
        io::stdout().flush()?;
        Ok(())
    }

    fn parts(&self) -> &[ResponseTurnPart] {
        &self.parts
    }
}

pub fn display_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "Error:".red(), error);
}

pub fn display_hello() {
    println!("{}", "Hello World from commander!".green());
}
