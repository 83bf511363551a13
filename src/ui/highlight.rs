use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const FENCE: &str = "```";
const RULE: &str = "──────────────────────────────────────────────────";

struct OpenFence {
    lang: Option<String>,
    body: String,
    rendered: usize,
}

/// Renders streamed markdown for the terminal, boxing and highlighting
/// fenced code blocks as their lines complete.
pub struct MarkdownRenderer {
    pending: String,
    fence: Option<OpenFence>,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of a trailing run of backticks that could be the start of a fence.
fn partial_fence_len(text: &str) -> usize {
    text.chars().rev().take_while(|&c| c == '`').count().min(FENCE.len() - 1)
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            pending: String::new(),
            fence: None,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let theme = &self.theme_set.themes["Solarized (dark)"];
        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => output.push_str(line),
            }
        }
        output.push_str("\x1b[0m");
        output
    }

    fn header(lang: Option<&str>) -> String {
        format!("{}[{}]{}\n", "┌─".dimmed(), lang.unwrap_or("code").cyan(), RULE.dimmed())
    }

    fn footer() -> String {
        format!("{}{}\n", "└─".dimmed(), RULE.dimmed())
    }

    /// Highlights the complete lines of the open fence not rendered yet.
    /// With `all`, a trailing partial line is rendered too.
    fn render_fence_body(&mut self, all: bool) -> String {
        let Some(fence) = self.fence.as_ref() else {
            return String::new();
        };
        let end = if all {
            fence.body.len()
        } else {
            fence.body.rfind('\n').map(|i| i + 1).unwrap_or(0)
        };
        if end <= fence.rendered {
            return String::new();
        }
        let mut chunk = fence.body[fence.rendered..end].to_string();
        if !chunk.ends_with('\n') {
            chunk.push('\n');
        }
        let output = self.highlight(&chunk, fence.lang.as_deref());
        if let Some(fence) = self.fence.as_mut() {
            fence.rendered = end;
        }
        output
    }

    /// Feeds streamed text; returns what can be printed now.
    pub fn push(&mut self, text: &str) -> String {
        self.pending.push_str(text);
        let mut output = String::new();

        loop {
            if self.fence.is_none() {
                let Some(start) = self.pending.find(FENCE) else {
                    let keep = partial_fence_len(&self.pending);
                    let emit = self.pending.len() - keep;
                    output.push_str(&self.pending[..emit]);
                    self.pending.drain(..emit);
                    break;
                };
                let Some(newline) = self.pending[start..].find('\n') else {
                    // Language line incomplete.
                    output.push_str(&self.pending[..start]);
                    self.pending.drain(..start);
                    break;
                };
                let newline = start + newline;
                let lang = self.pending[start + FENCE.len()..newline].trim();
                let lang = (!lang.is_empty()).then(|| lang.to_string());

                output.push_str(&self.pending[..start]);
                output.push_str(&Self::header(lang.as_deref()));
                self.pending.drain(..=newline);
                self.fence = Some(OpenFence {
                    lang,
                    body: String::new(),
                    rendered: 0,
                });
            } else if let Some(end) = self.pending.find(FENCE) {
                if let Some(fence) = self.fence.as_mut() {
                    fence.body.push_str(&self.pending[..end]);
                }
                output.push_str(&self.render_fence_body(true));
                output.push_str(&Self::footer());
                self.pending.drain(..end + FENCE.len());
                if self.pending.starts_with('\n') {
                    self.pending.remove(0);
                }
                self.fence = None;
            } else {
                let keep = partial_fence_len(&self.pending);
                let take = self.pending.len() - keep;
                if let Some(fence) = self.fence.as_mut() {
                    fence.body.push_str(&self.pending[..take]);
                }
                self.pending.drain(..take);
                output.push_str(&self.render_fence_body(false));
                break;
            }
        }

        output
    }

    /// Emits everything still held back, closing an unterminated fence.
    pub fn flush(&mut self) -> String {
        let mut output = String::new();
        if self.fence.is_some() {
            let rest = std::mem::take(&mut self.pending);
            if let Some(fence) = self.fence.as_mut() {
                fence.body.push_str(&rest);
            }
            output.push_str(&self.render_fence_body(true));
            output.push_str(&Self::footer());
            self.fence = None;
        } else {
            output.push_str(&self.pending);
            self.pending.clear();
        }
        output
    }
}
