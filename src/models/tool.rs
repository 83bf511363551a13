use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_schema: Option<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ToolDescriptor {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContentType {
    Json,
    PlainText,
}

impl ContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::PlainText => "text/plain",
        }
    }
}

/// Output of a tool invocation keyed by content type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolResult {
    contents: BTreeMap<ContentType, String>,
}

impl ToolResult {
    pub fn text(value: impl Into<String>) -> Self {
        Self::default().with(ContentType::PlainText, value)
    }

    pub fn json(value: &Value) -> Self {
        Self::default().with(ContentType::Json, value.to_string())
    }

    pub fn with(mut self, content_type: ContentType, value: impl Into<String>) -> Self {
        self.contents.insert(content_type, value.into());
        self
    }

    pub fn get(&self, content_type: ContentType) -> Option<&str> {
        self.contents.get(&content_type).map(String::as_str)
    }

    /// Structured data wins over plain text when both are present.
    pub fn preferred_type(&self) -> Option<ContentType> {
        [ContentType::Json, ContentType::PlainText]
            .into_iter()
            .find(|t| self.contents.contains_key(t))
    }

    pub fn preferred(&self) -> &str {
        self.preferred_type()
            .and_then(|t| self.get(t))
            .unwrap_or_default()
    }
}
