use crate::error::Result;
use crate::models::{ToolDescriptor, ToolResult};
use crate::settings::SettingsStore;
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::builtins;

/// Everything a tool handler may touch while running.
#[derive(Clone)]
pub struct ToolContext {
    pub settings: Arc<dyn SettingsStore>,
}

impl ToolContext {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }
}

pub type ToolFuture = Pin<Box<dyn Future<Output = Result<ToolResult>> + Send + 'static>>;

pub type ToolHandler = Box<dyn Fn(Option<Value>, ToolContext) -> ToolFuture + Send + Sync>;

pub struct LocalTool {
    pub descriptor: ToolDescriptor,
    pub handler: ToolHandler,
}

/// Tools keyed by id. Ids are unique; registering an existing id replaces it.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, LocalTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `searchSettings` and `updateSetting`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(builtins::search_settings_tool());
        registry.register(builtins::update_setting_tool());
        registry
    }

    pub fn register(&mut self, tool: LocalTool) {
        if self.tools.contains_key(&tool.descriptor.id) {
            tracing::warn!(tool = %tool.descriptor.id, "Replacing already registered tool");
        }
        self.tools.insert(tool.descriptor.id.clone(), tool);
    }

    pub fn get(&self, id: &str) -> Option<&LocalTool> {
        self.tools.get(id)
    }

    /// Descriptors carrying `tag`, sorted by id so the advertised list is stable.
    pub fn descriptors_tagged(&self, tag: &str) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> = self
            .tools
            .values()
            .filter(|tool| tool.descriptor.has_tag(tag))
            .map(|tool| tool.descriptor.clone())
            .collect();
        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        descriptors
    }

    pub fn validate_arguments(&self, tool_id: &str, arguments: &Value) -> std::result::Result<(), String> {
        let tool = self
            .tools
            .get(tool_id)
            .ok_or_else(|| format!("Tool '{}' not found", tool_id))?;

        let Some(schema) = tool.descriptor.parameters_schema.as_ref() else {
            return Ok(());
        };

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }

    /// Builds the invocation future without running it, so callers may spawn it.
    ///
    /// Schema violations and handler failures come back as plain-text results
    /// for the model rather than errors.
    pub fn invoke(&self, tool_id: &str, parameters: Option<Value>, context: ToolContext) -> ToolFuture {
        let Some(tool) = self.tools.get(tool_id) else {
            let message = format!("Error: Tool '{}' not found", tool_id);
            return Box::pin(async move { Ok(ToolResult::text(message)) });
        };

        if let Some(ref arguments) = parameters {
            if let Err(reason) = self.validate_arguments(tool_id, arguments) {
                tracing::warn!(tool = tool_id, %reason, "Tool parameters failed validation");
                let message = format!("Invalid parameters for tool '{}': {}", tool_id, reason);
                return Box::pin(async move { Ok(ToolResult::text(message)) });
            }
        }

        let id = tool_id.to_string();
        let pending = (tool.handler)(parameters, context);
        Box::pin(async move {
            match pending.await {
                Ok(result) => Ok(result),
                Err(e) => {
                    tracing::warn!(tool = %id, error = %e, "Tool invocation failed");
                    Ok(ToolResult::text(format!("Error: {}", e)))
                }
            }
        })
    }
}

/// OpenAI-style function declarations for the given descriptors.
pub fn format_tools_for_llm(descriptors: &[ToolDescriptor]) -> Vec<Value> {
    descriptors
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.id,
                    "description": tool.description,
                    "parameters": tool
                        .parameters_schema
                        .clone()
                        .unwrap_or_else(|| json!({"type": "object", "properties": {}})),
                }
            })
        })
        .collect()
}
