use super::registry::{LocalTool, ToolContext, ToolFuture};
use super::COMMANDER_TAG;
use crate::error::Result;
use crate::models::{ToolDescriptor, ToolResult};
use crate::settings::builtin_catalog;
use serde_json::{json, Value};

pub const SEARCH_SETTINGS: &str = "searchSettings";
pub const UPDATE_SETTING: &str = "updateSetting";

pub const CHANGED: &str = "Changed";
pub const MISSING_PARAMETER: &str = "Not able to change because the parameter is missing";

const MAX_SEARCH_RESULTS: usize = 25;

pub fn search_settings_tool() -> LocalTool {
    LocalTool {
        descriptor: ToolDescriptor {
            id: SEARCH_SETTINGS.to_string(),
            description: "Search the user's settings. Returns matching settings with their id, current value, default value and type. Call without a query to list the known settings.".to_string(),
            parameters_schema: Some(json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Words to look for in setting ids and descriptions"
                    }
                }
            })),
            tags: vec![COMMANDER_TAG.to_string()],
        },
        handler: Box::new(|params: Option<Value>, ctx: ToolContext| -> ToolFuture {
            Box::pin(async move { handle_search_settings(params.as_ref(), &ctx) })
        }),
    }
}

pub fn update_setting_tool() -> LocalTool {
    LocalTool {
        descriptor: ToolDescriptor {
            id: UPDATE_SETTING.to_string(),
            description: "Update a user setting at global scope. Only call this when the value actually changes.".to_string(),
            parameters_schema: Some(json!({
                "type": "object",
                "properties": {
                    "key": {
                        "type": "string",
                        "description": "Id of the setting, e.g. editor.fontSize"
                    },
                    "value": {
                        "description": "New value for the setting"
                    }
                }
            })),
            tags: vec![COMMANDER_TAG.to_string()],
        },
        handler: Box::new(|params: Option<Value>, ctx: ToolContext| -> ToolFuture {
            Box::pin(async move { handle_update_setting(params.as_ref(), &ctx) })
        }),
    }
}

pub fn handle_search_settings(params: Option<&Value>, ctx: &ToolContext) -> Result<ToolResult> {
    let query = params
        .and_then(|p| p.get("query"))
        .and_then(|q| q.as_str())
        .unwrap_or_default()
        .to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();
    let matches = |text: &str| {
        let text = text.to_lowercase();
        words.iter().all(|w| text.contains(w))
    };

    let catalog = builtin_catalog();
    let mut results = Vec::new();

    for definition in &catalog {
        if !matches(&format!("{} {}", definition.id, definition.description)) {
            continue;
        }
        let value = ctx
            .settings
            .get(definition.id)?
            .unwrap_or_else(|| definition.default_value.clone());
        results.push(json!({
            "id": definition.id,
            "value": value,
            "defaultValue": definition.default_value,
            "type": definition.kind,
            "description": definition.description,
        }));
    }

    // Stored keys the catalogue does not know about.
    for key in ctx.settings.keys()? {
        if catalog.iter().any(|d| d.id == key) || !matches(&key) {
            continue;
        }
        let value = ctx.settings.get(&key)?.unwrap_or(Value::Null);
        results.push(json!({
            "id": key,
            "value": value,
            "defaultValue": Value::Null,
            "type": json_type_name(&value),
            "description": "",
        }));
    }

    results.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
    results.truncate(MAX_SEARCH_RESULTS);

    tracing::debug!(query = %query, matches = results.len(), "Searched settings");
    Ok(ToolResult::json(&Value::Array(results)))
}

/// Rejects only absent values: `0`, `false` and `""` are legitimate settings.
pub fn handle_update_setting(params: Option<&Value>, ctx: &ToolContext) -> Result<ToolResult> {
    let key = params
        .and_then(|p| p.get("key"))
        .and_then(|k| k.as_str())
        .filter(|k| !k.is_empty());
    let value = params.and_then(|p| p.get("value")).filter(|v| !v.is_null());

    match (key, value) {
        (Some(key), Some(value)) => {
            ctx.settings.update(key, value.clone())?;
            tracing::info!(key, value = %value, "Setting changed");
            Ok(ToolResult::text(CHANGED))
        }
        _ => Ok(ToolResult::text(MISSING_PARAMETER)),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
