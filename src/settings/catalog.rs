use serde_json::{json, Value};

/// A known setting with its declared type and default.
#[derive(Debug, Clone)]
pub struct SettingDefinition {
    pub id: &'static str,
    pub kind: &'static str,
    pub default_value: Value,
    pub description: &'static str,
}

pub fn builtin_catalog() -> Vec<SettingDefinition> {
    vec![
        SettingDefinition {
            id: "editor.fontSize",
            kind: "number",
            default_value: json!(12),
            description: "Controls the font size in pixels.",
        },
        SettingDefinition {
            id: "editor.fontFamily",
            kind: "string",
            default_value: json!("Menlo, Monaco, 'Courier New', monospace"),
            description: "Controls the font family.",
        },
        SettingDefinition {
            id: "editor.tabSize",
            kind: "number",
            default_value: json!(4),
            description: "The number of spaces a tab is equal to.",
        },
        SettingDefinition {
            id: "editor.insertSpaces",
            kind: "boolean",
            default_value: json!(true),
            description: "Insert spaces when pressing Tab.",
        },
        SettingDefinition {
            id: "editor.wordWrap",
            kind: "string",
            default_value: json!("off"),
            description: "Controls how lines should wrap: off, on, wordWrapColumn or bounded.",
        },
        SettingDefinition {
            id: "editor.lineNumbers",
            kind: "string",
            default_value: json!("on"),
            description: "Controls the display of line numbers: off, on, relative or interval.",
        },
        SettingDefinition {
            id: "editor.minimap.enabled",
            kind: "boolean",
            default_value: json!(true),
            description: "Controls whether the minimap is shown.",
        },
        SettingDefinition {
            id: "editor.formatOnSave",
            kind: "boolean",
            default_value: json!(false),
            description: "Format a file on save.",
        },
        SettingDefinition {
            id: "files.autoSave",
            kind: "string",
            default_value: json!("off"),
            description: "Controls auto save of editors: off, afterDelay, onFocusChange or onWindowChange.",
        },
        SettingDefinition {
            id: "workbench.colorTheme",
            kind: "string",
            default_value: json!("Default Dark Modern"),
            description: "Specifies the color theme used in the workbench.",
        },
        SettingDefinition {
            id: "terminal.integrated.fontSize",
            kind: "number",
            default_value: json!(12),
            description: "Controls the font size in pixels of the terminal.",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = builtin_catalog();
        let ids: HashSet<_> = catalog.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(ids.contains("editor.fontSize"));
    }
}
