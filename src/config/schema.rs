//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The `TodoConfig` struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and keyed updates for `todo config set`

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output, one document per command
    Json,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keys accepted in config.kdl.
pub const CONFIG_KEYS: &[&str] = &["editor", "output-format", "branch-prefix"];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// editor "nvim"
/// output-format "human"  // or "json"
/// branch-prefix "feature/"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Editor command used by `todo edit`
    pub editor: Option<String>,

    /// Default output format
    pub output_format: Option<OutputFormat>,

    /// Prefix of the branches backing lists
    pub branch_prefix: Option<String>,
}

impl TodoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref editor) = self.editor {
            if editor.trim().is_empty() {
                return Err("editor must not be empty".to_string());
            }
        }
        if let Some(ref prefix) = self.branch_prefix {
            if prefix.chars().any(char::is_whitespace) {
                return Err(format!(
                    "branch-prefix must not contain whitespace, got {:?}",
                    prefix
                ));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "editor") {
            config.editor = Some(s);
        }

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(&s);
        }

        if let Some(s) = first_string(doc, "branch-prefix") {
            config.branch_prefix = Some(s);
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref editor) = self.editor {
            push_string(&mut doc, "editor", editor);
        }

        if let Some(ref format) = self.output_format {
            push_string(&mut doc, "output-format", format.as_str());
        }

        if let Some(ref prefix) = self.branch_prefix {
            push_string(&mut doc, "branch-prefix", prefix);
        }

        doc
    }

    /// Set a value by its KDL key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "editor" => self.editor = Some(value.to_string()),
            "output-format" => {
                let format = OutputFormat::parse(value).ok_or_else(|| {
                    format!("output-format must be 'human' or 'json', got '{}'", value)
                })?;
                self.output_format = Some(format);
            }
            "branch-prefix" => self.branch_prefix = Some(value.to_string()),
            _ => {
                return Err(format!(
                    "unknown config key '{}' (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        self.validate()
    }
}

fn first_string(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)?
        .entries()
        .first()?
        .value()
        .as_string()
        .map(|s| s.to_string())
}

fn push_string(doc: &mut KdlDocument, name: &str, value: &str) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    doc.nodes_mut().push(node);
}

/// Required permissions for config.kdl (Unix: 0644, readable by all).
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o644;
