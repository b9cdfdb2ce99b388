//! # Layout Document Model
//!
//! A template is a flat list of positioned blocks, as saved by the layout
//! editor. The same types serve the Rust API and the stored JSON.
//!
//! ```
//! use printcraft::document::*;
//!
//! // Rust construction
//! let blocks = vec![
//!     Block::from(Text::new("Hello {{customer.name}}")).at(0.0, 0.0),
//!     Block::from(Divider::default()).at(0.0, 40.0),
//! ];
//!
//! // JSON deserialization
//! let template = Template::from_json(
//!     r#"{"blocks":[{"type":"text","x":0,"y":0,"text":"Hello {{customer.name}}"}]}"#,
//! ).unwrap();
//! assert_eq!(template.blocks.len(), 1);
//! ```

mod bind;
pub mod types;

pub use bind::{bind_text, find_placeholders, missing_bindings, resolve_path};
pub use types::*;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PrintcraftError, Result};

/// Deserialize a `Vec<Block>`, skipping blocks of unknown type.
///
/// Each element is first parsed as raw JSON. Elements whose `"type"` is
/// missing or not one of [`Block::KINDS`] are dropped with a warning so a
/// template from a newer editor still renders what it can. Known blocks
/// that fail to parse are an error.
fn deserialize_blocks<'de, D>(deserializer: D) -> std::result::Result<Vec<Block>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    let mut blocks = Vec::with_capacity(values.len());

    for (i, v) in values.into_iter().enumerate() {
        let kind = v.get("type").and_then(serde_json::Value::as_str);
        match kind {
            Some(kind) if Block::KINDS.contains(&kind) => {
                let block = serde_json::from_value(v)
                    .map_err(|e| serde::de::Error::custom(format!("blocks[{}]: {}", i, e)))?;
                blocks.push(block);
            }
            other => {
                warn!(index = i, kind = ?other, "skipping block of unknown type");
            }
        }
    }

    Ok(blocks)
}

/// A saved layout: an optional name and its blocks.
///
/// Matches the stored `contentJson` shape `{"blocks": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Display name, used to derive download file names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Layout blocks in editor order.
    #[serde(default, deserialize_with = "deserialize_blocks")]
    pub blocks: Vec<Block>,
}

impl Template {
    /// Create a new empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the template.
    pub fn push(&mut self, block: impl Into<Block>) {
        self.blocks.push(block.into());
    }

    /// Parse a template from its stored JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PrintcraftError::Template(e.to_string()))
    }

    /// Placeholder paths that do not resolve in `data`.
    pub fn missing_bindings(&self, data: &serde_json::Value) -> std::collections::BTreeSet<String> {
        missing_bindings(&self.blocks, data)
    }
}

/// Blocks in print order: ascending `y`, ties broken by ascending `x`.
///
/// Returns references; the caller's list is left untouched. Blocks with
/// identical positions keep their relative input order.
pub fn print_order(blocks: &[Block]) -> Vec<&Block> {
    let mut ordered: Vec<&Block> = blocks.iter().collect();
    ordered.sort_by(|a, b| {
        let (a, b) = (a.frame(), b.frame());
        a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_template_from_editor_json() {
        let template = Template::from_json(
            r#"{
                "name": "Kitchen Ticket",
                "blocks": [
                    {"type": "text", "x": 0, "y": 0, "w": 300, "h": 24, "text": "Order", "fontSize": 16},
                    {"type": "divider", "x": 0, "y": 30, "w": 576, "h": 2},
                    {"type": "barcode", "x": 0, "y": 40, "value": "{{order.id}}", "height": 60},
                    {"type": "qr", "x": 0, "y": 120, "value": "https://x", "size": 5, "ec": "Q"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(template.name.as_deref(), Some("Kitchen Ticket"));
        let kinds: Vec<&str> = template.blocks.iter().map(Block::kind).collect();
        assert_eq!(kinds, vec!["text", "divider", "barcode", "qr"]);
    }

    #[test]
    fn test_unknown_block_types_are_skipped() {
        let template = Template::from_json(
            r#"{"blocks": [
                {"type": "image", "x": 0, "y": 0, "src": "logo.png"},
                {"type": "text", "text": "kept"},
                {"x": 5},
                "not an object"
            ]}"#,
        )
        .unwrap();
        assert_eq!(template.blocks.len(), 1);
        assert_eq!(template.blocks[0].template_text(), Some("kept"));
    }

    #[test]
    fn test_malformed_known_block_is_error() {
        let err = Template::from_json(r#"{"blocks": [{"type": "text", "text": 42}]}"#).unwrap_err();
        assert!(err.to_string().contains("blocks[0]"));
    }

    #[test]
    fn test_missing_blocks_field_is_empty() {
        let template = Template::from_json("{}").unwrap();
        assert!(template.blocks.is_empty());
    }

    #[test]
    fn test_print_order() {
        let blocks = vec![
            Block::from(Text::new("c")).at(0.0, 50.0),
            Block::from(Text::new("b")).at(20.0, 10.0),
            Block::from(Text::new("a")).at(5.0, 10.0),
            Block::from(Text::new("first")).at(100.0, 0.0),
        ];
        let ordered: Vec<&str> = print_order(&blocks)
            .into_iter()
            .filter_map(Block::template_text)
            .collect();
        assert_eq!(ordered, vec!["first", "a", "b", "c"]);
        // Input untouched
        assert_eq!(blocks[0].template_text(), Some("c"));
    }

    #[test]
    fn test_print_order_is_stable_for_ties() {
        let blocks = vec![
            Block::from(Text::new("one")).at(0.0, 0.0),
            Block::from(Text::new("two")).at(0.0, 0.0),
        ];
        let ordered: Vec<&str> = print_order(&blocks)
            .into_iter()
            .filter_map(Block::template_text)
            .collect();
        assert_eq!(ordered, vec!["one", "two"]);
    }

    #[test]
    fn test_template_push() {
        let mut template = Template::new();
        template.push(Text::new("x"));
        template.push(Divider::default());
        assert_eq!(template.blocks.len(), 2);
    }
}
