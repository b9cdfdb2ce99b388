//! # Rendering Module
//!
//! Turns layout blocks into a finished printer document.
//!
//! ## Modules
//!
//! - [`escpos`]: line-printer emitter with state minimization, producing an IR program
//! - [`zpl`]: label-printer field encoder
//!
//! ## Usage Example
//!
//! ```
//! use printcraft::document::{Block, Text};
//! use printcraft::render::{self, Target};
//! use serde_json::json;
//!
//! let blocks = vec![Block::from(Text::new("Hello {{name}}"))];
//! let data = json!({"name": "Ada"});
//!
//! let doc = render::encode(&blocks, None, Some(&data), Target::EscPosRaw).unwrap();
//! assert!(doc.as_bytes().starts_with(&[0x1B, 0x40]));
//! assert_eq!(doc.file_name(Some("Front Desk")), "front-desk-escpos.bin");
//! ```

pub mod escpos;
pub mod zpl;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document::{Block, Template};
use crate::error::Result;
use crate::printer::{Geometry, Profile, Protocol};

pub use zpl::{ZplFontRule, ZplOptions};

/// Output form of an encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// ESC/POS bytes, ready for the printer.
    EscPosRaw,
    /// ESC/POS spelled out one command per line, for review.
    EscPosMnemonic,
    /// ZPL label source.
    Zpl,
}

impl Target {
    pub fn protocol(self) -> Protocol {
        match self {
            Target::EscPosRaw | Target::EscPosMnemonic => Protocol::EscPos,
            Target::Zpl => Protocol::Zpl,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Target::EscPosRaw => "escpos-raw",
            Target::EscPosMnemonic => "escpos-mnemonic",
            Target::Zpl => "zpl",
        }
    }

    /// File name suffix for downloads.
    fn file_suffix(self) -> &'static str {
        match self {
            Target::EscPosRaw => "-escpos.bin",
            Target::EscPosMnemonic => "-escpos.txt",
            Target::Zpl => ".txt",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoded content: binary for raw ESC/POS, text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    Text(String),
}

/// A finished document, ready for a transport or a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    pub target: Target,
    pub payload: Payload,
}

impl EncodedDocument {
    /// The document as bytes (UTF-8 for text payloads).
    pub fn as_bytes(&self) -> &[u8] {
        match &self.payload {
            Payload::Bytes(b) => b,
            Payload::Text(s) => s.as_bytes(),
        }
    }

    /// Text payload, if this is a text document.
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(s) => Some(s),
            Payload::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self.payload {
            Payload::Bytes(b) => b,
            Payload::Text(s) => s.into_bytes(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn content_type(&self) -> &'static str {
        match self.payload {
            Payload::Bytes(_) => "application/octet-stream",
            Payload::Text(_) => "text/plain; charset=utf-8",
        }
    }

    /// Download file name derived from a template name.
    ///
    /// Whitespace runs become `-` and the result is lowercased. A missing or
    /// blank name falls back to `receipt` (ESC/POS) or `label` (ZPL).
    pub fn file_name(&self, template_name: Option<&str>) -> String {
        let slug = template_name.map(slugify).unwrap_or_default();
        let stem = if slug.is_empty() {
            match self.target.protocol() {
                Protocol::EscPos => "receipt".to_string(),
                Protocol::Zpl => "label".to_string(),
            }
        } else {
            slug
        };
        format!("{}{}", stem, self.target.file_suffix())
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.replace(['/', '\\'], "-"))
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Encoder configuration beyond the per-call inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    target: Target,
    zpl: ZplOptions,
}

impl Encoder {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            zpl: ZplOptions::default(),
        }
    }

    /// Select the ZPL font size rule. Ignored for ESC/POS targets.
    pub fn zpl_font_rule(mut self, rule: ZplFontRule) -> Self {
        self.zpl.font_rule = rule;
        self
    }

    /// Encode blocks with an optional profile and data object.
    ///
    /// Profile validation is the only failure; it happens before anything
    /// is emitted. Blocks are read, never modified.
    pub fn encode(
        &self,
        blocks: &[Block],
        profile: Option<&Profile>,
        data: Option<&Value>,
    ) -> Result<EncodedDocument> {
        let geometry = Geometry::resolve(profile, self.target.protocol())?;
        let data = data.unwrap_or(&Value::Null);

        let payload = match self.target {
            Target::EscPosRaw => Payload::Bytes(escpos::compile(blocks, geometry, data).to_bytes()),
            Target::EscPosMnemonic => {
                Payload::Text(escpos::compile(blocks, geometry, data).to_mnemonic())
            }
            Target::Zpl => Payload::Text(zpl::render(blocks, geometry, data, self.zpl)),
        };

        let doc = EncodedDocument {
            target: self.target,
            payload,
        };
        debug!(
            output = %self.target,
            blocks = blocks.len(),
            width = geometry.width_dots,
            bytes = doc.len(),
            "encoded document"
        );
        Ok(doc)
    }

    /// Encode a template's blocks.
    pub fn encode_template(
        &self,
        template: &Template,
        profile: Option<&Profile>,
        data: Option<&Value>,
    ) -> Result<EncodedDocument> {
        self.encode(&template.blocks, profile, data)
    }
}

/// Encode blocks for a target with default options.
pub fn encode(
    blocks: &[Block],
    profile: Option<&Profile>,
    data: Option<&Value>,
    target: Target,
) -> Result<EncodedDocument> {
    Encoder::new(target).encode(blocks, profile, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Text;
    use crate::error::PrintcraftError;
    use pretty_assertions::assert_eq;

    fn doc(target: Target) -> EncodedDocument {
        encode(&[], None, None, target).unwrap()
    }

    #[test]
    fn test_payload_kinds() {
        assert!(doc(Target::EscPosRaw).as_text().is_none());
        assert!(doc(Target::EscPosMnemonic).as_text().is_some());
        assert_eq!(doc(Target::Zpl).as_text(), Some("^XA\n^PW600\n^XZ"));
    }

    #[test]
    fn test_len_matches_bytes() {
        let raw = doc(Target::EscPosRaw);
        assert_eq!(raw.len(), 8);
        assert_eq!(raw.clone().into_bytes().len(), raw.len());
        assert!(!raw.is_empty());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(doc(Target::EscPosRaw).content_type(), "application/octet-stream");
        assert_eq!(doc(Target::Zpl).content_type(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(doc(Target::EscPosRaw).file_name(None), "receipt-escpos.bin");
        assert_eq!(
            doc(Target::EscPosMnemonic).file_name(Some("  Kitchen   Ticket ")),
            "kitchen-ticket-escpos.txt"
        );
        assert_eq!(doc(Target::Zpl).file_name(Some("")), "label.txt");
        assert_eq!(doc(Target::Zpl).file_name(Some("Box A/B")), "box-a-b.txt");
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let profile = Profile::with_width(-5);
        let err = encode(&[], Some(&profile), None, Target::Zpl).unwrap_err();
        assert!(matches!(err, PrintcraftError::InvalidProfile(_)));
    }

    #[test]
    fn test_encoder_font_rule() {
        let blocks = vec![Block::from(Text::new("x"))];
        let doc = Encoder::new(Target::Zpl)
            .zpl_font_rule(ZplFontRule::Legacy)
            .encode(&blocks, None, None)
            .unwrap();
        assert!(doc.as_text().unwrap().contains("^A0N,16,16"));
    }

    #[test]
    fn test_encode_template() {
        let template = Template::from_json(r#"{"blocks":[{"type":"text","text":"{{a}}"}]}"#).unwrap();
        let data = serde_json::json!({"a": "ok"});
        let doc = Encoder::new(Target::EscPosMnemonic)
            .encode_template(&template, None, Some(&data))
            .unwrap();
        assert!(doc.as_text().unwrap().contains("TXT \"ok\""));
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::EscPosMnemonic.to_string(), "escpos-mnemonic");
        assert_eq!(Target::Zpl.protocol(), Protocol::Zpl);
    }
}
