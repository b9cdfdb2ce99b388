//! # ZPL Encoder
//!
//! Label printers place every field absolutely, so there is no state to
//! track: each block becomes one `^FO` field at its own origin, in print
//! order, between `^XA` / `^PW` and `^XZ`.
//!
//! ```text
//! ^XA
//! ^PW600
//! ^FO0,0^A0N,26,26^FDHello^FS
//! ^XZ
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::document::{self, Barcode, Block, Divider, Frame, Qr, Text, bind_text};
use crate::printer::Geometry;

/// Fixed `^BC` parameters: normal orientation, 80-dot bars, HRI below.
pub const BARCODE_FIELD: &str = "^BCN,80,Y,N,N";

/// Fixed `^BQ` parameters: normal orientation, model 2, magnification 6.
pub const QR_FIELD: &str = "^BQN,2,6";

/// How an editor font size maps to a ZPL `^A0` height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZplFontRule {
    /// `round(fontSize * 1.6)` clamped to 18..=80.
    #[default]
    Scaled,
    /// `round(fontSize)`, at least 10.
    Legacy,
}

impl ZplFontRule {
    /// Font height in dots for an editor font size.
    pub fn dots(self, font_size: f64) -> u32 {
        match self {
            ZplFontRule::Scaled => (font_size * 1.6).round().clamp(18.0, 80.0) as u32,
            ZplFontRule::Legacy => font_size.round().max(10.0) as u32,
        }
    }
}

/// Options for the ZPL encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZplOptions {
    pub font_rule: ZplFontRule,
}

/// Field data safe for `^FD`: no control prefixes, line breaks folded,
/// ASCII only.
fn field_data(s: &str) -> String {
    s.replace("\r\n", " ")
        .chars()
        .map(|c| match c {
            '^' | '~' | '\n' | '\r' => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

fn origin(frame: &Frame, geometry: &Geometry) -> (u32, u32) {
    let (x, y) = frame.origin();
    (
        x.saturating_add(geometry.margins.left),
        y.saturating_add(geometry.margins.top),
    )
}

struct Fields<'a> {
    geometry: Geometry,
    data: &'a Value,
    options: ZplOptions,
}

impl Fields<'_> {
    fn field(&self, block: &Block) -> String {
        let (x, y) = origin(block.frame(), &self.geometry);
        let body = match block {
            Block::Text(t) => self.text(t),
            Block::Divider(d) => self.divider(d),
            Block::Barcode(b) => self.barcode(b),
            Block::Qr(q) => self.qr(q),
        };
        format!("^FO{},{}{}^FS", x, y, body)
    }

    fn text(&self, t: &Text) -> String {
        let fs = self.options.font_rule.dots(t.font_size());
        format!(
            "^A0N,{fs},{fs}^FD{}",
            field_data(&bind_text(&t.content, self.data))
        )
    }

    fn divider(&self, d: &Divider) -> String {
        let w = match d.frame.width() {
            0 => self.geometry.print_width(),
            w => w,
        };
        format!("^GB{},1,1", w)
    }

    fn barcode(&self, b: &Barcode) -> String {
        format!(
            "{}^FD{}",
            BARCODE_FIELD,
            field_data(&bind_text(&b.value, self.data))
        )
    }

    fn qr(&self, q: &Qr) -> String {
        format!(
            "{}^FD{}A,{}",
            QR_FIELD,
            q.ec.letter(),
            field_data(&bind_text(&q.value, self.data))
        )
    }
}

/// Encode blocks as a ZPL label.
///
/// Lines are joined with `\n`; there is no trailing newline.
pub fn render(blocks: &[Block], geometry: Geometry, data: &Value, options: ZplOptions) -> String {
    let fields = Fields {
        geometry,
        data,
        options,
    };

    let mut lines = vec!["^XA".to_string(), format!("^PW{}", geometry.width_dots)];
    for block in document::print_order(blocks) {
        trace!(kind = block.kind(), y = block.frame().y, "zpl field");
        lines.push(fields.field(block));
    }
    lines.push("^XZ".to_string());
    lines.join("\n")
}
