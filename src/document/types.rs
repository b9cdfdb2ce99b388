//! Block types for the layout model.
//!
//! All types derive `Serialize + Deserialize` so the same values work for
//! both Rust API construction and the editor's stored JSON. Numeric fields
//! are kept as the editor sent them; every clamp happens in the accessor
//! that the encoders call, never at parse time.

use serde::{Deserialize, Deserializer, Serialize};

use crate::protocol::barcode::qr::QrErrorLevel;
use crate::protocol::text::Alignment;

/// Lenient integer parse: accepts integers, floats (rounded) and `null`
/// (falls back to `default`).
fn lenient_int<'de, D>(deserializer: D, default: i64) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntValue {
        Int(i64),
        Float(f64),
    }

    let v: Option<IntValue> = Option::deserialize(deserializer)?;
    Ok(match v {
        None => default,
        Some(IntValue::Int(n)) => n,
        Some(IntValue::Float(f)) if f.is_finite() => f.round() as i64,
        Some(IntValue::Float(_)) => default,
    })
}

/// Lenient float parse: accepts any JSON number; `null` falls back to
/// `default`.
fn lenient_float<'de, D>(deserializer: D, default: f64) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<f64> = Option::deserialize(deserializer)?;
    Ok(v.filter(|f| f.is_finite()).unwrap_or(default))
}

fn deserialize_coord<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    lenient_float(d, 0.0)
}

/// A cleared font size field arrives as `0` or `null`; both mean the default.
fn deserialize_font_size<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let size = lenient_float(d, default_font_size())?;
    Ok(if size == 0.0 { default_font_size() } else { size })
}

fn deserialize_bar_height<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    lenient_int(d, default_bar_height())
}

fn deserialize_module_width<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    lenient_int(d, default_module_width())
}

fn deserialize_hri<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    lenient_int(d, 0)
}

fn deserialize_qr_size<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    lenient_int(d, default_qr_size())
}

/// Custom deserializer for alignment: unknown strings and `null` mean left.
fn deserialize_align<'de, D>(deserializer: D) -> Result<Alignment, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<String> = Option::deserialize(deserializer)?;
    Ok(match v.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        _ => Alignment::Left,
    })
}

/// Custom deserializer for the QR error-correction level: case-insensitive,
/// anything unrecognised falls back to M.
fn deserialize_ec<'de, D>(deserializer: D) -> Result<QrErrorLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<String> = Option::deserialize(deserializer)?;
    Ok(match v.as_deref().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("l") => QrErrorLevel::L,
        Some(s) if s.eq_ignore_ascii_case("q") => QrErrorLevel::Q,
        Some(s) if s.eq_ignore_ascii_case("h") => QrErrorLevel::H,
        _ => QrErrorLevel::M,
    })
}

fn default_font_size() -> f64 {
    16.0
}

/// Round a dot coordinate and clamp it to the non-negative range.
pub(crate) fn to_dots(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Position and size of a block, in device dots.
///
/// Coordinates may arrive fractional or negative from the editor; the
/// accessors round and clamp them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, deserialize_with = "deserialize_coord")]
    pub x: f64,
    #[serde(default, deserialize_with = "deserialize_coord")]
    pub y: f64,
    #[serde(default, deserialize_with = "deserialize_coord")]
    pub w: f64,
    #[serde(default, deserialize_with = "deserialize_coord")]
    pub h: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Resolved `(x, y)` origin in dots.
    pub fn origin(&self) -> (u32, u32) {
        (to_dots(self.x), to_dots(self.y))
    }

    /// Resolved width in dots.
    pub fn width(&self) -> u32 {
        to_dots(self.w)
    }

    /// Resolved height in dots.
    pub fn height(&self) -> u32 {
        to_dots(self.h)
    }
}

// ============================================================================
// BLOCKS
// ============================================================================

/// A run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(flatten)]
    pub frame: Frame,
    /// Text with optional `{{path}}` placeholders. The editor stores this
    /// under `text`; `content` is accepted as well.
    #[serde(default, alias = "text")]
    pub content: String,
    /// Editor font size in pixels.
    #[serde(default = "default_font_size", deserialize_with = "deserialize_font_size")]
    pub font_size: f64,
    #[serde(default, deserialize_with = "deserialize_align")]
    pub align: Alignment,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            content: String::new(),
            font_size: default_font_size(),
            align: Alignment::Left,
        }
    }
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Font size, never below 1.
    pub fn font_size(&self) -> f64 {
        if self.font_size.is_finite() {
            self.font_size.max(1.0)
        } else {
            default_font_size()
        }
    }

    /// Character size multiplier for line printers: one step per 16px.
    pub fn size_multiplier(&self) -> u8 {
        (self.font_size() / 16.0).round().clamp(1.0, 8.0) as u8
    }
}

/// A horizontal rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Divider {
    #[serde(flatten)]
    pub frame: Frame,
}

/// A Code128 barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub value: String,
    /// Bar height in dots.
    #[serde(default = "default_bar_height", deserialize_with = "deserialize_bar_height")]
    pub height: i64,
    /// Module (narrow bar) width in dots.
    #[serde(default = "default_module_width", deserialize_with = "deserialize_module_width")]
    pub width: i64,
    /// HRI position: 0 none, 1 above, 2 below, 3 both.
    #[serde(default, deserialize_with = "deserialize_hri")]
    pub hri: i64,
    #[serde(default, deserialize_with = "deserialize_align")]
    pub align: Alignment,
}

fn default_bar_height() -> i64 {
    80
}

fn default_module_width() -> i64 {
    2
}

impl Default for Barcode {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            value: String::new(),
            height: default_bar_height(),
            width: default_module_width(),
            hri: 0,
            align: Alignment::Left,
        }
    }
}

impl Barcode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Bar height clamped to 1..=255. A cleared (zero or negative) height
    /// means the default of 80.
    pub fn bar_height(&self) -> u8 {
        let height = if self.height > 0 {
            self.height
        } else {
            default_bar_height()
        };
        height.clamp(1, 255) as u8
    }

    /// Module width clamped to 2..=6.
    pub fn module_width(&self) -> u8 {
        self.width.clamp(2, 6) as u8
    }

    /// HRI mode clamped to 0..=3.
    pub fn hri_mode(&self) -> u8 {
        self.hri.clamp(0, 3) as u8
    }
}

/// A QR symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qr {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub value: String,
    /// Module size in dots.
    #[serde(default = "default_qr_size", deserialize_with = "deserialize_qr_size")]
    pub size: i64,
    #[serde(default, deserialize_with = "deserialize_ec")]
    pub ec: QrErrorLevel,
    #[serde(default, deserialize_with = "deserialize_align")]
    pub align: Alignment,
}

fn default_qr_size() -> i64 {
    6
}

impl Default for Qr {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            value: String::new(),
            size: default_qr_size(),
            ec: QrErrorLevel::M,
            align: Alignment::Left,
        }
    }
}

impl Qr {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Module size clamped to 1..=16.
    pub fn module_size(&self) -> u8 {
        self.size.clamp(1, 16) as u8
    }
}

/// A single layout element.
///
/// Matches the editor's `{"type": "..."}` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text(Text),
    Divider(Divider),
    Barcode(Barcode),
    Qr(Qr),
}

impl Block {
    /// Type tags this model understands.
    pub const KINDS: [&'static str; 4] = ["text", "divider", "barcode", "qr"];

    pub fn frame(&self) -> &Frame {
        match self {
            Block::Text(b) => &b.frame,
            Block::Divider(b) => &b.frame,
            Block::Barcode(b) => &b.frame,
            Block::Qr(b) => &b.frame,
        }
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        match self {
            Block::Text(b) => &mut b.frame,
            Block::Divider(b) => &mut b.frame,
            Block::Barcode(b) => &mut b.frame,
            Block::Qr(b) => &mut b.frame,
        }
    }

    /// Builder-style placement.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        let frame = self.frame_mut();
        frame.x = x;
        frame.y = y;
        self
    }

    /// Builder-style sizing.
    pub fn sized(mut self, w: f64, h: f64) -> Self {
        let frame = self.frame_mut();
        frame.w = w;
        frame.h = h;
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Block::Text(_) => "text",
            Block::Divider(_) => "divider",
            Block::Barcode(_) => "barcode",
            Block::Qr(_) => "qr",
        }
    }

    /// The bindable string of this block, if it has one.
    pub fn template_text(&self) -> Option<&str> {
        match self {
            Block::Text(t) => Some(&t.content),
            Block::Barcode(b) => Some(&b.value),
            Block::Qr(q) => Some(&q.value),
            Block::Divider(_) => None,
        }
    }
}

impl From<Text> for Block {
    fn from(t: Text) -> Self {
        Block::Text(t)
    }
}

impl From<Divider> for Block {
    fn from(d: Divider) -> Self {
        Block::Divider(d)
    }
}

impl From<Barcode> for Block {
    fn from(b: Barcode) -> Self {
        Block::Barcode(b)
    }
}

impl From<Qr> for Block {
    fn from(q: Qr) -> Self {
        Block::Qr(q)
    }
}
