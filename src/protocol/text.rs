//! # ESC/POS Text Formatting Commands
//!
//! Alignment, character size and the left margin / print area pair used to
//! indent a single line.
//!
//! ## Indenting a Line
//!
//! ESC/POS has no absolute horizontal position for a whole line that is
//! portable across vendors, so an indented block is printed by narrowing
//! the printable region:
//!
//! ```text
//! ├── GS L (left margin) ──┼──────── GS W (print area width) ────────┤
//! │                        │ text starts here                        │
//! ```
//!
//! Both settings persist until changed or `ESC @`, so callers must restore
//! them after the line.

use serde::{Deserialize, Serialize};

use super::commands::{ESC, GS, le16};

// ============================================================================
// ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Alignment {
    /// Lowercase name as used by the editor.
    pub fn name(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// ## Parameters
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// Takes effect at the start of the next line and stays until changed.
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Pack width/height multipliers (1-8 each) into the `GS !` parameter byte.
///
/// The high nibble carries `width - 1`, the low nibble `height - 1`.
#[inline]
pub fn size_byte(width: u8, height: u8) -> u8 {
    let w = width.clamp(1, 8) - 1;
    let h = height.clamp(1, 8) - 1;
    (w << 4) | h
}

/// # Select Character Size (GS ! n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS ! n   |
/// | Hex     | 1D 21 n  |
///
/// ```
/// use printcraft::protocol::text;
///
/// assert_eq!(text::size(2, 2), vec![0x1D, 0x21, 0x11]);
/// ```
#[inline]
pub fn size(width: u8, height: u8) -> Vec<u8> {
    vec![GS, b'!', size_byte(width, height)]
}

// ============================================================================
// MARGINS
// ============================================================================

/// # Set Left Margin (GS L nL nH)
///
/// | Format  | Bytes          |
/// |---------|----------------|
/// | ASCII   | GS L nL nH     |
/// | Hex     | 1D 4C nL nH    |
///
/// Margin in dots is `nL + nH * 256`.
#[inline]
pub fn left_margin(dots: u16) -> Vec<u8> {
    let [nl, nh] = le16(dots);
    vec![GS, b'L', nl, nh]
}

/// # Set Print Area Width (GS W nL nH)
///
/// | Format  | Bytes          |
/// |---------|----------------|
/// | ASCII   | GS W nL nH     |
/// | Hex     | 1D 57 nL nH    |
#[inline]
pub fn print_area_width(dots: u16) -> Vec<u8> {
    let [nl, nh] = le16(dots);
    vec![GS, b'W', nl, nh]
}

// ============================================================================
// TEXT PAYLOAD
// ============================================================================

/// Encode text for the printer's single-byte code page.
///
/// Characters in the Latin-1 range map to their byte value; anything wider
/// becomes `?`.
pub fn encode_latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
