//! # ESC/POS Printer Control Commands
//!
//! Initialization, paper feed and cutter commands for ESC/POS line printers
//! (Epson TM series and the many compatibles that follow it).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC d n`, `GS L nL nH`, `GS ( k pL pH cn fn ...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, margins, barcodes and the cutter.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// Split a value into the `nL nH` little-endian pair used by ESC/POS.
#[inline]
pub fn le16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and restores power-on defaults: left alignment,
/// 1x1 character size, left margin 0 and the full print area.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use printcraft::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the line buffer, then advances the paper by `lines` lines.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
#[inline]
pub fn feed_lines(lines: u8) -> Vec<u8> {
    vec![ESC, b'd', lines]
}

// ============================================================================
// CUTTER
// ============================================================================

/// # Full Cut (GS V 0)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
///
/// Most cutters sit a few millimetres above the print head, so a job should
/// feed before cutting or the last line is sliced through.
#[inline]
pub fn cut() -> Vec<u8> {
    vec![GS, b'V', 0x00]
}
