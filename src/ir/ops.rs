//! # IR Opcodes
//!
//! The intermediate representation for ESC/POS output: one [`Op`] per
//! printer command, in emission order.
//!
//! ## Design Philosophy
//!
//! ```text
//! Blocks → Emitter (state tracking) → IR → { Codegen (bytes) | Mnemonic (text) }
//! ```
//!
//! The emitter decides *which* commands are needed; the two backends only
//! decide how each command is spelled. Raw and mnemonic output therefore
//! cannot disagree about ordering.

use crate::protocol::barcode::qr::QrErrorLevel;
use crate::protocol::text::Alignment;

/// IR opcodes - one variant per printer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    // ========== Printer Control ==========
    /// Initialize printer (ESC @). Resets to default state.
    Init,

    /// Print and feed n lines (ESC d n).
    Feed { lines: u8 },

    /// Full cut (GS V 0).
    Cut,

    // ========== Style Changes ==========
    /// Set justification (ESC a n).
    SetAlign(Alignment),

    /// Set character size multipliers, 1-8 each (GS ! n).
    SetSize { width: u8, height: u8 },

    // ========== Margins ==========
    /// Indent the next line (GS L).
    SetLeftMargin(u16),

    /// Narrow the print area for the next line (GS W).
    SetPrintAreaWidth(u16),

    /// Restore the left margin to 0 (GS L 0 0).
    ResetLeftMargin,

    /// Restore the print area to the full width (GS W).
    ResetPrintAreaWidth(u16),

    // ========== Content ==========
    /// Text for the line buffer (no trailing newline).
    Text(String),

    /// Line feed (LF).
    Newline,

    // ========== Barcodes ==========
    /// Code128 with its height / module width / HRI settings.
    /// `data` is already ASCII and at most 255 bytes.
    Barcode {
        data: String,
        height: u8,
        module_width: u8,
        hri: u8,
    },

    /// QR code: model, module size, error correction, store, print.
    QrCode {
        data: String,
        module_size: u8,
        error_level: QrErrorLevel,
    },
}

/// A compiled IR program.
///
/// Contains a sequence of ops that can be compiled to bytes or to a
/// mnemonic transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Create a program with an initial Init op.
    pub fn with_init() -> Self {
        Self {
            ops: vec![Op::Init],
        }
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// Count ops matching a predicate.
    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
