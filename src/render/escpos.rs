//! # ESC/POS Emitter
//!
//! Walks the layout blocks in print order and builds an IR [`Program`].
//! Alignment and character size are persistent printer settings, so the
//! emitter tracks what it last sent in a [`PrintState`] and only emits a
//! change when a block needs something different. The state lives in the
//! emitter value for one encode; nothing is shared between calls.
//!
//! ## Per-block sequence
//!
//! 1. Alignment, if it differs from the tracked state
//! 2. Character size (text and dividers), if it differs
//! 3. Left margin + print area width, when the block is indented
//! 4. Content
//! 5. Margin reset, paired with step 3
//!
//! The program always ends with a 2-line feed and a cut.

use serde_json::Value;
use tracing::{trace, warn};

use crate::document::{self, Barcode, Block, Divider, Frame, Qr, Text, bind_text};
use crate::ir::{Op, Program};
use crate::printer::Geometry;
use crate::protocol::barcode::{code128, qr};
use crate::protocol::text::Alignment;

/// Narrowest print area sent for an indented line.
pub const MIN_PRINT_AREA: i64 = 48;

/// Lines fed before the final cut.
pub const TRAILING_FEED_LINES: u8 = 2;

/// Settings the printer holds between lines, as last sent by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintState {
    pub align: Alignment,
    /// Uniform character size multiplier, 1-8.
    pub size: u8,
}

impl Default for PrintState {
    /// Power-on state after `ESC @`.
    fn default() -> Self {
        Self {
            align: Alignment::Left,
            size: 1,
        }
    }
}

/// Dash count for a divider rule at the given print width.
pub fn divider_columns(width_dots: u32) -> usize {
    (width_dots / 8).clamp(24, 64) as usize
}

/// Replace line breaks with spaces; one block prints as one line.
fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace('\n', " ")
}

/// ASCII-only barcode payload, cut to the one-byte length limit.
fn barcode_payload(value: &str) -> String {
    let mut payload: String = value
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect();
    if payload.len() > code128::MAX_DATA_LEN {
        warn!(
            len = payload.len(),
            max = code128::MAX_DATA_LEN,
            "barcode payload too long, truncating"
        );
        payload.truncate(code128::MAX_DATA_LEN);
    }
    payload
}

/// QR payload cut (on a character boundary) to what the length field allows.
fn qr_payload(value: String) -> String {
    if value.len() <= qr::MAX_DATA_LEN {
        return value;
    }
    warn!(len = value.len(), max = qr::MAX_DATA_LEN, "QR payload too long, truncating");
    let mut end = qr::MAX_DATA_LEN;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

/// Builds one ESC/POS program. Create a fresh emitter per encode.
pub struct Emitter<'a> {
    geometry: Geometry,
    data: &'a Value,
    state: PrintState,
    program: Program,
}

impl<'a> Emitter<'a> {
    pub fn new(geometry: Geometry, data: &'a Value) -> Self {
        Self {
            geometry,
            data,
            state: PrintState::default(),
            program: Program::with_init(),
        }
    }

    /// Current tracked printer state.
    pub fn state(&self) -> PrintState {
        self.state
    }

    /// Emit every block in print order, then the closing feed and cut.
    pub fn emit_all(mut self, blocks: &[Block]) -> Program {
        for block in document::print_order(blocks) {
            self.emit(block);
        }
        self.program.push(Op::Feed {
            lines: TRAILING_FEED_LINES,
        });
        self.program.push(Op::Cut);
        self.program
    }

    /// Emit a single block.
    pub fn emit(&mut self, block: &Block) {
        trace!(kind = block.kind(), y = block.frame().y, "emit block");
        match block {
            Block::Text(t) => self.text(t),
            Block::Divider(d) => self.divider(d),
            Block::Barcode(b) => self.barcode(b),
            Block::Qr(q) => self.qr(q),
        }
    }

    fn set_align(&mut self, align: Alignment) {
        if align != self.state.align {
            self.program.push(Op::SetAlign(align));
            self.state.align = align;
        }
    }

    fn set_size(&mut self, size: u8) {
        if size != self.state.size {
            self.program.push(Op::SetSize {
                width: size,
                height: size,
            });
            self.state.size = size;
        }
    }

    /// Run `content` inside a left margin / print area pair when the block
    /// is indented, restoring both afterwards.
    fn indented(&mut self, frame: &Frame, content: impl FnOnce(&mut Program)) {
        let margins = self.geometry.margins;
        let width = i64::from(self.geometry.width_dots);
        let raw = frame.x + f64::from(margins.left);
        let indent = if raw.is_finite() {
            raw.round().clamp(0.0, f64::from(u16::MAX)) as i64
        } else {
            0
        };

        if indent == 0 {
            content(&mut self.program);
            return;
        }

        let area = (width - indent - i64::from(margins.right)).max(MIN_PRINT_AREA);
        self.program.push(Op::SetLeftMargin(indent as u16));
        self.program
            .push(Op::SetPrintAreaWidth(area.min(i64::from(u16::MAX)) as u16));

        content(&mut self.program);

        self.program.push(Op::ResetLeftMargin);
        self.program
            .push(Op::ResetPrintAreaWidth(self.geometry.width_dots as u16));
    }

    fn text(&mut self, t: &Text) {
        self.set_align(t.align);
        self.set_size(t.size_multiplier());
        let line = single_line(&bind_text(&t.content, self.data));
        self.indented(&t.frame, |p| {
            p.push(Op::Text(line));
            p.push(Op::Newline);
        });
    }

    fn divider(&mut self, _d: &Divider) {
        self.set_align(Alignment::Left);
        self.set_size(1);
        let rule = "-".repeat(divider_columns(self.geometry.width_dots));
        self.program.push(Op::Text(rule));
        self.program.push(Op::Newline);
    }

    fn barcode(&mut self, b: &Barcode) {
        self.set_align(b.align);
        let op = Op::Barcode {
            data: barcode_payload(&bind_text(&b.value, self.data)),
            height: b.bar_height(),
            module_width: b.module_width(),
            hri: b.hri_mode(),
        };
        self.indented(&b.frame, |p| {
            p.push(op);
            p.push(Op::Newline);
        });
    }

    fn qr(&mut self, q: &Qr) {
        self.set_align(q.align);
        let op = Op::QrCode {
            data: qr_payload(bind_text(&q.value, self.data)),
            module_size: q.module_size(),
            error_level: q.ec,
        };
        self.indented(&q.frame, |p| {
            p.push(op);
            p.push(Op::Feed { lines: 1 });
        });
    }
}

/// Compile blocks to an ESC/POS program.
pub fn compile(blocks: &[Block], geometry: Geometry, data: &Value) -> Program {
    Emitter::new(geometry, data).emit_all(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{Geometry, Profile, Protocol};
    use crate::protocol::barcode::qr::QrErrorLevel;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn geometry() -> Geometry {
        Geometry::defaults(Protocol::EscPos)
    }

    fn text_at(content: &str, x: f64, y: f64) -> Block {
        Block::from(Text::new(content)).at(x, y)
    }

    fn is_align(op: &Op) -> bool {
        matches!(op, Op::SetAlign(_))
    }

    fn is_size(op: &Op) -> bool {
        matches!(op, Op::SetSize { .. })
    }

    #[test]
    fn test_empty_blocks() {
        let program = compile(&[], geometry(), &Value::Null);
        assert_eq!(program.ops, vec![Op::Init, Op::Feed { lines: 2 }, Op::Cut]);
    }

    #[test]
    fn test_single_default_text() {
        let program = compile(&[text_at("Hello", 0.0, 0.0)], geometry(), &Value::Null);
        assert_eq!(
            program.ops,
            vec![
                Op::Init,
                Op::Text("Hello".into()),
                Op::Newline,
                Op::Feed { lines: 2 },
                Op::Cut,
            ]
        );
    }

    #[test]
    fn test_state_changes_only_when_different() {
        let centered = |s: &str, y: f64| {
            Block::Text(Text {
                align: Alignment::Center,
                font_size: 32.0,
                ..Text::new(s)
            })
            .at(0.0, y)
        };
        let blocks = vec![centered("a", 0.0), centered("b", 20.0), centered("c", 40.0)];
        let program = compile(&blocks, geometry(), &Value::Null);
        assert_eq!(program.count(is_align), 1);
        assert_eq!(program.count(is_size), 1);
        assert_eq!(program.ops[1], Op::SetAlign(Alignment::Center));
        assert_eq!(
            program.ops[2],
            Op::SetSize {
                width: 2,
                height: 2
            }
        );
    }

    #[test]
    fn test_defaults_emit_no_state_commands() {
        let blocks = vec![text_at("a", 0.0, 0.0), text_at("b", 0.0, 30.0)];
        let program = compile(&blocks, geometry(), &Value::Null);
        assert_eq!(program.count(is_align), 0);
        assert_eq!(program.count(is_size), 0);
    }

    #[test]
    fn test_state_returns_to_left() {
        let blocks = vec![
            Block::Text(Text {
                align: Alignment::Right,
                ..Text::new("r")
            }),
            text_at("l", 0.0, 10.0),
        ];
        let program = compile(&blocks, geometry(), &Value::Null);
        let aligns: Vec<&Op> = program.iter().filter(|op| is_align(op)).collect();
        assert_eq!(
            aligns,
            vec![&Op::SetAlign(Alignment::Right), &Op::SetAlign(Alignment::Left)]
        );
    }

    #[test]
    fn test_indent_sets_and_restores_margins() {
        let program = compile(&[text_at("x", 40.0, 0.0)], geometry(), &Value::Null);
        assert_eq!(
            program.ops,
            vec![
                Op::Init,
                Op::SetLeftMargin(40),
                Op::SetPrintAreaWidth(536),
                Op::Text("x".into()),
                Op::Newline,
                Op::ResetLeftMargin,
                Op::ResetPrintAreaWidth(576),
                Op::Feed { lines: 2 },
                Op::Cut,
            ]
        );
    }

    #[test]
    fn test_indent_includes_profile_margins() {
        let profile = Profile::with_width(576).margins(10, 20, 0, 0);
        let g = Geometry::resolve(Some(&profile), Protocol::EscPos).unwrap();
        let program = compile(&[text_at("x", 5.4, 0.0)], g, &Value::Null);
        assert_eq!(program.ops[1], Op::SetLeftMargin(15));
        assert_eq!(program.ops[2], Op::SetPrintAreaWidth(576 - 15 - 20));
    }

    #[test]
    fn test_print_area_floor() {
        let program = compile(&[text_at("x", 560.0, 0.0)], geometry(), &Value::Null);
        assert_eq!(program.ops[2], Op::SetPrintAreaWidth(48));
    }

    #[test]
    fn test_negative_x_is_not_indented() {
        let program = compile(&[text_at("x", -30.0, 0.0)], geometry(), &Value::Null);
        assert_eq!(program.count(|op| matches!(op, Op::SetLeftMargin(_))), 0);
    }

    #[test]
    fn test_every_margin_set_is_paired_with_reset() {
        let blocks = vec![
            text_at("a", 10.0, 0.0),
            text_at("b", 0.0, 10.0),
            Block::from(Qr::new("q")).at(100.0, 20.0),
            Block::from(Barcode::new("1")).at(0.0, 30.0),
            Block::from(Barcode::new("2")).at(8.0, 40.0),
        ];
        let program = compile(&blocks, geometry(), &Value::Null);

        let mut open = false;
        for op in &program {
            match op {
                Op::SetLeftMargin(_) => {
                    assert!(!open, "margin set twice without reset");
                    open = true;
                }
                Op::ResetPrintAreaWidth(w) => {
                    assert!(open, "reset without set");
                    assert_eq!(*w, 576);
                    open = false;
                }
                _ => {}
            }
        }
        assert!(!open);
        assert_eq!(program.count(|op| matches!(op, Op::SetLeftMargin(_))), 3);
        assert_eq!(program.count(|op| matches!(op, Op::ResetLeftMargin)), 3);
    }

    #[test]
    fn test_text_binding_and_line_breaks() {
        let data = json!({"customer": {"name": "Ada"}});
        let program = compile(&[text_at("Hi\n{{customer.name}}\r\n!", 0.0, 0.0)], geometry(), &data);
        assert_eq!(program.ops[1], Op::Text("Hi Ada !".into()));
    }

    #[test]
    fn test_sorted_by_y_then_x() {
        let blocks = vec![
            text_at("third", 0.0, 100.0),
            text_at("second", 50.0, 10.0),
            text_at("first", 0.0, 10.0),
        ];
        let program = compile(&blocks, geometry(), &Value::Null);
        let texts: Vec<&str> = program
            .iter()
            .filter_map(|op| match op {
                Op::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_divider_width_and_state() {
        let blocks = vec![
            Block::Text(Text {
                align: Alignment::Center,
                font_size: 48.0,
                ..Text::new("Big")
            }),
            Block::from(Divider::default()).at(30.0, 50.0),
        ];
        let program = compile(&blocks, geometry(), &Value::Null);
        // Divider restores left / 1x and ignores its x
        assert!(program.ops.contains(&Op::SetAlign(Alignment::Left)));
        assert!(program.ops.contains(&Op::SetSize {
            width: 1,
            height: 1
        }));
        assert_eq!(program.count(|op| matches!(op, Op::SetLeftMargin(_))), 0);
        assert!(program.ops.contains(&Op::Text("-".repeat(64))));
    }

    #[test]
    fn test_divider_columns() {
        assert_eq!(divider_columns(576), 64);
        assert_eq!(divider_columns(384), 48);
        assert_eq!(divider_columns(100), 24);
        assert_eq!(divider_columns(2000), 64);
    }

    #[test]
    fn test_barcode_op() {
        let data = json!({"sku": "ABC-1"});
        let block = Block::Barcode(Barcode {
            width: 0,
            hri: 7,
            ..Barcode::new("{{sku}}")
        });
        let program = compile(&[block], geometry(), &data);
        assert_eq!(
            program.ops[1],
            Op::Barcode {
                data: "ABC-1".into(),
                height: 80,
                module_width: 2,
                hri: 3,
            }
        );
        assert_eq!(program.ops[2], Op::Newline);
    }

    #[test]
    fn test_barcode_payload_sanitized_and_truncated() {
        assert_eq!(barcode_payload("né"), "n?");
        assert_eq!(barcode_payload(&"7".repeat(400)).len(), 255);
    }

    #[test]
    fn test_qr_op() {
        let block = Block::Qr(Qr {
            size: 99,
            ec: QrErrorLevel::H,
            align: Alignment::Center,
            ..Qr::new("https://x")
        });
        let program = compile(&[block], geometry(), &Value::Null);
        assert_eq!(
            &program.ops[1..4],
            &[
                Op::SetAlign(Alignment::Center),
                Op::QrCode {
                    data: "https://x".into(),
                    module_size: 16,
                    error_level: QrErrorLevel::H,
                },
                Op::Feed { lines: 1 },
            ]
        );
    }

    #[test]
    fn test_emitter_state_tracking() {
        let mut emitter = Emitter::new(geometry(), &Value::Null);
        assert_eq!(emitter.state(), PrintState::default());
        emitter.emit(&Block::Text(Text {
            align: Alignment::Right,
            font_size: 64.0,
            ..Text::new("x")
        }));
        assert_eq!(
            emitter.state(),
            PrintState {
                align: Alignment::Right,
                size: 4
            }
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let blocks = vec![text_at("b", 0.0, 10.0), text_at("a", 0.0, 0.0)];
        let before = blocks.clone();
        let _ = compile(&blocks, geometry(), &Value::Null);
        assert_eq!(blocks, before);
    }
}
