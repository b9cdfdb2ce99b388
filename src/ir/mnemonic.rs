//! # Mnemonic Transcript
//!
//! Spells an IR program as human-readable ESC/POS, one command per line
//! with a `;` comment. The transcript is for review and download; it is
//! never sent to a printer.
//!
//! ```text
//! # ESC/POS (mnemonic export for review)
//! ESC @                  ; Initialize
//! ESC a 1                ; Align center
//! TXT "Hello"
//! LF
//! ESC d 2                ; Feed 2 lines
//! GS V 0                 ; Cut
//! ```

use super::ops::{Op, Program};
use crate::protocol::barcode::qr::QrErrorLevel;

/// First line of every transcript.
pub const HEADER: &str = "# ESC/POS (mnemonic export for review)";

/// Width of the directive column before the `;` comment.
const DIRECTIVE_WIDTH: usize = 22;

fn line(out: &mut Vec<String>, directive: String, comment: &str) {
    out.push(format!("{:<width$} ; {}", directive, comment, width = DIRECTIVE_WIDTH));
}

fn quoted(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '"' => q.push_str("\\\""),
            '\\' => q.push_str("\\\\"),
            c => q.push(c),
        }
    }
    q.push('"');
    q
}

fn hri_name(hri: u8) -> &'static str {
    match hri {
        0 => "none",
        1 => "above",
        2 => "below",
        _ => "above and below",
    }
}

impl Program {
    /// Render the program as a mnemonic transcript.
    ///
    /// Lines are joined with `\n`; there is no trailing newline.
    pub fn to_mnemonic(&self) -> String {
        let mut out = vec![HEADER.to_string()];

        for op in &self.ops {
            match op {
                Op::Init => line(&mut out, "ESC @".into(), "Initialize"),
                Op::Feed { lines } => {
                    let unit = if *lines == 1 { "line" } else { "lines" };
                    line(&mut out, format!("ESC d {}", lines), &format!("Feed {} {}", lines, unit));
                }
                Op::Cut => line(&mut out, "GS V 0".into(), "Cut"),

                Op::SetAlign(align) => line(
                    &mut out,
                    format!("ESC a {}", *align as u8),
                    &format!("Align {}", align.name()),
                ),
                Op::SetSize { width, height } => line(
                    &mut out,
                    format!("GS ! 0x{:02x}", crate::protocol::text::size_byte(*width, *height)),
                    &format!("Size {}x{}", width, height),
                ),

                Op::SetLeftMargin(dots) => line(
                    &mut out,
                    format!("GS L {}", dots),
                    &format!("Left margin = {} dots", dots),
                ),
                Op::SetPrintAreaWidth(dots) => line(
                    &mut out,
                    format!("GS W {}", dots),
                    &format!("Print area width = {} dots", dots),
                ),
                Op::ResetLeftMargin => line(&mut out, "GS L 0".into(), "Reset margin"),
                Op::ResetPrintAreaWidth(dots) => {
                    line(&mut out, format!("GS W {}", dots), "Reset area width")
                }

                Op::Text(s) => out.push(format!("TXT {}", quoted(s))),
                Op::Newline => out.push("LF".to_string()),

                Op::Barcode {
                    data,
                    height,
                    module_width,
                    hri,
                } => {
                    line(
                        &mut out,
                        format!("GS h {}", height),
                        &format!("Barcode height = {} dots", height),
                    );
                    line(
                        &mut out,
                        format!("GS w {}", module_width),
                        &format!("Module width = {} dots", module_width),
                    );
                    line(&mut out, format!("GS H {}", hri), &format!("HRI {}", hri_name(*hri)));
                    line(
                        &mut out,
                        format!("GS k 73 {} {}", data.len(), quoted(data)),
                        "Code128",
                    );
                }
                Op::QrCode {
                    data,
                    module_size,
                    error_level,
                } => emit_qr(&mut out, data, *module_size, *error_level),
            }
        }

        out.join("\n")
    }
}

fn emit_qr(out: &mut Vec<String>, data: &str, module_size: u8, level: QrErrorLevel) {
    line(out, "GS ( k 4 0 49 65 50 0".into(), "QR model 2");
    line(
        out,
        format!("GS ( k 3 0 49 67 {}", module_size),
        &format!("QR module size = {} dots", module_size),
    );
    line(
        out,
        format!("GS ( k 3 0 49 69 {}", level as u8),
        &format!("QR error correction {}", level.letter()),
    );
    let [pl, ph] = ((data.len() + 3) as u16).to_le_bytes();
    line(
        out,
        format!("GS ( k {} {} 49 80 48 {}", pl, ph, quoted(data)),
        &format!("QR store {} bytes", data.len()),
    );
    line(out, "GS ( k 3 0 49 81 48".into(), "QR print");
}
