//! # Code Generation
//!
//! Converts IR programs to raw ESC/POS bytes.

use super::ops::{Op, Program};
use crate::protocol::commands::LF;
use crate::protocol::{barcode, commands, text};

impl Program {
    /// Compile the IR program to ESC/POS bytes.
    ///
    /// All commands are appended to one buffer that is returned as-is.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.ops.len() * 4);

        for op in &self.ops {
            match op {
                // ===== Printer Control =====
                Op::Init => out.extend(commands::init()),
                Op::Feed { lines } => out.extend(commands::feed_lines(*lines)),
                Op::Cut => out.extend(commands::cut()),

                // ===== Style Changes =====
                Op::SetAlign(align) => out.extend(text::align(*align)),
                Op::SetSize { width, height } => out.extend(text::size(*width, *height)),

                // ===== Margins =====
                Op::SetLeftMargin(dots) => out.extend(text::left_margin(*dots)),
                Op::SetPrintAreaWidth(dots) => out.extend(text::print_area_width(*dots)),
                Op::ResetLeftMargin => out.extend(text::left_margin(0)),
                Op::ResetPrintAreaWidth(dots) => out.extend(text::print_area_width(*dots)),

                // ===== Content =====
                Op::Text(s) => out.extend(text::encode_latin1(s)),
                Op::Newline => out.push(LF),

                // ===== Barcodes =====
                Op::Barcode {
                    data,
                    height,
                    module_width,
                    hri,
                } => {
                    out.extend(barcode::code128::generate(
                        data.as_bytes(),
                        *height,
                        *module_width,
                        *hri,
                    ));
                }
                Op::QrCode {
                    data,
                    module_size,
                    error_level,
                } => {
                    out.extend(barcode::qr::generate(
                        data.as_bytes(),
                        *module_size,
                        *error_level,
                    ));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::barcode::qr::QrErrorLevel;
    use crate::protocol::text::Alignment;

    #[test]
    fn test_empty_program() {
        let program = Program::new();
        let bytes = program.to_bytes();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_init_only() {
        let program = Program::with_init();
        assert_eq!(program.to_bytes(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_simple_text() {
        let mut program = Program::with_init();
        program.push(Op::Text("Hello".into()));
        program.push(Op::Newline);

        let bytes = program.to_bytes();
        assert!(bytes.starts_with(&[0x1B, 0x40])); // Init
        assert!(bytes.ends_with(&[b'H', b'e', b'l', b'l', b'o', 0x0A]));
    }

    #[test]
    fn test_styled_text() {
        let mut program = Program::with_init();
        program.push(Op::SetAlign(Alignment::Center));
        program.push(Op::SetSize {
            width: 2,
            height: 2,
        });
        program.push(Op::Text("HEADER".into()));
        program.push(Op::Newline);

        let bytes = program.to_bytes();
        // Center align (ESC a 1)
        assert!(bytes.windows(3).any(|w| w == [0x1B, 0x61, 0x01]));
        // Double size (GS ! 0x11)
        assert!(bytes.windows(3).any(|w| w == [0x1D, 0x21, 0x11]));
    }

    #[test]
    fn test_margins_and_reset() {
        let program: Program = vec![
            Op::SetLeftMargin(40),
            Op::SetPrintAreaWidth(536),
            Op::ResetLeftMargin,
            Op::ResetPrintAreaWidth(576),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            program.to_bytes(),
            vec![
                0x1D, 0x4C, 40, 0, //
                0x1D, 0x57, 0x18, 0x02, //
                0x1D, 0x4C, 0, 0, //
                0x1D, 0x57, 0x40, 0x02,
            ]
        );
    }

    #[test]
    fn test_feed_and_cut() {
        let program: Program = vec![Op::Feed { lines: 2 }, Op::Cut].into_iter().collect();
        assert_eq!(program.to_bytes(), vec![0x1B, 0x64, 0x02, 0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_barcode() {
        let mut program = Program::new();
        program.push(Op::Barcode {
            data: "42".into(),
            height: 80,
            module_width: 3,
            hri: 2,
        });
        assert_eq!(
            program.to_bytes(),
            vec![0x1D, 0x68, 80, 0x1D, 0x77, 3, 0x1D, 0x48, 2, 0x1D, 0x6B, 73, 2, b'4', b'2']
        );
    }

    #[test]
    fn test_qr_code() {
        let mut program = Program::new();
        program.push(Op::QrCode {
            data: "https://x".into(),
            module_size: 6,
            error_level: QrErrorLevel::M,
        });

        let bytes = program.to_bytes();
        // Model select first
        assert!(bytes.starts_with(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]));
        // Store command carries len + 3
        assert!(bytes.windows(8).any(|w| w == [0x1D, 0x28, 0x6B, 12, 0, 0x31, 0x50, 0x30]));
        // Print trigger last
        assert!(bytes.ends_with(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]));
    }

    #[test]
    fn test_text_is_latin1() {
        let mut program = Program::new();
        program.push(Op::Text("Café €".into()));
        assert_eq!(program.to_bytes(), vec![b'C', b'a', b'f', 0xE9, b' ', b'?']);
    }
}
