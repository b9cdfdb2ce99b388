//! # ESC/POS Barcode Commands
//!
//! Code128 and QR symbol commands. Both are generated by the printer from
//! the payload, so nothing here rasterizes a symbol.
//!
//! ## Code128 Usage
//!
//! ```
//! use printcraft::protocol::barcode::code128;
//!
//! let cmd = code128::generate(b"12345", 80, 2, 2);
//! assert!(cmd.ends_with(&[0x1D, 0x6B, 73, 5, b'1', b'2', b'3', b'4', b'5']));
//! ```
//!
//! ## QR Code Usage
//!
//! QR codes are a multi-step sequence: configure, store, then print.
//!
//! ```
//! use printcraft::protocol::barcode::qr::{self, QrErrorLevel};
//!
//! let mut data = Vec::new();
//! data.extend(qr::set_model());
//! data.extend(qr::set_module_size(6));
//! data.extend(qr::set_error_correction(QrErrorLevel::M));
//! data.extend(qr::store_data(b"https://example.com"));
//! data.extend(qr::print());
//! ```

use super::commands::GS;

// ============================================================================
// CODE128 (GS k m=73)
// ============================================================================

/// Code128 command builders
///
/// Height, module width and HRI position are persistent settings; the
/// `GS k` command that follows prints using whatever is current.
pub mod code128 {
    use super::GS;

    /// `m` selector for Code128 in the length-prefixed `GS k` form.
    pub const SYSTEM: u8 = 73;

    /// The length prefix is a single byte.
    pub const MAX_DATA_LEN: usize = 255;

    /// # Set Barcode Height (GS h n)
    ///
    /// | Format  | Bytes    |
    /// |---------|----------|
    /// | ASCII   | GS h n   |
    /// | Hex     | 1D 68 n  |
    ///
    /// Height in dots, 1-255.
    pub fn set_height(height: u8) -> Vec<u8> {
        vec![GS, b'h', height.max(1)]
    }

    /// # Set Module Width (GS w n)
    ///
    /// | Format  | Bytes    |
    /// |---------|----------|
    /// | ASCII   | GS w n   |
    /// | Hex     | 1D 77 n  |
    ///
    /// Narrow bar width in dots, 2-6.
    pub fn set_module_width(width: u8) -> Vec<u8> {
        vec![GS, b'w', width.clamp(2, 6)]
    }

    /// # Select HRI Position (GS H n)
    ///
    /// | Format  | Bytes    |
    /// |---------|----------|
    /// | ASCII   | GS H n   |
    /// | Hex     | 1D 48 n  |
    ///
    /// | n | HRI text |
    /// |---|----------|
    /// | 0 | Not printed |
    /// | 1 | Above the bars |
    /// | 2 | Below the bars |
    /// | 3 | Above and below |
    pub fn set_hri(position: u8) -> Vec<u8> {
        vec![GS, b'H', position.min(3)]
    }

    /// # Print Code128 (GS k m n d1...dn)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | ASCII   | GS k 73 n data... |
    /// | Hex     | 1D 6B 49 n data... |
    ///
    /// Payloads longer than [`MAX_DATA_LEN`] are cut to fit the one-byte
    /// length field.
    pub fn data(payload: &[u8]) -> Vec<u8> {
        let payload = &payload[..payload.len().min(MAX_DATA_LEN)];
        let mut cmd = Vec::with_capacity(4 + payload.len());
        cmd.extend_from_slice(&[GS, b'k', SYSTEM, payload.len() as u8]);
        cmd.extend_from_slice(payload);
        cmd
    }

    /// Complete Code128 sequence: height, module width, HRI, data.
    pub fn generate(payload: &[u8], height: u8, module_width: u8, hri: u8) -> Vec<u8> {
        let mut cmd = Vec::new();
        cmd.extend(set_height(height));
        cmd.extend(set_module_width(module_width));
        cmd.extend(set_hri(hri));
        cmd.extend(data(payload));
        cmd
    }
}

// ============================================================================
// QR CODE (GS ( k, cn = 49)
// ============================================================================

/// QR Code command builders
///
/// Every QR function is a `GS ( k pL pH cn fn [params]` command where
/// `pL pH` counts the bytes after itself (cn, fn and parameters).
pub mod qr {
    use serde::{Deserialize, Serialize};

    use super::GS;

    /// Symbol type selector for QR functions.
    const CN: u8 = 0x31;

    /// QR Code error correction level
    ///
    /// | Level | Recovery | n |
    /// |-------|----------|---|
    /// | L | ~7% | 48 |
    /// | M | ~15% | 49 |
    /// | Q | ~25% | 50 |
    /// | H | ~30% | 51 |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[repr(u8)]
    pub enum QrErrorLevel {
        L = 48,
        #[default]
        M = 49,
        Q = 50,
        H = 51,
    }

    impl QrErrorLevel {
        pub fn letter(self) -> char {
            match self {
                QrErrorLevel::L => 'L',
                QrErrorLevel::M => 'M',
                QrErrorLevel::Q => 'Q',
                QrErrorLevel::H => 'H',
            }
        }
    }

    fn function(fn_code: u8, params: &[u8]) -> Vec<u8> {
        let [pl, ph] = ((params.len() + 2) as u16).to_le_bytes();
        let mut cmd = Vec::with_capacity(7 + params.len());
        cmd.extend_from_slice(&[GS, b'(', b'k', pl, ph, CN, fn_code]);
        cmd.extend_from_slice(params);
        cmd
    }

    /// # Select Model 2 (GS ( k 04 00 31 41 32 00)
    pub fn set_model() -> Vec<u8> {
        function(0x41, &[0x32, 0x00])
    }

    /// # Set Module Size (GS ( k 03 00 31 43 n)
    ///
    /// Module size in dots, 1-16.
    pub fn set_module_size(size: u8) -> Vec<u8> {
        function(0x43, &[size.clamp(1, 16)])
    }

    /// # Set Error Correction Level (GS ( k 03 00 31 45 n)
    pub fn set_error_correction(level: QrErrorLevel) -> Vec<u8> {
        function(0x45, &[level as u8])
    }

    /// Largest payload the 16-bit length field can describe.
    pub const MAX_DATA_LEN: usize = u16::MAX as usize - 3;

    /// # Store Symbol Data (GS ( k pL pH 31 50 30 data)
    ///
    /// `pL pH` is `data.len() + 3`: the length covers `cn`, `fn` and `m`
    /// as well as the payload.
    ///
    /// ```
    /// use printcraft::protocol::barcode::qr;
    ///
    /// let cmd = qr::store_data(b"https://x");
    /// assert_eq!(&cmd[..8], &[0x1D, 0x28, 0x6B, 12, 0, 0x31, 0x50, 0x30]);
    /// ```
    pub fn store_data(data: &[u8]) -> Vec<u8> {
        let data = &data[..data.len().min(MAX_DATA_LEN)];
        let mut params = Vec::with_capacity(1 + data.len());
        params.push(0x30);
        params.extend_from_slice(data);
        function(0x50, &params)
    }

    /// # Print Stored Symbol (GS ( k 03 00 31 51 30)
    pub fn print() -> Vec<u8> {
        function(0x51, &[0x30])
    }

    /// Complete QR sequence in the order the printer requires: model,
    /// module size, error correction, store, print.
    pub fn generate(data: &[u8], module_size: u8, level: QrErrorLevel) -> Vec<u8> {
        let mut cmd = Vec::new();
        cmd.extend(set_model());
        cmd.extend(set_module_size(module_size));
        cmd.extend(set_error_correction(level));
        cmd.extend(store_data(data));
        cmd.extend(print());
        cmd
    }
}
