//! # Printcraft - Receipt and Label Command Encoder
//!
//! Printcraft turns positioned layouts (text, dividers, barcodes, QR codes)
//! plus a JSON data object into printer command streams. It provides:
//!
//! - **Document model**: serde types for saved layouts, with `{{path}}` data binding
//! - **ESC/POS**: raw bytes for receipt printers, or a readable mnemonic transcript
//! - **ZPL**: label source for Zebra-compatible printers
//! - **Geometry**: printer profiles with widths and margins
//!
//! ## Quick Start
//!
//! ```
//! use printcraft::{
//!     document::Template,
//!     printer::Profile,
//!     render::{self, Target},
//! };
//! use serde_json::json;
//!
//! let template = Template::from_json(r#"{
//!     "name": "Order",
//!     "blocks": [
//!         {"type": "text", "x": 0, "y": 0, "text": "Order #{{order.id}}", "fontSize": 32, "align": "center"},
//!         {"type": "divider", "x": 0, "y": 40},
//!         {"type": "qr", "x": 0, "y": 60, "value": "https://example.com/o/{{order.id}}"}
//!     ]
//! }"#)?;
//!
//! let data = json!({"order": {"id": 1042}});
//! let profile = Profile::with_width(576);
//!
//! let doc = render::encode(&template.blocks, Some(&profile), Some(&data), Target::EscPosRaw)?;
//! assert!(doc.as_bytes().ends_with(&[0x1B, 0x64, 0x02, 0x1D, 0x56, 0x00]));
//! assert_eq!(doc.file_name(template.name.as_deref()), "order-escpos.bin");
//!
//! # Ok::<(), printcraft::error::PrintcraftError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Blocks, templates and data binding |
//! | [`printer`] | Profiles and resolved geometry |
//! | [`protocol`] | ESC/POS command builders |
//! | [`ir`] | ESC/POS op list with byte and mnemonic backends |
//! | [`render`] | ESC/POS and ZPL encoders |
//! | [`error`] | Error types |
//!
//! Encoding is pure: the same blocks, profile and data always give the same
//! output, and calls share no state.

pub mod document;
pub mod error;
pub mod ir;
pub mod printer;
pub mod protocol;
pub mod render;

// Re-exports for convenience
pub use document::{Block, Template};
pub use error::PrintcraftError;
pub use printer::{Geometry, Profile, Protocol};
pub use render::{EncodedDocument, Encoder, Target, encode};
