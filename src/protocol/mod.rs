//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for ESC/POS line printers. Every function
//! returns the exact bytes of one command; sequencing and state tracking
//! live in [`crate::render::escpos`].
//!
//! ## Module Structure
//!
//! - [`commands`]: Init, feed, cut
//! - [`text`]: Alignment, character size, left margin and print area
//! - [`barcode`]: Code128 and QR codes
//!
//! ## Usage Example
//!
//! ```
//! use printcraft::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(b"RECEIPT\n");
//! data.extend(commands::feed_lines(2));
//! data.extend(commands::cut());
//! ```

pub mod barcode;
pub mod commands;
pub mod text;
