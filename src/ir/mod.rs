//! # Intermediate Representation (IR)
//!
//! This module provides the IR layer for ESC/POS output. The IR is a
//! "bytecode" representation that sits between the layout blocks and the
//! two ESC/POS output forms.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │   Blocks    │ ──► │     IR      │ ──► │ Codegen (bytes)  │
//! │  (layout)   │     │  (Vec<Op>)  │  └► │ Mnemonic (text)  │
//! └─────────────┘     └─────────────┘     └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use printcraft::ir::{Op, Program};
//! use printcraft::protocol::text::Alignment;
//!
//! let mut program = Program::with_init();
//! program.push(Op::SetAlign(Alignment::Center));
//! program.push(Op::Text("HELLO".into()));
//! program.push(Op::Newline);
//! program.push(Op::Cut);
//!
//! let bytes = program.to_bytes();
//! let transcript = program.to_mnemonic();
//! assert!(bytes.starts_with(&[0x1B, 0x40]));
//! assert!(transcript.contains("ESC a 1"));
//! ```

mod codegen;
pub mod mnemonic;
mod ops;

// Re-export the ops types (codegen and mnemonic add methods to Program via impl)
pub use ops::*;
