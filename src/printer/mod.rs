//! # Printer Module
//!
//! Printer profiles and the geometry an encoder derives from them.
//!
//! ## Modules
//!
//! - [`config`]: Profiles, protocol defaults, geometry resolution

pub mod config;

pub use config::{Geometry, MarginSpec, Margins, Profile, Protocol};
