//! # Printer Profiles and Geometry
//!
//! A [`Profile`] is what the profile store keeps for a printer: its width in
//! dots and four margins. [`Geometry::resolve`] turns an optional profile
//! into the concrete numbers an encoder works with, filling gaps with the
//! defaults of the target [`Protocol`].
//!
//! ## Defaults
//!
//! | Protocol | Width (dots) | Typical device |
//! |----------|--------------|----------------|
//! | ESC/POS | 576 | 80mm receipt printer at 203 DPI (72mm printable) |
//! | ZPL | 600 | 3" label at 203 DPI |
//!
//! ## Usage
//!
//! ```
//! use printcraft::printer::{Geometry, Profile, Protocol};
//!
//! let profile: Profile = serde_json::from_str(
//!     r#"{"widthDots": 512, "margins": {"left": 16, "right": 16}}"#,
//! ).unwrap();
//! let geometry = Geometry::resolve(Some(&profile), Protocol::EscPos).unwrap();
//! assert_eq!(geometry.print_width(), 480);
//!
//! let fallback = Geometry::resolve(None, Protocol::Zpl).unwrap();
//! assert_eq!(fallback.width_dots, 600);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PrintcraftError, Result};

/// Largest width the two-byte ESC/POS area commands can carry.
pub const MAX_WIDTH_DOTS: i64 = u16::MAX as i64;

// ============================================================================
// PROTOCOL
// ============================================================================

/// Target printer command language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Line/receipt printers (ESC/POS family).
    EscPos,
    /// Label printers (Zebra ZPL).
    Zpl,
}

impl Protocol {
    /// Print width used when no profile supplies one.
    pub const fn default_width_dots(self) -> u32 {
        match self {
            Protocol::EscPos => 576,
            Protocol::Zpl => 600,
        }
    }

    /// Short lowercase name (`escpos` / `zpl`).
    pub fn name(self) -> &'static str {
        match self {
            Protocol::EscPos => "escpos",
            Protocol::Zpl => "zpl",
        }
    }
}

// ============================================================================
// PROFILE
// ============================================================================

/// Margins as stored; any side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<i64>,
}

/// Wire shape of a profile. Accepts both the nested `margins` object and
/// the flat `marginLeftDots`-style columns of the profile table; nested
/// values win when both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    #[serde(default)]
    width_dots: Option<i64>,
    #[serde(default)]
    margins: Option<MarginSpec>,
    #[serde(default)]
    margin_left_dots: Option<i64>,
    #[serde(default)]
    margin_right_dots: Option<i64>,
    #[serde(default)]
    margin_top_dots: Option<i64>,
    #[serde(default)]
    margin_bottom_dots: Option<i64>,
}

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        let nested = raw.margins.unwrap_or_default();
        Profile {
            width_dots: raw.width_dots,
            margins: MarginSpec {
                left: nested.left.or(raw.margin_left_dots),
                right: nested.right.or(raw.margin_right_dots),
                top: nested.top.or(raw.margin_top_dots),
                bottom: nested.bottom.or(raw.margin_bottom_dots),
            },
        }
    }
}

/// A stored printer profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawProfile")]
pub struct Profile {
    /// Full print width in dots. `None` or `0` means "use the protocol default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_dots: Option<i64>,
    #[serde(default)]
    pub margins: MarginSpec,
}

impl Profile {
    pub fn with_width(width_dots: i64) -> Self {
        Self {
            width_dots: Some(width_dots),
            ..Default::default()
        }
    }

    pub fn margins(mut self, left: i64, right: i64, top: i64, bottom: i64) -> Self {
        self.margins = MarginSpec {
            left: Some(left),
            right: Some(right),
            top: Some(top),
            bottom: Some(bottom),
        };
        self
    }

    /// Reject widths no printer can have.
    ///
    /// Margins are never rejected; they are clamped during resolution.
    pub fn validate(&self) -> Result<()> {
        match self.width_dots {
            Some(w) if w < 0 => Err(PrintcraftError::InvalidProfile(format!(
                "widthDots must not be negative (got {})",
                w
            ))),
            Some(w) if w > MAX_WIDTH_DOTS => Err(PrintcraftError::InvalidProfile(format!(
                "widthDots must be at most {} (got {})",
                MAX_WIDTH_DOTS, w
            ))),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Resolved margins in dots, all non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// Effective width and margins for one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width_dots: u32,
    pub margins: Margins,
}

fn clamp_margin(v: Option<i64>) -> u32 {
    v.unwrap_or(0).clamp(0, MAX_WIDTH_DOTS) as u32
}

impl Geometry {
    /// Resolve a profile against the protocol defaults.
    ///
    /// Missing width (or `0`) falls back to [`Protocol::default_width_dots`];
    /// missing or negative margins become `0`.
    pub fn resolve(profile: Option<&Profile>, protocol: Protocol) -> Result<Self> {
        let Some(profile) = profile else {
            return Ok(Self::defaults(protocol));
        };
        profile.validate()?;

        let width_dots = match profile.width_dots {
            Some(w) if w > 0 => w as u32,
            _ => protocol.default_width_dots(),
        };

        Ok(Self {
            width_dots,
            margins: Margins {
                left: clamp_margin(profile.margins.left),
                right: clamp_margin(profile.margins.right),
                top: clamp_margin(profile.margins.top),
                bottom: clamp_margin(profile.margins.bottom),
            },
        })
    }

    /// Protocol default width, zero margins.
    pub fn defaults(protocol: Protocol) -> Self {
        Self {
            width_dots: protocol.default_width_dots(),
            margins: Margins::default(),
        }
    }

    /// Printable width between the side margins, never negative.
    pub fn print_width(&self) -> u32 {
        self.width_dots
            .saturating_sub(self.margins.left.saturating_add(self.margins.right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_protocol() {
        let escpos = Geometry::resolve(None, Protocol::EscPos).unwrap();
        assert_eq!(escpos.width_dots, 576);
        assert_eq!(escpos.margins, Margins::default());

        let zpl = Geometry::resolve(None, Protocol::Zpl).unwrap();
        assert_eq!(zpl.width_dots, 600);
        assert_eq!(zpl.print_width(), 600);
    }

    #[test]
    fn test_nested_margins() {
        let profile: Profile = serde_json::from_str(
            r#"{"widthDots": 576, "margins": {"left": 10, "right": 20, "top": 5}}"#,
        )
        .unwrap();
        let g = Geometry::resolve(Some(&profile), Protocol::EscPos).unwrap();
        assert_eq!(g.margins.left, 10);
        assert_eq!(g.margins.right, 20);
        assert_eq!(g.margins.top, 5);
        assert_eq!(g.margins.bottom, 0);
        assert_eq!(g.print_width(), 546);
    }

    #[test]
    fn test_flat_margin_columns() {
        let profile: Profile = serde_json::from_str(
            r#"{"widthDots": 812, "marginLeftDots": 8, "marginTopDots": 12}"#,
        )
        .unwrap();
        let g = Geometry::resolve(Some(&profile), Protocol::Zpl).unwrap();
        assert_eq!(g.width_dots, 812);
        assert_eq!(g.margins.left, 8);
        assert_eq!(g.margins.top, 12);
    }

    #[test]
    fn test_missing_width_uses_protocol_default() {
        let profile: Profile = serde_json::from_str(r#"{"margins": {"left": 4}}"#).unwrap();
        let g = Geometry::resolve(Some(&profile), Protocol::Zpl).unwrap();
        assert_eq!(g.width_dots, 600);
        assert_eq!(g.margins.left, 4);

        let zero = Profile::with_width(0);
        let g = Geometry::resolve(Some(&zero), Protocol::EscPos).unwrap();
        assert_eq!(g.width_dots, 576);
    }

    #[test]
    fn test_negative_margins_clamp_to_zero() {
        let profile = Profile::with_width(576).margins(-10, -1, -3, -100);
        let g = Geometry::resolve(Some(&profile), Protocol::EscPos).unwrap();
        assert_eq!(g.margins, Margins::default());
    }

    #[test]
    fn test_print_width_never_negative() {
        let profile = Profile::with_width(100).margins(80, 80, 0, 0);
        let g = Geometry::resolve(Some(&profile), Protocol::EscPos).unwrap();
        assert_eq!(g.print_width(), 0);
    }

    #[test]
    fn test_invalid_width_is_error() {
        let negative = Profile::with_width(-576);
        assert!(matches!(
            Geometry::resolve(Some(&negative), Protocol::EscPos),
            Err(PrintcraftError::InvalidProfile(_))
        ));

        let huge = Profile::with_width(70_000);
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_protocol_serde() {
        let p: Protocol = serde_json::from_str(r#""escpos""#).unwrap();
        assert_eq!(p, Protocol::EscPos);
        assert_eq!(Protocol::Zpl.name(), "zpl");
    }
}
