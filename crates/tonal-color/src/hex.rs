// SPDX-License-Identifier: MIT
//
// Hex encoding and decoding.
//
// Output is always uppercase `#RRGGBB` (or `#RRGGBBAA` when an opacity is
// attached). Parsing is lenient about case and the leading `#`, and also
// accepts the `#RGB` shorthand, because hex values arrive from hand-written
// configuration as well as from our own exports.

use std::fmt;

/// An 8-bit-per-channel display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantize gamma-encoded channels in `[0, 1]`. Values outside the
    /// range are clamped first.
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Channels normalized back to `[0, 1]`.
    #[must_use]
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// `#RRGGBB`, uppercase.
    #[must_use]
    pub fn to_hex(self) -> String {
        let Self { r, g, b } = self;
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// `#RRGGBBAA`, uppercase, with the opacity given in percent.
    ///
    /// The percentage is clamped to `[0, 100]` before quantizing.
    #[must_use]
    pub fn to_hex_with_alpha(self, alpha_percent: u8) -> String {
        let Self { r, g, b } = self;
        let a = to_u8(f64::from(alpha_percent.min(100)) / 100.0);
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    ///
    /// Any alpha component is accepted but discarded. Returns `None` for
    /// anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self::new(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 | 8 => {
                if bytes.len() == 8 {
                    parse_hex_byte(&bytes[6..8])?;
                }
                let r = parse_hex_byte(&bytes[0..2])?;
                let g = parse_hex_byte(&bytes[2..4])?;
                let b = parse_hex_byte(&bytes[4..6])?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Attach an opacity to an existing hex value.
///
/// Returns `None` when `hex` does not parse.
#[must_use]
pub fn with_alpha(hex: &str, alpha_percent: u8) -> Option<String> {
    Rgb8::parse(hex).map(|rgb| rgb.to_hex_with_alpha(alpha_percent))
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Convert a float (0.0–1.0) to a u8 (0–255), rounding half away from zero.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.5 before truncation.
    v.clamp(0.0, 1.0).mul_add(255.0, 0.5).min(255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_uppercase() {
        assert_eq!(Rgb8::new(0xc8, 0x64, 0x32).to_hex(), "#C86432");
    }

    #[test]
    fn unit_extremes() {
        assert_eq!(Rgb8::from_unit(0.0, 0.0, 0.0), Rgb8::BLACK);
        assert_eq!(Rgb8::from_unit(1.0, 1.0, 1.0), Rgb8::WHITE);
    }

    #[test]
    fn unit_clamps_out_of_range() {
        assert_eq!(Rgb8::from_unit(-0.3, 1.7, 0.5), Rgb8::new(0, 255, 128));
    }

    #[test]
    fn rounds_to_nearest() {
        // 0.5 * 255 = 127.5 → 128; 0.498 * 255 = 126.99 → 127
        assert_eq!(Rgb8::from_unit(0.5, 0.498, 0.0), Rgb8::new(128, 127, 0));
    }

    #[test]
    fn alpha_suffix() {
        let black = Rgb8::BLACK;
        assert_eq!(black.to_hex_with_alpha(0), "#00000000");
        assert_eq!(black.to_hex_with_alpha(50), "#00000080");
        assert_eq!(black.to_hex_with_alpha(100), "#000000FF");
        assert_eq!(black.to_hex_with_alpha(250), "#000000FF");
    }

    #[test]
    fn parse_forms() {
        assert_eq!(Rgb8::parse("#ff8000"), Some(Rgb8::new(255, 128, 0)));
        assert_eq!(Rgb8::parse("FF8000"), Some(Rgb8::new(255, 128, 0)));
        assert_eq!(Rgb8::parse("#f80"), Some(Rgb8::new(255, 136, 0)));
        assert_eq!(Rgb8::parse("#FF800080"), Some(Rgb8::new(255, 128, 0)));
    }

    #[test]
    fn parse_invalid() {
        assert!(Rgb8::parse("xyz").is_none());
        assert!(Rgb8::parse("#12345").is_none());
        assert!(Rgb8::parse("").is_none());
        assert!(Rgb8::parse("#GG0000").is_none());
        assert!(Rgb8::parse("#FF0000ZZ").is_none());
    }

    #[test]
    fn with_alpha_roundtrips_through_parse() {
        assert_eq!(with_alpha("#0086ff", 10).as_deref(), Some("#0086FF1A"));
        assert!(with_alpha("blue", 10).is_none());
    }
}
