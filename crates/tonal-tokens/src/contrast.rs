//! Foreground selection for on-color tokens.
//!
//! The decision is a deliberately simple heuristic: a Rec. 709-weighted sum
//! of the *gamma-encoded* channels, compared against a threshold. It is not
//! WCAG relative luminance (no linearization) and it is not APCA. Existing
//! token files were produced with exactly this formula, so swapping in a
//! more accurate contrast model would silently flip on-colors near the
//! threshold. Keep it as is unless the output format is meant to change.

use std::fmt;

use tonal_color::Rgb8;

/// The only two foregrounds the heuristic produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Foreground {
    Black,
    White,
}

impl Foreground {
    #[must_use]
    pub const fn rgb(self) -> Rgb8 {
        match self {
            Self::Black => Rgb8::BLACK,
            Self::White => Rgb8::WHITE,
        }
    }

    /// `#000000` or `#FFFFFF`.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Black => "#000000",
            Self::White => "#FFFFFF",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Foreground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weighted sum of gamma-encoded channels:
///   L = 0.2126 * R + 0.7152 * G + 0.0722 * B
///
/// Returns a value in [0.0, 1.0].
#[must_use]
pub fn luminance_of(rgb: Rgb8) -> f64 {
    let (r, g, b) = rgb.to_unit();
    0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
}

/// [`luminance_of`] for a hex string. `None` if it does not parse.
#[must_use]
pub fn luminance(hex: &str) -> Option<f64> {
    Rgb8::parse(hex).map(luminance_of)
}

/// Pick black or white text for a background.
///
/// Black when the luminance is strictly above `threshold_percent / 100`,
/// white otherwise. The threshold is clamped to `[0, 100]`. A background
/// that does not parse is treated as black (luminance 0).
#[must_use]
pub fn choose_foreground(background_hex: &str, threshold_percent: f64) -> Foreground {
    let threshold = if threshold_percent.is_nan() {
        0.0
    } else {
        threshold_percent.clamp(0.0, 100.0) / 100.0
    };
    let lum = luminance(background_hex).unwrap_or(0.0);
    if lum > threshold { Foreground::Black } else { Foreground::White }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
