// SPDX-License-Identifier: MIT
//
// OKLCH → display color conversion.
//
// Variable names (l, c, h, a, b, m, s) follow Ottosson's Oklab notes.
#![allow(clippy::many_single_char_names)]
//
// Conversion pipeline:
//
//   OKLCH → Oklab → LMS (cubed) → linear RGB (sRGB or P3 primaries)
//         → gamut test → clamp → sRGB transfer curve → 8-bit → hex
//
// The gamut test happens on the *linear* channels, before encoding. A
// color that fails it is still encoded (each channel clamped on its own,
// which can shift the hue slightly) so callers always get something
// displayable, but the `clipped` flag tells them it is not exact.
//
// All math is f64. Exported token files must be byte-stable, and f32
// rounding is close enough to the 8-bit quantization boundaries that it
// would occasionally flip a channel by one.

use std::fmt;

use crate::hex::Rgb8;
use crate::profile::{ColorProfile, Matrix3};

/// Linear channels may overshoot `[0, 1]` by this much and still count as
/// in gamut. Pure white lands on 1.0 ± a few ULPs.
const GAMUT_EPSILON: f64 = 1e-7;

// ─── Oklch ───────────────────────────────────────────────────────────────────

/// A color in OKLCH space.
///
/// OKLCH is the cylindrical form of Björn Ottosson's Oklab: perceptually
/// uniform lightness, chroma and hue, so equal numerical steps look like
/// equal visual steps. That property is what lets a palette be described
/// by a handful of lightness/chroma pairs and still come out even.
#[derive(Clone, Copy, PartialEq)]
pub struct Oklch {
    /// Lightness: 0.0 (black) to 1.0 (white).
    pub l: f64,

    /// Chroma: 0.0 (gray) upward. ~0.37 is the most vivid sRGB can show.
    pub c: f64,

    /// Hue angle in degrees, normalized to `[0, 360)`.
    pub h: f64,
}

impl Oklch {
    /// Create a color from OKLCH values, degrading out-of-range input.
    ///
    /// Lightness is clamped to `[0, 1]`, chroma to `>= 0`, and the hue is
    /// wrapped into `[0, 360)`. Non-finite values become zero.
    #[must_use]
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self {
            l: finite_or_zero(l).clamp(0.0, 1.0),
            c: finite_or_zero(c).max(0.0),
            h: normalize_hue(finite_or_zero(h)),
        }
    }

    /// Create a color with lightness given in percent (0–100), the way
    /// shades are configured.
    #[must_use]
    pub fn from_percent(lightness: f64, chroma: f64, hue: f64) -> Self {
        Self::new(lightness / 100.0, chroma, hue)
    }

    /// Pure black.
    pub const BLACK: Self = Self { l: 0.0, c: 0.0, h: 0.0 };

    /// Linear RGB in the given profile's primaries. Not clamped.
    #[must_use]
    pub fn to_linear(self, profile: ColorProfile) -> (f64, f64, f64) {
        let (a, b) = oklch_to_oklab_ab(self.c, self.h);
        let (l, m, s) = oklab_to_lms(self.l, a, b);
        apply(profile.lms_to_linear(), l, m, s)
    }

    /// Whether every linear channel lies in `[0, 1]` for `profile`.
    #[must_use]
    pub fn in_gamut(self, profile: ColorProfile) -> bool {
        let (r, g, b) = self.to_linear(profile);
        channel_in_gamut(r) && channel_in_gamut(g) && channel_in_gamut(b)
    }

    /// Encode for `profile`, returning the 8-bit color and whether it was
    /// clipped to fit.
    #[must_use]
    pub fn encode(self, profile: ColorProfile) -> (Rgb8, bool) {
        let (r, g, b) = self.to_linear(profile);
        let clipped = !(channel_in_gamut(r) && channel_in_gamut(g) && channel_in_gamut(b));
        let rgb = Rgb8::from_unit(
            linear_to_gamma(r.clamp(0.0, 1.0)),
            linear_to_gamma(g.clamp(0.0, 1.0)),
            linear_to_gamma(b.clamp(0.0, 1.0)),
        );
        (rgb, clipped)
    }

    /// Run the full conversion for both profiles.
    #[must_use]
    pub fn convert(self) -> Conversion {
        let (srgb, clipped_srgb) = self.encode(ColorProfile::Srgb);
        let (p3, clipped_p3) = self.encode(ColorProfile::DisplayP3);
        Conversion {
            hex_srgb: srgb.to_hex(),
            hex_p3: p3.to_hex(),
            clipped_srgb,
            clipped_p3,
        }
    }
}

impl fmt::Debug for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oklch({:.4}, {:.4}, {:.1})", self.l, self.c, self.h)
    }
}

impl Default for Oklch {
    /// Default is black.
    fn default() -> Self {
        Self::BLACK
    }
}

// ─── Conversion ──────────────────────────────────────────────────────────────

/// Display encodings of one OKLCH color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conversion {
    /// `#RRGGBB` in sRGB.
    pub hex_srgb: String,
    /// `#RRGGBB` in Display-P3.
    pub hex_p3: String,
    /// The color lies outside sRGB and was clamped.
    pub clipped_srgb: bool,
    /// The color lies outside Display-P3 and was clamped.
    pub clipped_p3: bool,
}

impl Conversion {
    /// The hex value for the selected profile.
    #[must_use]
    pub fn hex_for(&self, profile: ColorProfile) -> &str {
        match profile {
            ColorProfile::Srgb => &self.hex_srgb,
            ColorProfile::DisplayP3 => &self.hex_p3,
        }
    }

    /// The clip flag for the selected profile.
    #[must_use]
    pub const fn clipped_for(&self, profile: ColorProfile) -> bool {
        match profile {
            ColorProfile::Srgb => self.clipped_srgb,
            ColorProfile::DisplayP3 => self.clipped_p3,
        }
    }
}

/// Convert an OKLCH color to its sRGB and Display-P3 encodings.
///
/// `lightness` is in percent (0–100), `chroma` is absolute, `hue` in
/// degrees. Pure and deterministic: identical input always produces
/// identical output. Out-of-range values degrade (see [`Oklch::new`]).
#[must_use]
pub fn convert(lightness: f64, chroma: f64, hue: f64) -> Conversion {
    Oklch::from_percent(lightness, chroma, hue).convert()
}

// ─── Color Space Math ────────────────────────────────────────────────────────
//
// Oklab by Björn Ottosson. Reference: https://bottosson.github.io/posts/oklab/

#[inline]
const fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Normalize a hue angle to the range [0, 360).
#[inline]
fn normalize_hue(h: f64) -> f64 {
    let h = h % 360.0;
    if h < 0.0 { h + 360.0 } else { h }
}

#[inline]
fn channel_in_gamut(v: f64) -> bool {
    (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&v)
}

/// Convert OKLCH chroma and hue to Oklab a, b components.
#[inline]
fn oklch_to_oklab_ab(c: f64, h: f64) -> (f64, f64) {
    let h_rad = h.to_radians();
    (c * h_rad.cos(), c * h_rad.sin())
}

/// Convert Oklab (L, a, b) to linear LMS cone response.
#[inline]
fn oklab_to_lms(l_ok: f64, a: f64, b: f64) -> (f64, f64, f64) {
    // Oklab → LMS (cube roots)
    let l_ = 0.215_803_757_3f64.mul_add(b, 0.396_337_777_4f64.mul_add(a, l_ok));
    let m_ = 0.063_854_172_8f64.mul_add(-b, 0.105_561_345_8f64.mul_add(-a, l_ok));
    let s_ = 1.291_485_548_0f64.mul_add(-b, 0.089_484_177_5f64.mul_add(-a, l_ok));

    // Undo cube root
    (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_)
}

/// Multiply a column vector by a row-major 3×3 matrix.
#[inline]
fn apply(m: &Matrix3, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let row = |r: &[f64; 3]| r[2].mul_add(z, r[0].mul_add(x, r[1] * y));
    (row(&m[0]), row(&m[1]), row(&m[2]))
}

/// Convert a single linear component to gamma-encoded form using the sRGB
/// transfer function. Display-P3 uses the same curve.
#[inline]
#[must_use]
pub fn linear_to_gamma(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f64.mul_add(c.powf(1.0 / 2.4), -0.055)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
