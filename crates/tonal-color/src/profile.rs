// SPDX-License-Identifier: MIT
//
// Target display profiles.
//
// Both profiles share the sRGB transfer curve; only the primaries differ.
// The matrices below take Oklab's LMS cone response (after undoing the
// cube root) straight to linear RGB in the profile's primaries. The P3
// matrix is the product  XYZ→P3 · linear-sRGB→XYZ · LMS→linear-sRGB,
// precomputed to ten decimals like Ottosson's original sRGB one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 3×3 row-major matrix.
pub type Matrix3 = [[f64; 3]; 3];

/// LMS → linear sRGB (Björn Ottosson, <https://bottosson.github.io/posts/oklab/>).
const LMS_TO_LINEAR_SRGB: Matrix3 = [
    [4.076_741_662_1, -3.307_711_591_3, 0.230_969_929_2],
    [-1.268_438_004_6, 2.609_757_401_1, -0.341_319_396_5],
    [-0.004_196_086_3, -0.703_418_614_7, 1.707_614_701_0],
];

/// LMS → linear Display-P3 (D65 white point).
const LMS_TO_LINEAR_P3: Matrix3 = [
    [3.127_768_987_2, -2.257_135_796_2, 0.129_366_809_0],
    [-1.091_009_047_8, 2.413_331_758_7, -0.322_322_710_8],
    [-0.026_010_813_0, -0.508_041_325_9, 1.534_052_138_9],
];

/// The color space a generated hex value is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorProfile {
    /// Standard sRGB — the web default.
    #[default]
    Srgb,
    /// Display P3 — wide gamut, same transfer curve as sRGB.
    DisplayP3,
}

impl ColorProfile {
    /// Every supported profile, in display order.
    pub const ALL: [Self; 2] = [Self::Srgb, Self::DisplayP3];

    /// Matrix taking linear LMS to linear RGB in this profile's primaries.
    #[inline]
    #[must_use]
    pub const fn lms_to_linear(self) -> &'static Matrix3 {
        match self {
            Self::Srgb => &LMS_TO_LINEAR_SRGB,
            Self::DisplayP3 => &LMS_TO_LINEAR_P3,
        }
    }

    /// Short machine name, matching the serde representation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::DisplayP3 => "display-p3",
        }
    }
}

impl fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
