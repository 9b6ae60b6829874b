// SPDX-License-Identifier: MIT
//
// tonal-color — OKLCH conversion engine for tonal.
//
// Everything downstream of the palette generator is built on the values
// this crate produces, so it is deliberately small and pure: one OKLCH
// triple in, two display encodings out (sRGB and Display-P3), each with
// a flag saying whether the color had to be clipped to fit the gamut.
// No caching, no global state. The same input always yields the same
// bytes, which is what makes exported token files reproducible.

pub mod color;
pub mod hex;
pub mod profile;

pub use color::{Conversion, Oklch, convert};
pub use hex::Rgb8;
pub use profile::ColorProfile;
