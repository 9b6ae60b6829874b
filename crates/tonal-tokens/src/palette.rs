//! Palette generation — the hue × shade color matrix.
//!
//! Every `(hue, shade)` pair becomes one [`Color`]. Ordering is part of the
//! contract: hues come out in the order supplied, and within each hue the
//! shades do too. Downstream token paths and the dark-mode shade reversal
//! both depend on it.

use tonal_color::{ColorProfile, Conversion, Oklch};
use tracing::debug;

use crate::config::{Hue, Shade};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One generated swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub shade_label: String,
    /// OKLCH lightness as a 0–1 fraction.
    pub lightness: f64,
    /// Effective chroma: zero for grayscale hues.
    pub chroma: f64,
    pub hue_angle: f64,
    /// `oklch(L% C H)` display text.
    pub oklch_text: String,
    pub hex_srgb: String,
    pub hex_p3: String,
    pub clipped_srgb: bool,
    pub clipped_p3: bool,
}

impl Color {
    /// Build a swatch. Pure: the same inputs always give the same swatch.
    #[must_use]
    pub fn new(shade_label: &str, lightness_percent: f64, chroma: f64, hue_angle: f64) -> Self {
        let oklch = Oklch::from_percent(lightness_percent, chroma, hue_angle);
        let Conversion { hex_srgb, hex_p3, clipped_srgb, clipped_p3 } = oklch.convert();
        Self {
            shade_label: shade_label.to_string(),
            lightness: oklch.l,
            chroma: oklch.c,
            hue_angle: oklch.h,
            oklch_text: oklch_text(oklch),
            hex_srgb,
            hex_p3,
            clipped_srgb,
            clipped_p3,
        }
    }

    /// The hex value for the selected profile.
    #[must_use]
    pub fn hex(&self, profile: ColorProfile) -> &str {
        match profile {
            ColorProfile::Srgb => &self.hex_srgb,
            ColorProfile::DisplayP3 => &self.hex_p3,
        }
    }

    /// Whether the color was clipped in the selected profile.
    #[must_use]
    pub const fn clipped(&self, profile: ColorProfile) -> bool {
        match profile {
            ColorProfile::Srgb => self.clipped_srgb,
            ColorProfile::DisplayP3 => self.clipped_p3,
        }
    }
}

/// `oklch(63% 0.21 255)` — three decimals, trailing zeros trimmed.
fn oklch_text(color: Oklch) -> String {
    format!(
        "oklch({}% {} {})",
        trim_decimal(color.l * 100.0),
        trim_decimal(color.c),
        trim_decimal(color.h)
    )
}

fn trim_decimal(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

// ---------------------------------------------------------------------------
// HueSet / Palette
// ---------------------------------------------------------------------------

/// One color family with a swatch at every shade.
#[derive(Debug, Clone, PartialEq)]
pub struct HueSet {
    pub label: String,
    pub hue_angle: f64,
    pub grayscale: bool,
    /// In shade order.
    pub colors: Vec<Color>,
}

impl HueSet {
    #[must_use]
    pub fn color(&self, shade: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.shade_label == shade)
    }
}

/// The full color matrix, in hue order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    pub hues: Vec<HueSet>,
}

impl Palette {
    /// Generate the matrix for `hues × shades`.
    ///
    /// Grayscale hues get zero chroma at every shade regardless of the
    /// shade's configured chroma. Empty input gives an empty palette.
    #[must_use]
    pub fn generate(hues: &[Hue], shades: &[Shade]) -> Self {
        let hues: Vec<HueSet> = if shades.is_empty() {
            Vec::new()
        } else {
            hues.iter()
                .map(|hue| HueSet {
                    label: hue.label.clone(),
                    hue_angle: hue.hue_angle,
                    grayscale: hue.grayscale,
                    colors: shades
                        .iter()
                        .map(|shade| {
                            let chroma = if hue.grayscale { 0.0 } else { shade.chroma };
                            Color::new(&shade.label, shade.lightness, chroma, hue.hue_angle)
                        })
                        .collect(),
                })
                .collect()
        };

        let palette = Self { hues };
        debug!(hues = palette.hues.len(), colors = palette.len(), "generated palette");
        palette
    }

    /// Total number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hues.iter().map(|h| h.colors.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn hue(&self, label: &str) -> Option<&HueSet> {
        self.hues.iter().find(|h| h.label == label)
    }

    #[must_use]
    pub fn color(&self, hue: &str, shade: &str) -> Option<&Color> {
        self.hue(hue)?.color(shade)
    }

    /// Every `(hue, color)` pair in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&HueSet, &Color)> {
        self.hues
            .iter()
            .flat_map(|hue| hue.colors.iter().map(move |color| (hue, color)))
    }

    /// Shade labels in order (taken from the first hue).
    #[must_use]
    pub fn shade_labels(&self) -> Vec<&str> {
        self.hues
            .first()
            .map(|h| h.colors.iter().map(|c| c.shade_label.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Free-function form of [`Palette::generate`].
#[must_use]
pub fn generate(hues: &[Hue], shades: &[Shade]) -> Palette {
    Palette::generate(hues, shades)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn example_shades() -> Vec<Shade> {
        vec![
            Shade::new("0", 100.0, 0.02),
            Shade::new("500", 63.0, 0.21),
            Shade::new("1000", 25.0, 0.02),
        ]
    }

    fn example_hues() -> Vec<Hue> {
        vec![Hue::gray("gray"), Hue::new("blue", 255.0)]
    }

    #[test]
    fn example_has_six_colors() {
        let p = generate(&example_hues(), &example_shades());
        assert_eq!(p.len(), 6);
        assert_eq!(p.iter().count(), 6);
    }

    #[test]
    fn grayscale_forces_zero_chroma() {
        let p = generate(&example_hues(), &example_shades());
        let gray500 = p.color("gray", "500").unwrap();
        assert!(gray500.chroma.abs() < f64::EPSILON);
        for color in &p.hue("gray").unwrap().colors {
            assert!(color.chroma.abs() < f64::EPSILON, "{} has chroma", color.shade_label);
        }
    }

    #[test]
    fn gray_zero_golden() {
        let p = generate(&example_hues(), &example_shades());
        let gray0 = p.color("gray", "0").unwrap();
        assert_eq!(gray0.hex_srgb, "#FFFFFF");
        assert_eq!(gray0.hex_p3, "#FFFFFF");
        assert!(!gray0.clipped_srgb);
        assert_eq!(p.color("gray", "500").unwrap().hex_srgb, "#898989");
        assert_eq!(p.color("gray", "1000").unwrap().hex_srgb, "#222222");
    }

    #[test]
    fn chromatic_goldens() {
        let p = generate(&example_hues(), &example_shades());
        let blue500 = p.color("blue", "500").unwrap();
        assert_eq!(blue500.hex_srgb, "#0086FF");
        assert!(blue500.clipped_srgb);
        assert_eq!(blue500.hex_p3, "#3984FB");
        assert!(!blue500.clipped_p3);
        assert_eq!(p.color("blue", "1000").unwrap().hex_srgb, "#1B222B");
    }

    #[test]
    fn ordering_matches_input() {
        let p = generate(&example_hues(), &example_shades());
        let order: Vec<(&str, &str)> = p
            .iter()
            .map(|(h, c)| (h.label.as_str(), c.shade_label.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("gray", "0"),
                ("gray", "500"),
                ("gray", "1000"),
                ("blue", "0"),
                ("blue", "500"),
                ("blue", "1000"),
            ]
        );
    }

    #[test]
    fn non_numeric_shade_order_is_kept() {
        let shades = vec![Shade::new("b", 80.0, 0.1), Shade::new("a", 40.0, 0.1)];
        let p = generate(&[Hue::new("x", 10.0)], &shades);
        assert_eq!(p.shade_labels(), vec!["b", "a"]);
    }

    #[test]
    fn empty_inputs_give_empty_palette() {
        assert!(generate(&[], &example_shades()).is_empty());
        assert!(generate(&example_hues(), &[]).is_empty());
        assert!(generate(&example_hues(), &[]).hues.is_empty());
    }

    #[test]
    fn oklch_text_format() {
        let p = generate(&example_hues(), &example_shades());
        assert_eq!(p.color("blue", "500").unwrap().oklch_text, "oklch(63% 0.21 255)");
        assert_eq!(p.color("gray", "0").unwrap().oklch_text, "oklch(100% 0 0)");
        assert_eq!(Color::new("x", 12.3456, 0.12345, 33.3).oklch_text, "oklch(12.346% 0.123 33.3)");
    }

    #[test]
    fn lightness_is_a_fraction() {
        let c = Color::new("500", 63.0, 0.21, 255.0);
        assert!((c.lightness - 0.63).abs() < 1e-12);
    }

    #[test]
    fn deterministic() {
        let a = generate(&example_hues(), &example_shades());
        let b = generate(&example_hues(), &example_shades());
        assert_eq!(a, b);
    }

    #[test]
    fn profile_accessors() {
        let c = Color::new("500", 63.0, 0.21, 255.0);
        assert_eq!(c.hex(ColorProfile::Srgb), "#0086FF");
        assert_eq!(c.hex(ColorProfile::DisplayP3), "#3984FB");
        assert!(c.clipped(ColorProfile::Srgb));
    }
}
