//! Named preset configurations — ready-to-use starting points.
//!
//! Each preset is a complete [`Config`]: a shade ladder, a set of hues and
//! the default semantic layer. Presets are plain data; callers tweak the
//! returned value rather than mutating anything shared.

use crate::config::{Config, GroundConfig, Hue, IntentBinding, Shade, ThemeConfig};

/// Eleven-step ladder from near-white to near-black. Chroma peaks in the
/// middle where the gamut is widest.
#[must_use]
pub fn default_shades() -> Vec<Shade> {
    vec![
        Shade::new("0", 99.0, 0.01),
        Shade::new("100", 95.0, 0.03),
        Shade::new("200", 89.0, 0.06),
        Shade::new("300", 81.0, 0.10),
        Shade::new("400", 72.0, 0.15),
        Shade::new("500", 63.0, 0.18),
        Shade::new("600", 54.0, 0.17),
        Shade::new("700", 45.0, 0.14),
        Shade::new("800", 36.0, 0.10),
        Shade::new("900", 27.0, 0.06),
        Shade::new("1000", 18.0, 0.03),
    ]
}

#[must_use]
pub fn default_hues() -> Vec<Hue> {
    vec![
        Hue::gray("gray"),
        Hue::new("red", 25.0),
        Hue::new("orange", 55.0),
        Hue::new("yellow", 90.0),
        Hue::new("green", 145.0),
        Hue::new("teal", 185.0),
        Hue::new("blue", 255.0),
        Hue::new("purple", 300.0),
    ]
}

#[must_use]
pub fn default_intents() -> Vec<IntentBinding> {
    vec![
        IntentBinding::new("primary", "blue"),
        IntentBinding::new("danger", "red"),
        IntentBinding::new("warning", "orange"),
        IntentBinding::new("success", "green"),
        IntentBinding::new("neutral", "gray"),
    ]
}

fn compact_shades() -> Vec<Shade> {
    vec![
        Shade::new("0", 98.0, 0.01),
        Shade::new("250", 84.0, 0.09),
        Shade::new("500", 63.0, 0.18),
        Shade::new("750", 40.0, 0.12),
        Shade::new("1000", 18.0, 0.03),
    ]
}

/// Look up a builtin preset by name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_config(name: &str) -> Option<Config> {
    Some(match name {
        "default" => Config::default(),
        "compact" => Config {
            shades: compact_shades(),
            theme: ThemeConfig {
                ground: GroundConfig {
                    hue: None,
                    light: ["0".into(), "250".into(), "500".into()],
                    dark: ["1000".into(), "750".into(), "500".into()],
                },
                ..ThemeConfig::default()
            },
            ..Config::default()
        },
        "mono" => Config {
            hues: vec![Hue::gray("gray")],
            theme: ThemeConfig {
                intents: vec![
                    IntentBinding::new("primary", "gray"),
                    IntentBinding::new("neutral", "gray"),
                ],
                ..ThemeConfig::default()
            },
            ..Config::default()
        },
        _ => return None,
    })
}

/// List all available preset names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["default", "compact", "mono"]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_resolve() {
        for name in builtin_names() {
            assert!(builtin_config(name).is_some(), "Builtin '{name}' failed to resolve");
        }
    }

    #[test]
    fn unknown_returns_none() {
        assert!(builtin_config("nonexistent").is_none());
    }

    #[test]
    fn default_shade_is_present_in_every_preset() {
        for name in builtin_names() {
            let config = builtin_config(name).unwrap();
            let shade = &config.theme.default_shade;
            assert!(
                config.shades.iter().any(|s| &s.label == shade),
                "'{name}' lacks default shade {shade}"
            );
        }
    }

    #[test]
    fn intents_reference_existing_hues() {
        for name in builtin_names() {
            let config = builtin_config(name).unwrap();
            for intent in &config.theme.intents {
                assert!(
                    config.hues.iter().any(|h| h.label == intent.hue),
                    "'{name}': intent {} bound to unknown hue {}",
                    intent.name,
                    intent.hue
                );
            }
        }
    }

    #[test]
    fn ground_shades_exist() {
        for name in builtin_names() {
            let config = builtin_config(name).unwrap();
            let ground = &config.theme.ground;
            for label in ground.light.iter().chain(&ground.dark) {
                assert!(
                    config.shades.iter().any(|s| &s.label == label),
                    "'{name}': ground shade {label} missing"
                );
            }
        }
    }

    #[test]
    fn default_shades_are_ordered_light_to_dark() {
        let shades = default_shades();
        assert_eq!(shades.len(), 11);
        assert!(shades.windows(2).all(|w| w[0].lightness > w[1].lightness));
    }
}
