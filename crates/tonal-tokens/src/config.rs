//! Generation inputs — the immutable configuration for one pass.
//!
//! Everything the pipeline needs arrives in a single [`Config`] value.
//! Recomputing after an edit means building a new value and calling the
//! pipeline again; nothing observes shared state. Every field has a
//! default, so a TOML file only needs to spell out what differs from the
//! builtin `default` preset.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tonal_color::ColorProfile;

use crate::builtin;
use crate::scope::ScopeSelection;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Palette inputs
// ---------------------------------------------------------------------------

/// A named lightness step, e.g. `"500"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shade {
    /// Opaque label; conventionally numeric.
    pub label: String,
    /// OKLCH lightness in percent, 0–100.
    pub lightness: f64,
    /// OKLCH chroma, >= 0. Ignored for grayscale hues.
    #[serde(default)]
    pub chroma: f64,
}

impl Shade {
    #[must_use]
    pub fn new(label: impl Into<String>, lightness: f64, chroma: f64) -> Self {
        Self { label: label.into(), lightness, chroma }
    }
}

/// A named color family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hue {
    pub label: String,
    /// Hue angle in degrees, 0–360.
    #[serde(default)]
    pub hue_angle: f64,
    /// Force every shade of this hue to zero chroma.
    #[serde(default, alias = "is_grayscale")]
    pub grayscale: bool,
}

impl Hue {
    #[must_use]
    pub fn new(label: impl Into<String>, hue_angle: f64) -> Self {
        Self { label: label.into(), hue_angle, grayscale: false }
    }

    #[must_use]
    pub fn gray(label: impl Into<String>) -> Self {
        Self { label: label.into(), hue_angle: 0.0, grayscale: true }
    }
}

// ---------------------------------------------------------------------------
// Theme inputs
// ---------------------------------------------------------------------------

/// Binds a semantic intent (primary, danger, …) to a hue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentBinding {
    pub name: String,
    pub hue: String,
    /// Overrides [`ThemeConfig::default_shade`] for this intent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_shade: Option<String>,
}

impl IntentBinding {
    #[must_use]
    pub fn new(name: impl Into<String>, hue: impl Into<String>) -> Self {
        Self { name: name.into(), hue: hue.into(), default_shade: None }
    }
}

/// Where the foreground modifier goes relative to its base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnPlacement {
    /// `on-primary`
    #[default]
    Prefix,
    /// `primary-on`
    Suffix,
}

/// Naming of generated groups and collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Prefix marking raw palette variables, e.g. `--blue/500`.
    pub raw_marker: String,
    /// Foreground modifier word.
    pub on_modifier: String,
    pub on_placement: OnPlacement,
    /// Elevation tiers: base, raised, highest.
    pub ground: [String; 3],
    pub stark: String,
    pub black: String,
    pub white: String,
    pub palette_collection: String,
    pub theme_collection: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            raw_marker: "--".into(),
            on_modifier: "on".into(),
            on_placement: OnPlacement::Prefix,
            ground: Self::ground_tiers("ground"),
            stark: "stark".into(),
            black: "black".into(),
            white: "white".into(),
            palette_collection: "Palette".into(),
            theme_collection: "Theme".into(),
        }
    }
}

impl Naming {
    /// Default tier names for a base name: `base`, `base1`, `base2`.
    #[must_use]
    pub fn ground_tiers(base: &str) -> [String; 3] {
        [base.to_string(), format!("{base}1"), format!("{base}2")]
    }

    /// Affixes that turn a group name into its on-color name.
    #[must_use]
    pub fn on_affixes(&self) -> (String, String) {
        match self.on_placement {
            OnPlacement::Prefix => (format!("{}-", self.on_modifier), String::new()),
            OnPlacement::Suffix => (String::new(), format!("-{}", self.on_modifier)),
        }
    }

    /// The on-color name for a group, e.g. `on-primary`.
    #[must_use]
    pub fn on_name(&self, base: &str) -> String {
        let (prefix, suffix) = self.on_affixes();
        format!("{prefix}{base}{suffix}")
    }

    /// Inverse of [`on_name`](Self::on_name).
    #[must_use]
    pub fn strip_on<'a>(&self, name: &'a str) -> Option<&'a str> {
        let (prefix, suffix) = self.on_affixes();
        name.strip_prefix(prefix.as_str())?
            .strip_suffix(suffix.as_str())
            .filter(|base| !base.is_empty())
    }
}

/// Shades of the ground hue backing each elevation tier, per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Hue for grounds and stark references. Defaults to the `neutral`
    /// intent's hue, else the first grayscale hue, else the first hue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<String>,
    pub light: [String; 3],
    pub dark: [String; 3],
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            hue: None,
            light: ["0".into(), "100".into(), "200".into()],
            dark: ["1000".into(), "900".into(), "800".into()],
        }
    }
}

/// Foreground on ground surfaces — the one on-color that is configured
/// rather than always derived.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnGround {
    /// Black or white, chosen by the contrast heuristic.
    #[default]
    Derived,
    Black,
    White,
    /// A literal hex value.
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnGroundConfig {
    pub light: OnGround,
    pub dark: OnGround,
}

/// What `stark` resolves to in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarkRef {
    /// Pure black (light mode) or pure white (dark mode).
    #[default]
    Pure,
    /// A shade of the ground hue.
    Shade(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StarkConfig {
    pub light: StarkRef,
    pub dark: StarkRef,
}

/// Semantic layer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub intents: Vec<IntentBinding>,
    /// Shade the bare intent token points at.
    pub default_shade: String,
    /// Luminance threshold (percent) above which on-colors turn black.
    pub contrast_threshold: f64,
    /// Groups whose name starts with this are left out of the output.
    pub exclusion_prefix: String,
    pub profile: ColorProfile,
    pub palette_scopes: ScopeSelection,
    /// Opacity grammar per group name, e.g. `primary = "0-30,35"`.
    pub alpha: BTreeMap<String, String>,
    pub naming: Naming,
    pub ground: GroundConfig,
    pub on_ground: OnGroundConfig,
    pub stark: StarkConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            intents: builtin::default_intents(),
            default_shade: "500".into(),
            contrast_threshold: 50.0,
            exclusion_prefix: "#".into(),
            profile: ColorProfile::Srgb,
            palette_scopes: ScopeSelection::All,
            alpha: BTreeMap::new(),
            naming: Naming::default(),
            ground: GroundConfig::default(),
            on_ground: OnGroundConfig::default(),
            stark: StarkConfig::default(),
        }
    }
}

impl ThemeConfig {
    /// Whether a group is dropped by the exclusion filter.
    #[must_use]
    pub fn is_excluded(&self, group: &str) -> bool {
        !self.exclusion_prefix.is_empty() && group.starts_with(&self.exclusion_prefix)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Everything one generation pass reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shades: Vec<Shade>,
    pub hues: Vec<Hue>,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shades: builtin::default_shades(),
            hues: builtin::default_hues(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on syntax or type errors.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Toml`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
