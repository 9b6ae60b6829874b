//! Token tree — palette and theme collections from a generated palette.
//!
//! The palette collection is a flat mirror of the color matrix. The theme
//! collection is the semantic layer on top of it, with a light and a dark
//! value per token:
//!
//! ```text
//! primary                     alias --blue/S[k]      dark: S[n-1-k]
//! primary/<alpha>             #RRGGBBAA
//! primary/shade/<S[i]>        alias --blue/S[i]      dark: S[n-1-i]
//! primary/shade/<S[i]>/<a>    #RRGGBBAA
//! on-primary[/…]              black or white against the matching token
//! ground, ground1, ground2    fixed shades of the ground hue, no reversal
//! on-ground[…]                derived, black, white or a custom hex
//! stark, on-stark             black/white (or ground shades), inverted
//! black, white                constant
//! ```
//!
//! References that don't resolve never fail the build. The affected group
//! is skipped with a warning (or, for a missing default shade, the middle
//! shade stands in).

use tonal_color::Rgb8;
use tracing::{debug, warn};

use crate::alpha::AlphaTable;
use crate::config::{IntentBinding, OnGround, StarkRef, ThemeConfig};
use crate::contrast::{Foreground, choose_foreground};
use crate::palette::{HueSet, Palette};
use crate::token::{
    Modes, Role, Segment, Token, TokenCollection, TokenPath, TokenValue, TokenValues,
};

/// Literal segment separating shade labels from alpha siblings.
pub const SHADE_SEGMENT: &str = "shade";

/// Both generated collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTree {
    pub palette: TokenCollection,
    pub theme: TokenCollection,
}

impl TokenTree {
    /// Palette first: theme aliases point into it.
    #[must_use]
    pub fn into_collections(self) -> Vec<TokenCollection> {
        vec![self.palette, self.theme]
    }
}

/// Path of a palette token, `[<marker><hue>, <shade>]`.
#[must_use]
pub fn palette_path(marker: &str, hue: &str, shade: &str) -> TokenPath {
    TokenPath::new(vec![
        Segment::affixed(Role::Hue, hue, marker, ""),
        Segment::named(Role::Shade, shade),
    ])
}

/// A resolved value in one mode: what gets written, plus the concrete
/// color it stands for (alpha variants and contrast need the latter).
#[derive(Debug, Clone)]
struct Swatch {
    value: TokenValue,
    hex: String,
}

impl Swatch {
    fn color(hex: &str) -> Self {
        Self { value: TokenValue::Color(hex.to_string()), hex: hex.to_string() }
    }

    fn foreground(fg: Foreground) -> Self {
        Self::color(fg.hex())
    }
}

/// One token to emit relative to a group root.
struct Entry {
    tail: Vec<Segment>,
    light: Swatch,
    dark: Swatch,
}

// ---------------------------------------------------------------------------
// TokenTreeBuilder
// ---------------------------------------------------------------------------

/// Compiles a [`Palette`] and a [`ThemeConfig`] into collections.
pub struct TokenTreeBuilder<'a> {
    palette: &'a Palette,
    theme: &'a ThemeConfig,
    alpha: AlphaTable,
}

impl<'a> TokenTreeBuilder<'a> {
    #[must_use]
    pub fn new(palette: &'a Palette, theme: &'a ThemeConfig) -> Self {
        Self { palette, theme, alpha: AlphaTable::from_specs(&theme.alpha) }
    }

    #[must_use]
    pub fn build(&self) -> TokenTree {
        TokenTree { palette: self.palette_collection(), theme: self.theme_collection() }
    }

    /// One token per `(hue, shade)`.
    #[must_use]
    pub fn palette_collection(&self) -> TokenCollection {
        let naming = &self.theme.naming;
        let profile = self.theme.profile;
        let mut out = TokenCollection::new(&naming.palette_collection, Modes::None);

        for (hue, color) in self.palette.iter() {
            let path = palette_path(&naming.raw_marker, &hue.label, &color.shade_label);
            let token = Token::new(
                path,
                &hue.label,
                TokenValues::Single(TokenValue::Color(color.hex(profile).to_string())),
            )
            .with_scopes(self.theme.palette_scopes)
            .with_description(&color.oklch_text);
            out.push(token);
        }

        out.exclude_groups(|group| self.theme.is_excluded(group));
        debug!(tokens = out.len(), excluded = out.excluded().len(), "built palette collection");
        out
    }

    /// The semantic layer with light and dark values.
    #[must_use]
    pub fn theme_collection(&self) -> TokenCollection {
        let mut out = TokenCollection::new(&self.theme.naming.theme_collection, Modes::LightDark);

        for binding in &self.theme.intents {
            self.intent(&mut out, binding);
        }
        let ground = self.ground_hue();
        if let Some(ground) = ground {
            self.grounds(&mut out, ground);
        }
        self.stark(&mut out, ground);
        self.constants(&mut out);

        out.exclude_groups(|group| self.theme.is_excluded(group));
        debug!(tokens = out.len(), excluded = out.excluded().len(), "built theme collection");
        out
    }

    // ------------------------------------------------------------------
    // Resolution helpers
    // ------------------------------------------------------------------

    /// A hue usable as an alias target: present and not excluded.
    fn target_hue(&self, label: &str) -> Option<&'a HueSet> {
        if self.theme.is_excluded(label) {
            return None;
        }
        self.palette.hue(label).filter(|h| !h.colors.is_empty())
    }

    /// Alias to a palette color plus the color it resolves to.
    fn alias(&self, hue: &HueSet, index: usize) -> Swatch {
        let naming = &self.theme.naming;
        let color = &hue.colors[index];
        let path = palette_path(&naming.raw_marker, &hue.label, &color.shade_label);
        Swatch {
            value: TokenValue::Alias {
                collection: naming.palette_collection.clone(),
                name: path.render(),
            },
            hex: color.hex(self.theme.profile).to_string(),
        }
    }

    fn alias_shade(&self, hue: &HueSet, shade: &str) -> Option<Swatch> {
        let index = hue.colors.iter().position(|c| c.shade_label == shade)?;
        Some(self.alias(hue, index))
    }

    fn foreground(&self, background: &Swatch) -> Swatch {
        Swatch::foreground(choose_foreground(&background.hex, self.theme.contrast_threshold))
    }

    /// Hue behind grounds and stark: configured, else the `neutral`
    /// intent's hue, else the first grayscale hue, else the first hue.
    fn ground_hue(&self) -> Option<&'a HueSet> {
        if let Some(label) = &self.theme.ground.hue {
            let hue = self.target_hue(label);
            if hue.is_none() {
                warn!(hue = %label, "ground hue not in palette; skipping grounds");
            }
            return hue;
        }
        self.theme
            .intents
            .iter()
            .find(|b| b.name == "neutral")
            .and_then(|b| self.target_hue(&b.hue))
            .or_else(|| {
                self.palette
                    .hues
                    .iter()
                    .find(|h| h.grayscale)
                    .and_then(|h| self.target_hue(&h.label))
            })
            .or_else(|| self.palette.hues.first().and_then(|h| self.target_hue(&h.label)))
    }

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    /// Push every entry under `root`, each followed by its alpha variants.
    fn emit(
        &self,
        out: &mut TokenCollection,
        root: &Segment,
        group: &str,
        alpha_key: &str,
        entries: &[Entry],
    ) {
        let alphas = self.alpha.get(alpha_key);
        for entry in entries {
            let mut segments = vec![root.clone()];
            segments.extend(entry.tail.iter().cloned());
            let path = TokenPath::new(segments);

            out.push(Token::new(
                path.clone(),
                group,
                TokenValues::Modes {
                    light: entry.light.value.clone(),
                    dark: entry.dark.value.clone(),
                },
            ));

            for alpha in alphas {
                let light = Rgb8::parse(&entry.light.hex);
                let dark = Rgb8::parse(&entry.dark.hex);
                let (Some(light), Some(dark)) = (light, dark) else {
                    debug!(token = %path, "no concrete color; skipping alpha variants");
                    break;
                };
                out.push(Token::new(
                    path.child(Segment::literal(alpha.to_string())),
                    group,
                    TokenValues::Modes {
                        light: TokenValue::Color(light.to_hex_with_alpha(alpha)),
                        dark: TokenValue::Color(dark.to_hex_with_alpha(alpha)),
                    },
                ));
            }
        }
    }

    /// Intent tokens and their on-colors.
    fn intent(&self, out: &mut TokenCollection, binding: &IntentBinding) {
        let Some(hue) = self.target_hue(&binding.hue) else {
            warn!(intent = %binding.name, hue = %binding.hue, "intent bound to unknown hue; skipped");
            return;
        };
        let n = hue.colors.len();
        let default_shade = binding.default_shade.as_deref().unwrap_or(&self.theme.default_shade);
        let k = hue.colors.iter().position(|c| c.shade_label == default_shade).unwrap_or_else(|| {
            let middle = n / 2;
            warn!(
                intent = %binding.name,
                shade = default_shade,
                fallback = %hue.colors[middle].shade_label,
                "default shade not found; using middle shade"
            );
            middle
        });

        let mut entries = Vec::with_capacity(n + 1);
        entries.push(Entry {
            tail: Vec::new(),
            light: self.alias(hue, k),
            dark: self.alias(hue, n - 1 - k),
        });
        for (i, color) in hue.colors.iter().enumerate() {
            entries.push(Entry {
                tail: vec![
                    Segment::literal(SHADE_SEGMENT),
                    Segment::named(Role::Shade, &color.shade_label),
                ],
                light: self.alias(hue, i),
                dark: self.alias(hue, n - 1 - i),
            });
        }

        let root = Segment::named(Role::Intent, &binding.name);
        self.emit(out, &root, &binding.name, &binding.name, &entries);

        let on_entries: Vec<Entry> = entries
            .iter()
            .map(|e| Entry {
                tail: e.tail.clone(),
                light: self.foreground(&e.light),
                dark: self.foreground(&e.dark),
            })
            .collect();
        let naming = &self.theme.naming;
        let (prefix, suffix) = naming.on_affixes();
        let on_root = Segment::affixed(Role::Intent, &binding.name, prefix, suffix);
        self.emit(out, &on_root, &binding.name, &naming.on_name(&binding.name), &on_entries);
    }

    /// Ground tiers and their on-colors.
    fn grounds(&self, out: &mut TokenCollection, hue: &HueSet) {
        let naming = &self.theme.naming;
        let base = &naming.ground[0];
        let on_base = naming.on_name(base);
        let on = &self.theme.on_ground;

        for (tier, name) in naming.ground.iter().enumerate() {
            let light_shade = &self.theme.ground.light[tier];
            let dark_shade = &self.theme.ground.dark[tier];
            let (Some(light), Some(dark)) =
                (self.alias_shade(hue, light_shade), self.alias_shade(hue, dark_shade))
            else {
                warn!(
                    tier = %name,
                    hue = %hue.label,
                    light = %light_shade,
                    dark = %dark_shade,
                    "ground shade missing; tier skipped"
                );
                continue;
            };

            let on_light = self.on_ground(&on.light, &light);
            let on_dark = self.on_ground(&on.dark, &dark);
            let entry = Entry { tail: Vec::new(), light, dark };
            self.emit(out, &Segment::literal(name), name, base, &[entry]);

            let on_entry = Entry { tail: Vec::new(), light: on_light, dark: on_dark };
            self.emit(out, &Segment::literal(naming.on_name(name)), name, &on_base, &[on_entry]);
        }
    }

    fn on_ground(&self, choice: &OnGround, background: &Swatch) -> Swatch {
        match choice {
            OnGround::Derived => self.foreground(background),
            OnGround::Black => Swatch::foreground(Foreground::Black),
            OnGround::White => Swatch::foreground(Foreground::White),
            OnGround::Custom(hex) => match Rgb8::parse(hex) {
                Some(rgb) => Swatch::color(&rgb.to_hex()),
                None => {
                    warn!(value = %hex, "custom on-ground color does not parse; using it verbatim");
                    Swatch::color(hex)
                }
            },
        }
    }

    /// `stark` and its inverse `on-stark`.
    fn stark(&self, out: &mut TokenCollection, ground: Option<&HueSet>) {
        let naming = &self.theme.naming;
        let light = self.stark_value(&self.theme.stark.light, ground, Foreground::Black);
        let dark = self.stark_value(&self.theme.stark.dark, ground, Foreground::White);

        let stark = Entry { tail: Vec::new(), light: light.clone(), dark: dark.clone() };
        self.emit(out, &Segment::literal(&naming.stark), &naming.stark, &naming.stark, &[stark]);

        let on_name = naming.on_name(&naming.stark);
        let on_stark = Entry { tail: Vec::new(), light: dark, dark: light };
        self.emit(out, &Segment::literal(&on_name), &naming.stark, &on_name, &[on_stark]);
    }

    fn stark_value(&self, choice: &StarkRef, ground: Option<&HueSet>, pure: Foreground) -> Swatch {
        match choice {
            StarkRef::Pure => Swatch::foreground(pure),
            StarkRef::Shade(shade) => ground
                .and_then(|hue| self.alias_shade(hue, shade))
                .unwrap_or_else(|| {
                    warn!(shade = %shade, "stark shade not in ground hue; using {pure}");
                    Swatch::foreground(pure)
                }),
        }
    }

    /// `black` and `white`, identical in both modes.
    fn constants(&self, out: &mut TokenCollection) {
        let naming = &self.theme.naming;
        for (name, fg) in [(&naming.black, Foreground::Black), (&naming.white, Foreground::White)] {
            let entry = Entry {
                tail: Vec::new(),
                light: Swatch::foreground(fg),
                dark: Swatch::foreground(fg),
            };
            self.emit(out, &Segment::literal(name), name, name, &[entry]);
        }
    }
}

/// Build both collections in one call.
#[must_use]
pub fn build(palette: &Palette, theme: &ThemeConfig) -> TokenTree {
    TokenTreeBuilder::new(palette, theme).build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
