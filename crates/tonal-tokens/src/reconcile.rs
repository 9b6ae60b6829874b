//! Identifier reconciliation — keeping downstream references alive.
//!
//! A design tool holds on to variables by identifier. When a palette is
//! regenerated (a hue renamed, a shade added, an intent rebound), every
//! token that corresponds to something in the previous export must keep
//! that identifier, or references break.
//!
//! The caller says, per hue, shade and intent, where each new element came
//! from: `new`, or the name of an existing element. Anything not mentioned
//! maps to itself. For each token the reconciler rebuilds the name it
//! would have had in the previous file and classifies it:
//!
//! | source name            | in previous file | action |
//! |------------------------|------------------|--------|
//! | any segment is `new`   | –                | create |
//! | equal to target        | yes              | update |
//! | differs from target    | yes              | rename |
//! | any                    | no               | create |

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigError, IntentBinding};
use crate::palette::Palette;
use crate::parse::ParsedFile;
use crate::token::{Action, Role, Segment, Token, TokenCollection, TokenPath};

/// Where a target element takes its identity from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    /// Fresh identifiers.
    New,
    /// Adopt the identifiers of the named existing element.
    Existing(String),
}

impl Source {
    /// Keyword for [`Source::New`] in mapping files.
    pub const NEW: &'static str = "new";
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        if s == Self::NEW { Self::New } else { Self::Existing(s) }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        match source {
            Source::New => Source::NEW.to_string(),
            Source::Existing(name) => name,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str(Self::NEW),
            Self::Existing(name) => f.write_str(name),
        }
    }
}

/// Caller-supplied provenance of hues, shades, intents and whole tokens.
///
/// ```toml
/// [hues]
/// navy = "blue"      # navy adopts blue's identifiers
/// mint = "new"
///
/// [shades]
/// "550" = "500"
///
/// [tokens]
/// "primary/shade/550" = "accent/shade/500"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMapping {
    pub hues: BTreeMap<String, Source>,
    pub shades: BTreeMap<String, Source>,
    pub intents: BTreeMap<String, Source>,
    /// Full token name overrides; checked before the per-role maps.
    pub tokens: BTreeMap<String, Source>,
}

/// A source adopted by more than one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSource {
    /// `hue`, `shade`, `intent` or `token`.
    pub kind: &'static str,
    pub source: String,
    pub targets: Vec<String>,
}

impl SourceMapping {
    /// Parse a TOML mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on syntax or type errors.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML mapping file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if unreadable, [`ConfigError::Toml`] if malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Identity for every element the previous file knows, `new` otherwise.
    #[must_use]
    pub fn suggest(parsed: &ParsedFile, palette: &Palette, intents: &[IntentBinding]) -> Self {
        let pick = |known: bool, name: &str| {
            if known { Source::Existing(name.to_string()) } else { Source::New }
        };
        Self {
            hues: palette
                .hues
                .iter()
                .map(|h| (h.label.clone(), pick(parsed.has_hue(&h.label), &h.label)))
                .collect(),
            shades: palette
                .shade_labels()
                .into_iter()
                .map(|s| (s.to_string(), pick(parsed.has_shade(s), s)))
                .collect(),
            intents: intents
                .iter()
                .map(|i| (i.name.clone(), pick(parsed.intent(&i.name).is_some(), &i.name)))
                .collect(),
            tokens: BTreeMap::new(),
        }
    }

    const fn role_map(&self, role: Role) -> &BTreeMap<String, Source> {
        match role {
            Role::Hue => &self.hues,
            Role::Shade => &self.shades,
            Role::Intent => &self.intents,
        }
    }

    /// Sources that more than one target adopts. Reported, never enforced:
    /// older mappings rely on it.
    #[must_use]
    pub fn duplicate_sources(&self) -> Vec<DuplicateSource> {
        let maps = [
            ("hue", &self.hues),
            ("shade", &self.shades),
            ("intent", &self.intents),
            ("token", &self.tokens),
        ];
        let mut out = Vec::new();
        for (kind, map) in maps {
            let mut by_source: BTreeMap<&str, Vec<String>> = BTreeMap::new();
            for (target, source) in map {
                if let Source::Existing(name) = source {
                    by_source.entry(name).or_default().push(target.clone());
                }
            }
            out.extend(
                by_source
                    .into_iter()
                    .filter(|(_, targets)| targets.len() > 1)
                    .map(|(source, targets)| DuplicateSource {
                        kind,
                        source: source.to_string(),
                        targets,
                    }),
            );
        }
        out
    }

    /// The name a token had in the previous file; `None` when any part of
    /// it is new.
    #[must_use]
    pub fn source_name(&self, token: &Token) -> Option<String> {
        if let Some(source) = self.tokens.get(&token.name) {
            return match source {
                Source::New => None,
                Source::Existing(name) => Some(name.clone()),
            };
        }

        let mut segments = Vec::with_capacity(token.path.segments().len());
        for segment in token.path.segments() {
            let source = match segment {
                Segment::Literal(_) => segment.clone(),
                Segment::Named { role, name, .. } => match self.role_map(*role).get(name) {
                    None => segment.clone(),
                    Some(Source::New) => return None,
                    Some(Source::Existing(from)) => segment.renamed(from),
                },
            };
            segments.push(source);
        }
        Some(TokenPath::new(segments).render())
    }
}

/// Counts per action, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub create: usize,
    pub rename: usize,
    pub update: usize,
}

impl Summary {
    #[must_use]
    pub fn of(collection: &TokenCollection) -> Self {
        let mut s = Self::default();
        for token in collection.variables() {
            match token.action {
                Action::Create => s.create += 1,
                Action::Rename => s.rename += 1,
                Action::Update => s.update += 1,
            }
        }
        s
    }
}

/// Resolve action and adopted identifier for one token of `collection`.
fn resolve(
    collection: &str,
    token: &Token,
    parsed: Option<&ParsedFile>,
    mapping: &SourceMapping,
) -> (Action, Option<String>) {
    let Some(parsed) = parsed else {
        return (Action::Create, None);
    };
    let Some(source) = mapping.source_name(token) else {
        return (Action::Create, None);
    };
    match parsed.id(collection, &source) {
        Some(id) if source == token.name => (Action::Update, Some(id.to_string())),
        Some(id) => (Action::Rename, Some(id.to_string())),
        None => {
            debug!(token = %token.name, source = %source, "source not in previous file");
            (Action::Create, None)
        }
    }
}

/// Attach actions and adopted identifiers. Exactly one output token per
/// input token; names are untouched.
#[must_use]
pub fn reconcile(
    collection: TokenCollection,
    parsed: Option<&ParsedFile>,
    mapping: &SourceMapping,
) -> TokenCollection {
    let name = collection.name.clone();
    let out = collection.map_tokens(|mut token| {
        let (action, source_id) = resolve(&name, &token, parsed, mapping);
        token.action = action;
        token.source_id = source_id;
        token
    });
    let summary = Summary::of(&out);
    info!(
        collection = %out.name,
        create = summary.create,
        rename = summary.rename,
        update = summary.update,
        "reconciled"
    );
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Hue, Shade, ThemeConfig};
    use crate::export::{Exporter, export};
    use crate::palette::generate;
    use crate::parse::parse;
    use crate::tree::{TokenTree, build};
    use pretty_assertions::assert_eq;

    fn shades(middle: &str) -> Vec<Shade> {
        vec![
            Shade::new("0", 100.0, 0.02),
            Shade::new(middle, 63.0, 0.21),
            Shade::new("1000", 25.0, 0.02),
        ]
    }

    fn theme(intent: &str) -> ThemeConfig {
        ThemeConfig {
            intents: vec![IntentBinding::new(intent, "blue"), IntentBinding::new("neutral", "gray")],
            ..ThemeConfig::default()
        }
    }

    fn tree(hues: &[Hue], shades: &[Shade], theme: &ThemeConfig) -> TokenTree {
        build(&generate(hues, shades), theme)
    }

    fn base_hues() -> Vec<Hue> {
        vec![Hue::gray("gray"), Hue::new("blue", 255.0)]
    }

    /// Export the baseline configuration and read it back.
    fn previous() -> ParsedFile {
        let theme = theme("primary");
        let t = tree(&base_hues(), &shades("500"), &theme);
        parse(&export(&t.into_collections(), 0).unwrap(), &theme.naming).unwrap()
    }

    fn action(c: &TokenCollection, name: &str) -> Action {
        c.get(name).unwrap_or_else(|| panic!("missing {name}")).action
    }

    #[test]
    fn without_previous_file_everything_is_created() {
        let t = tree(&base_hues(), &shades("500"), &theme("primary"));
        let c = reconcile(t.theme, None, &SourceMapping::default());
        assert!(c.variables().iter().all(|t| t.action == Action::Create && t.source_id.is_none()));
    }

    #[test]
    fn identity_round_trip_is_all_update() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("500"), &theme("primary"));
        for c in t.into_collections() {
            let c = reconcile(c, Some(&parsed), &SourceMapping::default());
            for token in c.variables() {
                assert_eq!(token.action, Action::Update, "{}", token.name);
                assert_eq!(token.source_id.as_deref(), parsed.id(&c.name, &token.name));
            }
        }
    }

    #[test]
    fn round_trip_keeps_identifiers_in_export() {
        let theme = theme("primary");
        let first = tree(&base_hues(), &shades("500"), &theme).into_collections();
        let text = export(&first, 5).unwrap();
        let parsed = parse(&text, &theme.naming).unwrap();

        let again: Vec<TokenCollection> = tree(&base_hues(), &shades("500"), &theme)
            .into_collections()
            .into_iter()
            .map(|c| reconcile(c, Some(&parsed), &SourceMapping::default()))
            .collect();
        let doc = Exporter::new(99).document(&again);
        for c in &doc.collections {
            for var in &c.variables {
                assert_eq!(Some(var.id.as_str()), parsed.id(&c.name, &var.name));
            }
        }
    }

    #[test]
    fn renamed_shade_is_a_rename() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("550"), &theme("primary"));
        let mapping = SourceMapping {
            shades: BTreeMap::from([("550".to_string(), Source::Existing("500".into()))]),
            ..SourceMapping::default()
        };
        let palette = reconcile(t.palette, Some(&parsed), &mapping);
        let token = palette.get("--blue/550").unwrap();
        assert_eq!(token.action, Action::Rename);
        assert_eq!(token.source_id.as_deref(), parsed.id("Palette", "--blue/500"));
        assert_eq!(action(&palette, "--blue/0"), Action::Update);

        let theme = reconcile(t.theme, Some(&parsed), &mapping);
        assert_eq!(action(&theme, "primary/shade/550"), Action::Rename);
        assert_eq!(action(&theme, "on-primary/shade/550"), Action::Rename);
        assert_eq!(action(&theme, "primary/shade/0"), Action::Update);
    }

    #[test]
    fn unmapped_new_shade_is_a_create() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("550"), &theme("primary"));
        let palette = reconcile(t.palette, Some(&parsed), &SourceMapping::default());
        assert_eq!(action(&palette, "--blue/550"), Action::Create);
        assert_eq!(action(&palette, "--blue/1000"), Action::Update);
    }

    #[test]
    fn new_overrides_existing_match() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("500"), &theme("primary"));
        let mapping = SourceMapping {
            hues: BTreeMap::from([("blue".to_string(), Source::New)]),
            ..SourceMapping::default()
        };
        let palette = reconcile(t.palette, Some(&parsed), &mapping);
        assert_eq!(action(&palette, "--blue/500"), Action::Create);
        assert_eq!(action(&palette, "--gray/500"), Action::Update);
    }

    #[test]
    fn renamed_intent_carries_on_colors() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("500"), &theme("accent"));
        let mapping = SourceMapping {
            intents: BTreeMap::from([("accent".to_string(), Source::Existing("primary".into()))]),
            ..SourceMapping::default()
        };
        let c = reconcile(t.theme, Some(&parsed), &mapping);
        assert_eq!(action(&c, "accent"), Action::Rename);
        assert_eq!(action(&c, "on-accent/shade/1000"), Action::Rename);
        assert_eq!(c.get("on-accent").unwrap().source_id.as_deref(), parsed.id("Theme", "on-primary"));
        assert_eq!(action(&c, "neutral"), Action::Update);
    }

    #[test]
    fn token_override_wins() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("500"), &theme("primary"));
        let mapping = SourceMapping {
            tokens: BTreeMap::from([
                ("stark".to_string(), Source::Existing("black".into())),
                ("white".to_string(), Source::New),
            ]),
            ..SourceMapping::default()
        };
        let c = reconcile(t.theme, Some(&parsed), &mapping);
        assert_eq!(action(&c, "stark"), Action::Rename);
        assert_eq!(c.get("stark").unwrap().source_id.as_deref(), parsed.id("Theme", "black"));
        assert_eq!(action(&c, "white"), Action::Create);
    }

    #[test]
    fn one_output_per_input() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("500"), &theme("primary"));
        let before: Vec<String> = t.palette.variables().iter().map(|t| t.name.clone()).collect();
        // Both hues adopt blue: permissive, nothing is merged.
        let mapping = SourceMapping {
            hues: BTreeMap::from([("gray".to_string(), Source::Existing("blue".into()))]),
            ..SourceMapping::default()
        };
        let c = reconcile(t.palette, Some(&parsed), &mapping);
        let after: Vec<String> = c.variables().iter().map(|t| t.name.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(c.get("--gray/500").unwrap().source_id, c.get("--blue/500").unwrap().source_id);
    }

    #[test]
    fn suggest_marks_unknown_elements_new() {
        let parsed = previous();
        let mut hues = base_hues();
        hues.push(Hue::new("teal", 185.0));
        let palette = generate(&hues, &shades("550"));
        let intents = vec![IntentBinding::new("primary", "blue"), IntentBinding::new("info", "teal")];
        let mapping = SourceMapping::suggest(&parsed, &palette, &intents);

        assert_eq!(mapping.hues["blue"], Source::Existing("blue".into()));
        assert_eq!(mapping.hues["teal"], Source::New);
        assert_eq!(mapping.shades["550"], Source::New);
        assert_eq!(mapping.shades["0"], Source::Existing("0".into()));
        assert_eq!(mapping.intents["primary"], Source::Existing("primary".into()));
        assert_eq!(mapping.intents["info"], Source::New);
        assert!(mapping.tokens.is_empty());
    }

    #[test]
    fn duplicate_sources_are_reported() {
        let mapping = SourceMapping::from_toml_str(
            r#"
            [hues]
            navy = "blue"
            azure = "blue"
            mint = "new"
            fresh = "new"

            [shades]
            "550" = "500"
            "#,
        )
        .unwrap();
        assert_eq!(
            mapping.duplicate_sources(),
            vec![DuplicateSource {
                kind: "hue",
                source: "blue".into(),
                targets: vec!["azure".into(), "navy".into()],
            }]
        );
    }

    #[test]
    fn mapping_toml_round_trip() {
        let mapping = SourceMapping {
            hues: BTreeMap::from([("navy".to_string(), Source::Existing("blue".into()))]),
            shades: BTreeMap::from([("550".to_string(), Source::New)]),
            ..SourceMapping::default()
        };
        let text = toml::to_string(&mapping).unwrap();
        assert!(text.contains(r#"navy = "blue""#));
        assert!(text.contains(r#"550 = "new""#));
        assert_eq!(SourceMapping::from_toml_str(&text).unwrap(), mapping);
    }

    #[test]
    fn summary_counts() {
        let parsed = previous();
        let t = tree(&base_hues(), &shades("550"), &theme("primary"));
        let c = reconcile(t.palette, Some(&parsed), &SourceMapping::default());
        assert_eq!(Summary::of(&c), Summary { create: 2, rename: 0, update: 4 });
    }

    #[test]
    fn identifiers_are_not_adopted_across_collections() {
        let theme = theme("primary");
        let t = tree(&base_hues(), &shades("500"), &theme);
        let mut parsed = previous();
        // The palette no longer knows `--blue/500`; only the theme has
        // a variable by that name.
        let palette_ids = parsed.identifiers.remove("Palette").unwrap();
        let stray = palette_ids["--blue/500"].clone();
        parsed
            .identifiers
            .entry("Theme".to_string())
            .or_default()
            .insert("--blue/500".to_string(), stray);

        let palette = reconcile(t.palette, Some(&parsed), &SourceMapping::default());
        let token = palette.get("--blue/500").unwrap();
        assert_eq!(token.action, Action::Create);
        assert_eq!(token.source_id, None);
    }
}
