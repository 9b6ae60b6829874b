//! Token file export — the versioned JSON document.
//!
//! The document types here are shared with [`crate::parse`], so what one
//! run writes, the next run reads back with the same schema.
//!
//! Identifiers for tokens that reconcile to [`Action::Create`] are minted
//! only in this module. They are UUID v5 values over the seed, the
//! collection, the token name and an attempt counter, so exporting the
//! same configuration twice yields byte-identical files. An identifier
//! that collides with one adopted, or with any identifier of the previous
//! file, is retried with the next attempt.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::parse::ParsedFile;
use crate::scope::ScopeSelection;
use crate::token::{Action, Mode, Modes, Token, TokenCollection, TokenValue};

/// The only document version this crate reads or writes.
pub const FORMAT_VERSION: u32 = 1;

/// Namespace for minted identifiers.
const ID_NAMESPACE: Uuid = Uuid::from_u128(0x7d3f_6a1e_93b4_4c55_8e02_4b1a_c0de_7a11);

// ---------------------------------------------------------------------------
// Document schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    #[serde(default)]
    pub collections: Vec<CollectionDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDoc {
    pub name: String,
    /// Empty for single-mode collections.
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
    #[serde(default)]
    pub variables: Vec<VariableDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDoc {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub scopes: ScopeSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Single-mode value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueDoc>,
    /// Per-mode values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ModeValuesDoc>,
}

/// A hex string, or `{ "alias": …, "collection": … }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueDoc {
    Color(String),
    Alias { alias: String, collection: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeValuesDoc {
    pub light: ValueDoc,
    pub dark: ValueDoc,
}

impl From<&TokenValue> for ValueDoc {
    fn from(value: &TokenValue) -> Self {
        match value {
            TokenValue::Color(hex) => Self::Color(hex.clone()),
            TokenValue::Alias { collection, name } => {
                Self::Alias { alias: name.clone(), collection: collection.clone() }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Identifier allocation
// ---------------------------------------------------------------------------

/// Mints deterministic identifiers that avoid every adopted or reserved
/// one.
struct IdAllocator {
    seed: u64,
    taken: HashSet<String>,
}

impl IdAllocator {
    fn new(seed: u64, collections: &[TokenCollection], reserved: &BTreeSet<String>) -> Self {
        let taken = collections
            .iter()
            .flat_map(TokenCollection::variables)
            .filter(|t| t.action != Action::Create)
            .filter_map(|t| t.source_id.clone())
            .chain(reserved.iter().cloned())
            .collect();
        Self { seed, taken }
    }

    fn mint(&mut self, collection: &str, name: &str) -> String {
        let mut attempt: u32 = 0;
        loop {
            let key = format!("{}\u{1f}{collection}\u{1f}{name}\u{1f}{attempt}", self.seed);
            let id = Uuid::new_v5(&ID_NAMESPACE, key.as_bytes()).to_string();
            if self.taken.insert(id.clone()) {
                return id;
            }
            debug!(collection, name, attempt, "identifier collision; retrying");
            attempt = attempt.wrapping_add(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Serializes reconciled collections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exporter {
    seed: u64,
    /// Identifiers a created token must never receive.
    reserved: BTreeSet<String>,
}

impl Exporter {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed, reserved: BTreeSet::new() }
    }

    /// Reserve every identifier of the previous file, so a token that
    /// reconciled to [`Action::Create`] never reuses one. Adopted
    /// identifiers are unaffected.
    #[must_use]
    pub fn with_previous(mut self, parsed: &ParsedFile) -> Self {
        self.reserved.extend(parsed.ids().map(String::from));
        self
    }

    /// The document value, identifiers assigned.
    #[must_use]
    pub fn document(&self, collections: &[TokenCollection]) -> Document {
        let mut ids = IdAllocator::new(self.seed, collections, &self.reserved);
        let collections = collections
            .iter()
            .map(|c| CollectionDoc {
                name: c.name.clone(),
                modes: match c.modes {
                    Modes::None => Vec::new(),
                    Modes::LightDark => Mode::BOTH.iter().map(|m| m.name().to_string()).collect(),
                },
                excluded: c.excluded().to_vec(),
                variables: c.variables().iter().map(|t| variable(&mut ids, c, t)).collect(),
            })
            .collect();
        Document { version: FORMAT_VERSION, collections }
    }

    /// Pretty-printed JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error; the schema itself always
    /// serializes.
    pub fn export(&self, collections: &[TokenCollection]) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.document(collections))?;
        text.push('\n');
        Ok(text)
    }
}

fn variable(ids: &mut IdAllocator, collection: &TokenCollection, token: &Token) -> VariableDoc {
    let id = match (&token.action, &token.source_id) {
        (Action::Rename | Action::Update, Some(id)) => id.clone(),
        _ => ids.mint(&collection.name, &token.name),
    };
    let (value, values) = match collection.modes {
        Modes::None => (Some(ValueDoc::from(token.values.get(Mode::Light))), None),
        Modes::LightDark => (
            None,
            Some(ModeValuesDoc {
                light: token.values.get(Mode::Light).into(),
                dark: token.values.get(Mode::Dark).into(),
            }),
        ),
    };
    VariableDoc {
        name: token.name.clone(),
        id,
        action: token.action,
        scopes: token.scopes,
        description: token.description.clone(),
        value,
        values,
    }
}

/// Export with the given seed.
///
/// # Errors
///
/// See [`Exporter::export`].
pub fn export(collections: &[TokenCollection], seed: u64) -> Result<String, serde_json::Error> {
    Exporter::new(seed).export(collections)
}

/// Number of leaf variables that an export would contain.
#[must_use]
pub fn count(collections: &[TokenCollection]) -> usize {
    collections.iter().map(TokenCollection::len).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Hue, IntentBinding, Shade, ThemeConfig};
    use crate::palette::generate;
    use crate::parse::parse;
    use crate::reconcile::{Source, SourceMapping, reconcile};
    use crate::token::{Role, Segment, TokenPath, TokenValues};
    use crate::tree::{TokenTree, build};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn tree(hues: &[Hue]) -> TokenTree {
        let shades = vec![
            Shade::new("0", 100.0, 0.02),
            Shade::new("500", 63.0, 0.21),
            Shade::new("1000", 25.0, 0.02),
        ];
        let theme = ThemeConfig {
            intents: vec![IntentBinding::new("primary", "blue")],
            ..ThemeConfig::default()
        };
        build(&generate(hues, &shades), &theme)
    }

    fn example() -> Vec<TokenCollection> {
        tree(&[Hue::gray("gray"), Hue::new("blue", 255.0)]).into_collections()
    }

    #[test]
    fn single_mode_shape() {
        let doc = Exporter::new(0).document(&example());
        let palette = &doc.collections[0];
        assert_eq!(palette.name, "Palette");
        assert!(palette.modes.is_empty());

        let blue = palette.variables.iter().find(|v| v.name == "--blue/500").unwrap();
        assert_eq!(blue.value, Some(ValueDoc::Color("#0086FF".into())));
        assert_eq!(blue.values, None);
        assert_eq!(blue.action, Action::Create);
        assert_eq!(blue.description.as_deref(), Some("oklch(63% 0.21 255)"));
    }

    #[test]
    fn multi_mode_shape() {
        let doc = Exporter::new(0).document(&example());
        let theme = &doc.collections[1];
        assert_eq!(theme.modes, vec!["light", "dark"]);

        let v = theme.variables.iter().find(|v| v.name == "primary/shade/0").unwrap();
        assert_eq!(
            v.values,
            Some(ModeValuesDoc {
                light: ValueDoc::Alias { alias: "--blue/0".into(), collection: "Palette".into() },
                dark: ValueDoc::Alias { alias: "--blue/1000".into(), collection: "Palette".into() },
            })
        );
        assert!(v.value.is_none());
    }

    #[test]
    fn json_layout() {
        let text = export(&example(), 7).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains(r#""version": 1"#));
        assert!(text.contains(r#""alias": "--blue/500""#));
        assert!(text.contains(r#""ALL_SCOPES""#));
        assert!(text.contains(r#""action": "create""#));
        // Palette has no excluded groups, so the key is omitted.
        assert!(!text.contains("excluded"));
    }

    #[test]
    fn export_is_byte_identical() {
        assert_eq!(export(&example(), 42).unwrap(), export(&example(), 42).unwrap());
    }

    #[test]
    fn seed_changes_identifiers() {
        let a = Exporter::new(1).document(&example());
        let b = Exporter::new(2).document(&example());
        assert_ne!(a.collections[0].variables[0].id, b.collections[0].variables[0].id);
    }

    #[test]
    fn identifiers_are_unique() {
        let doc = Exporter::new(0).document(&example());
        let ids: HashSet<&str> = doc
            .collections
            .iter()
            .flat_map(|c| &c.variables)
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids.len(), count(&example()));
    }

    #[test]
    fn adopted_identifiers_are_kept_and_avoided() {
        let mut collection = TokenCollection::new("Palette", Modes::None);
        let path = |hue: &str| {
            TokenPath::new(vec![
                Segment::affixed(Role::Hue, hue, "--", ""),
                Segment::named(Role::Shade, "500"),
            ])
        };
        // Adopt exactly the id the fresh token would mint first.
        let clash = IdAllocator::new(0, &[], &BTreeSet::new()).mint("Palette", "--red/500");
        let mut adopted = Token::new(path("blue"), "blue", TokenValues::Single(TokenValue::Color("#000000".into())));
        adopted.action = Action::Update;
        adopted.source_id = Some(clash.clone());
        collection.push(adopted);
        collection.push(Token::new(path("red"), "red", TokenValues::Single(TokenValue::Color("#FF0000".into()))));

        let doc = Exporter::new(0).document(&[collection]);
        let vars = &doc.collections[0].variables;
        assert_eq!(vars[0].id, clash);
        assert_ne!(vars[1].id, clash);
    }

    #[test]
    fn count_skips_excluded() {
        let with_draft = tree(&[Hue::gray("gray"), Hue::new("blue", 255.0), Hue::new("#draft", 30.0)]);
        let doc = Exporter::new(0).document(&[with_draft.palette.clone()]);
        assert_eq!(doc.collections[0].excluded, vec!["#draft"]);
        assert!(doc.collections[0].variables.iter().all(|v| !v.name.contains("#draft")));
        assert_eq!(count(&with_draft.into_collections()), count(&example()));
    }

    #[test]
    fn schema_round_trips_through_json() {
        let doc = Exporter::new(3).document(&example());
        let text = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn created_tokens_never_reuse_previous_identifiers() {
        let theme = ThemeConfig {
            intents: vec![IntentBinding::new("primary", "blue")],
            ..ThemeConfig::default()
        };
        let parsed = parse(&export(&example(), 0).unwrap(), &theme.naming).unwrap();
        let previous: HashSet<&str> = parsed.ids().collect();

        let mapping = SourceMapping {
            hues: BTreeMap::from([("blue".to_string(), Source::New)]),
            ..SourceMapping::default()
        };
        let reconciled: Vec<TokenCollection> = example()
            .into_iter()
            .map(|c| reconcile(c, Some(&parsed), &mapping))
            .collect();
        let doc = Exporter::new(0).with_previous(&parsed).document(&reconciled);

        let mut created = 0;
        for c in &doc.collections {
            for var in &c.variables {
                let old = parsed.id(&c.name, &var.name);
                match var.action {
                    Action::Create => {
                        created += 1;
                        assert!(!previous.contains(var.id.as_str()), "{}", var.name);
                        assert_ne!(Some(var.id.as_str()), old, "{}", var.name);
                    }
                    _ => assert_eq!(Some(var.id.as_str()), old, "{}", var.name),
                }
            }
        }
        assert!(created >= 3, "{created}");
    }
}
