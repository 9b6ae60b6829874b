//! Reading a previously exported token file.
//!
//! The parser extracts just what reconciliation needs: which hues, shades
//! and intents the file already knows, which groups it excluded, and the
//! identifier of every variable. Anything that isn't a version 1 document
//! is an error value, never a panic.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::config::Naming;
use crate::export::{Document, FORMAT_VERSION};
use crate::token::PATH_SEPARATOR;
use crate::tree::SHADE_SEGMENT;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed token file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported token file version {0} (only version 1 is understood)")]
    UnsupportedVersion(u32),
}

/// An intent found in a file, with its shades in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIntent {
    pub name: String,
    pub shades: Vec<String>,
}

/// What a previous export tells us.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFile {
    /// Palette hue labels, marker stripped.
    pub hues: Vec<String>,
    pub shades: Vec<String>,
    pub intents: Vec<ParsedIntent>,
    pub excluded_groups: Vec<String>,
    /// Collection name → variable name → identifier.
    pub identifiers: BTreeMap<String, BTreeMap<String, String>>,
}

impl ParsedFile {
    /// Identifier of `name` within `collection`.
    #[must_use]
    pub fn id(&self, collection: &str, name: &str) -> Option<&str> {
        self.identifiers.get(collection)?.get(name).map(String::as_str)
    }

    /// Every identifier in the file, across collections.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.identifiers.values().flat_map(BTreeMap::values).map(String::as_str)
    }

    #[must_use]
    pub fn has_hue(&self, label: &str) -> bool {
        self.hues.iter().any(|h| h == label)
    }

    #[must_use]
    pub fn has_shade(&self, label: &str) -> bool {
        self.shades.iter().any(|s| s == label)
    }

    #[must_use]
    pub fn intent(&self, name: &str) -> Option<&ParsedIntent> {
        self.intents.iter().find(|i| i.name == name)
    }
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|x| x == item) {
        list.push(item.to_string());
    }
}

/// Parse an exported document.
///
/// # Errors
///
/// [`ParseError::Json`] for malformed JSON or an unexpected shape,
/// [`ParseError::UnsupportedVersion`] for any version other than 1.
pub fn parse(text: &str, naming: &Naming) -> Result<ParsedFile, ParseError> {
    let header: Header = serde_json::from_str(text)?;
    if header.version != FORMAT_VERSION {
        return Err(ParseError::UnsupportedVersion(header.version));
    }
    let doc: Document = serde_json::from_str(text)?;

    let mut parsed = ParsedFile::default();
    let mut intents: Vec<ParsedIntent> = Vec::new();

    for collection in &doc.collections {
        for group in &collection.excluded {
            push_unique(&mut parsed.excluded_groups, group);
        }
        let ids = parsed.identifiers.entry(collection.name.clone()).or_default();
        let is_palette = collection.name == naming.palette_collection || collection.modes.is_empty();
        for var in &collection.variables {
            ids.entry(var.name.clone()).or_insert_with(|| var.id.clone());

            let parts: Vec<&str> = var.name.split(PATH_SEPARATOR).collect();
            match parts.as_slice() {
                [group, shade] if is_palette => {
                    let hue = group
                        .strip_prefix(naming.raw_marker.as_str())
                        .filter(|h| !h.is_empty());
                    if let Some(hue) = hue {
                        push_unique(&mut parsed.hues, hue);
                        push_unique(&mut parsed.shades, shade);
                    }
                }
                [group, segment, shade] if !is_palette && *segment == SHADE_SEGMENT => {
                    match intents.iter_mut().find(|i| i.name == *group) {
                        Some(intent) => push_unique(&mut intent.shades, shade),
                        None => intents.push(ParsedIntent {
                            name: (*group).to_string(),
                            shades: vec![(*shade).to_string()],
                        }),
                    }
                }
                _ => {}
            }
        }
    }

    // On-colors share the intent layout; drop them.
    let names: Vec<String> = intents.iter().map(|i| i.name.clone()).collect();
    intents.retain(|i| {
        naming
            .strip_on(&i.name)
            .is_none_or(|base| !names.iter().any(|n| n == base))
    });
    parsed.intents = intents;

    debug!(
        hues = parsed.hues.len(),
        shades = parsed.shades.len(),
        intents = parsed.intents.len(),
        identifiers = parsed.ids().count(),
        "parsed token file"
    );
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
