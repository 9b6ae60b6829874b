//! Token model — paths, values, collections.
//!
//! A token path is a list of segments. Most segments are plain literals
//! (`shade`, an alpha like `10`, a tier name). Segments that come from a
//! configured name (a hue, a shade label, an intent) keep their role and
//! the raw name alongside the affixes used to render them, e.g. the hue
//! `blue` rendered as `--blue`. That is what lets the reconciler ask
//! "what was this token called when `blue` was still `navy`?" without
//! re-parsing strings.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scope::ScopeSelection;

/// Separator between rendered path segments.
pub const PATH_SEPARATOR: char = '/';

// ---------------------------------------------------------------------------
// Segments and paths
// ---------------------------------------------------------------------------

/// Which configured name a segment was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Hue,
    Shade,
    Intent,
}

/// One step of a token path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Named {
        role: Role,
        name: String,
        prefix: String,
        suffix: String,
    },
}

impl Segment {
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// A named segment rendered verbatim.
    #[must_use]
    pub fn named(role: Role, name: impl Into<String>) -> Self {
        Self::affixed(role, name, "", "")
    }

    #[must_use]
    pub fn affixed(
        role: Role,
        name: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self::Named {
            role,
            name: name.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The same segment with its name replaced (affixes kept).
    #[must_use]
    pub fn renamed(&self, new_name: &str) -> Self {
        match self {
            Self::Literal(_) => self.clone(),
            Self::Named { role, prefix, suffix, .. } => {
                Self::affixed(*role, new_name, prefix.as_str(), suffix.as_str())
            }
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Named { name, prefix, suffix, .. } => format!("{prefix}{name}{suffix}"),
        }
    }
}

/// A hierarchical token path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TokenPath(Vec<Segment>);

impl TokenPath {
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// A new path with one more segment.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Rendered segments.
    #[must_use]
    pub fn parts(&self) -> Vec<String> {
        self.0.iter().map(Segment::render).collect()
    }

    /// Rendered segments joined with `/`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(PATH_SEPARATOR);
            }
            out.push_str(&segment.render());
        }
        out
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// The value of a token in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    /// Reference to another variable by collection and name.
    Alias { collection: String, name: String },
    /// A literal color, `#RRGGBB` or `#RRGGBBAA`.
    Color(String),
}

/// Color modes of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const BOTH: [Self; 2] = [Self::Light, Self::Dark];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Per-mode values of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValues {
    Single(TokenValue),
    Modes { light: TokenValue, dark: TokenValue },
}

impl TokenValues {
    /// Value for a mode; single-mode tokens answer the same for both.
    #[must_use]
    pub const fn get(&self, mode: Mode) -> &TokenValue {
        match (self, mode) {
            (Self::Single(v), _) | (Self::Modes { light: v, .. }, Mode::Light) => v,
            (Self::Modes { dark, .. }, Mode::Dark) => dark,
        }
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// What exporting a token does to the downstream file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Create,
    Rename,
    Update,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Rename => "rename",
            Self::Update => "update",
        })
    }
}

/// One leaf variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub path: TokenPath,
    /// `path` rendered, cached because every later stage keys on it.
    pub name: String,
    /// Group the exclusion filter looks at (a hue, intent or tier name).
    pub group: String,
    pub values: TokenValues,
    pub scopes: ScopeSelection,
    pub description: Option<String>,
    /// Identifier adopted from a previous export.
    pub source_id: Option<String>,
    pub action: Action,
}

impl Token {
    #[must_use]
    pub fn new(path: TokenPath, group: impl Into<String>, values: TokenValues) -> Self {
        Self {
            name: path.render(),
            path,
            group: group.into(),
            values,
            scopes: ScopeSelection::All,
            description: None,
            source_id: None,
            action: Action::Create,
        }
    }

    #[must_use]
    pub const fn with_scopes(mut self, scopes: ScopeSelection) -> Self {
        self.scopes = scopes;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ---------------------------------------------------------------------------
// TokenCollection
// ---------------------------------------------------------------------------

/// Whether a collection carries light/dark modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modes {
    None,
    LightDark,
}

/// A named set of variables with unique paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCollection {
    pub name: String,
    pub modes: Modes,
    variables: Vec<Token>,
    names: BTreeSet<String>,
    excluded: Vec<String>,
}

impl TokenCollection {
    #[must_use]
    pub fn new(name: impl Into<String>, modes: Modes) -> Self {
        Self {
            name: name.into(),
            modes,
            variables: Vec::new(),
            names: BTreeSet::new(),
            excluded: Vec::new(),
        }
    }

    /// Add a token. A token whose path is already taken is dropped with a
    /// warning and `false` is returned; the first one wins.
    pub fn push(&mut self, token: Token) -> bool {
        if !self.names.insert(token.name.clone()) {
            warn!(collection = %self.name, token = %token.name, "duplicate token path dropped");
            return false;
        }
        self.variables.push(token);
        true
    }

    #[must_use]
    pub fn variables(&self) -> &[Token] {
        &self.variables
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.variables.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Group names removed by [`exclude_groups`](Self::exclude_groups), in
    /// order of first appearance.
    #[must_use]
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Record a group as excluded without it ever having been added.
    pub fn note_excluded(&mut self, group: &str) {
        if !self.excluded.iter().any(|g| g == group) {
            self.excluded.push(group.to_string());
        }
    }

    /// Drop every token whose group matches `is_excluded`.
    pub fn exclude_groups(&mut self, is_excluded: impl Fn(&str) -> bool) {
        let mut dropped = Vec::new();
        self.variables.retain(|token| {
            if is_excluded(&token.group) {
                dropped.push(token.group.clone());
                false
            } else {
                true
            }
        });
        for group in dropped {
            self.note_excluded(&group);
        }
        self.names = self.variables.iter().map(|t| t.name.clone()).collect();
    }

    /// Rewrite every token in place. Names must not change.
    #[must_use]
    pub fn map_tokens(mut self, f: impl FnMut(Token) -> Token) -> Self {
        self.variables = self.variables.into_iter().map(f).collect();
        debug_assert!(self.variables.iter().all(|t| self.names.contains(&t.name)));
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
