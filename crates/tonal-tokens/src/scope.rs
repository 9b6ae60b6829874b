//! Variable scopes — where a design tool may offer a token.
//!
//! A scope selection is either the `ALL_SCOPES` sentinel or an explicit
//! set of categories. The two are mutually exclusive: choosing the
//! sentinel clears the categories, and choosing a category clears the
//! sentinel. Modelling this as an enum makes the invalid "both" state
//! unrepresentable.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The sentinel name meaning "every scope".
pub const ALL_SCOPES: &str = "ALL_SCOPES";

bitflags::bitflags! {
    /// Individual scope categories for color variables.
    ///
    /// ```
    /// use tonal_tokens::scope::Scope;
    ///
    /// let text_and_strokes = Scope::TEXT_FILL | Scope::STROKE_COLOR;
    /// assert!(text_and_strokes.contains(Scope::TEXT_FILL));
    /// assert!(!text_and_strokes.contains(Scope::FRAME_FILL));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Scope: u8 {
        /// Every kind of fill.
        const ALL_FILLS    = 1 << 0;
        /// Frame backgrounds.
        const FRAME_FILL   = 1 << 1;
        /// Vector shape fills.
        const SHAPE_FILL   = 1 << 2;
        /// Text color.
        const TEXT_FILL    = 1 << 3;
        /// Strokes and borders.
        const STROKE_COLOR = 1 << 4;
        /// Shadows and other effects.
        const EFFECT_COLOR = 1 << 5;
    }
}

/// The applicability of a token: the sentinel, or specific categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum ScopeSelection {
    /// `ALL_SCOPES`.
    #[default]
    All,
    /// Only the listed categories. May be empty (token hidden from pickers).
    Only(Scope),
}

impl ScopeSelection {
    /// Select one category. Clears the sentinel if it was set.
    #[must_use]
    pub const fn with(self, scope: Scope) -> Self {
        match self {
            Self::All => Self::Only(scope),
            Self::Only(current) => Self::Only(current.union(scope)),
        }
    }

    /// Deselect one category. Has no effect on the sentinel.
    #[must_use]
    pub const fn without(self, scope: Scope) -> Self {
        match self {
            Self::All => Self::All,
            Self::Only(current) => Self::Only(current.difference(scope)),
        }
    }

    /// Whether the sentinel is selected.
    #[must_use]
    pub const fn is_all(self) -> bool {
        matches!(self, Self::All)
    }

    /// Exported names, in canonical order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        match self {
            Self::All => vec![ALL_SCOPES],
            Self::Only(scopes) => Scope::all()
                .iter_names()
                .filter(|(_, scope)| scopes.contains(*scope))
                .map(|(name, _)| name)
                .collect(),
        }
    }

    /// Build a selection from exported names.
    ///
    /// The sentinel wins over any categories listed alongside it. Unknown
    /// names are skipped with a warning.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::Only(Scope::empty());
        for name in names {
            let name = name.as_ref();
            if name == ALL_SCOPES {
                return Self::All;
            }
            match Scope::from_name(name) {
                Some(scope) => selection = selection.with(scope),
                None => warn!(scope = name, "ignoring unknown variable scope"),
            }
        }
        selection
    }
}

impl From<Vec<String>> for ScopeSelection {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<ScopeSelection> for Vec<String> {
    fn from(selection: ScopeSelection) -> Self {
        selection.names().into_iter().map(String::from).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
