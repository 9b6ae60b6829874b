//! Opacity variants — the alpha grammar and its parsed form.
//!
//! Grammar (comma separated, whitespace ignored around items):
//!
//! ```text
//! spec  := item ("," item)*
//! item  := int | int "-" int        ; inclusive range, low <= high
//! int   := 0..=100
//! ```
//!
//! Items that don't match are skipped, not reported: `"5,abc,10"` is
//! `{5, 10}`. The raw strings only exist at the configuration boundary;
//! [`AlphaTable`] parses them once and everything downstream works with
//! [`AlphaSet`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})(?:\s*-\s*(\d{1,3}))?$").expect("alpha item pattern is valid")
});

/// A deduplicated, ascending set of opacities in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AlphaSet(BTreeSet<u8>);

impl AlphaSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, alpha: u8) -> bool {
        self.0.contains(&alpha)
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl FromIterator<u8> for AlphaSet {
    /// Values above 100 are dropped.
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|a| *a <= 100).collect())
    }
}

impl<'a> IntoIterator for &'a AlphaSet {
    type Item = u8;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

fn percent(digits: &str) -> Option<u8> {
    digits.parse::<u8>().ok().filter(|v| *v <= 100)
}

/// Parse one grammar item into its inclusive range.
fn parse_item(item: &str) -> Option<(u8, u8)> {
    let caps = ITEM.captures(item)?;
    let low = percent(caps.get(1)?.as_str())?;
    let high = match caps.get(2) {
        Some(m) => percent(m.as_str())?,
        None => low,
    };
    (low <= high).then_some((low, high))
}

/// Expand an alpha spec into the set it describes.
#[must_use]
pub fn expand(spec: &str) -> AlphaSet {
    let mut set = BTreeSet::new();
    for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match parse_item(item) {
            Some((low, high)) => set.extend(low..=high),
            None => debug!(item, "skipping malformed alpha item"),
        }
    }
    AlphaSet(set)
}

// ---------------------------------------------------------------------------
// AlphaTable
// ---------------------------------------------------------------------------

/// Parsed alpha sets per group name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlphaTable {
    groups: BTreeMap<String, AlphaSet>,
}

impl AlphaTable {
    /// Parse every spec string eagerly.
    #[must_use]
    pub fn from_specs(specs: &BTreeMap<String, String>) -> Self {
        let groups = specs
            .iter()
            .map(|(group, spec)| (group.clone(), expand(spec)))
            .filter(|(_, set)| !set.is_empty())
            .collect();
        Self { groups }
    }

    /// The set for a group; empty when the group has none configured.
    #[must_use]
    pub fn get(&self, group: &str) -> &AlphaSet {
        static EMPTY: AlphaSet = AlphaSet::new();
        self.groups.get(group).unwrap_or(&EMPTY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
