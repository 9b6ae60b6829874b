//! # tonal-tokens — palette generation and design-token compiler
//!
//! Turns a handful of hues and shades into a full palette, then compiles
//! that palette plus semantic rules into versioned token files whose
//! identifiers survive regeneration.
//!
//! # Architecture
//!
//! ```text
//! Config (shades, hues, theme)
//!     │
//!     ▼
//! palette.rs:   hue × shade matrix via tonal-color (OKLCH → sRGB / P3)
//!     │
//!     ▼
//! tree.rs:      Palette + Theme collections
//!     │           ├── contrast.rs  black/white on-colors
//!     │           └── alpha.rs     opacity variants
//!     ▼
//! reconcile.rs: create / rename / update against a parse.rs'd previous file
//!     │
//!     ▼
//! export.rs:    versioned JSON, deterministic identifiers for new tokens
//! ```
//!
//! Every stage is a pure function of its arguments. Changing the
//! configuration means building a new [`Config`] and running the pipeline
//! again.

// Tier and collection names share prefixes with their modules.
#![allow(clippy::module_name_repetitions)]

pub mod alpha;
pub mod builtin;
pub mod config;
pub mod contrast;
pub mod export;
pub mod palette;
pub mod parse;
pub mod reconcile;
pub mod scope;
pub mod token;
pub mod tree;

pub use alpha::{AlphaSet, AlphaTable};
pub use config::{Config, ConfigError, ThemeConfig};
pub use contrast::{Foreground, choose_foreground};
pub use export::{Exporter, count, export};
pub use palette::{Color, HueSet, Palette};
pub use parse::{ParseError, ParsedFile, parse};
pub use reconcile::{Source, SourceMapping, reconcile};
pub use token::{Action, Token, TokenCollection};
pub use tree::{TokenTree, TokenTreeBuilder};

/// Generate the palette and both collections for a configuration.
/// Every token comes out as [`Action::Create`]; run [`reconcile`] against
/// a previous file to adopt identifiers.
#[must_use]
pub fn compile(config: &Config) -> (Palette, TokenTree) {
    let palette = Palette::generate(&config.hues, &config.shades);
    let tree = TokenTreeBuilder::new(&palette, &config.theme).build();
    (palette, tree)
}
