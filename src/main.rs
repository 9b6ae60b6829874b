// SPDX-License-Identifier: MIT
//
// tonal — OKLCH palettes and design tokens from the command line.
//
// This binary wires the library crates together:
//
//   tonal-color  → OKLCH → sRGB / Display-P3 conversion
//   tonal-tokens → palette, token tree, reconciliation, export
//
// It owns no state. Each invocation loads a configuration (file or
// builtin preset), runs the pipeline once and prints the result:
//
//   Config → palette → token tree → reconcile(previous, mapping) → JSON
//
// Logs go to stderr so stdout carries only the requested output.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tonal_tokens::builtin::{builtin_config, builtin_names};
use tonal_tokens::config::Naming;
use tonal_tokens::{
    Config, Palette, ParsedFile, SourceMapping, TokenCollection, TokenTree, alpha, compile,
    Exporter, count, parse, reconcile,
};

#[derive(Parser)]
#[command(author, version, about = "OKLCH palettes and design tokens with stable identifiers")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Configuration file (TOML)
    #[arg(short, long, global = true, conflicts_with = "preset")]
    config: Option<PathBuf>,
    /// Builtin preset to use instead of a configuration file
    #[arg(short, long, global = true)]
    preset: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum CollectionArg {
    Palette,
    Theme,
    All,
}

#[derive(Subcommand)]
enum Command {
    /// Print every generated color
    Palette,
    /// Build, reconcile and export token collections as JSON
    Export {
        #[arg(long, value_enum, default_value_t = CollectionArg::All)]
        collection: CollectionArg,
        /// Previously exported file whose identifiers should be kept
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Source mapping (TOML); suggested from the previous file if omitted
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Seed for identifiers of new tokens
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the number of variables an export would contain
    Count {
        #[arg(long, value_enum, default_value_t = CollectionArg::All)]
        collection: CollectionArg,
    },
    /// Print the suggested source mapping against a previous file
    Suggest {
        previous: PathBuf,
    },
    /// Expand an alpha spec such as "0-30,35,40"
    Alpha {
        spec: String,
    },
    /// List builtin presets
    Presets,
}

// ─── Setup ──────────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        return Config::load(path).with_context(|| format!("failed to load {}", path.display()));
    }
    let name = cli.preset.as_deref().unwrap_or("default");
    match builtin_config(name) {
        Some(config) => Ok(config),
        None => bail!("unknown preset '{name}' (available: {})", builtin_names().join(", ")),
    }
}

/// Read a previous export. A file that does not parse is reported and
/// ignored: export then proceeds with fresh identifiers.
fn read_previous(path: &Path, naming: &Naming) -> Result<Option<ParsedFile>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    match parse(&text, naming) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(path = %path.display(), "ignoring previous file: {e}");
            Ok(None)
        }
    }
}

fn select(tree: TokenTree, which: CollectionArg) -> Vec<TokenCollection> {
    match which {
        CollectionArg::Palette => vec![tree.palette],
        CollectionArg::Theme => vec![tree.theme],
        CollectionArg::All => tree.into_collections(),
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn palette_lines(palette: &Palette) -> Vec<String> {
    palette
        .iter()
        .map(|(hue, color)| {
            let mut clipped = Vec::new();
            if color.clipped_srgb {
                clipped.push("srgb");
            }
            if color.clipped_p3 {
                clipped.push("p3");
            }
            let marker = if clipped.is_empty() {
                String::new()
            } else {
                format!("  clipped: {}", clipped.join(", "))
            };
            format!(
                "{:<10} {:>6}  {:<28} {}  {}{marker}",
                hue.label, color.shade_label, color.oklch_text, color.hex_srgb, color.hex_p3
            )
        })
        .collect()
}

fn export_command(
    config: &Config,
    collection: CollectionArg,
    previous: Option<&Path>,
    mapping: Option<&Path>,
    seed: u64,
) -> Result<String> {
    let (palette, tree) = compile(config);

    let parsed = match previous {
        Some(path) => read_previous(path, &config.theme.naming)?,
        None => None,
    };
    let mapping = match (mapping, &parsed) {
        (Some(path), _) => SourceMapping::load(path)
            .with_context(|| format!("failed to load mapping {}", path.display()))?,
        (None, Some(parsed)) => SourceMapping::suggest(parsed, &palette, &config.theme.intents),
        (None, None) => SourceMapping::default(),
    };
    for dup in mapping.duplicate_sources() {
        warn!(kind = dup.kind, source = %dup.source, targets = ?dup.targets, "source adopted more than once");
    }

    let collections: Vec<TokenCollection> = select(tree, collection)
        .into_iter()
        .map(|c| reconcile(c, parsed.as_ref(), &mapping))
        .collect();
    let exporter = match &parsed {
        Some(parsed) => Exporter::new(seed).with_previous(parsed),
        None => Exporter::new(seed),
    };
    exporter.export(&collections).context("failed to serialize tokens")
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Presets => {
            for name in builtin_names() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Alpha { spec } => {
            let set = alpha::expand(spec);
            let items: Vec<String> = set.iter().map(|a| a.to_string()).collect();
            writeln!(out, "{}", items.join(","))?;
        }
        Command::Palette => {
            let config = load_config(cli)?;
            let (palette, _) = compile(&config);
            for line in palette_lines(&palette) {
                writeln!(out, "{line}")?;
            }
        }
        Command::Count { collection } => {
            let config = load_config(cli)?;
            let (_, tree) = compile(&config);
            writeln!(out, "{}", count(&select(tree, *collection)))?;
        }
        Command::Suggest { previous } => {
            let config = load_config(cli)?;
            let (palette, _) = compile(&config);
            let Some(parsed) = read_previous(previous, &config.theme.naming)? else {
                bail!("{} is not a usable token file", previous.display());
            };
            let mapping = SourceMapping::suggest(&parsed, &palette, &config.theme.intents);
            write!(out, "{}", toml::to_string(&mapping)?)?;
        }
        Command::Export { collection, previous, mapping, seed, output } => {
            let config = load_config(cli)?;
            let text = export_command(
                &config,
                *collection,
                previous.as_deref(),
                mapping.as_deref(),
                *seed,
            )?;
            match output {
                Some(path) => {
                    fs::write(path, &text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), bytes = text.len(), "wrote tokens");
                }
                None => write!(out, "{text}")?,
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
