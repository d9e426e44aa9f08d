//! qbhmatch - rank catalog songs against a hummed query
//!
//! Usage:
//!   qbhmatch <query_melody>                          # Uses qbh.toml if present
//!   qbhmatch --config <path> <query_melody>          # Uses custom settings
//!   qbhmatch -i <catalog.json> -m dtw <query_melody> # Flags override settings

use anyhow::{Context, Result};
use clap::Parser;
use qbh_cli::output::{print_json, write_json, RankReport};
use qbh_core::melody::encode_track;
use qbh_core::{build_matcher, CancellationToken, Encoding, QbhSettings};
use qbh_melody::MelodyReader;
use std::path::Path;
use std::time::Duration;

const DEFAULT_SETTINGS_FILE: &str = "qbh.toml";

#[derive(Parser, Debug)]
#[command(name = "qbhmatch")]
#[command(about = "Find the songs a hummed melody belongs to", long_about = None)]
struct Args {
    /// Melody file of the hummed query (onset duration pitch per line)
    query: String,

    /// Path to settings file (TOML). Defaults to qbh.toml when present
    #[arg(short, long)]
    config: Option<String>,

    /// Catalog file (JSON), overrides the settings file
    #[arg(short = 'i', long)]
    catalog: Option<String>,

    /// Write the rank list to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Encoding: contour (uds) or absolute (dtw)
    #[arg(short = 'm', long)]
    encoding: Option<String>,

    /// Number of songs in the rank list
    #[arg(long)]
    top_k: Option<usize>,

    /// Fragment length tolerance p, runs must span [p, 3 - p] query lengths
    #[arg(long)]
    tolerance: Option<f64>,

    /// Maximum number of fragments combined per comparison
    #[arg(long)]
    max_fragments: Option<usize>,

    /// Score bonus per additional fragment
    #[arg(long)]
    extra_fragment_penalty: Option<f64>,

    /// Stop scanning the catalog after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Default: no logs (clean JSON output for parsing)
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    let settings = load_settings(&args)?;
    run_qbhmatch(&args, settings)
}

fn load_settings(args: &Args) -> Result<QbhSettings> {
    let mut settings = match &args.config {
        Some(path) => QbhSettings::load(Path::new(path))?,
        None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
            log::info!("Using settings from {}", DEFAULT_SETTINGS_FILE);
            QbhSettings::load(Path::new(DEFAULT_SETTINGS_FILE))?
        }
        None => QbhSettings::default(),
    };

    if let Some(catalog) = &args.catalog {
        settings.catalog.path = catalog.clone();
    }

    let matching = &mut settings.matching;
    if let Some(encoding) = &args.encoding {
        matching.encoding = encoding.parse::<Encoding>()?;
    }
    if let Some(top_k) = args.top_k {
        matching.top_k = top_k;
    }
    if let Some(tolerance) = args.tolerance {
        matching.fragment_length_tolerance = tolerance;
    }
    if let Some(max_fragments) = args.max_fragments {
        matching.max_fragments = max_fragments;
    }
    if let Some(penalty) = args.extra_fragment_penalty {
        matching.extra_fragment_penalty = Some(penalty);
    }
    matching.validate()?;

    Ok(settings)
}

fn run_qbhmatch(args: &Args, settings: QbhSettings) -> Result<()> {
    let query_path = Path::new(&args.query);
    let catalog_path = Path::new(&settings.catalog.path);
    let encoding = settings.matching.encoding;

    if !catalog_path.exists() {
        anyhow::bail!("Catalog not found: {}", catalog_path.display());
    }

    log::info!("Loading catalog from: {}", catalog_path.display());
    let matcher = build_matcher(catalog_path, settings.matching.clone())?;
    log::info!(
        "Catalog ready: {} songs, {} samples ({} encoding)",
        matcher.songs().len(),
        matcher.sample_count(),
        encoding
    );

    log::info!("Loading query: {}", query_path.display());
    let track = MelodyReader::read(query_path)?;
    let query = encode_track(&track, encoding);
    log::info!(
        "Query has {} notes ({} voiced), {} tokens",
        track.notes.len(),
        track.voiced_count(),
        query.len()
    );

    let cancel = match args.timeout_ms {
        Some(ms) => CancellationToken::with_timeout(Duration::from_millis(ms)),
        None => CancellationToken::new(),
    };

    let outcome = matcher
        .query(&query, &cancel)
        .context("Matching failed")?;
    let report = RankReport::from_outcome(&args.query, encoding, &outcome);

    match &args.output {
        Some(path) => {
            write_json(&report, Path::new(path))?;
            log::info!("Rank list written to {}", path);
        }
        None => print_json(&report),
    }

    Ok(())
}
