//! qbhcompare - compare two melody files directly
//!
//! Usage: qbhcompare <query_melody> <reference_melody> [-m contour|absolute]

use anyhow::Result;
use clap::Parser;
use qbh_cli::output::{print_json, ComparisonReport};
use qbh_core::melody::encode_track;
use qbh_core::{compare, Encoding, MatchingConfig};
use qbh_melody::MelodyReader;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "qbhcompare")]
#[command(about = "Align a hummed query against a single reference melody", long_about = None)]
struct Args {
    /// Melody file of the query
    query: String,

    /// Melody file of the reference
    reference: String,

    /// Encoding: contour (uds) or absolute (dtw)
    #[arg(short = 'm', long, default_value = "contour")]
    encoding: String,

    /// Fragment length tolerance p
    #[arg(long)]
    tolerance: Option<f64>,

    /// Maximum number of fragments combined
    #[arg(long)]
    max_fragments: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Trace)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    let encoding: Encoding = args.encoding.parse()?;
    let mut config = MatchingConfig::for_encoding(encoding);
    if let Some(tolerance) = args.tolerance {
        config.fragment_length_tolerance = tolerance;
    }
    if let Some(max_fragments) = args.max_fragments {
        config.max_fragments = max_fragments;
    }
    config.validate()?;

    let query_track = MelodyReader::read(Path::new(&args.query))?;
    let reference_track = MelodyReader::read(Path::new(&args.reference))?;
    let query = encode_track(&query_track, encoding);
    let reference = encode_track(&reference_track, encoding);

    log::info!(
        "Query: {} tokens, reference: {} tokens",
        query.len(),
        reference.len()
    );

    let selection = compare(&query, &reference, &config)?;
    print_json(&ComparisonReport::new(
        &args.query,
        &args.reference,
        &query,
        &reference,
        selection.as_ref(),
    ));

    Ok(())
}
