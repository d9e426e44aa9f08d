//! QBH Core - query-by-humming melody matching
//!
//! Encodes transcribed melodies into symbolic sequences, aligns a hummed
//! query against every reference sample with a tolerant DP, and ranks the
//! catalog songs by their best partial alignment.

pub mod alignment;
pub mod cancel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod matching;
pub mod melody;
pub mod ranking;
pub mod selection;
pub mod settings;
pub mod song;

pub use alignment::{align, AlignmentCell, Move};
pub use cancel::CancellationToken;
pub use catalog::{load_catalog, load_sequence, LoadedCatalog};
pub use config::{Encoding, MatchingConfig};
pub use error::{QbhError, Result};
pub use matching::{compare, Matcher, RankedSong, SearchOutcome};
pub use melody::{encode, ContourSymbol, EncodedSequence, MelodyEvent};
pub use ranking::{Candidate, RankingAggregator};
pub use selection::{select_fragments, Fragment, Selection};
pub use settings::QbhSettings;
pub use song::{Song, SongId};

/// Build a matcher from a catalog file
pub fn build_matcher(
    catalog_path: &std::path::Path,
    config: MatchingConfig,
) -> anyhow::Result<Matcher> {
    config.validate()?;

    let loaded = load_catalog(catalog_path, config.encoding)?;
    let mut matcher = Matcher::new(config)?;
    for song in loaded.songs {
        matcher.add_song(song)?;
    }

    Ok(matcher)
}
