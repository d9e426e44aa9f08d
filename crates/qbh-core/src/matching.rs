//! Query matching against a song catalog
//!
//! Every (query, reference sample) comparison is independent, so the catalog
//! scan runs on rayon and reduces per-thread aggregators at the end.

use crate::alignment::align;
use crate::cancel::CancellationToken;
use crate::config::MatchingConfig;
use crate::error::{QbhError, Result};
use crate::melody::EncodedSequence;
use crate::ranking::{Candidate, RankingAggregator};
use crate::selection::{select_fragments, Selection};
use crate::song::{Song, SongId};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

#[cfg(test)]
mod tests;

/// A ranked song with its best score
#[derive(Debug, Clone, Copy)]
pub struct RankedSong<'a> {
    pub song: &'a Song,
    /// Lower is more similar
    pub score: f64,
}

/// Result of one catalog scan
#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    /// Up to `top_k` songs, ascending by score
    pub ranking: Vec<RankedSong<'a>>,
    /// Comparisons actually run
    pub compared: usize,
    /// Comparisons skipped after cancellation
    pub skipped: usize,
    /// The scan stopped early; `ranking` covers the completed comparisons
    pub interrupted: bool,
}

impl<'a> SearchOutcome<'a> {
    fn empty() -> Self {
        Self {
            ranking: Vec::new(),
            compared: 0,
            skipped: 0,
            interrupted: false,
        }
    }
}

/// Partial scan state, one per rayon fold
#[derive(Default)]
struct Tally {
    ranks: RankingAggregator,
    compared: usize,
    skipped: usize,
}

impl Tally {
    fn merge(self, other: Tally) -> Tally {
        Tally {
            ranks: self.ranks.merge(other.ranks),
            compared: self.compared + other.compared,
            skipped: self.skipped + other.skipped,
        }
    }
}

fn check_encoding(config: &MatchingConfig, sequence: &EncodedSequence) -> Result<()> {
    if sequence.encoding != config.encoding {
        return Err(QbhError::EncodingMismatch {
            expected: config.encoding,
            found: sequence.encoding,
        });
    }
    Ok(())
}

fn compare_checked(
    query: &EncodedSequence,
    reference: &EncodedSequence,
    config: &MatchingConfig,
) -> Option<Selection> {
    if query.is_empty() || reference.is_empty() {
        return None;
    }
    let final_row = align(&query.tokens, &reference.tokens, config.encoding);
    select_fragments(&final_row, query.len(), config)
}

/// Compare a query against a single reference sequence.
///
/// `Ok(None)` means no usable fragment, which includes empty inputs.
pub fn compare(
    query: &EncodedSequence,
    reference: &EncodedSequence,
    config: &MatchingConfig,
) -> Result<Option<Selection>> {
    check_encoding(config, query)?;
    check_encoding(config, reference)?;
    Ok(compare_checked(query, reference, config))
}

/// Matcher over an in-memory catalog
pub struct Matcher {
    config: MatchingConfig,
    songs: Vec<Song>,
    /// Song id -> position in `songs`
    positions: HashMap<SongId, usize>,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            songs: Vec::new(),
            positions: HashMap::new(),
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Add a song; all its samples must use the configured encoding
    pub fn add_song(&mut self, song: Song) -> Result<()> {
        if self.positions.contains_key(&song.id) {
            return Err(QbhError::DuplicateSong(song.id));
        }
        for sample in &song.samples {
            check_encoding(&self.config, sample)?;
        }
        self.positions.insert(song.id, self.songs.len());
        self.songs.push(song);
        Ok(())
    }

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.positions.get(&id).map(|&pos| &self.songs[pos])
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn sample_count(&self) -> usize {
        self.songs.iter().map(|s| s.samples.len()).sum()
    }

    /// Rank catalog songs against `query`
    pub fn query(
        &self,
        query: &EncodedSequence,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome<'_>> {
        check_encoding(&self.config, query)?;

        if query.is_empty() {
            log::debug!("Empty query sequence, nothing to match");
            return Ok(SearchOutcome::empty());
        }

        let references: Vec<(SongId, &EncodedSequence)> = self
            .songs
            .iter()
            .flat_map(|song| song.samples.iter().map(move |sample| (song.id, sample)))
            .collect();

        let start = Instant::now();
        let config = &self.config;

        let tally = references
            .par_iter()
            .fold(Tally::default, |mut tally, (song_id, reference)| {
                if cancel.is_cancelled() {
                    tally.skipped += 1;
                    return tally;
                }
                tally.compared += 1;

                if let Some(selection) = compare_checked(query, reference, config) {
                    log::debug!(
                        "Song {}: {} fragment(s), score {:.4}",
                        song_id,
                        selection.fragments.len(),
                        selection.score
                    );
                    tally.ranks.push(Candidate::new(*song_id, selection.score));
                }
                tally
            })
            .reduce(Tally::default, Tally::merge);

        let interrupted = tally.skipped > 0;
        if interrupted {
            log::warn!(
                "Matching interrupted: {} of {} comparisons skipped",
                tally.skipped,
                references.len()
            );
        }

        let ranking: Vec<RankedSong<'_>> = tally
            .ranks
            .finish(config.top_k)
            .into_iter()
            .filter_map(|candidate| {
                self.song(candidate.song_id).map(|song| RankedSong {
                    song,
                    score: candidate.normalized_score,
                })
            })
            .collect();

        log::info!(
            "Compared query against {} samples in {:.3}s, {} ranked",
            tally.compared,
            start.elapsed().as_secs_f64(),
            ranking.len()
        );

        Ok(SearchOutcome {
            ranking,
            compared: tally.compared,
            skipped: tally.skipped,
            interrupted,
        })
    }
}
