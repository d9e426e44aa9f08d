//! Per-song aggregation of comparison scores

use crate::song::SongId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One scored comparison between the query and a reference sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub song_id: SongId,
    /// Lower is more similar
    pub normalized_score: f64,
}

impl Candidate {
    pub fn new(song_id: SongId, normalized_score: f64) -> Self {
        Self {
            song_id,
            normalized_score,
        }
    }
}

/// Keeps the best (lowest) score seen for every song
#[derive(Debug, Clone, Default)]
pub struct RankingAggregator {
    best: HashMap<SongId, f64>,
}

impl RankingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        if candidate.normalized_score.is_nan() {
            log::debug!("Ignoring NaN score for song {}", candidate.song_id);
            return;
        }
        self.best
            .entry(candidate.song_id)
            .and_modify(|score| {
                if candidate.normalized_score < *score {
                    *score = candidate.normalized_score;
                }
            })
            .or_insert(candidate.normalized_score);
    }

    /// Fold another partial aggregation into this one
    pub fn merge(mut self, other: RankingAggregator) -> Self {
        for (song_id, normalized_score) in other.best {
            self.push(Candidate {
                song_id,
                normalized_score,
            });
        }
        self
    }

    /// Number of distinct songs with at least one candidate
    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Ascending by score (ties by song id), truncated to `top_k`
    pub fn finish(self, top_k: usize) -> Vec<Candidate> {
        let mut ranked: Vec<Candidate> = self
            .best
            .into_iter()
            .map(|(song_id, normalized_score)| Candidate {
                song_id,
                normalized_score,
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.normalized_score
                .partial_cmp(&b.normalized_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.song_id.cmp(&b.song_id))
        });
        ranked.truncate(top_k);
        ranked
    }
}

impl Extend<Candidate> for RankingAggregator {
    fn extend<I: IntoIterator<Item = Candidate>>(&mut self, iter: I) {
        for candidate in iter {
            self.push(candidate);
        }
    }
}

impl FromIterator<Candidate> for RankingAggregator {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        aggregator.extend(iter);
        aggregator
    }
}
