//! Fragment selection over the final DP row
//!
//! Picks non-overlapping runs whose length is plausible for the query and
//! folds them into one normalized score per comparison.

use crate::alignment::AlignmentCell;
use crate::config::MatchingConfig;
use std::cmp::Ordering;

/// An accepted aligned run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub segment_start: usize,
    pub segment_end: usize,
    pub normalized_score: f64,
}

impl Fragment {
    pub fn run_length(&self) -> usize {
        self.segment_end - self.segment_start
    }

    fn overlaps(&self, other: &Fragment) -> bool {
        self.segment_start <= other.segment_end && other.segment_start <= self.segment_end
    }
}

/// Outcome of fragment selection for one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub fragments: Vec<Fragment>,
    /// Combined score, lower is better
    pub score: f64,
}

/// Select fragments from the final DP row.
///
/// Returns `None` when no run qualifies.
pub fn select_fragments(
    final_row: &[AlignmentCell],
    query_len: usize,
    config: &MatchingConfig,
) -> Option<Selection> {
    let mut ranked: Vec<Fragment> = final_row
        .iter()
        .filter_map(|cell| {
            cell.normalized_score().map(|normalized_score| Fragment {
                segment_start: cell.segment_start,
                segment_end: cell.segment_end,
                normalized_score,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.normalized_score
            .partial_cmp(&b.normalized_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.run_length().cmp(&a.run_length()))
            .then_with(|| a.segment_end.cmp(&b.segment_end))
    });

    let (min_len, max_len) = config.length_window(query_len);
    let ceiling = config.max_fragment_score();
    let mut accepted: Vec<Fragment> = Vec::new();

    for fragment in ranked {
        if accepted.len() >= config.max_fragments {
            break;
        }

        let len = fragment.run_length() as f64;
        if len < min_len || len > max_len {
            log::trace!(
                "Rejecting run {}..{}: length {} outside [{:.1}, {:.1}]",
                fragment.segment_start,
                fragment.segment_end,
                len,
                min_len,
                max_len
            );
            continue;
        }
        if let Some(ceiling) = ceiling {
            if fragment.normalized_score >= ceiling {
                continue;
            }
        }
        if accepted.iter().any(|a| a.overlaps(&fragment)) {
            continue;
        }

        log::trace!(
            "Accepting run {}..{} with normalized score {:.4}",
            fragment.segment_start,
            fragment.segment_end,
            fragment.normalized_score
        );
        accepted.push(fragment);
    }

    if accepted.is_empty() {
        return None;
    }

    let count = accepted.len() as f64;
    let mean = accepted.iter().map(|f| f.normalized_score).sum::<f64>() / count;
    let score = mean - (count - 1.0) * config.extra_fragment_penalty();

    Some(Selection {
        fragments: accepted,
        score,
    })
}
