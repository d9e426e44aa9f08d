//! Tolerant DP alignment of a query against one reference sequence
//!
//! Only the previous and current rows are kept. The result is the final row:
//! for every reference end position, the best run ending there and where that
//! run started.

use crate::config::Encoding;


/// Mismatch cost of a contour token in the first query row and column
const CONTOUR_INITIAL_MISMATCH: u32 = 4;
/// Mismatch cost of a contour token elsewhere
const CONTOUR_MISMATCH: u32 = 2;
/// Largest cost a single absolute-pitch step may add (one octave)
pub const MAX_INTERVAL_COST: u32 = 12;

/// One DP hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentCell {
    /// Reference index where the run started
    pub segment_start: usize,
    /// Reference index where the run ends
    pub segment_end: usize,
    pub cumulative_score: u32,
    /// Query/reference interval at the start of the run (absolute model only)
    pub drift_height: i64,
}

impl AlignmentCell {
    fn start(j: usize, cumulative_score: u32, drift_height: i64) -> Self {
        Self {
            segment_start: j,
            segment_end: j,
            cumulative_score,
            drift_height,
        }
    }

    fn extend(source: &AlignmentCell, j: usize, cumulative_score: u32) -> Self {
        Self {
            segment_start: source.segment_start,
            segment_end: j,
            cumulative_score,
            drift_height: source.drift_height,
        }
    }

    pub fn run_length(&self) -> usize {
        self.segment_end - self.segment_start
    }

    /// Cost per aligned reference step, `None` for zero-length runs
    pub fn normalized_score(&self) -> Option<f64> {
        match self.run_length() {
            0 => None,
            len => Some(self.cumulative_score as f64 / len as f64),
        }
    }
}

/// Predecessor move in the DP grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Same query row, previous reference column
    Left,
    /// Previous query row, same reference column
    Up,
    /// Previous query row and reference column
    Diagonal,
}

/// Pick the move with the smallest key.
///
/// Diagonal wins unless another move is strictly smaller; between equal up
/// and left keys, up wins.
pub fn preferred_move<K: PartialOrd>(left: K, up: K, diagonal: K) -> Move {
    let mut best = (Move::Diagonal, diagonal);
    for candidate in [(Move::Up, up), (Move::Left, left)] {
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best.0
}

/// Cost of extending a run with drift `drift_height` by a cell at `interval`
pub fn interval_cost(drift_height: i64, interval: i64) -> u32 {
    capped(drift_height.abs_diff(interval))
}

fn capped(distance: u64) -> u32 {
    distance.min(u64::from(MAX_INTERVAL_COST)) as u32
}

/// Pitch difference, widened so any pair of tokens fits
fn pitch_interval(query_pitch: i32, reference_pitch: i32) -> i64 {
    i64::from(query_pitch) - i64::from(reference_pitch)
}

/// Align `query` against `reference` and return the final DP row
pub fn align(query: &[i32], reference: &[i32], encoding: Encoding) -> Vec<AlignmentCell> {
    if query.is_empty() || reference.is_empty() {
        return Vec::new();
    }

    match encoding {
        Encoding::Contour => align_contour(query, reference),
        Encoding::Absolute => align_absolute(query, reference),
    }
}

fn align_contour(query: &[i32], reference: &[i32]) -> Vec<AlignmentCell> {
    let initial_cost = |a: i32, b: i32| if a == b { 0 } else { CONTOUR_INITIAL_MISMATCH };

    let mut prev: Vec<AlignmentCell> = reference
        .iter()
        .enumerate()
        .map(|(j, &r)| AlignmentCell::start(j, initial_cost(query[0], r), 0))
        .collect();
    let mut curr: Vec<AlignmentCell> = Vec::with_capacity(reference.len());

    for &q in &query[1..] {
        curr.push(AlignmentCell::extend(
            &prev[0],
            0,
            prev[0].cumulative_score + initial_cost(q, reference[0]),
        ));

        for j in 1..reference.len() {
            let dist = if q == reference[j] { 0 } else { CONTOUR_MISMATCH };
            let left = curr[j - 1].cumulative_score + dist / 2;
            let up = prev[j].cumulative_score + dist;
            let diagonal = prev[j - 1].cumulative_score + (3 * dist) / 2;

            let cell = match preferred_move(left, up, diagonal) {
                Move::Left => AlignmentCell::extend(&curr[j - 1], j, left),
                Move::Up => AlignmentCell::extend(&prev[j], j, up),
                Move::Diagonal => AlignmentCell::extend(&prev[j - 1], j, diagonal),
            };
            curr.push(cell);
        }

        std::mem::swap(&mut prev, &mut curr);
        curr.clear();
    }

    prev
}

/// Ordering key for absolute-model predecessors: total cost, then how far
/// the predecessor's drift is from `interval` (uncapped), then the
/// predecessor's own score.
fn absolute_key(source: &AlignmentCell, interval: i64) -> (u32, u64, u32) {
    let distance = source.drift_height.abs_diff(interval);
    (
        source.cumulative_score + capped(distance),
        distance,
        source.cumulative_score,
    )
}

fn align_absolute(query: &[i32], reference: &[i32]) -> Vec<AlignmentCell> {
    let mut prev: Vec<AlignmentCell> = reference
        .iter()
        .enumerate()
        .map(|(j, &r)| AlignmentCell::start(j, 0, pitch_interval(query[0], r)))
        .collect();
    let mut curr: Vec<AlignmentCell> = Vec::with_capacity(reference.len());

    for &q in &query[1..] {
        let (total, _, _) = absolute_key(&prev[0], pitch_interval(q, reference[0]));
        curr.push(AlignmentCell::extend(&prev[0], 0, total));

        for j in 1..reference.len() {
            let interval = pitch_interval(q, reference[j]);
            let left = absolute_key(&curr[j - 1], interval);
            let up = absolute_key(&prev[j], interval);
            let diagonal = absolute_key(&prev[j - 1], interval);

            let cell = match preferred_move(left, up, diagonal) {
                Move::Left => AlignmentCell::extend(&curr[j - 1], j, left.0),
                Move::Up => AlignmentCell::extend(&prev[j], j, up.0),
                Move::Diagonal => AlignmentCell::extend(&prev[j - 1], j, diagonal.0),
            };
            curr.push(cell);
        }

        std::mem::swap(&mut prev, &mut curr);
        curr.clear();
    }

    prev
}
