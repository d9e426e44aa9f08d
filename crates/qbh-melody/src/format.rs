//! Melody transcription structures
//!
//! A transcription is what the pitch tracker leaves on disk: one note per
//! line, `onset duration pitch`, times in seconds.

use serde::{Deserialize, Serialize};

/// Comment marker for melody files
pub const COMMENT_PREFIX: char = '#';

/// Highest MIDI note number a melody file may contain
pub const MAX_PITCH: f64 = 127.0;

/// One transcribed note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteTriplet {
    /// Onset time (seconds)
    pub onset: f64,
    /// Note duration (seconds)
    pub duration: f64,
    /// Pitch (MIDI note number, 0 = unvoiced)
    pub pitch: f64,
}

impl NoteTriplet {
    pub fn new(onset: f64, duration: f64, pitch: f64) -> Self {
        Self {
            onset,
            duration,
            pitch,
        }
    }

    /// Pitch rounded to the nearest semitone
    pub fn semitone(&self) -> i32 {
        self.pitch.round() as i32
    }

    /// A note is voiced when its rounded pitch is above 0
    pub fn is_voiced(&self) -> bool {
        self.semitone() > 0
    }
}

/// A complete melody file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MelodyTrack {
    pub notes: Vec<NoteTriplet>,
}

impl MelodyTrack {
    pub fn new(notes: Vec<NoteTriplet>) -> Self {
        Self { notes }
    }

    /// Number of voiced notes
    pub fn voiced_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_voiced()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
