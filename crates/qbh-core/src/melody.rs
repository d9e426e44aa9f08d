//! Symbolic melody encoding
//!
//! Turns transcribed notes into token sequences the alignment engine can
//! compare. Unvoiced events (pitch 0 or below) are dropped first.

use crate::config::Encoding;
use qbh_melody::{MelodyTrack, NoteTriplet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transcribed note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MelodyEvent {
    /// Onset (seconds)
    pub onset: f64,
    /// Duration (seconds)
    pub duration: f64,
    /// MIDI pitch, 0 or below when unvoiced
    pub pitch: i32,
}

impl MelodyEvent {
    pub fn new(onset: f64, duration: f64, pitch: i32) -> Self {
        Self {
            onset,
            duration,
            pitch,
        }
    }

    pub fn is_voiced(&self) -> bool {
        self.pitch > 0
    }
}

impl From<&NoteTriplet> for MelodyEvent {
    fn from(note: &NoteTriplet) -> Self {
        Self::new(note.onset, note.duration, note.semitone())
    }
}

/// Relative movement symbols of the contour encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContourSymbol {
    Down,
    Up,
    Same,
    Shorter,
    Longer,
    Equal,
}

impl ContourSymbol {
    pub fn letter(self) -> char {
        match self {
            ContourSymbol::Down => 'D',
            ContourSymbol::Up => 'U',
            ContourSymbol::Same => 'S',
            ContourSymbol::Shorter => 's',
            ContourSymbol::Longer => 'L',
            ContourSymbol::Equal => 'E',
        }
    }

    /// Token value. All six symbols are distinct.
    pub fn token(self) -> i32 {
        self.letter() as i32
    }

    pub fn from_token(token: i32) -> Option<Self> {
        [
            ContourSymbol::Down,
            ContourSymbol::Up,
            ContourSymbol::Same,
            ContourSymbol::Shorter,
            ContourSymbol::Longer,
            ContourSymbol::Equal,
        ]
        .into_iter()
        .find(|s| s.token() == token)
    }

    fn direction(prev_pitch: i32, pitch: i32) -> Self {
        if prev_pitch > pitch {
            ContourSymbol::Down
        } else if prev_pitch < pitch {
            ContourSymbol::Up
        } else {
            ContourSymbol::Same
        }
    }

    fn duration_relation(prev_duration: f64, duration: f64) -> Self {
        if prev_duration > duration {
            ContourSymbol::Shorter
        } else if prev_duration < duration {
            ContourSymbol::Longer
        } else {
            ContourSymbol::Equal
        }
    }
}

/// Token sequence tagged with the encoding that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSequence {
    pub encoding: Encoding,
    pub tokens: Vec<i32>,
}

impl EncodedSequence {
    pub fn new(encoding: Encoding, tokens: Vec<i32>) -> Self {
        Self { encoding, tokens }
    }

    /// Build a contour sequence from symbols
    pub fn from_contour(symbols: &[ContourSymbol]) -> Self {
        Self::new(
            Encoding::Contour,
            symbols.iter().map(|s| s.token()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Contour sequences print as letters (`UEDs`), absolute ones as pitches
impl fmt::Display for EncodedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encoding {
            Encoding::Contour => {
                for &token in &self.tokens {
                    let letter =
                        ContourSymbol::from_token(token).map_or('?', ContourSymbol::letter);
                    write!(f, "{}", letter)?;
                }
            }
            Encoding::Absolute => {
                for (i, token) in self.tokens.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", token)?;
                }
            }
        }
        Ok(())
    }
}

/// Encode a melody event stream
pub fn encode(events: &[MelodyEvent], encoding: Encoding) -> EncodedSequence {
    let voiced = events.iter().filter(|e| e.is_voiced());

    let tokens = match encoding {
        Encoding::Absolute => voiced.map(|e| e.pitch).collect(),
        Encoding::Contour => {
            let voiced: Vec<&MelodyEvent> = voiced.collect();
            voiced
                .windows(2)
                .flat_map(|pair| {
                    [
                        ContourSymbol::direction(pair[0].pitch, pair[1].pitch).token(),
                        ContourSymbol::duration_relation(pair[0].duration, pair[1].duration)
                            .token(),
                    ]
                })
                .collect()
        }
    };

    EncodedSequence::new(encoding, tokens)
}

/// Encode a parsed melody file
pub fn encode_track(track: &MelodyTrack, encoding: Encoding) -> EncodedSequence {
    let events: Vec<MelodyEvent> = track.notes.iter().map(MelodyEvent::from).collect();
    encode(&events, encoding)
}
