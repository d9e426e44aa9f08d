//! Catalog entries as seen by the matcher

use crate::melody::EncodedSequence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Song identifier taken from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u32);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SongId {
    fn from(id: u32) -> Self {
        SongId(id)
    }
}

/// Immutable song record with its encoded reference samples
#[derive(Debug, Clone)]
pub struct Song {
    pub id: SongId,
    pub author: String,
    pub title: String,
    pub genre: String,
    pub thumbnail_url: String,
    pub samples: Vec<EncodedSequence>,
}

impl Song {
    pub fn new(id: SongId, author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            author: author.into(),
            title: title.into(),
            genre: String::new(),
            thumbnail_url: String::new(),
            samples: Vec::new(),
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    pub fn with_sample(mut self, sample: EncodedSequence) -> Self {
        self.samples.push(sample);
        self
    }
}
