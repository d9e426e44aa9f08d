//! Error types for the matching engine

use crate::config::Encoding;
use crate::song::SongId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QbhError {
    /// Empty or unreadable sequence source. Excludes the affected sample only.
    #[error("input error in {source_name}: {message}")]
    Input {
        source_name: String,
        message: String,
    },
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("sequence encoded as {found}, matcher expects {expected}")]
    EncodingMismatch { expected: Encoding, found: Encoding },
    #[error("duplicate song id {0}")]
    DuplicateSong(SongId),
}

impl QbhError {
    pub(crate) fn input(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Input {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QbhError>;
