//! Melody transcription and song catalog file formats

pub mod catalog;
pub mod format;
pub mod reader;
pub mod writer;

pub use catalog::{resolve_sample_path, CatalogFile, CatalogSample, CatalogSong};
pub use format::{MelodyTrack, NoteTriplet, MAX_PITCH};
pub use reader::MelodyReader;
pub use writer::MelodyWriter;
