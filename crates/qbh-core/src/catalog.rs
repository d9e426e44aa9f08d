//! Catalog loading
//!
//! Reads the JSON catalog and encodes every reference sample. A sample that
//! cannot be read or encodes to nothing is logged and left out; it never
//! aborts the load.

use crate::config::Encoding;
use crate::error::QbhError;
use crate::melody::{encode_track, EncodedSequence};
use crate::song::{Song, SongId};
use anyhow::Result;
use qbh_melody::{resolve_sample_path, CatalogFile, CatalogSong, MelodyReader};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Songs ready for matching plus the samples that were left out
#[derive(Debug)]
pub struct LoadedCatalog {
    pub songs: Vec<Song>,
    pub skipped: Vec<QbhError>,
}

/// Read and encode a single melody file
pub fn load_sequence(path: &Path, encoding: Encoding) -> crate::error::Result<EncodedSequence> {
    let source = path.display().to_string();
    let track =
        MelodyReader::read(path).map_err(|e| QbhError::input(&source, format!("{:#}", e)))?;

    let sequence = encode_track(&track, encoding);
    if sequence.is_empty() {
        return Err(QbhError::input(
            source,
            format!(
                "no {} tokens ({} notes, {} voiced)",
                encoding,
                track.notes.len(),
                track.voiced_count()
            ),
        ));
    }
    Ok(sequence)
}

fn load_song(
    catalog_path: &Path,
    entry: &CatalogSong,
    encoding: Encoding,
) -> (Song, Vec<QbhError>) {
    let mut song = Song::new(SongId(entry.id), entry.author.clone(), entry.title.clone())
        .with_genre(entry.genre.clone())
        .with_thumbnail_url(entry.thumb_url.clone());
    let mut skipped = Vec::new();

    for sample in &entry.samples {
        let path = resolve_sample_path(catalog_path, sample);
        log::debug!("Loading sample {} for song {}", path.display(), entry.id);
        match load_sequence(&path, encoding) {
            Ok(sequence) => song.samples.push(sequence),
            Err(e) => {
                log::warn!("Skipping sample of song {}: {}", entry.id, e);
                skipped.push(e);
            }
        }
    }

    (song, skipped)
}

/// Load a catalog file, encoding samples in parallel
pub fn load_catalog(catalog_path: &Path, encoding: Encoding) -> Result<LoadedCatalog> {
    let catalog = CatalogFile::load(catalog_path)?;

    log::info!(
        "Catalog {} lists {} songs with {} samples, loading in parallel...",
        catalog_path.display(),
        catalog.songs.len(),
        catalog.sample_count()
    );

    let load_start = Instant::now();
    let loaded: Vec<(Song, Vec<QbhError>)> = catalog
        .songs
        .par_iter()
        .map(|entry| load_song(catalog_path, entry, encoding))
        .collect();

    let mut songs = Vec::with_capacity(loaded.len());
    let mut skipped = Vec::new();
    for (song, errors) in loaded {
        songs.push(song);
        skipped.extend(errors);
    }

    log::info!(
        "Loaded {} songs in {:.2}s ({} samples skipped)",
        songs.len(),
        load_start.elapsed().as_secs_f64(),
        skipped.len()
    );

    Ok(LoadedCatalog { songs, skipped })
}
