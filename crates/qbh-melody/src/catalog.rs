//! JSON song catalog
//!
//! Lists the reference songs and, for each, the melody files of its
//! reference samples. Sample paths are relative to the catalog file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete catalog file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    pub songs: Vec<CatalogSong>,
}

/// One song entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSong {
    pub id: u32,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub thumb_url: String,
    #[serde(default)]
    pub samples: Vec<CatalogSample>,
}

/// Reference sample of a song
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSample {
    pub path: String,
}

impl CatalogFile {
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            songs: Vec::new(),
        }
    }

    /// Add a song entry
    pub fn add_song(&mut self, song: CatalogSong) {
        self.songs.push(song);
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json_str = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json_str)
            .with_context(|| format!("Failed to write catalog: {}", path.display()))?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        let catalog: CatalogFile = serde_json::from_str(&json_str)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
        Ok(catalog)
    }

    /// Total number of reference samples across all songs
    pub fn sample_count(&self) -> usize {
        self.songs.iter().map(|s| s.samples.len()).sum()
    }
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a sample path against the directory holding the catalog
pub fn resolve_sample_path(catalog_path: &Path, sample: &CatalogSample) -> PathBuf {
    let sample_path = Path::new(&sample.path);
    if sample_path.is_absolute() {
        return sample_path.to_path_buf();
    }
    catalog_path
        .parent()
        .map(|dir| dir.join(sample_path))
        .unwrap_or_else(|| sample_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_defaults() {
        let json = r#"{
            "version": "1.0",
            "songs": [
                { "id": 7, "author": "Anon", "title": "Tune",
                  "samples": [ { "path": "samples/tune_a.txt" } ] },
                { "id": 8, "author": "Anon", "title": "Empty" }
            ]
        }"#;

        let catalog: CatalogFile = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.songs.len(), 2);
        assert_eq!(catalog.songs[0].genre, "");
        assert!(catalog.songs[1].samples.is_empty());
        assert_eq!(catalog.sample_count(), 1);
    }

    #[test]
    fn test_resolve_relative_sample_path() {
        let sample = CatalogSample {
            path: "samples/a.txt".to_string(),
        };
        let resolved = resolve_sample_path(Path::new("/data/db/catalog.json"), &sample);
        assert_eq!(resolved, PathBuf::from("/data/db/samples/a.txt"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut catalog = CatalogFile::new();
        catalog.add_song(CatalogSong {
            id: 1,
            author: "Trad.".to_string(),
            title: "Greensleeves".to_string(),
            genre: "folk".to_string(),
            thumb_url: "http://example.com/g.png".to_string(),
            samples: vec![CatalogSample {
                path: "g.txt".to_string(),
            }],
        });
        catalog.save(&path).unwrap();

        let loaded = CatalogFile::load(&path).unwrap();
        assert_eq!(loaded.songs[0].title, "Greensleeves");
        assert_eq!(loaded.sample_count(), 1);
    }
}
