//! Melody file writer

use crate::format::MelodyTrack;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct MelodyWriter {}

impl MelodyWriter {
    pub fn new() -> Self {
        Self {}
    }

    /// Write a melody file, one note per line
    pub fn write(&self, path: &Path, track: &MelodyTrack) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create melody file: {}", path.display()))?;

        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, track)?;
        writer.flush()?;

        Ok(())
    }

    /// Write notes to any sink
    pub fn write_to<W: Write>(&self, writer: &mut W, track: &MelodyTrack) -> Result<()> {
        for note in &track.notes {
            writeln!(writer, "{:.6} {:.6} {}", note.onset, note.duration, note.pitch)?;
        }
        Ok(())
    }
}

impl Default for MelodyWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NoteTriplet;
    use crate::reader::MelodyReader;

    #[test]
    fn test_written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hum.txt");
        let track = MelodyTrack::new(vec![
            NoteTriplet::new(0.0, 0.3, 57.0),
            NoteTriplet::new(0.3, 0.2, 0.0),
            NoteTriplet::new(0.5, 0.6, 59.5),
        ]);

        MelodyWriter::new().write(&path, &track).unwrap();
        let loaded = MelodyReader::read(&path).unwrap();

        assert_eq!(loaded, track);
    }
}
