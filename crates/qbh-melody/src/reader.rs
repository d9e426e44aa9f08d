//! Melody file reader

use crate::format::{MelodyTrack, NoteTriplet, COMMENT_PREFIX, MAX_PITCH};
use anyhow::{Context, Result};
use std::path::Path;

pub struct MelodyReader;

impl MelodyReader {
    /// Read a melody file from disk
    pub fn read(path: &Path) -> Result<MelodyTrack> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open melody file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse melody file: {}", path.display()))
    }

    /// Parse melody text: one `onset duration pitch` triplet per line
    pub fn parse(content: &str) -> Result<MelodyTrack> {
        let mut notes = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            notes.push(Self::parse_line(line).with_context(|| format!("line {}", line_no + 1))?);
        }

        log::trace!("Parsed {} notes", notes.len());

        Ok(MelodyTrack::new(notes))
    }

    fn parse_line(line: &str) -> Result<NoteTriplet> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            anyhow::bail!("expected 3 fields (onset duration pitch), found {}", fields.len());
        }

        let onset = Self::parse_field(fields[0], "onset")?;
        let duration = Self::parse_field(fields[1], "duration")?;
        let pitch = Self::parse_field(fields[2], "pitch")?;

        if duration < 0.0 {
            anyhow::bail!("negative duration {}", duration);
        }
        if !(0.0..=MAX_PITCH).contains(&pitch) {
            anyhow::bail!("pitch {} outside MIDI range 0..={}", pitch, MAX_PITCH);
        }

        Ok(NoteTriplet::new(onset, duration, pitch))
    }

    fn parse_field(raw: &str, name: &str) -> Result<f64> {
        let value: f64 = raw
            .parse()
            .with_context(|| format!("invalid {} value '{}'", name, raw))?;
        if !value.is_finite() {
            anyhow::bail!("non-finite {} value '{}'", name, raw);
        }
        Ok(value)
    }
}
