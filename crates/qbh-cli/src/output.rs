//! JSON output formatting

use anyhow::{Context, Result};
use qbh_core::{EncodedSequence, Encoding, SearchOutcome, Selection};
use serde::Serialize;
use std::path::Path;

/// One ranked song, as the result list shows it
#[derive(Debug, Serialize)]
pub struct RankRecord {
    pub rank: usize,
    pub author: String,
    pub title: String,
    pub genre: String,
    pub thumb_url: String,
    /// Lower is more similar
    pub similarity: f64,
}

/// Ranked answer to one hummed query
#[derive(Debug, Serialize)]
pub struct RankReport {
    pub query_path: String,
    pub encoding: Encoding,
    pub generated_at: String,
    pub interrupted: bool,
    pub compared: usize,
    pub skipped: usize,
    pub results: Vec<RankRecord>,
}

impl RankReport {
    pub fn from_outcome(
        query_path: &str,
        encoding: Encoding,
        outcome: &SearchOutcome<'_>,
    ) -> Self {
        let results = outcome
            .ranking
            .iter()
            .enumerate()
            .map(|(i, ranked)| RankRecord {
                rank: i + 1,
                author: ranked.song.author.clone(),
                title: ranked.song.title.clone(),
                genre: ranked.song.genre.clone(),
                thumb_url: ranked.song.thumbnail_url.clone(),
                similarity: ranked.score,
            })
            .collect();

        Self {
            query_path: query_path.to_string(),
            encoding,
            generated_at: chrono::Utc::now().to_rfc3339(),
            interrupted: outcome.interrupted,
            compared: outcome.compared,
            skipped: outcome.skipped,
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FragmentRecord {
    pub reference_start: usize,
    pub reference_end: usize,
    pub normalized_score: f64,
}

/// Pairwise comparison between two melody files
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub query_path: String,
    pub reference_path: String,
    pub encoding: Encoding,
    pub query_tokens: String,
    pub reference_tokens: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub fragments: Vec<FragmentRecord>,
}

impl ComparisonReport {
    pub fn new(
        query_path: &str,
        reference_path: &str,
        query: &EncodedSequence,
        reference: &EncodedSequence,
        selection: Option<&Selection>,
    ) -> Self {
        let fragments = selection
            .map(|s| {
                s.fragments
                    .iter()
                    .map(|f| FragmentRecord {
                        reference_start: f.segment_start,
                        reference_end: f.segment_end,
                        normalized_score: f.normalized_score,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            query_path: query_path.to_string(),
            reference_path: reference_path.to_string(),
            encoding: query.encoding,
            query_tokens: query.to_string(),
            reference_tokens: reference.to_string(),
            matched: selection.is_some(),
            score: selection.map(|s| s.score),
            fragments,
        }
    }
}

/// Print any report as pretty JSON on stdout
pub fn print_json<T: Serialize>(report: &T) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

/// Write a report as pretty JSON to a file
pub fn write_json<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbh_core::{CancellationToken, EncodedSequence, MatchingConfig, Matcher, Song, SongId};

    #[test]
    fn test_rank_report_fields() {
        let query = EncodedSequence::new(Encoding::Absolute, vec![60, 62, 64, 65]);
        let mut matcher = Matcher::new(MatchingConfig::for_encoding(Encoding::Absolute)).unwrap();
        matcher
            .add_song(
                Song::new(SongId(5), "Author", "Title")
                    .with_genre("rock")
                    .with_thumbnail_url("http://example.com/t.png")
                    .with_sample(query.clone()),
            )
            .unwrap();

        let outcome = matcher.query(&query, &CancellationToken::new()).unwrap();
        let report = RankReport::from_outcome("hum.txt", Encoding::Absolute, &outcome);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].rank, 1);
        assert_eq!(report.results[0].thumb_url, "http://example.com/t.png");

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["encoding"], "absolute");
        assert_eq!(json["results"][0]["genre"], "rock");
        assert_eq!(json["results"][0]["similarity"], 0.0);
    }

    #[test]
    fn test_comparison_report_without_match() {
        let query = EncodedSequence::new(Encoding::Contour, vec!['U' as i32, 'E' as i32]);
        let reference = EncodedSequence::new(Encoding::Contour, vec!['D' as i32, 's' as i32]);
        let report = ComparisonReport::new("a.txt", "b.txt", &query, &reference, None);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["encoding"], "contour");
        assert_eq!(json["query_tokens"], "UE");
        assert_eq!(json["reference_tokens"], "Ds");
        assert_eq!(json["matched"], false);
        assert!(json.get("score").is_none());
        assert!(json["fragments"].as_array().unwrap().is_empty());
    }
}
