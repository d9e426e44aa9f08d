//! Tests for catalog matching

use super::*;
use crate::config::Encoding;
use crate::melody::ContourSymbol::*;

fn absolute(tokens: &[i32]) -> EncodedSequence {
    EncodedSequence::new(Encoding::Absolute, tokens.to_vec())
}

fn absolute_matcher() -> Matcher {
    let mut matcher = Matcher::new(MatchingConfig::for_encoding(Encoding::Absolute)).unwrap();
    matcher
        .add_song(
            Song::new(SongId(1), "Composer A", "Rising")
                .with_sample(absolute(&[50, 71, 45, 80, 52, 70, 44]))
                .with_sample(absolute(&[60, 62, 64, 65, 67, 69])),
        )
        .unwrap();
    matcher
        .add_song(
            Song::new(SongId(2), "Composer B", "Jumps")
                .with_sample(absolute(&[72, 40, 90, 41, 88, 39, 95])),
        )
        .unwrap();
    matcher
}

#[test]
fn test_compare_self_match_is_zero() {
    let contour = EncodedSequence::from_contour(&[Up, Longer, Down, Same, Up, Equal]);
    let config = MatchingConfig::for_encoding(Encoding::Contour);
    let selection = compare(&contour, &contour, &config).unwrap().unwrap();
    assert_eq!(selection.score, 0.0);

    let pitches = absolute(&[62, 62, 69, 69, 71, 71, 69]);
    let config = MatchingConfig::for_encoding(Encoding::Absolute);
    let selection = compare(&pitches, &pitches, &config).unwrap().unwrap();
    assert_eq!(selection.score, 0.0);
}

#[test]
fn test_contour_end_to_end() {
    let query = EncodedSequence::from_contour(&[Up, Longer, Down, Same]);
    let config = MatchingConfig::for_encoding(Encoding::Contour);

    let selection = compare(&query, &query, &config).unwrap().unwrap();
    assert_eq!(selection.fragments.len(), 1);
    assert_eq!(selection.score, 0.0);

    let mut matcher = Matcher::new(config).unwrap();
    matcher
        .add_song(
            Song::new(SongId(3), "Other", "Descending")
                .with_sample(EncodedSequence::from_contour(&[Down, Shorter, Down, Shorter])),
        )
        .unwrap();
    matcher
        .add_song(Song::new(SongId(8), "Target", "Melody").with_sample(query.clone()))
        .unwrap();

    let outcome = matcher.query(&query, &CancellationToken::new()).unwrap();
    assert!(!outcome.interrupted);
    assert_eq!(outcome.compared, 2);
    assert_eq!(outcome.ranking[0].song.id, SongId(8));
    assert_eq!(outcome.ranking[0].score, 0.0);
}

#[test]
fn test_song_keeps_best_sample() {
    let matcher = absolute_matcher();
    let query = absolute(&[60, 62, 64, 65, 67, 69]);

    let outcome = matcher.query(&query, &CancellationToken::new()).unwrap();
    assert_eq!(outcome.compared, 3);
    assert_eq!(outcome.ranking[0].song.id, SongId(1));
    assert_eq!(outcome.ranking[0].score, 0.0);

    let ids: Vec<SongId> = outcome.ranking.iter().map(|r| r.song.id).collect();
    let mut unique = ids.clone();
    unique.dedup();
    assert_eq!(ids, unique);
}

#[test]
fn test_empty_query_ranks_nothing() {
    let matcher = absolute_matcher();
    let outcome = matcher
        .query(&absolute(&[]), &CancellationToken::new())
        .unwrap();

    assert!(outcome.ranking.is_empty());
    assert_eq!(outcome.compared, 0);
    assert!(!outcome.interrupted);
}

#[test]
fn test_cancelled_scan_is_interrupted() {
    let matcher = absolute_matcher();
    let token = CancellationToken::new();
    token.cancel();

    let outcome = matcher
        .query(&absolute(&[60, 62, 64, 65]), &token)
        .unwrap();
    assert!(outcome.interrupted);
    assert_eq!(outcome.skipped, matcher.sample_count());
    assert!(outcome.ranking.is_empty());
}

#[test]
fn test_query_is_deterministic() {
    let matcher = absolute_matcher();
    let query = absolute(&[61, 63, 65, 66, 70]);

    let first = matcher.query(&query, &CancellationToken::new()).unwrap();
    let second = matcher.query(&query, &CancellationToken::new()).unwrap();

    let summarize = |o: &SearchOutcome<'_>| -> Vec<(SongId, f64)> {
        o.ranking.iter().map(|r| (r.song.id, r.score)).collect()
    };
    assert_eq!(summarize(&first), summarize(&second));
}

#[test]
fn test_encoding_mismatch_is_rejected() {
    let mut matcher = Matcher::new(MatchingConfig::for_encoding(Encoding::Contour)).unwrap();
    let err = matcher
        .add_song(Song::new(SongId(1), "A", "B").with_sample(absolute(&[60, 62])))
        .unwrap_err();
    assert!(matches!(err, QbhError::EncodingMismatch { .. }));

    let err = matcher
        .query(&absolute(&[60]), &CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, QbhError::EncodingMismatch { .. }));
}

#[test]
fn test_duplicate_song_is_rejected() {
    let mut matcher = absolute_matcher();
    let err = matcher
        .add_song(Song::new(SongId(2), "Again", "Duplicate"))
        .unwrap_err();
    assert!(matches!(err, QbhError::DuplicateSong(SongId(2))));
}

#[test]
fn test_invalid_config_fails_fast() {
    let mut config = MatchingConfig::default();
    config.top_k = 0;
    assert!(matches!(
        Matcher::new(config),
        Err(QbhError::Configuration { .. })
    ));
}
