//! Matching parameters
//!
//! Defaults follow the original humming matcher: 0.6 length tolerance, a
//! single accepted fragment and a top-5 rank list.

use crate::error::{QbhError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic representation used for both encoding and alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Up/Down/Same + Shorter/Longer/Equal transition symbols
    #[serde(alias = "uds")]
    Contour,
    /// Raw pitch numbers, matched with interval-aware DTW
    #[serde(alias = "dtw")]
    Absolute,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Contour => "contour",
            Encoding::Absolute => "absolute",
        }
    }

    /// Penalty subtracted per additional accepted fragment
    pub fn default_extra_fragment_penalty(&self) -> f64 {
        match self {
            Encoding::Contour => 0.10,
            Encoding::Absolute => 0.15,
        }
    }

    /// Upper bound on a fragment's normalized score, if any
    pub fn default_max_fragment_score(&self) -> Option<f64> {
        match self {
            Encoding::Contour => None,
            Encoding::Absolute => Some(3.0),
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Contour
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = QbhError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contour" | "uds" => Ok(Encoding::Contour),
            "absolute" | "dtw" => Ok(Encoding::Absolute),
            other => Err(QbhError::configuration(format!(
                "unknown encoding '{}' (expected contour or absolute)",
                other
            ))),
        }
    }
}

/// Configuration threaded through every matching stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub encoding: Encoding,
    /// Accepted run lengths lie in `[p * |query|, (3 - p) * |query|]`
    #[serde(default = "default_fragment_length_tolerance")]
    pub fragment_length_tolerance: f64,
    #[serde(default = "default_max_fragments")]
    pub max_fragments: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Falls back to the encoding's default when unset
    #[serde(default)]
    pub extra_fragment_penalty: Option<f64>,
    /// Falls back to the encoding's default when unset
    #[serde(default)]
    pub max_fragment_score: Option<f64>,
}

fn default_fragment_length_tolerance() -> f64 {
    0.6
}
fn default_max_fragments() -> usize {
    1
}
fn default_top_k() -> usize {
    5
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self::for_encoding(Encoding::default())
    }
}

impl MatchingConfig {
    pub fn for_encoding(encoding: Encoding) -> Self {
        Self {
            encoding,
            fragment_length_tolerance: default_fragment_length_tolerance(),
            max_fragments: default_max_fragments(),
            top_k: default_top_k(),
            extra_fragment_penalty: None,
            max_fragment_score: None,
        }
    }

    pub fn extra_fragment_penalty(&self) -> f64 {
        self.extra_fragment_penalty
            .unwrap_or_else(|| self.encoding.default_extra_fragment_penalty())
    }

    pub fn max_fragment_score(&self) -> Option<f64> {
        self.max_fragment_score
            .or_else(|| self.encoding.default_max_fragment_score())
    }

    /// Plausible run length window for a query of `query_len` tokens
    pub fn length_window(&self, query_len: usize) -> (f64, f64) {
        let p = self.fragment_length_tolerance;
        let n = query_len as f64;
        (p * n, (3.0 - p) * n)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let p = self.fragment_length_tolerance;
        if !(p > 0.0 && p < 1.5) {
            return Err(QbhError::configuration(format!(
                "fragment_length_tolerance must be in (0, 1.5), got {}",
                p
            )));
        }
        if self.max_fragments == 0 {
            return Err(QbhError::configuration("max_fragments must be >= 1"));
        }
        if self.top_k == 0 {
            return Err(QbhError::configuration("top_k must be >= 1"));
        }
        if !self.extra_fragment_penalty().is_finite() {
            return Err(QbhError::configuration(
                "extra_fragment_penalty must be a finite number",
            ));
        }
        if let Some(ceiling) = self.max_fragment_score {
            if ceiling.is_nan() || ceiling <= 0.0 {
                return Err(QbhError::configuration(
                    "max_fragment_score must be a positive number",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchingConfig::default();
        assert_eq!(config.encoding, Encoding::Contour);
        assert_eq!(config.max_fragments, 1);
        assert_eq!(config.top_k, 5);
        assert!((config.extra_fragment_penalty() - 0.10).abs() < 1e-12);
        assert_eq!(config.max_fragment_score(), None);
        assert!(config.validate().is_ok());

        let absolute = MatchingConfig::for_encoding(Encoding::Absolute);
        assert!((absolute.extra_fragment_penalty() - 0.15).abs() < 1e-12);
        assert_eq!(absolute.max_fragment_score(), Some(3.0));
    }

    #[test]
    fn test_length_window() {
        let config = MatchingConfig::default();
        let (lo, hi) = config.length_window(20);
        assert!((lo - 12.0).abs() < 1e-9);
        assert!((hi - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("contour".parse::<Encoding>().unwrap(), Encoding::Contour);
        assert_eq!("UDS".parse::<Encoding>().unwrap(), Encoding::Contour);
        assert_eq!("dtw".parse::<Encoding>().unwrap(), Encoding::Absolute);
        assert!(matches!(
            "default".parse::<Encoding>(),
            Err(QbhError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = MatchingConfig::default();
        config.fragment_length_tolerance = 1.5;
        assert!(config.validate().is_err());

        let mut config = MatchingConfig::default();
        config.max_fragments = 0;
        assert!(config.validate().is_err());

        let mut config = MatchingConfig::default();
        config.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = MatchingConfig::default();
        config.extra_fragment_penalty = Some(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_with_alias() {
        let config: MatchingConfig = toml::from_str(
            r#"
            encoding = "dtw"
            max_fragments = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.encoding, Encoding::Absolute);
        assert_eq!(config.max_fragments, 2);
        assert_eq!(config.top_k, 5);

        let unknown: std::result::Result<MatchingConfig, _> =
            toml::from_str(r#"encoding = "default""#);
        assert!(unknown.is_err());
    }
}
