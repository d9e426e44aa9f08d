//! TOML settings file
//!
//! ```toml
//! [catalog]
//! path = "db/catalog.json"
//!
//! [matching]
//! encoding = "contour"
//! fragment_length_tolerance = 0.6
//! max_fragments = 1
//! top_k = 5
//! ```

use crate::config::MatchingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QbhSettings {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Where the reference catalog lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "./db/catalog.json".to_string()
}

impl QbhSettings {
    /// Load settings from a TOML file and validate the matching section
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read settings file {}: {}", path.display(), e)
        })?;
        let settings: QbhSettings = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML settings: {}", e))?;
        settings.matching.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Encoding;

    #[test]
    fn test_default_settings() {
        let settings = QbhSettings::default();
        assert_eq!(settings.catalog.path, "./db/catalog.json");
        assert_eq!(settings.matching, MatchingConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [catalog]
            path = "/srv/qbh/catalog.json"

            [matching]
            encoding = "absolute"
            fragment_length_tolerance = 0.5
            max_fragments = 2
            top_k = 10
            extra_fragment_penalty = 0.2
        "#;

        let settings: QbhSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.catalog.path, "/srv/qbh/catalog.json");
        assert_eq!(settings.matching.encoding, Encoding::Absolute);
        assert_eq!(settings.matching.max_fragments, 2);
        assert_eq!(settings.matching.top_k, 10);
        assert_eq!(settings.matching.extra_fragment_penalty(), 0.2);
    }

    #[test]
    fn test_load_rejects_invalid_matching() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qbh.toml");
        std::fs::write(&path, "[matching]\nfragment_length_tolerance = 2.0\n").unwrap();

        let err = QbhSettings::load(&path).unwrap_err();
        assert!(err.to_string().contains("fragment_length_tolerance"));
    }

    #[test]
    fn test_load_rejects_unknown_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qbh.toml");
        std::fs::write(&path, "[matching]\nencoding = \"default\"\n").unwrap();

        assert!(QbhSettings::load(&path).is_err());
    }
}
