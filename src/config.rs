//! Application configuration.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `vocab.toml` in the working directory, or an explicit file
//! 3. `VOCAB_*` environment variables (`VOCAB_MATCHING__STRONG_RATIO` for nested keys)

use crate::error::Result;
use crate::models::MoveCountPolicy;
use crate::models::sm2::DEFAULT_DUE_LIMIT;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "vocab.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: PathBuf,
    /// Practice pool size when a command doesn't ask for a specific one.
    pub due_limit: usize,
    /// Grading rule for the pair-matching game.
    pub matching: MoveCountPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("vocab.sqlite3"),
            due_limit: DEFAULT_DUE_LIMIT,
            matching: MoveCountPolicy::default(),
        }
    }
}

impl Config {
    /// Loads `vocab.toml` from the working directory (if present) plus env overrides.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("VOCAB_").split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml_content))
            .extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchingOutcome, Quality, QualityPolicy};

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.due_limit, 20);
    }

    #[test]
    fn test_overrides_from_toml() {
        let config = Config::from_toml_str(
            r#"
            database_path = "/tmp/words.sqlite3"
            due_limit = 8

            [matching]
            strong_ratio = 1.5
            strong_quality = 4
            weak_quality = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/words.sqlite3"));
        assert_eq!(config.due_limit, 8);
        let outcome = MatchingOutcome { pairs: 4, moves: 7 };
        assert_eq!(config.matching.assess(&outcome), Quality::new(2).unwrap());
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let result = Config::from_toml_str(
            r#"
            [matching]
            strong_ratio = 2.0
            strong_quality = 9
            weak_quality = 3
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.due_limit, DEFAULT_DUE_LIMIT);
    }
}
