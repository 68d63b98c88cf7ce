//! Search configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AlphaBeta, Minimax, MoveStrategy, SearchLimits};

/// Errors that can occur when loading or validating a search configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Failed to render the configuration as TOML.
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    /// A search needs at least one ply.
    #[error("Search depth must be at least 1, got {0}")]
    InvalidDepth(u32),
}

/// Which search algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Minimax,
    #[default]
    AlphaBeta,
}

/// Search settings.
///
/// Every field is optional in the file:
///
/// ```toml
/// strategy = "alpha_beta"
/// depth = 4
/// max_time_ms = 5000
/// use_book = true
/// book_path = "book.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Search depth in plies. Defaults to 4.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Time budget per search. Unlimited if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_ms: Option<u64>,
    /// Consult the opening book before searching. Defaults to true.
    #[serde(default = "default_use_book")]
    pub use_book: bool,
    /// JSON opening book to load when `use_book` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_path: Option<PathBuf>,
}

fn default_depth() -> u32 {
    4
}

fn default_use_book() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: StrategyKind::default(),
            depth: default_depth(),
            max_time_ms: None,
            use_book: default_use_book(),
            book_path: None,
        }
    }
}

impl SearchConfig {
    /// Loads the configuration at `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::InvalidDepth`] for a zero depth.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::InvalidDepth(self.depth));
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        match self.max_time_ms {
            Some(ms) => SearchLimits::none().with_max_time(Duration::from_millis(ms)),
            None => SearchLimits::none(),
        }
    }

    /// Builds the configured strategy with the standard evaluator, applying
    /// `limits` (usually [`limits`](Self::limits) plus a stop flag).
    pub fn build_strategy(&self, limits: SearchLimits) -> Box<dyn MoveStrategy + Send> {
        match self.strategy {
            StrategyKind::Minimax => Box::new(Minimax::new(self.depth).with_limits(limits)),
            StrategyKind::AlphaBeta => Box::new(AlphaBeta::new(self.depth).with_limits(limits)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SearchConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.strategy, StrategyKind::AlphaBeta);
        assert_eq!(config.depth, 4);
        assert!(config.use_book);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "strategy = \"minimax\"\nmax_time_ms = 250").unwrap();
        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.strategy, StrategyKind::Minimax);
        assert_eq!(config.depth, 4);
        assert_eq!(config.limits().max_time(), Some(Duration::from_millis(250)));
        assert_eq!(config.build_strategy(config.limits()).name(), "minimax");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "depth = \"deep\"").unwrap();
        assert!(matches!(
            SearchConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(matches!(
            SearchConfig::from_toml_str("depth = 0"),
            Err(ConfigError::InvalidDepth(0))
        ));
    }

    #[test]
    fn survives_a_save_and_load() {
        let config = SearchConfig {
            strategy: StrategyKind::Minimax,
            depth: 3,
            max_time_ms: Some(1000),
            use_book: false,
            book_path: Some(PathBuf::from("book.json")),
        };
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();
        assert_eq!(SearchConfig::load(file.path()).unwrap(), config);
    }
}
