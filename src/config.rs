//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all)
//! yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Change feed behaviour.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Change feed queue and reconnect policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Delay before the first reconnect attempt, in milliseconds.
    #[serde(default = "default_reconnect_initial_delay_ms")]
    pub reconnect_initial_delay_ms: u64,
    /// Upper bound on the reconnect delay, in milliseconds.
    #[serde(default = "default_reconnect_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
    /// Reconnect attempts before giving up; `0` retries forever.
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
    /// Capacity of the notification queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reconnect_initial_delay_ms: default_reconnect_initial_delay_ms(),
            reconnect_max_delay_ms: default_reconnect_max_delay_ms(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `TRELLIS_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

const fn default_reconnect_initial_delay_ms() -> u64 {
    250
}

const fn default_reconnect_max_delay_ms() -> u64 {
    30_000
}

const fn default_reconnect_max_attempts() -> u32 {
    8
}

const fn default_queue_capacity() -> usize {
    1024
}

fn default_filter() -> String {
    "trellis=info,warn".to_owned()
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid configuration TOML.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The reconnect bounds contradict each other.
    #[error("reconnect_initial_delay_ms ({initial}) exceeds reconnect_max_delay_ms ({max})")]
    InvertedBackoff {
        /// Configured initial delay.
        initial: u64,
        /// Configured maximum delay.
        max: u64,
    },
}

impl EngineConfig {
    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::InvertedBackoff`] for contradictory reconnect bounds.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validated()
    }

    /// Loads configuration from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file exists but cannot be read,
    /// or any error from [`EngineConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(document) => Self::from_toml_str(&document),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let FeedConfig {
            reconnect_initial_delay_ms: initial,
            reconnect_max_delay_ms: max,
            ..
        } = self.feed;
        if initial > max {
            return Err(ConfigError::InvertedBackoff { initial, max });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig, LogFormat};
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.feed.reconnect_initial_delay_ms, 250);
        assert_eq!(config.feed.reconnect_max_delay_ms, 30_000);
        assert_eq!(config.feed.reconnect_max_attempts, 8);
        assert_eq!(config.feed.queue_capacity, 1024);
        assert_eq!(config.logging.filter, "trellis=info,warn");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = EngineConfig::from_toml_str(
            "[feed]\nreconnect_max_attempts = 0\n\n[logging]\nformat = \"json\"\n",
        )
        .expect("partial config parses");
        assert_eq!(config.feed.reconnect_max_attempts, 0);
        assert_eq!(config.feed.reconnect_initial_delay_ms, 250);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "trellis=info,warn");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = EngineConfig::from_toml_str("[feed]\nretry = true\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn inverted_backoff_is_rejected() {
        let result = EngineConfig::from_toml_str(
            "[feed]\nreconnect_initial_delay_ms = 500\nreconnect_max_delay_ms = 100\n",
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvertedBackoff {
                initial: 500,
                max: 100
            })
        ));
    }

    #[test]
    fn load_reads_file_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = EngineConfig::load(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(missing, EngineConfig::default());

        let path = dir.path().join("trellis.toml");
        let mut file = std::fs::File::create(&path).expect("create config");
        writeln!(file, "[feed]\nqueue_capacity = 16").expect("write config");
        let loaded = EngineConfig::load(&path).expect("load config");
        assert_eq!(loaded.feed.queue_capacity, 16);
    }
}
