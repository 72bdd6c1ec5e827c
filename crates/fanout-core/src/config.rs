//! Processor configuration.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// How a batch admits its units of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Admission {
    /// One task per item, each waiting on a semaphore slot.
    #[default]
    PerItem,

    /// `min(concurrency, items)` workers draining a shared queue.
    Pooled,
}

/// Immutable service configuration.
///
/// `timeout` and `max_retries` are carried and logged but not consulted by
/// any code path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,

    pub max_retries: u32,

    /// Maximum number of transformations running at once.
    pub concurrency: NonZeroUsize,

    pub admission: Admission,
}

impl Config {
    pub fn new(
        timeout: Duration,
        max_retries: u32,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        let concurrency = NonZeroUsize::new(concurrency).ok_or(ConfigError::ZeroConcurrency)?;
        Ok(Self {
            timeout,
            max_retries,
            concurrency,
            admission: Admission::default(),
        })
    }

    pub fn with_admission(mut self, admission: Admission) -> Self {
        self.admission = admission;
        self
    }

    /// Parse a JSON document. Missing fields fall back to [`Config::default`].
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            concurrency: DEFAULT_CONCURRENCY,
            admission: Admission::PerItem,
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_startup_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.concurrency.get(), 10);
        assert_eq!(cfg.admission, Admission::PerItem);
    }

    #[test]
    fn new_rejects_zero_concurrency() {
        let err = Config::new(Duration::from_secs(1), 0, 0).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroConcurrency));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "concurrency": 2, "admission": "pooled" }"#).unwrap();
        assert_eq!(cfg.concurrency.get(), 2);
        assert_eq!(cfg.admission, Admission::Pooled);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_retries, 3);
    }

    #[test]
    fn json_uses_millisecond_timeout() {
        let cfg = Config::from_json_str(r#"{ "timeout_ms": 1500 }"#).unwrap();
        assert_eq!(cfg.timeout, Duration::from_millis(1500));

        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(value["timeout_ms"], 1500);
        assert_eq!(value["admission"], "per-item");
    }

    #[test]
    fn json_rejects_zero_concurrency() {
        let err = Config::from_json_str(r#"{ "concurrency": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
