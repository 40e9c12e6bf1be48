//! Timer configuration.
//!
//! A configuration is a static, ordered list of named intervals plus the tick
//! size and tick period. It is read once at start-up (from TOML or JSON) and
//! never changes during a run.
//!
//! ```toml
//! tick_size = 1
//! tick_period_ms = 1000
//!
//! [[intervals]]
//! name = "Int 1"
//! duration = 3
//!
//! [[intervals]]
//! name = "Int 2"
//! duration = 5
//! ```

pub mod error;

pub use error::ConfigError;

use crate::builder::{BuildError, SequenceBuilder};
use crate::clock::Scheduler;
use crate::sequence::{IntervalSpec, SequenceMachine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn default_tick_size() -> u64 {
    crate::builder::DEFAULT_TICK_SIZE
}

fn default_tick_period_ms() -> u64 {
    1000
}

/// Static description of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub intervals: Vec<IntervalSpec>,

    #[serde(default = "default_tick_size")]
    pub tick_size: u64,

    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            intervals: vec![IntervalSpec::new("Int 1", 3), IntervalSpec::new("Int 2", 5)],
            tick_size: default_tick_size(),
            tick_period_ms: default_tick_period_ms(),
        }
    }
}

impl TimerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a configuration file, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// A builder preloaded with this configuration.
    pub fn builder(&self) -> SequenceBuilder {
        SequenceBuilder::new()
            .intervals(self.intervals.iter().cloned())
            .tick_size(self.tick_size)
            .tick_period(self.tick_period())
    }

    /// Build a `ready` sequence on `scheduler`.
    pub fn build(&self, scheduler: Arc<dyn Scheduler>) -> Result<SequenceMachine, BuildError> {
        self.builder().shared_scheduler(scheduler).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualScheduler;
    use std::io::Write;

    #[test]
    fn default_matches_reference_run() {
        let config = TimerConfig::default();

        assert_eq!(config.intervals.len(), 2);
        assert_eq!(config.intervals[0], IntervalSpec::new("Int 1", 3));
        assert_eq!(config.intervals[1], IntervalSpec::new("Int 2", 5));
        assert_eq!(config.tick_size, 1);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn toml_fills_in_defaults() {
        let config = TimerConfig::from_toml_str(
            r#"
            [[intervals]]
            name = "Focus"
            duration = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.intervals, vec![IntervalSpec::new("Focus", 25)]);
        assert_eq!(config.tick_size, 1);
        assert_eq!(config.tick_period_ms, 1000);
    }

    #[test]
    fn json_parses_all_fields() {
        let config = TimerConfig::from_json_str(
            r#"{"intervals":[{"name":"A","duration":4}],"tick_size":2,"tick_period_ms":10}"#,
        )
        .unwrap();

        assert_eq!(config.tick_size, 2);
        assert_eq!(config.tick_period(), Duration::from_millis(10));
    }

    #[test]
    fn malformed_input_is_reported() {
        let err = TimerConfig::from_toml_str("intervals = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "tick_size = 1\n[[intervals]]\nname = \"X\"\nduration = 2").unwrap();

        let config = TimerConfig::load(file.path()).unwrap();
        assert_eq!(config.intervals, vec![IntervalSpec::new("X", 2)]);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();

        let err = TimerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TimerConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn build_validates_configuration() {
        let config = TimerConfig {
            intervals: vec![IntervalSpec::new("Odd", 3)],
            tick_size: 2,
            tick_period_ms: 1000,
        };

        let result = config.build(Arc::new(ManualScheduler::new()));
        assert!(matches!(result, Err(BuildError::Invalid(_))));
    }
}
