//! Build errors for interval and sequence builders.

use thiserror::Error;

/// Errors that can occur when building machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Scheduler not specified. Call .scheduler(..) before .build()")]
    MissingScheduler,

    #[error("Invalid timer configuration: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),
}

impl BuildError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            Self::Invalid(violations) => violations,
            Self::MissingScheduler => &[],
        }
    }
}

/// A single problem found while validating a timer configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("tick size must be greater than zero")]
    ZeroTickSize,

    #[error("tick period must be greater than zero")]
    ZeroTickPeriod,

    #[error("interval '{name}' lasts {duration}, not a multiple of tick size {tick_size}")]
    DurationNotMultiple {
        name: String,
        duration: u64,
        tick_size: u64,
    },

    #[error("interval at position {index} has an empty name")]
    EmptyName { index: usize },

    #[error("total duration of all intervals exceeds {}", u64::MAX)]
    TotalOverflow,
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
