//! Builder API for constructing interval and sequence machines.
//!
//! Builders collect configuration fluently and validate it in one pass at
//! `.build()`. Validation uses Stillwater's `Validation` so every problem is
//! reported together instead of stopping at the first.

pub mod error;
pub mod interval;
pub mod sequence;

pub use error::{BuildError, ConfigViolation};
pub use interval::IntervalBuilder;
pub use sequence::SequenceBuilder;

use crate::sequence::IntervalSpec;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Tick size used when none is configured.
pub const DEFAULT_TICK_SIZE: u64 = 1;

/// Tick period used when none is configured.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Check a timer configuration, accumulating ALL violations.
pub fn validate(
    intervals: &[IntervalSpec],
    tick_size: u64,
    tick_period: Duration,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

    checks.push(if tick_size == 0 {
        Validation::fail(ConfigViolation::ZeroTickSize)
    } else {
        Validation::success(())
    });

    checks.push(if tick_period.is_zero() {
        Validation::fail(ConfigViolation::ZeroTickPeriod)
    } else {
        Validation::success(())
    });

    for (index, interval) in intervals.iter().enumerate() {
        if interval.name.trim().is_empty() {
            checks.push(Validation::fail(ConfigViolation::EmptyName { index }));
        }
        // Divisibility is meaningless without a tick size; that is reported above.
        if tick_size != 0 && interval.duration % tick_size != 0 {
            checks.push(Validation::fail(ConfigViolation::DurationNotMultiple {
                name: interval.name.clone(),
                duration: interval.duration,
                tick_size,
            }));
        }
    }

    let total = intervals
        .iter()
        .try_fold(0u64, |total, interval| total.checked_add(interval.duration));
    if total.is_none() {
        checks.push(Validation::fail(ConfigViolation::TotalOverflow));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Run [`validate`] and turn the outcome into a `Result`.
pub(crate) fn check(
    intervals: &[IntervalSpec],
    tick_size: u64,
    tick_period: Duration,
) -> Result<(), BuildError> {
    match validate(intervals, tick_size, tick_period) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => {
            Err(BuildError::Invalid(violations.iter().cloned().collect()))
        }
    }
}
