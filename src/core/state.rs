//! Core State trait for timer machine states.
//!
//! Both the interval and the sequence machine describe their position with a
//! plain enum implementing this trait. The trait only inspects; it never
//! mutates.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for machine state tags.
///
/// # Required Traits
///
/// - `Clone` + `PartialEq`: states are compared when resolving transitions
/// - `Debug`: states show up in tracing output
/// - `Serialize` + `Deserialize`: states travel inside snapshots
///
/// # Example
///
/// ```rust
/// use metronome::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     Blinking,
///     Burnt,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "off",
///             Self::Blinking => "blinking",
///             Self::Burnt => "burnt",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Burnt)
///     }
/// }
///
/// assert!(Lamp::Burnt.is_final());
/// assert_eq!(Lamp::Blinking.name(), "blinking");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used in logs and snapshots.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// A machine in a final state accepts no further events.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Phase {
        Idle,
        Counting,
        Finished,
    }

    impl State for Phase {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "idle",
                Self::Counting => "counting",
                Self::Finished => "finished",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Finished)
        }
    }

    #[test]
    fn name_matches_variant() {
        assert_eq!(Phase::Idle.name(), "idle");
        assert_eq!(Phase::Counting.name(), "counting");
        assert_eq!(Phase::Finished.name(), "finished");
    }

    #[test]
    fn only_terminal_state_is_final() {
        assert!(!Phase::Idle.is_final());
        assert!(!Phase::Counting.is_final());
        assert!(Phase::Finished.is_final());
    }

    #[test]
    fn default_is_final_is_false() {
        #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
        struct Forever;

        impl State for Forever {
            fn name(&self) -> &str {
                "forever"
            }
        }

        assert!(!Forever.is_final());
    }

    #[test]
    fn state_serializes_by_variant() {
        let json = serde_json::to_string(&Phase::Counting).unwrap();
        assert_eq!(json, "\"Counting\"");
        let back: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Phase::Counting);
    }
}
