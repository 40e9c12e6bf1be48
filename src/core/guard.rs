//! Guard predicates for automatic transitions.
//!
//! A guard inspects a machine's context and decides whether an eventless
//! transition may fire. Guards are pure: they read the context and never
//! change it.

/// Pure predicate over a machine context.
///
/// # Example
///
/// ```rust
/// use metronome::core::Guard;
///
/// struct Countdown {
///     left: u64,
/// }
///
/// let finished = Guard::new(|c: &Countdown| c.left == 0);
///
/// assert!(finished.check(&Countdown { left: 0 }));
/// assert!(!finished.check(&Countdown { left: 4 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against a context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> std::fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}
