//! Macros for declaring machine state tags.

/// Declare a state enum and its `State` implementation in one go.
///
/// Each variant carries the label used in logs and snapshots. Variants listed
/// under `final:` are terminal.
///
/// # Example
///
/// ```
/// use metronome::state_enum;
/// use metronome::core::State;
///
/// state_enum! {
///     pub enum Door {
///         Closed => "closed",
///         Open => "open",
///         Welded => "welded",
///     }
///     final: [Welded]
/// }
///
/// assert_eq!(Door::Open.name(), "open");
/// assert!(Door::Welded.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum Light {
            Green => "green",
            Amber => "amber",
            Off => "off",
        }
        final: [Off]
    }

    #[test]
    fn macro_generates_names_and_finality() {
        assert_eq!(Light::Green.name(), "green");
        assert_eq!(Light::Amber.name(), "amber");
        assert!(!Light::Green.is_final());
        assert!(Light::Off.is_final());
    }

    #[test]
    fn macro_generates_display() {
        assert_eq!(Light::Amber.to_string(), "amber");
    }

    #[test]
    fn macro_supports_visibility() {
        state_enum! {
            pub enum Exposed {
                A => "a",
                B => "b",
            }
            final: [B]
        }

        assert!(Exposed::B.is_final());
    }

    #[test]
    fn macro_works_without_final_list() {
        state_enum! {
            enum Endless {
                One => "one",
                Two => "two",
            }
        }

        assert!(!Endless::One.is_final());
        assert!(!Endless::Two.is_final());
    }
}
