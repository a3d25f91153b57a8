//! Macro for implementing string conversions on wire enums
//!
//! Backend status fields travel as lowercase snake_case strings. This macro
//! gives an enum `as_str`, `Display` and a case-insensitive `FromStr` from one
//! variant table so query parameters and log fields use the same spelling as
//! the serde representation.
//!
//! # Example
//!
//! ```rust
//! use visadesk_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LinkState {
//!     Active,
//!     Expired,
//! }
//!
//! impl_domain_status_conversions!(LinkState {
//!     Active => "active",
//!     Expired => "expired",
//! });
//!
//! assert_eq!(LinkState::Expired.as_str(), "expired");
//! assert_eq!("ACTIVE".parse::<LinkState>().unwrap(), LinkState::Active);
//! ```

/// Implements `as_str`, Display and FromStr for wire enums
///
/// The string for each variant must match its serde name.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this variant
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ReviewState {
        Open,
        NeedsChanges,
        Approved,
    }

    impl_domain_status_conversions!(ReviewState {
        Open => "open",
        NeedsChanges => "needs_changes",
        Approved => "approved",
    });

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(ReviewState::NeedsChanges.to_string(), "needs_changes");
        assert_eq!(ReviewState::Approved.as_str(), "approved");
    }

    #[test]
    fn parse_ignores_case_and_padding() {
        assert_eq!(ReviewState::from_str(" OPEN ").unwrap(), ReviewState::Open);
        assert_eq!(ReviewState::from_str("Needs_Changes").unwrap(), ReviewState::NeedsChanges);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = ReviewState::from_str("closed").unwrap_err();
        assert_eq!(err, "Invalid ReviewState: closed");
    }
}
