//! Numeric field codes used by the Qase API.
//!
//! The API encodes severity, priority and friends as small integers. In
//! definition files the same fields may be written either as the number or
//! as a case-insensitive name ("critical", "to-be-automated").

use serde::Deserialize;
use thiserror::Error;

/// A code or name that does not map to any variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Either form a coded field may take when deserialized
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CodeOrName {
    Code(u8),
    Name(String),
}

/// Normalize a user-written name: lowercase, `-` and spaces become `_`
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Declare an API enum with its wire code and accepted names.
///
/// The first name is canonical (used for display); the rest are aliases.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal => $label:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(into = "u8", try_from = "crate::types::codes::CodeOrName")]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code ),+
        }

        impl $name {
            /// Every variant, in code order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Numeric code sent to the API
            pub fn code(self) -> u8 {
                self as u8
            }

            /// Canonical lowercase name
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = crate::types::codes::UnknownVariant;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(crate::types::codes::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::types::codes::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match crate::types::codes::normalize_name(s).as_str() {
                    $($label $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(crate::types::codes::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<crate::types::codes::CodeOrName> for $name {
            type Error = crate::types::codes::UnknownVariant;

            fn try_from(value: crate::types::codes::CodeOrName) -> Result<Self, Self::Error> {
                match value {
                    crate::types::codes::CodeOrName::Code(code) => Self::try_from(code),
                    crate::types::codes::CodeOrName::Name(name) => name.parse(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub(crate) use coded_enum;
