//! Portfolio records as stored in PostgreSQL.
//!
//! Choice fields are persisted as short lowercase codes (`"language"`, `"dark"`, ...).
//! Each code set has a typed enum that knows its display label; rows keep the raw
//! code so an unknown value in the database never fails a read.

/// Declares a closed set of stored codes with their display labels.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident,
        { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Code stored in the database and submitted by forms.
            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn parse(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Parses a stored code, falling back to the default for unknown values.
            pub fn from_stored(code: &str) -> Self {
                Self::parse(code).unwrap_or_default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

pub mod experience;
pub mod preference;
pub mod profile;
pub mod project;
pub mod service;
pub mod skill;
pub mod user;

pub use experience::Experience;
pub use preference::{Accent, Density, Section, Theme, UserPreference};
pub use profile::Profile;
pub use project::{Project, ProjectWithSkills};
pub use service::{Service, ServiceCategory};
pub use skill::{Skill, SkillCategory};
pub use user::User;
