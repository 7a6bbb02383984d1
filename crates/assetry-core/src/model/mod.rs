//! One UI-shaped struct per tracked entity kind.
//!
//! Every struct is `#[serde(rename_all = "camelCase", default)]` so a draft
//! can start from `Default` and a wire row with missing columns still reads.

/// Declares a closed string vocabulary stored verbatim on the wire.
///
/// Reading is lenient: spellings match case-insensitively and an unknown
/// value becomes the default, logged at warn level, so one odd row never
/// spoils a whole collection.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        $crate::error::Error::validation(format!(
                            "Unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(
                        vocabulary = stringify!($name),
                        value = %raw,
                        fallback = $name::$default.as_str(),
                        "Unknown value, using default"
                    );
                    $name::$default
                }))
            }
        }
    };
}

pub mod assets;
pub mod governance;
pub mod inventory;
pub mod kits;
pub mod operations;
pub mod people;

pub use assets::{Asset, Depreciation, Lifecycle};
pub use governance::{
    Alert, AlertLevel, AlertStatus, ComplianceCheck, ComplianceStatus, MaintenanceRecord,
    PolicyViolation, Priority, ViolationStatus,
};
pub use inventory::{Accessory, Component, Consumable, License};
pub use kits::{Kit, RequestableItem};
pub use operations::{ImportRecord, ImportStatus, Integration, Report};
pub use people::{Person, Preferences, UserProfile};
