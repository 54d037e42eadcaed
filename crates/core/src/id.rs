//! Strongly-typed identifiers used across the domain.
//!
//! Each record type gets its own UUID newtype so a variant id can never be
//! passed where an attribute value id is expected.

/// Declare a UUID-backed identifier newtype.
///
/// The generated type is `Copy`, ordered, hashable and serializes as a bare
/// UUID string.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $vis:vis struct $t:ident;) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            $crate::__private::serde::Serialize,
            $crate::__private::serde::Deserialize,
        )]
        #[serde(crate = "storefront_core::__private::serde", transparent)]
        $vis struct $t($crate::__private::uuid::Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self($crate::__private::uuid::Uuid::now_v7())
            }

            pub fn from_uuid(uuid: $crate::__private::uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &$crate::__private::uuid::Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::__private::uuid::Uuid> for $t {
            fn from(value: $crate::__private::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $crate::__private::uuid::Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = $crate::__private::uuid::Uuid::parse_str(s).map_err(|e| {
                    $crate::DomainError::invalid_id(format!("{}: {}", stringify!($t), e))
                })?;
                Ok(Self(uuid))
            }
        }
    };
}
