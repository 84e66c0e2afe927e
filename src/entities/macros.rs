//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the repetitive struct and trait code every stored
//! record needs.

/// Define a stored record with automatic trait implementations
///
/// Generates the struct with `id`, the specific fields, `createdAt` and
/// `updatedAt`, an [`Entity`](crate::core::entity::Entity) implementation
/// and a `new` constructor that assigns a fresh id and timestamps. An
/// optional `unique = [...]` list names fields the stores keep unique.
///
/// # Example
///
/// ```rust,ignore
/// use logistics::prelude::*;
///
/// impl_record_entity!(
///     Truck,
///     "truck",
///     "trucks",
///     unique = ["plates"],
///     {
///         year: String,
///         color: String,
///         plates: String,
///         user: RecordId,
///     }
/// );
///
/// let truck = Truck::new("2020".into(), "red".into(), "ABC1234".into(), owner_id);
/// ```
#[macro_export]
macro_rules! impl_record_entity {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        $( unique = [ $( $unique:literal ),* $(,)? ], )?
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this record
            pub id: $crate::core::id::RecordId,

            $( $(#[$field_meta])* pub $field : $field_type, )*

            /// When this record was created
            #[serde(rename = "createdAt")]
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            #[serde(rename = "updatedAt")]
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> $crate::core::id::RecordId {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn touch(&mut self) {
                self.updated_at = $crate::core::entity::timestamp();
            }

            fn type_name() -> &'static str {
                stringify!($type)
            }

            fn unique_fields() -> &'static [&'static str] {
                &[ $( $( $unique ),* )? ]
            }
        }

        impl $type {
            /// Create a new record with a fresh id
            #[allow(clippy::too_many_arguments)]
            pub fn new( $( $field: $field_type ),* ) -> Self {
                let now = $crate::core::entity::timestamp();
                Self {
                    id: $crate::core::id::RecordId::new(),
                    $( $field, )*
                    created_at: now,
                    updated_at: now,
                }
            }
        }
    };
}
