//! `define_port_error!` declares a `thiserror` enum for a port and gives every
//! variant a snake_case constructor whose fields accept `impl Into<_>`.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Offline => "store offline",
//!         Rejected { reason: String } => "rejected: {reason}",
//!     }
//! }
//!
//! let err = StoreError::rejected("quota");
//! ```

macro_rules! define_port_error {
    (
        $(#[$attr:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_attr:meta])*
                $variant:ident $({ $($field:ident : $ty:ty),* $(,)? })? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_attr])*
                #[error($message)]
                $variant $({ $($field: $ty),* })?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Build [`" $name "::" $variant "`]."]
                    #[must_use]
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant $({ $($field: $field.into()),* })?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
