//! Macro for declaring driven-port error enums.
//!
//! Each variant gets a `thiserror` message, a snake_case constructor taking
//! `impl Into<_>` for every field, and a `kind()` label for structured logs.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $(
                    #[doc = concat!("Failure detail (`", stringify!($field), "`).")]
                    $field: $ty
                ),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Construct [`" $name "::" $variant "`]."]
                    pub fn [<$variant:snake>]($( $($field: impl Into<$ty>),* )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*

                /// Snake-case variant label for log fields.
                #[must_use]
                pub const fn kind(&self) -> &'static str {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
