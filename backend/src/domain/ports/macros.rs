//! `define_port_error!`: declares a `thiserror` enum for a driven port plus
//! one snake-case constructor per variant.
//!
//! String-like fields accept `impl Into<T>`, so adapters can write
//! `CatalogRepositoryError::transport(err.to_string())` or pass `&str`
//! literals directly.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unavailable => "store unavailable",
            Rejected { status: u16, body: String } => "rejected with {status}: {body}",
            Transport { message: String } => "transport failed: {message}",
        }
    }

    #[test]
    fn unit_variant_gets_a_nullary_constructor() {
        assert_eq!(SamplePortError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn mixed_fields_accept_into_conversions() {
        let err = SamplePortError::rejected(403_u16, "forbidden");
        assert_eq!(err.to_string(), "rejected with 403: forbidden");
    }

    #[test]
    fn string_fields_accept_owned_strings() {
        let err = SamplePortError::transport(String::from("connection reset"));
        assert_eq!(
            err,
            SamplePortError::Transport {
                message: "connection reset".to_owned()
            }
        );
    }
}
