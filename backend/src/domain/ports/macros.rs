//! Helper macro for declaring port error enums.
//!
//! Each variant carries a `message` captured from the failing adapter and a
//! snake_case convenience constructor accepting anything `Into<String>`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { message: String } => $format:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($format)]
                $variant { message: String },
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
