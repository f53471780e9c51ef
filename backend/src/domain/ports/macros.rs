//! Helper macro for generating domain port error enums.
//!
//! Every driven port exposes the same error shape: a small enum of failure
//! categories, each carrying a message. The macro derives the `thiserror`
//! plumbing and snake_case constructors so adapters can write
//! `FooRepositoryError::connection("...")` without boilerplate.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    /// Adapter-supplied failure description.
                    message: String,
                },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    /// Construct this failure category from any message-like input.
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error for macro coverage.
        pub enum ExamplePortError {
            /// Connection failure.
            Connection => "example connection failed: {message}",
            /// Query failure.
            Query => "example query failed: {message}",
        }
    }

    #[test]
    fn constructors_accept_str() {
        let err = ExamplePortError::connection("refused");
        assert_eq!(err.to_string(), "example connection failed: refused");
    }

    #[test]
    fn variants_compare_by_value() {
        assert_eq!(
            ExamplePortError::query("boom"),
            ExamplePortError::Query {
                message: "boom".into()
            }
        );
    }
}
