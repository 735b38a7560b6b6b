//! Interface declarations.
//!
//! An interface is the contract shared by the calling side and the serving side:
//! a set of method signatures. [`interface!`](crate::interface!) declares one and
//! generates two things from a single list of methods:
//!
//! - a marker type implementing [`Interface`], whose [`Interface::methods`] lists
//!   every declared signature (fed to [`ExposureRegistry::declare`](crate::ExposureRegistry::declare));
//! - a client stub whose async methods turn each call into a request, send it
//!   through a [`Proxy`](crate::Proxy) and unwrap the returned envelope.
//!
//! A method can carry a different wire name with `as "name"`, which is how two
//! overloads sharing a wire name are written in Rust:
//!
//! ```
//! lpfcp::interface! {
//!     pub interface Greeter => GreeterClient {
//!         fn greet(name: String) -> String;
//!         fn greet_many(names: Vec<String>) -> String as "greet";
//!     }
//! }
//!
//! use lpfcp::Interface;
//! let names: Vec<String> = Greeter::methods().iter().map(|m| m.to_string()).collect();
//! assert_eq!(names, vec!["greet(string)", "greet(list<string>)"]);
//! ```

use crate::descriptor::MethodSignature;

/// A declared set of remotely callable methods.
pub trait Interface {
    /// Interface name, used in logs.
    const NAME: &'static str;

    /// Every declared signature, in declaration order.
    fn methods() -> Vec<MethodSignature>;
}

/// Declare an interface and generate its client stub.
///
/// ```text
/// interface! {
///     pub interface Name => NameClient {
///         fn method(arg: Type, ...) -> Return;
///         fn rust_name(arg: Type, ...) -> Return as "wireName";
///     }
/// }
/// ```
///
/// Stub methods return `lpfcp::Result<Return>`: the success value, a
/// [`LpfcpError::Remote`](crate::LpfcpError::Remote) for a failure envelope, or a
/// transport error.
#[macro_export]
macro_rules! interface {
    (
        $(#[$meta:meta])*
        $vis:vis interface $name:ident => $client:ident {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident($($arg:ident : $arg_ty:ty),* $(,)?) -> $ret:ty $(as $wire:literal)?;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::Interface for $name {
            const NAME: &'static str = stringify!($name);

            fn methods() -> ::std::vec::Vec<$crate::MethodSignature> {
                ::std::vec![
                    $(
                        $crate::MethodSignature::of::<($($arg_ty,)*)>(
                            $crate::__wire_name!($method $(, $wire)?)
                        )
                    ),*
                ]
            }
        }

        #[doc = concat!("Client stub for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone)]
        $vis struct $client {
            proxy: $crate::Proxy,
        }

        impl $client {
            pub fn new(proxy: $crate::Proxy) -> Self {
                Self { proxy }
            }

            pub fn proxy(&self) -> &$crate::Proxy {
                &self.proxy
            }

            $(
                $(#[$method_meta])*
                pub async fn $method(&self, $($arg: $arg_ty),*) -> $crate::Result<$ret> {
                    self.proxy
                        .invoke::<($($arg_ty,)*), $ret>(
                            $crate::__wire_name!($method $(, $wire)?),
                            ($($arg,)*),
                        )
                        .await
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_name {
    ($method:ident) => {
        stringify!($method)
    };
    ($method:ident, $wire:literal) => {
        $wire
    };
}
