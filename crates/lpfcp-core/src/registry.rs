//! Exposure registry.
//!
//! The allow-list of remotely callable methods for one target type. A method is
//! callable only if it was registered with [`ExposureRegistry::expose`] or
//! [`ExposureRegistry::expose_fallible`]. Declaring an interface
//! ([`ExposureRegistry::declare`]) only records which signatures exist so that
//! misses can be reported as `NotExposed`; it never makes anything callable.
//!
//! ```
//! use lpfcp::ExposureRegistry;
//!
//! struct Calculator;
//!
//! let registry = ExposureRegistry::<Calculator>::new()
//!     .expose("add", |_: &Calculator, (a, b): (i32, i32)| a + b)?
//!     .expose("add", |_: &Calculator, (a, b): (String, String)| a + &b)?;
//!
//! assert!(registry.is_exposed("add", &[lpfcp::TypeDescriptor::from("i32"), "i32".into()]));
//! # Ok::<(), lpfcp::LpfcpError>(())
//! ```

use crate::descriptor::{Arguments, MethodSignature, TypeDescriptor};
use crate::encoding::encode_value;
use crate::envelope::{Failure, FailureKind};
use crate::interface::Interface;
use crate::{LpfcpError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

type Handler<T> = dyn Fn(&T, Vec<Value>) -> std::result::Result<Value, Failure> + Send + Sync;

/// One exposed overload: its signature and the type-erased call into the target.
pub struct ExposedMethod<T> {
    signature: MethodSignature,
    handler: Box<Handler<T>>,
}

impl<T> ExposedMethod<T> {
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    /// Decode `arguments`, run the method against `target`, and encode the return value.
    ///
    /// Errors are already wire-safe: `InvalidArguments`, `InvocationFailure` (with
    /// the method's own error as cause) or `EncodingFailure`.
    pub fn invoke(&self, target: &T, arguments: Vec<Value>) -> std::result::Result<Value, Failure> {
        (self.handler)(target, arguments)
    }
}

impl<T> fmt::Debug for ExposedMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExposedMethod")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Allow-list of exposed methods for targets of type `T`.
pub struct ExposureRegistry<T> {
    exposed: HashMap<MethodSignature, ExposedMethod<T>>,
    declared: HashSet<MethodSignature>,
}

impl<T> Default for ExposureRegistry<T> {
    fn default() -> Self {
        Self {
            exposed: HashMap::new(),
            declared: HashSet::new(),
        }
    }
}

impl<T> fmt::Debug for ExposureRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExposureRegistry")
            .field("exposed", &self.exposed.keys().collect::<Vec<_>>())
            .field("declared", &self.declared)
            .finish()
    }
}

impl<T: 'static> ExposureRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every method of interface `I` as declared.
    pub fn declare<I: Interface>(mut self) -> Self {
        let methods = I::methods();
        debug!("Declaring interface {} ({} methods)", I::NAME, methods.len());
        self.declared.extend(methods);
        self
    }

    /// Record one declared signature.
    pub fn declare_signature(mut self, signature: MethodSignature) -> Self {
        self.declared.insert(signature);
        self
    }

    /// Expose an infallible method.
    ///
    /// The parameter descriptors come from the argument tuple `A`.
    pub fn expose<A, R, F>(self, name: &str, method: F) -> Result<Self>
    where
        A: Arguments + 'static,
        R: Serialize + 'static,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        self.expose_fallible(name, move |target: &T, args: A| {
            Ok::<R, std::convert::Infallible>(method(target, args))
        })
    }

    /// Expose a method that can fail with its own error type.
    ///
    /// Registering a second method with an identical signature is rejected here,
    /// not at call time.
    pub fn expose_fallible<A, R, E, F>(mut self, name: &str, method: F) -> Result<Self>
    where
        A: Arguments + 'static,
        R: Serialize + 'static,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&T, A) -> std::result::Result<R, E> + Send + Sync + 'static,
    {
        let signature = MethodSignature::of::<A>(name);
        if name.is_empty() {
            return Err(LpfcpError::Config {
                message: "exposed method name must not be empty".to_string(),
            });
        }
        if self.exposed.contains_key(&signature) {
            return Err(LpfcpError::DuplicateExposure(signature));
        }

        let display = signature.to_string();
        let handler = move |target: &T, values: Vec<Value>| {
            let args = A::decode(values).map_err(|e| {
                Failure::new(
                    FailureKind::InvalidArguments,
                    format!("Invalid arguments for {}: {}", display, e),
                )
            })?;
            let value = method(target, args).map_err(|e| {
                Failure::new(
                    FailureKind::InvocationFailure,
                    format!("Exposed method {} failed", display),
                )
                .caused_by(Failure::from_error(e))
            })?;
            encode_value(&value).map_err(|e| {
                Failure::new(
                    FailureKind::EncodingFailure,
                    format!("Return value of {} could not be encoded: {}", display, e),
                )
            })
        };

        debug!("Exposing {}", signature);
        self.exposed.insert(
            signature.clone(),
            ExposedMethod {
                signature,
                handler: Box::new(handler),
            },
        );
        Ok(self)
    }
}

impl<T> ExposureRegistry<T> {
    /// Whether `name(parameter_types)` is remotely callable.
    pub fn is_exposed(&self, name: &str, parameter_types: &[TypeDescriptor]) -> bool {
        self.exposed
            .contains_key(&MethodSignature::new(name, parameter_types.to_vec()))
    }

    /// Whether the signature was declared by an interface.
    pub fn is_declared(&self, signature: &MethodSignature) -> bool {
        self.declared.contains(signature)
    }

    /// Look up the exposed method with exactly this signature.
    pub fn get(&self, signature: &MethodSignature) -> Option<&ExposedMethod<T>> {
        self.exposed.get(signature)
    }

    /// Exposed overloads sharing `name`, sorted by their display form.
    pub fn overloads(&self, name: &str) -> Vec<&MethodSignature> {
        let mut overloads: Vec<_> = self.exposed.keys().filter(|s| s.name == name).collect();
        overloads.sort_by_key(|s| s.to_string());
        overloads
    }

    /// All exposed signatures.
    pub fn signatures(&self) -> impl Iterator<Item = &MethodSignature> {
        self.exposed.keys()
    }

    pub fn len(&self) -> usize {
        self.exposed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exposed.is_empty()
    }
}
