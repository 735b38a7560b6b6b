//! Overload resolution.
//!
//! A request names a method and the descriptors of its declared parameter types.
//! Resolution is an exact lookup on that pair: same name, same arity, same
//! descriptors in the same order. There is no widening, no defaulting and no
//! guessing from argument values.

use crate::descriptor::MethodSignature;
use crate::envelope::{Failure, FailureKind};
use crate::registry::{ExposedMethod, ExposureRegistry};
use thiserror::Error;

/// Why a request did not resolve to an exposed method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No exposed method matches {signature}")]
    NotFound {
        signature: MethodSignature,
        /// Exposed overloads sharing the requested name.
        candidates: Vec<MethodSignature>,
    },

    #[error("Method {signature} is declared but not exposed")]
    NotExposed { signature: MethodSignature },
}

impl ResolveError {
    pub fn signature(&self) -> &MethodSignature {
        match self {
            ResolveError::NotFound { signature, .. } | ResolveError::NotExposed { signature } => {
                signature
            }
        }
    }

    /// Collapse `NotExposed` into `NotFound` so the two cannot be told apart remotely.
    pub fn conceal(self) -> Self {
        match self {
            ResolveError::NotExposed { signature } => ResolveError::NotFound {
                signature,
                candidates: Vec::new(),
            },
            other => other,
        }
    }
}

impl From<ResolveError> for Failure {
    fn from(err: ResolveError) -> Self {
        match &err {
            ResolveError::NotFound { candidates, .. } if !candidates.is_empty() => {
                let candidates: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
                Failure::new(
                    FailureKind::MethodNotFound,
                    format!("{} (exposed overloads: {})", err, candidates.join(", ")),
                )
            }
            ResolveError::NotFound { .. } => {
                Failure::new(FailureKind::MethodNotFound, err.to_string())
            }
            ResolveError::NotExposed { .. } => {
                Failure::new(FailureKind::NotExposed, err.to_string())
            }
        }
    }
}

/// Find the exposed method for `signature`.
pub fn resolve<'r, T>(
    registry: &'r ExposureRegistry<T>,
    signature: &MethodSignature,
) -> Result<&'r ExposedMethod<T>, ResolveError> {
    if let Some(method) = registry.get(signature) {
        return Ok(method);
    }

    if registry.is_declared(signature) {
        return Err(ResolveError::NotExposed {
            signature: signature.clone(),
        });
    }

    Err(ResolveError::NotFound {
        signature: signature.clone(),
        candidates: registry
            .overloads(&signature.name)
            .into_iter()
            .cloned()
            .collect(),
    })
}
