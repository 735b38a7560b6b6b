//! Result envelope.
//!
//! Every processed request produces exactly one envelope:
//!
//! ```text
//! { "success": <value> }                                   // value may be null
//! { "failure": { "kind": "...", "message": "...", "cause": {...}? } }
//! ```
//!
//! The caller decodes it once and unwraps it at a single point
//! ([`Envelope::into_result`]): the success value is returned, a failure becomes
//! [`LpfcpError::Remote`]. A body that is not a valid envelope is a transport
//! error ([`LpfcpError::MalformedResponse`]), never a failure.

use crate::encoding::{decode_value, encode_value};
use crate::{LpfcpError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::str::FromStr;

/// Failure kinds produced by the protocol itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No exposed method matches the name and parameter descriptors.
    MethodNotFound,
    /// The method is declared by the interface but the implementation does not expose it.
    NotExposed,
    /// The request body could not be parsed.
    MalformedRequest,
    /// The arguments did not decode into the resolved overload's parameter types.
    InvalidArguments,
    /// The exposed method failed while executing. The cause describes the original failure.
    InvocationFailure,
    /// The return value could not be encoded.
    EncodingFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MethodNotFound => "MethodNotFound",
            FailureKind::NotExposed => "NotExposed",
            FailureKind::MalformedRequest => "MalformedRequest",
            FailureKind::InvalidArguments => "InvalidArguments",
            FailureKind::InvocationFailure => "InvocationFailure",
            FailureKind::EncodingFailure => "EncodingFailure",
        }
    }

}

/// A failure kind name that is not one of the protocol's own kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown failure kind: {0}")]
pub struct UnknownFailureKind(pub String);

impl FromStr for FailureKind {
    type Err = UnknownFailureKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MethodNotFound" => Ok(FailureKind::MethodNotFound),
            "NotExposed" => Ok(FailureKind::NotExposed),
            "MalformedRequest" => Ok(FailureKind::MalformedRequest),
            "InvalidArguments" => Ok(FailureKind::InvalidArguments),
            "InvocationFailure" => Ok(FailureKind::InvocationFailure),
            "EncodingFailure" => Ok(FailureKind::EncodingFailure),
            other => Err(UnknownFailureKind(other.to_string())),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind used for the cause of a method that panicked.
pub const PANIC_KIND: &str = "Panic";

/// Wire-safe description of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    /// A [`FailureKind`] name, or the type name of the error an exposed method returned.
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[source]
    pub cause: Option<Box<Failure>>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::with_kind(kind.as_str(), message)
    }

    /// Failure with an application-defined kind.
    pub fn with_kind(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the original failure.
    pub fn caused_by(mut self, cause: Failure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Describe an error returned by an exposed method.
    ///
    /// The kind is the error's short type name (`CalcError` for
    /// `my_crate::CalcError`). A `Failure` passes through unchanged.
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if let Some(failure) = (&err as &dyn Any).downcast_ref::<Failure>() {
            return failure.clone();
        }
        Self::with_kind(short_type_name::<E>(), err.to_string())
    }

    /// Describe a panic payload caught while invoking a method.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "method panicked".to_string()
        };
        Self::with_kind(PANIC_KIND, message)
    }

    /// The protocol kind, if `kind` names one.
    pub fn protocol_kind(&self) -> Option<FailureKind> {
        self.kind.parse().ok()
    }

    pub fn is_kind(&self, kind: FailureKind) -> bool {
        self.kind == kind.as_str()
    }

    /// This failure followed by its causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Failure> {
        std::iter::successors(Some(self), |f| f.cause.as_deref())
    }

    /// One-line description of the whole chain, e.g.
    /// `InvocationFailure: Exposed method divide(i32, i32) failed: CalcError: Division by zero`.
    pub fn describe(&self) -> String {
        self.chain()
            .map(|f| format!("{}: {}", f.kind, f.message))
            .collect::<Vec<_>>()
            .join(": ")
    }

    /// The innermost failure in the cause chain.
    pub fn root_cause(&self) -> &Failure {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Outcome of a decoded envelope, before it is unwrapped.
pub type Outcome<T> = std::result::Result<T, Failure>;

/// The success/failure wrapper exchanged as the result of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    Success(Value),
    Failure(Failure),
}

impl Envelope {
    /// Wrap a successful return value.
    pub fn success<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Envelope::Success(encode_value(value)?))
    }

    pub fn failure(failure: Failure) -> Self {
        Envelope::Failure(failure)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Serialize to JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse an envelope received from a transport.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| LpfcpError::MalformedResponse {
            message: format!("response is not a valid envelope: {}", e),
            source: Some(e),
        })
    }

    /// Decode the carried value as `T`, keeping a failure as data.
    pub fn into_outcome<T: DeserializeOwned>(self) -> Result<Outcome<T>> {
        match self {
            Envelope::Success(value) => decode_value(value).map(Ok).map_err(|e| {
                LpfcpError::malformed_response(format!(
                    "success value does not match the declared return type: {}",
                    e
                ))
            }),
            Envelope::Failure(failure) => Ok(Err(failure)),
        }
    }

    /// Decode and unwrap: the success value, or the failure as [`LpfcpError::Remote`].
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        unwrap_outcome(self.into_outcome()?)
    }
}

/// Return the success value or raise the carried failure.
pub fn unwrap_outcome<T>(outcome: Outcome<T>) -> Result<T> {
    outcome.map_err(LpfcpError::Remote)
}

impl From<Failure> for Envelope {
    fn from(failure: Failure) -> Self {
        Envelope::Failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    #[error("division by zero")]
    struct DivisionByZero;

    fn roundtrip(envelope: &Envelope) -> Envelope {
        Envelope::decode(&envelope.to_vec().unwrap()).unwrap()
    }

    #[test]
    fn test_success_wire_form() {
        let envelope = Envelope::success(&8).unwrap();
        let value: Value = serde_json::from_slice(&envelope.to_vec().unwrap()).unwrap();
        assert_eq!(value, json!({"success": 8}));
    }

    #[test]
    fn test_failure_wire_form() {
        let envelope = Envelope::failure(Failure::new(FailureKind::MethodNotFound, "no such method"));
        let value: Value = serde_json::from_slice(&envelope.to_vec().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"failure": {"kind": "MethodNotFound", "message": "no such method"}})
        );
    }

    #[test]
    fn test_success_roundtrip_unwraps_value() {
        let value: String = roundtrip(&Envelope::success("Hello, World!").unwrap())
            .into_result()
            .unwrap();
        assert_eq!(value, "Hello, World!");
    }

    #[test]
    fn test_null_success_is_not_a_failure() {
        let envelope = roundtrip(&Envelope::success(&None::<i32>).unwrap());
        assert!(envelope.is_success());
        let value: Option<i32> = envelope.into_result().unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_failure_roundtrip_raises_with_description() {
        let failure = Failure::new(FailureKind::InvocationFailure, "divide(i32, i32) failed")
            .caused_by(Failure::from_error(DivisionByZero));
        let err = roundtrip(&Envelope::failure(failure.clone()))
            .into_result::<i32>()
            .unwrap_err();

        assert!(!err.is_transport());
        let carried = err.failure().unwrap();
        assert_eq!(carried, &failure);
        assert_eq!(carried.root_cause().kind, "DivisionByZero");
        assert_eq!(carried.root_cause().message, "division by zero");
    }

    #[test]
    fn test_outcome_keeps_failure_as_data() {
        let outcome = Envelope::failure(Failure::new(FailureKind::NotExposed, "hidden"))
            .into_outcome::<i32>()
            .unwrap();
        assert_eq!(outcome.unwrap_err().protocol_kind(), Some(FailureKind::NotExposed));
    }

    #[test]
    fn test_decode_rejects_garbage_as_transport_error() {
        let err = Envelope::decode(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.is_transport());

        let err = Envelope::decode(br#"{"neither": 1}"#).unwrap_err();
        assert!(matches!(err, LpfcpError::MalformedResponse { .. }));
    }

    #[test]
    fn test_wrong_return_type_is_malformed_response() {
        let err = Envelope::success("eight")
            .unwrap()
            .into_result::<i32>()
            .unwrap_err();
        assert!(matches!(err, LpfcpError::MalformedResponse { .. }));
    }

    #[test]
    fn test_from_error_passes_failures_through() {
        let original = Failure::with_kind("Custom", "kept");
        assert_eq!(Failure::from_error(original.clone()), original);
    }

    #[test]
    fn test_from_panic_reads_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let failure = Failure::from_panic(payload.as_ref());
        assert_eq!(failure.kind, PANIC_KIND);
        assert_eq!(failure.message, "boom");
    }

    #[test]
    fn test_failure_kind_roundtrip() {
        for kind in [
            FailureKind::MethodNotFound,
            FailureKind::NotExposed,
            FailureKind::MalformedRequest,
            FailureKind::InvalidArguments,
            FailureKind::InvocationFailure,
            FailureKind::EncodingFailure,
        ] {
            assert_eq!(kind.as_str().parse::<FailureKind>(), Ok(kind));
        }
        assert_eq!(
            "CalcError".parse::<FailureKind>(),
            Err(UnknownFailureKind("CalcError".to_string()))
        );
    }

    #[test]
    fn test_describe_walks_cause_chain() {
        let failure = Failure::new(FailureKind::InvocationFailure, "divide(i32, i32) failed")
            .caused_by(Failure::from_error(DivisionByZero));
        assert_eq!(failure.chain().count(), 2);
        assert_eq!(
            failure.describe(),
            "InvocationFailure: divide(i32, i32) failed: DivisionByZero: division by zero"
        );
        assert_eq!(Failure::with_kind("Custom", "alone").describe(), "Custom: alone");
    }
}
