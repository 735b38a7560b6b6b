//! Request codec.
//!
//! Wire format:
//!
//! ```text
//! { "methodName": "<string>", "parameterTypes": ["<descriptor>", ...], "arguments": [<value>, ...] }
//! ```
//!
//! `parameterTypes` and `arguments` always have the same length; order is the
//! call-site argument order.

use crate::descriptor::{Arguments, MethodSignature, TypeDescriptor};
use crate::{LpfcpError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// A single remote method call.
///
/// Only serialized through serde; parsing goes through [`CallRequest::from_slice`]
/// so the length invariant is always checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub method_name: String,
    pub parameter_types: Vec<TypeDescriptor>,
    pub arguments: Vec<Value>,
}

impl CallRequest {
    /// Build a request, rejecting mismatched descriptor/argument counts.
    pub fn new(
        method_name: impl Into<String>,
        parameter_types: Vec<TypeDescriptor>,
        arguments: Vec<Value>,
    ) -> Result<Self> {
        let request = Self {
            method_name: method_name.into(),
            parameter_types,
            arguments,
        };
        request.validate()?;
        Ok(request)
    }

    /// Build a request for `method_name` from a typed argument tuple.
    ///
    /// Descriptors come from the tuple's declared types.
    pub fn from_arguments<A: Arguments>(method_name: impl Into<String>, arguments: &A) -> Result<Self> {
        Self::new(method_name, A::descriptors(), arguments.encode()?)
    }

    /// Split the request into its parts.
    pub fn into_parts(self) -> (String, Vec<TypeDescriptor>, Vec<Value>) {
        (self.method_name, self.parameter_types, self.arguments)
    }

    /// The overload this request targets.
    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(self.method_name.clone(), self.parameter_types.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.method_name.is_empty() {
            return Err(LpfcpError::malformed_request("`methodName` must not be empty"));
        }
        if self.parameter_types.len() != self.arguments.len() {
            return Err(LpfcpError::malformed_request(format!(
                "`parameterTypes` has {} entries but `arguments` has {}",
                self.parameter_types.len(),
                self.arguments.len()
            )));
        }
        Ok(())
    }

    /// Serialize to JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a request from JSON bytes.
    ///
    /// Every failure is a `MalformedRequest` naming the offending key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| LpfcpError::malformed_request(format!("request is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Parse a request from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(LpfcpError::malformed_request(format!(
                    "request must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let method_name = match object.remove("methodName") {
            Some(Value::String(name)) => name,
            _ => {
                return Err(LpfcpError::malformed_request(
                    "`methodName` key not found or is not a string",
                ))
            }
        };

        let parameter_types = take_array(&mut object, "parameterTypes")?
            .into_iter()
            .map(|ty| match ty {
                Value::String(name) => Ok(TypeDescriptor::new(name)),
                _ => Err(LpfcpError::malformed_request(
                    "`parameterTypes` must contain only strings",
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        let arguments = take_array(&mut object, "arguments")?;

        let request = Self {
            method_name,
            parameter_types,
            arguments,
        };
        request.validate()?;
        Ok(request)
    }
}

fn take_array(object: &mut Map<String, Value>, key: &str) -> Result<Vec<Value>> {
    match object.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(LpfcpError::malformed_request(format!(
            "`{}` key not found or is not an array",
            key
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
