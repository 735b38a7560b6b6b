//! Value encoding.
//!
//! Every argument and return value crosses the wire as a `serde_json::Value`.
//! `None` encodes as `null` and decodes back to `None`.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Encode a value into its wire form.
pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Decode a wire value into `T`.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}
