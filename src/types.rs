//! Dynamically-shaped response values and the narrowing helpers applied to them.
//!
//! The exchange answers some endpoints with a JSON object and others with a JSON array.
//! The dispatcher returns a [`Value`] untouched; endpoint methods then narrow it with
//! [`into_object`] or [`into_array`], which fail with [`crate::error::Kind::Shape`]
//! instead of panicking on the wrong kind.

/// Generic JSON values returned by the dispatcher.
pub use serde_json::{Map, Value};

use crate::Result;
use crate::error::Error;

/// A JSON object as returned by object-shaped endpoints.
pub type Object = Map<String, Value>;

/// The top-level kind of a decoded JSON value.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl Shape {
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Shape::Object,
            Value::Array(_) => Shape::Array,
            Value::String(_) => Shape::String,
            Value::Number(_) => Shape::Number,
            Value::Bool(_) => Shape::Bool,
            Value::Null => Shape::Null,
        }
    }
}

/// Narrows `value` to a JSON object.
pub fn into_object(endpoint: &str, value: Value) -> Result<Object> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(Error::unexpected_shape(
            endpoint,
            Shape::Object,
            Shape::of(&other),
        )),
    }
}

/// Narrows `value` to a JSON array.
pub fn into_array(endpoint: &str, value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(array) => Ok(array),
        other => Err(Error::unexpected_shape(
            endpoint,
            Shape::Array,
            Shape::of(&other),
        )),
    }
}
