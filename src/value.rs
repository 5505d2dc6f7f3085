//! Opaque typed payloads carried by key-value nodes.
//!
//! The tree engine never inspects payload contents beyond the null marker;
//! it only records them for the downstream binder to read.

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use std::fmt;

/// A scalar value payload.
///
/// `Null` is the distinguished null marker: `key = null` parses to a
/// key-value node whose payload reports [`is_null`](Scalar::is_null).
#[derive(Clone, PartialEq)]
pub enum Scalar {
    /// A string literal, with escapes already resolved.
    String(Box<str>),
    /// An integer literal.
    Integer(i64),
    /// A float literal.
    Float(f64),
    /// A boolean literal.
    Boolean(bool),
    /// The distinguished null marker.
    Null,
}

impl Scalar {
    /// Returns the string contents, if this is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` if this is the null marker.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// A short name for the scalar's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Boolean(_) => "boolean",
            Scalar::Null => "null",
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => fmt::Debug::fmt(s, f),
            Scalar::Integer(i) => fmt::Display::fmt(i, f),
            Scalar::Float(x) => fmt::Display::fmt(x, f),
            Scalar::Boolean(b) => fmt::Display::fmt(b, f),
            Scalar::Null => f.write_str("null"),
        }
    }
}

/// The payload of a key-value line: a scalar or a (possibly nested) array of
/// payloads.
#[derive(Clone, PartialEq, Debug)]
pub enum Payload {
    /// `key = scalar`
    Scalar(Scalar),
    /// `key = [ ... ]`, elements in source order.
    Array(Vec<Payload>),
}

/// Payload shape tag, distinguishing scalar from array-valued key-values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PayloadKind {
    /// A single scalar.
    Scalar,
    /// A value array.
    Array,
}

impl Payload {
    /// Returns the shape tag of this payload.
    #[inline]
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Scalar(_) => PayloadKind::Scalar,
            Payload::Array(_) => PayloadKind::Array,
        }
    }

    /// Returns the scalar, if this payload is one.
    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Payload::Scalar(s) => Some(s),
            Payload::Array(_) => None,
        }
    }

    /// Returns the element slice, if this payload is an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[Payload]> {
        match self {
            Payload::Scalar(_) => None,
            Payload::Array(items) => Some(items),
        }
    }

    /// Returns `true` iff this payload is the scalar null marker.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Scalar(Scalar::Null))
    }
}

impl From<Scalar> for Payload {
    #[inline]
    fn from(s: Scalar) -> Self {
        Payload::Scalar(s)
    }
}
