//! Runtime values flowing through link chains
//!
//! Membership predicates inspect the variant (and, for [`Value::Tagged`], the
//! tag) rather than any host type information, so a collaborator can introduce
//! nominal domain types without changing the engine.

use std::fmt;

use num_bigint::BigUint;
use serde_json::{Map, Number};

use crate::error::{GraphError, Result};

const TAG_KEY: &str = "$tag";
const VALUE_KEY: &str = "$value";

/// A value that can be checked against a type and passed to a link
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    UInt(u128),
    /// Unsigned integer above `u128::MAX`; anything smaller is a `UInt`
    BigUInt(BigUint),
    Int(i128),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// A value owned by a named domain type (e.g. a field element)
    Tagged { tag: String, inner: Box<Value> },
}

impl Value {
    /// Wrap a value under a domain tag
    pub fn tagged(tag: impl Into<String>, inner: Value) -> Self {
        Value::Tagged {
            tag: tag.into(),
            inner: Box::new(inner),
        }
    }

    /// Build an unsigned integer, using `UInt` whenever it fits
    pub fn uint(n: BigUint) -> Self {
        match u128::try_from(&n) {
            Ok(small) => Value::UInt(small),
            Err(_) => Value::BigUInt(n),
        }
    }

    /// Short variant name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::UInt(_) | Value::BigUInt(_) => "uint",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Tagged { .. } => "tagged",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Any unsigned integer, widened
    pub fn to_big_uint(&self) -> Option<BigUint> {
        match self {
            Value::UInt(n) => Some(BigUint::from(*n)),
            Value::BigUInt(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Number of significant bits of an unsigned integer
    pub fn uint_bits(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(u64::from(u128::BITS - n.leading_zeros())),
            Value::BigUInt(n) => Some(n.bits()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Inner value if this is tagged with `tag`
    pub fn as_tagged(&self, tag: &str) -> Option<&Value> {
        match self {
            Value::Tagged { tag: t, inner } if t == tag => Some(inner),
            _ => None,
        }
    }

    /// Unwrap a tagged value, keeping ownership of the inner value
    pub fn into_tagged(self, tag: &str) -> Option<Value> {
        match self {
            Value::Tagged { tag: t, inner } if t == tag => Some(*inner),
            _ => None,
        }
    }

    /// Convert a JSON value.
    ///
    /// Objects are only accepted in the `{"$tag": ..., "$value": ...}` form.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => Ok(number_to_value(n)),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Object(map) => match tagged_parts(map) {
                Some((tag, inner)) => Ok(Value::tagged(tag, Value::from_json(inner)?)),
                None => Err(GraphError::InvalidValue(format!(
                    "objects must have exactly the keys \"{TAG_KEY}\" and \"{VALUE_KEY}\""
                ))),
            },
        }
    }

    /// Render as JSON; byte strings become arrays of numbers.
    ///
    /// Integers of any width are written as JSON numbers with all digits.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::UInt(n) => match u64::try_from(*n) {
                Ok(small) => serde_json::Value::from(small),
                Err(_) => big_number(n.to_string()),
            },
            Value::BigUInt(n) => big_number(n.to_string()),
            Value::Int(n) => match i64::try_from(*n) {
                Ok(small) => serde_json::Value::from(small),
                Err(_) => big_number(n.to_string()),
            },
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(bytes) => {
                serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
            }
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Tagged { tag, inner } => {
                let mut map = Map::new();
                map.insert(TAG_KEY.to_string(), serde_json::Value::String(tag.clone()));
                map.insert(VALUE_KEY.to_string(), inner.to_json());
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Whether a JSON object is the encoding of a tagged value
pub(crate) fn is_tagged_json(map: &Map<String, serde_json::Value>) -> bool {
    tagged_parts(map).is_some()
}

fn tagged_parts(map: &Map<String, serde_json::Value>) -> Option<(&str, &serde_json::Value)> {
    if map.len() != 2 {
        return None;
    }
    let tag = map.get(TAG_KEY)?.as_str()?;
    let inner = map.get(VALUE_KEY)?;
    Some((tag, inner))
}

fn number_to_value(n: &Number) -> Value {
    if let Some(u) = n.as_u64() {
        return Value::UInt(u128::from(u));
    }
    if let Some(i) = n.as_i64() {
        return Value::Int(i128::from(i));
    }

    // arbitrary_precision keeps the literal digits of wide integers
    let digits = n.to_string();
    if let Ok(big) = digits.parse::<BigUint>() {
        Value::uint(big)
    } else if let Ok(i) = digits.parse::<i128>() {
        Value::Int(i)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn big_number(digits: String) -> serde_json::Value {
    serde_json::from_str::<serde_json::Value>(&digits).unwrap_or(serde_json::Value::String(digits))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::UInt(n) => write!(f, "{}", n),
            Value::BigUInt(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Bytes(bytes) => write!(f, "bytes[{}]", bytes.len()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Tagged { tag, inner } => write!(f, "{}({})", tag, inner),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! uint_conversions {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::UInt(u128::from(n))
                }
            }

            impl TryFrom<Value> for $t {
                type Error = GraphError;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::UInt(n) => <$t>::try_from(n).map_err(|_| {
                            GraphError::InvalidValue(format!("{} does not fit in {}", n, stringify!($t)))
                        }),
                        Value::BigUInt(n) => Err(GraphError::InvalidValue(format!(
                            "{} does not fit in {}",
                            n,
                            stringify!($t)
                        ))),
                        other => Err(GraphError::InvalidValue(format!(
                            "expected uint, got {}",
                            other.kind()
                        ))),
                    }
                }
            }
        )*
    };
}

uint_conversions!(u8, u16, u32, u64);

impl From<u128> for Value {
    fn from(n: u128) -> Self {
        Value::UInt(n)
    }
}

impl From<BigUint> for Value {
    fn from(n: BigUint) -> Self {
        Value::uint(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

fn unexpected(expected: &str, got: &Value) -> GraphError {
    GraphError::InvalidValue(format!("expected {}, got {}", expected, got.kind()))
}

impl TryFrom<Value> for bool {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| unexpected("bool", &value))
    }
}

impl TryFrom<Value> for u128 {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::UInt(n) => Ok(n),
            Value::BigUInt(n) => Err(GraphError::InvalidValue(format!("{} does not fit in u128", n))),
            other => Err(unexpected("uint", &other)),
        }
    }
}

impl TryFrom<Value> for BigUint {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self> {
        value.to_big_uint().ok_or_else(|| unexpected("uint", &value))
    }
}

impl TryFrom<Value> for String {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(unexpected("text", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(unexpected("bytes", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => Ok(items),
            other => Err(unexpected("list", &other)),
        }
    }
}
