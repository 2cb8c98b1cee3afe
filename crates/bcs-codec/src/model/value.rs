//! Dynamic value trees encoded from and decoded to by the engine.

use std::fmt;

use alloy_primitives::U256;

/// A value whose shape is described by a [`TypeTag`](crate::model::TypeTag).
///
/// Decoding always produces the canonical form for the tag: integers in the
/// variant of the declared width, fixed arrays as [`Value::Vector`], struct
/// fields in declared order. Encoding accepts any unsigned integer variant for
/// any integer tag as long as the value fits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    String(String),
    Bytes(Vec<u8>),
    /// Elements of a vector or a fixed array.
    Vector(Vec<Value>),
    Option(Option<Box<Value>>),
    /// Map entries in wire order.
    Map(Vec<(Value, Value)>),
    /// Named struct fields. Names select fields; order on the wire comes
    /// from the struct definition.
    Struct(Vec<(String, Value)>),
    /// Enum variant selected by name, with its payload if the variant has one.
    Enum {
        variant: String,
        payload: Option<Box<Value>>,
    },
}

impl Value {
    /// Builds a struct value from `(field, value)` pairs.
    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds an enum value for a variant carrying `payload`.
    pub fn variant(name: impl Into<String>, payload: Value) -> Self {
        Value::Enum {
            variant: name.into(),
            payload: Some(Box::new(payload)),
        }
    }

    /// Builds an enum value for a unit variant.
    pub fn unit_variant(name: impl Into<String>) -> Self {
        Value::Enum {
            variant: name.into(),
            payload: None,
        }
    }

    pub fn some(value: Value) -> Self {
        Value::Option(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Value::Option(None)
    }

    /// Builds a fixed byte array (`[u8; N]`) value.
    pub fn byte_array(bytes: &[u8]) -> Self {
        Value::Vector(bytes.iter().copied().map(Value::U8).collect())
    }

    /// Returns the bytes of a `Vector` made only of `U8` elements.
    pub fn as_byte_array(&self) -> Option<Vec<u8>> {
        match self {
            Value::Vector(items) => items
                .iter()
                .map(|v| match v {
                    Value::U8(b) => Some(*b),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Returns any unsigned integer variant widened to 256 bits.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::U8(v) => Some(U256::from(*v)),
            Value::U16(v) => Some(U256::from(*v)),
            Value::U32(v) => Some(U256::from(*v)),
            Value::U64(v) => Some(U256::from(*v)),
            Value::U128(v) => Some(U256::from(*v)),
            Value::U256(v) => Some(*v),
            _ => None,
        }
    }

    /// Looks up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::U256(_) => "u256",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Vector(_) => "vector",
            Value::Option(_) => "option",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
            Value::Enum { .. } => "enum",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        Value::U128(v)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::U256(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Vector(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::U128(v) => write!(f, "{v}"),
            Value::U256(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Vector(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Option(None) => f.write_str("none"),
            Value::Option(Some(v)) => write!(f, "some({v})"),
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Struct(fields) => {
                f.write_str("{ ")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str(" }")
            }
            Value::Enum { variant, payload: None } => f.write_str(variant),
            Value::Enum {
                variant,
                payload: Some(v),
            } => write!(f, "{variant}({v})"),
        }
    }
}
