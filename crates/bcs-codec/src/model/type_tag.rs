//! Type tags: the closed description of a value's shape.
//!
//! A [`TypeTag`] is either a built-in kind (integers, strings, containers) or
//! a reference into a [`Registry`](crate::registry::Registry) by name. Named
//! references are resolved lazily at encode/decode time, so definitions may
//! refer to types registered after them.

use std::fmt;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::codec::primitives::UintWidth;
use crate::config::TypeNaming;
use crate::error::SchemaError;
use crate::model::schema::FieldDef;

/// A reference to a registered type, with type arguments for generics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub type_args: Vec<TypeTag>,
}

impl TypeRef {
    /// Creates a reference to a non-generic type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// Creates a reference to a generic type instantiated with `type_args`.
    pub fn generic(name: impl Into<String>, type_args: Vec<TypeTag>) -> Self {
        Self {
            name: name.into(),
            type_args,
        }
    }
}

/// Shape of a BCS value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    /// UTF-8 string with ULEB128 length prefix.
    String,
    /// Raw bytes with ULEB128 length prefix.
    Bytes,
    /// Fixed-length array; the length is part of the schema, not the wire.
    FixedArray(Box<TypeTag>, usize),
    /// Variable-length sequence with ULEB128 count prefix.
    Vector(Box<TypeTag>),
    Option(Box<TypeTag>),
    /// Key/value pairs with ULEB128 count prefix, in caller order.
    Map(Box<TypeTag>, Box<TypeTag>),
    /// Registered struct.
    Struct(TypeRef),
    /// Unregistered struct given by its ordered fields.
    InlineStruct(Vec<FieldDef>),
    /// Registered enum.
    Enum(TypeRef),
    /// Registered struct, enum or alias; the kind is looked up on use.
    Named(TypeRef),
    /// Type parameter `index` of the enclosing generic definition.
    Param(usize),
}

impl TypeTag {
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn option(inner: TypeTag) -> Self {
        TypeTag::Option(Box::new(inner))
    }

    pub fn fixed_array(inner: TypeTag, len: usize) -> Self {
        TypeTag::FixedArray(Box::new(inner), len)
    }

    pub fn map(key: TypeTag, value: TypeTag) -> Self {
        TypeTag::Map(Box::new(key), Box::new(value))
    }

    pub fn structure(name: impl Into<String>) -> Self {
        TypeTag::Struct(TypeRef::new(name))
    }

    /// Builds an unregistered struct from `(field, type)` pairs.
    pub fn inline_struct<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeTag)>,
        S: Into<String>,
    {
        TypeTag::InlineStruct(
            fields
                .into_iter()
                .map(|(name, ty)| FieldDef { name: name.into(), ty })
                .collect(),
        )
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        TypeTag::Enum(TypeRef::new(name))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeTag::Named(TypeRef::new(name))
    }

    /// Returns the integer width if this is an unsigned integer tag.
    pub fn uint_width(&self) -> Option<UintWidth> {
        match self {
            TypeTag::U8 => Some(UintWidth::U8),
            TypeTag::U16 => Some(UintWidth::U16),
            TypeTag::U32 => Some(UintWidth::U32),
            TypeTag::U64 => Some(UintWidth::U64),
            TypeTag::U128 => Some(UintWidth::U128),
            TypeTag::U256 => Some(UintWidth::U256),
            _ => None,
        }
    }

    /// Replaces every [`TypeTag::Param`] with the matching entry of `args`.
    pub fn substitute(&self, args: &[TypeTag]) -> Result<TypeTag, SchemaError> {
        Ok(match self {
            TypeTag::Param(index) => args
                .get(*index)
                .cloned()
                .ok_or(SchemaError::UnboundParam { index: *index })?,
            TypeTag::FixedArray(inner, len) => TypeTag::fixed_array(inner.substitute(args)?, *len),
            TypeTag::Vector(inner) => TypeTag::vector(inner.substitute(args)?),
            TypeTag::Option(inner) => TypeTag::option(inner.substitute(args)?),
            TypeTag::Map(k, v) => TypeTag::map(k.substitute(args)?, v.substitute(args)?),
            TypeTag::Struct(r) => TypeTag::Struct(r.substitute(args)?),
            TypeTag::Enum(r) => TypeTag::Enum(r.substitute(args)?),
            TypeTag::Named(r) => TypeTag::Named(r.substitute(args)?),
            TypeTag::InlineStruct(fields) => TypeTag::InlineStruct(
                fields
                    .iter()
                    .map(|f| {
                        Ok(FieldDef {
                            name: f.name.clone(),
                            ty: f.ty.substitute(args)?,
                        })
                    })
                    .collect::<Result<_, SchemaError>>()?,
            ),
            TypeTag::Bool
            | TypeTag::U8
            | TypeTag::U16
            | TypeTag::U32
            | TypeTag::U64
            | TypeTag::U128
            | TypeTag::U256
            | TypeTag::String
            | TypeTag::Bytes => self.clone(),
        })
    }

    /// Returns the largest type parameter index referenced, if any.
    pub(crate) fn max_param(&self) -> Option<usize> {
        match self {
            TypeTag::Param(index) => Some(*index),
            TypeTag::FixedArray(inner, _) | TypeTag::Vector(inner) | TypeTag::Option(inner) => {
                inner.max_param()
            }
            TypeTag::Map(k, v) => k.max_param().max(v.max_param()),
            TypeTag::Struct(r) | TypeTag::Enum(r) | TypeTag::Named(r) => {
                r.type_args.iter().filter_map(TypeTag::max_param).max()
            }
            TypeTag::InlineStruct(fields) => fields.iter().filter_map(|f| f.ty.max_param()).max(),
            _ => None,
        }
    }

    /// Renders this tag using the given naming convention.
    pub fn to_type_string(&self, naming: TypeNaming) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_type_string(&mut out, naming);
        out
    }

    fn write_type_string(&self, f: &mut impl fmt::Write, naming: TypeNaming) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::String => f.write_str(naming.string_keyword()),
            TypeTag::Bytes => f.write_str("bytes"),
            TypeTag::FixedArray(inner, len) => {
                f.write_char('[')?;
                inner.write_type_string(f, naming)?;
                write!(f, "; {len}]")
            }
            TypeTag::Vector(inner) => {
                write!(f, "{}<", naming.vector_keyword())?;
                inner.write_type_string(f, naming)?;
                f.write_char('>')
            }
            TypeTag::Option(inner) => {
                f.write_str("Option<")?;
                inner.write_type_string(f, naming)?;
                f.write_char('>')
            }
            TypeTag::Map(k, v) => {
                f.write_str("Map<")?;
                k.write_type_string(f, naming)?;
                f.write_str(", ")?;
                v.write_type_string(f, naming)?;
                f.write_char('>')
            }
            TypeTag::Struct(r) | TypeTag::Enum(r) | TypeTag::Named(r) => {
                f.write_str(&r.name)?;
                if !r.type_args.is_empty() {
                    f.write_char('<')?;
                    for (i, arg) in r.type_args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        arg.write_type_string(f, naming)?;
                    }
                    f.write_char('>')?;
                }
                Ok(())
            }
            TypeTag::InlineStruct(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: ", field.name)?;
                    field.ty.write_type_string(f, naming)?;
                }
                f.write_str(" }")
            }
            TypeTag::Param(index) => write!(f, "${index}"),
        }
    }
}

impl TypeRef {
    fn substitute(&self, args: &[TypeTag]) -> Result<TypeRef, SchemaError> {
        Ok(TypeRef {
            name: self.name.clone(),
            type_args: self
                .type_args
                .iter()
                .map(|t| t.substitute(args))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_type_string(f, TypeNaming::Move)
    }
}

// =============================================================================
// PARSING
// =============================================================================

lazy_static! {
    /// Primitive type names shared by both naming conventions.
    static ref PRIMITIVES: FxHashMap<&'static str, TypeTag> = {
        let mut m = FxHashMap::default();
        m.insert("bool", TypeTag::Bool);
        m.insert("u8", TypeTag::U8);
        m.insert("u16", TypeTag::U16);
        m.insert("u32", TypeTag::U32);
        m.insert("u64", TypeTag::U64);
        m.insert("u128", TypeTag::U128);
        m.insert("u256", TypeTag::U256);
        m.insert("bytes", TypeTag::Bytes);
        m
    };
}

/// Parses a type string such as `vector<u8>`, `Option<Coin<u64>>`,
/// `[u8; 32]`, `Map<string, u64>` or `{ id: address, value: u64 }`.
///
/// Identifiers listed in `params` become [`TypeTag::Param`] (used when
/// writing generic definitions). Any other non-primitive identifier becomes a
/// [`TypeTag::Named`] reference that is resolved against the registry later.
pub fn parse_type_tag(
    input: &str,
    naming: TypeNaming,
    params: &[&str],
) -> Result<TypeTag, SchemaError> {
    let mut parser = Parser {
        input,
        pos: 0,
        naming,
        params,
    };
    let tag = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(tag)
}

struct Parser<'s, 'p> {
    input: &'s str,
    pos: usize,
    naming: TypeNaming,
    params: &'p [&'p str],
}

impl<'s> Parser<'s, '_> {
    fn error(&self, reason: &'static str) -> SchemaError {
        SchemaError::InvalidTypeString {
            input: self.input.to_string(),
            reason,
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, reason: &'static str) -> Result<(), SchemaError> {
        if self.eat(c) { Ok(()) } else { Err(self.error(reason)) }
    }

    fn ident(&mut self) -> Result<&'s str, SchemaError> {
        self.skip_ws();
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Field names in inline structs; unlike type names they never contain `:`.
    fn field_name(&mut self) -> Result<&'s str, SchemaError> {
        self.skip_ws();
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a field name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn number(&mut self) -> Result<usize, SchemaError> {
        self.skip_ws();
        let rest = &self.input[self.pos..];
        let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let n = rest[..len]
            .parse()
            .map_err(|_| self.error("expected an array length"))?;
        self.pos += len;
        Ok(n)
    }

    fn parse_type(&mut self) -> Result<TypeTag, SchemaError> {
        if self.eat('[') {
            let inner = self.parse_type()?;
            self.expect(';', "expected `;` in array type")?;
            let len = self.number()?;
            self.expect(']', "expected `]` to close array type")?;
            return Ok(TypeTag::fixed_array(inner, len));
        }

        if self.eat('{') {
            let mut fields: Vec<FieldDef> = Vec::new();
            if self.eat('}') {
                return Ok(TypeTag::InlineStruct(fields));
            }
            loop {
                let name = self.field_name()?;
                if fields.iter().any(|f| f.name == name) {
                    return Err(self.error("duplicate field in inline struct"));
                }
                self.expect(':', "expected `:` after field name")?;
                let ty = self.parse_type()?;
                fields.push(FieldDef {
                    name: name.to_string(),
                    ty,
                });
                if self.eat(',') {
                    continue;
                }
                self.expect('}', "expected `}` to close inline struct")?;
                break;
            }
            return Ok(TypeTag::InlineStruct(fields));
        }

        let name = self.ident()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                self.expect('>', "expected `>` to close type arguments")?;
                break;
            }
        }

        if let Some(index) = self.params.iter().position(|p| *p == name) {
            if !args.is_empty() {
                return Err(self.error("type parameters take no type arguments"));
            }
            return Ok(TypeTag::Param(index));
        }

        if let Some(tag) = PRIMITIVES.get(name) {
            if !args.is_empty() {
                return Err(self.error("primitive types take no type arguments"));
            }
            return Ok(tag.clone());
        }

        if name == self.naming.string_keyword() {
            if !args.is_empty() {
                return Err(self.error("string takes no type arguments"));
            }
            return Ok(TypeTag::String);
        }

        if name == self.naming.vector_keyword() {
            let [inner] = <[TypeTag; 1]>::try_from(args)
                .map_err(|_| self.error("vector takes exactly one type argument"))?;
            return Ok(TypeTag::vector(inner));
        }

        match name {
            "Option" => {
                let [inner] = <[TypeTag; 1]>::try_from(args)
                    .map_err(|_| self.error("Option takes exactly one type argument"))?;
                Ok(TypeTag::option(inner))
            }
            "Map" => {
                let [key, value] = <[TypeTag; 2]>::try_from(args)
                    .map_err(|_| self.error("Map takes exactly two type arguments"))?;
                Ok(TypeTag::map(key, value))
            }
            _ => Ok(TypeTag::Named(TypeRef::generic(name, args))),
        }
    }
}
