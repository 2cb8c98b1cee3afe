//! The codec engine: drives primitive, container and registry codecs from a
//! type tag.
//!
//! Each call is a pure function of `(registry, config, input)`. The engine
//! keeps no state between calls, so a populated [`Bcs`] can be shared across
//! threads (e.g. behind an `Arc`) for concurrent encoding and decoding.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::codec::containers;
use crate::codec::primitives::{Reader, UintWidth, Writer};
use crate::config::BcsConfig;
use crate::error::{DecodeError, EncodeError, Error, SchemaError};
use crate::model::{EncodedValue, EnumDef, FieldDef, StructDef, TypeTag, Value};
use crate::registry::{Registry, Resolved};
use crate::util::encoding::{decode_from_str, Encoding};

/// Type name reported in errors for [`TypeTag::InlineStruct`].
const INLINE_STRUCT_NAME: &str = "<inline>";

/// A BCS codec bound to its own registry and configuration.
#[derive(Debug, Clone, Default)]
pub struct Bcs {
    registry: Registry,
    config: BcsConfig,
}

impl Bcs {
    /// Creates an engine with an empty registry and default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BcsConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    /// Creates an engine around an already-populated registry.
    pub fn with_registry(registry: Registry, config: BcsConfig) -> Self {
        Self { registry, config }
    }

    /// Move naming with `address` pre-registered as `[u8; 32]`.
    pub fn with_move_prelude() -> Self {
        Self::with_prelude(BcsConfig::move_config())
    }

    /// Registers `address` as `[u8; config.address_length]`.
    pub fn with_prelude(config: BcsConfig) -> Self {
        Self::with_registry(Registry::with_address_length(config.address_length), config)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &BcsConfig {
        &self.config
    }

    pub fn register_struct(&mut self, name: impl Into<String>, def: StructDef) -> Result<(), SchemaError> {
        self.registry.register_struct(name, def)
    }

    pub fn register_enum(&mut self, name: impl Into<String>, def: EnumDef) -> Result<(), SchemaError> {
        self.registry.register_enum(name, def)
    }

    pub fn register_alias(&mut self, name: impl Into<String>, target: TypeTag) -> Result<(), SchemaError> {
        self.registry.register_alias(name, target)
    }

    /// Registers `name` as a `len`-byte address.
    pub fn register_address(&mut self, name: impl Into<String>, len: usize) -> Result<(), SchemaError> {
        self.registry.register_address(name, len)
    }

    /// Registers a struct from `(field, type string)` pairs.
    pub fn register_struct_str(
        &mut self,
        name: impl Into<String>,
        type_params: &[&str],
        fields: &[(&str, &str)],
    ) -> Result<(), SchemaError> {
        let naming = self.config.naming;
        self.registry.register_struct_str(name, type_params, fields, naming)
    }

    /// Registers an enum from `(variant, type string)` pairs.
    pub fn register_enum_str(
        &mut self,
        name: impl Into<String>,
        type_params: &[&str],
        variants: &[(&str, Option<&str>)],
    ) -> Result<(), SchemaError> {
        let naming = self.config.naming;
        self.registry.register_enum_str(name, type_params, variants, naming)
    }

    /// Registers an alias whose target is given as a type string.
    pub fn register_alias_str(&mut self, name: impl Into<String>, target: &str) -> Result<(), SchemaError> {
        let target = self.parse_type(target)?;
        self.registry.register_alias(name, target)
    }

    /// Parses a type string using the configured naming convention.
    pub fn parse_type(&self, input: &str) -> Result<TypeTag, SchemaError> {
        crate::model::parse_type_tag(input, self.config.naming, &[])
    }

    // =========================================================================
    // ENCODING
    // =========================================================================

    /// Encodes `value` as `tag`.
    pub fn encode(&self, value: &Value, tag: &TypeTag) -> Result<EncodedValue, EncodeError> {
        let mut writer = Writer::new();
        self.encode_into(&mut writer, value, tag)?;
        Ok(EncodedValue::new(writer.into_bytes()))
    }

    /// Appends the encoding of `value` to `writer`.
    ///
    /// On error the writer is left exactly as it was.
    pub fn encode_into(&self, writer: &mut Writer, value: &Value, tag: &TypeTag) -> Result<(), EncodeError> {
        let start = writer.len();
        match self.encode_value(writer, value, tag, 0) {
            Ok(()) => {
                trace!(type_tag = %tag, len = writer.len() - start, "encoded value");
                Ok(())
            }
            Err(e) => {
                writer.truncate(start);
                debug!(type_tag = %tag, error = %e, "encode failed");
                Err(e)
            }
        }
    }

    /// Returns the number of bytes `value` encodes to.
    pub fn serialized_size(&self, value: &Value, tag: &TypeTag) -> Result<usize, EncodeError> {
        let mut writer = Writer::new();
        self.encode_value(&mut writer, value, tag, 0)?;
        Ok(writer.len())
    }

    /// Encodes `value` as the type named by a type string.
    pub fn encode_str(&self, type_str: &str, value: &Value) -> Result<EncodedValue, Error> {
        let tag = self.parse_type(type_str)?;
        Ok(self.encode(value, &tag)?)
    }

    fn encode_value(&self, w: &mut Writer, value: &Value, tag: &TypeTag, depth: usize) -> Result<(), EncodeError> {
        if depth > self.config.max_depth {
            return Err(EncodeError::MaxDepthExceeded {
                max_depth: self.config.max_depth,
            });
        }
        let depth = depth + 1;
        let max_len = self.config.max_sequence_len;

        match tag {
            TypeTag::Bool => match value {
                Value::Bool(b) => {
                    w.write_bool(*b);
                    Ok(())
                }
                other => Err(mismatch(tag, other)),
            },
            TypeTag::U8 => encode_uint(w, value, tag, UintWidth::U8),
            TypeTag::U16 => encode_uint(w, value, tag, UintWidth::U16),
            TypeTag::U32 => encode_uint(w, value, tag, UintWidth::U32),
            TypeTag::U64 => encode_uint(w, value, tag, UintWidth::U64),
            TypeTag::U128 => encode_uint(w, value, tag, UintWidth::U128),
            TypeTag::U256 => encode_uint(w, value, tag, UintWidth::U256),
            TypeTag::String => match value {
                Value::String(s) => containers::encode_string(w, s, max_len),
                other => Err(mismatch(tag, other)),
            },
            TypeTag::Bytes => match value {
                Value::Bytes(b) => containers::encode_bytes(w, b, max_len),
                other => Err(mismatch(tag, other)),
            },
            TypeTag::FixedArray(inner, len) => match value {
                Value::Vector(items) => containers::encode_fixed_array(w, items, *len, |w, item| {
                    self.encode_value(w, item, inner, depth)
                }),
                Value::Bytes(bytes) if **inner == TypeTag::U8 => {
                    containers::encode_fixed_bytes(w, bytes, *len)
                }
                // Addresses and other byte arrays given as text.
                Value::String(text) if **inner == TypeTag::U8 => {
                    let encoding = self.config.address_encoding;
                    let bytes = decode_from_str(text, encoding).map_err(|_| {
                        EncodeError::InvalidByteText {
                            encoding,
                            input: text.clone(),
                        }
                    })?;
                    containers::encode_fixed_bytes(w, &bytes, *len)
                }
                other => Err(mismatch(tag, other)),
            },
            TypeTag::Vector(inner) => match value {
                Value::Vector(items) => containers::encode_vector(w, items, max_len, |w, item| {
                    self.encode_value(w, item, inner, depth)
                }),
                Value::Bytes(bytes) if **inner == TypeTag::U8 => {
                    containers::encode_bytes(w, bytes, max_len)
                }
                other => Err(mismatch(tag, other)),
            },
            TypeTag::Option(inner) => match value {
                Value::Option(item) => containers::encode_option(w, item.as_deref(), |w, item| {
                    self.encode_value(w, item, inner, depth)
                }),
                other => Err(mismatch(tag, other)),
            },
            TypeTag::Map(key_tag, value_tag) => match value {
                Value::Map(entries) => containers::encode_map(
                    w,
                    entries,
                    max_len,
                    |w, k| self.encode_value(w, k, key_tag, depth),
                    |w, v| self.encode_value(w, v, value_tag, depth),
                ),
                other => Err(mismatch(tag, other)),
            },
            TypeTag::Struct(_) | TypeTag::Enum(_) | TypeTag::Named(_) => {
                match self.registry.resolve(tag)? {
                    Resolved::Builtin(target) => self.encode_value(w, value, target, depth),
                    Resolved::Struct { name, def, type_args } => {
                        self.encode_struct(w, value, name, &def.fields, type_args, depth)
                    }
                    Resolved::Enum { name, def, type_args } => {
                        self.encode_enum(w, value, name, def, type_args, depth)
                    }
                }
            }
            TypeTag::InlineStruct(fields) => {
                self.encode_struct(w, value, INLINE_STRUCT_NAME, fields, &[], depth)
            }
            TypeTag::Param(index) => Err(SchemaError::UnboundParam { index: *index }.into()),
        }
    }

    fn encode_struct(
        &self,
        w: &mut Writer,
        value: &Value,
        name: &str,
        defs: &[FieldDef],
        type_args: &[TypeTag],
        depth: usize,
    ) -> Result<(), EncodeError> {
        let fields = match value {
            Value::Struct(fields) => fields,
            other => {
                return Err(EncodeError::TypeMismatch {
                    expected: format!("struct {name}"),
                    found: other.kind_name(),
                });
            }
        };

        // Every supplied field must be declared, and only once.
        for (i, (field, _)) in fields.iter().enumerate() {
            let declared = defs.iter().any(|f| &f.name == field);
            let repeated = fields[..i].iter().any(|(prev, _)| prev == field);
            if !declared || repeated {
                return Err(EncodeError::UnexpectedField {
                    type_name: name.to_string(),
                    field: field.clone(),
                });
            }
        }

        for field in defs {
            let field_value = fields
                .iter()
                .find(|(k, _)| *k == field.name)
                .map(|(_, v)| v)
                .ok_or_else(|| EncodeError::MissingField {
                    type_name: name.to_string(),
                    field: field.name.clone(),
                })?;
            let ty = instantiate(&field.ty, type_args)?;
            self.encode_value(w, field_value, &ty, depth)?;
        }
        Ok(())
    }

    fn encode_enum(
        &self,
        w: &mut Writer,
        value: &Value,
        name: &str,
        def: &EnumDef,
        type_args: &[TypeTag],
        depth: usize,
    ) -> Result<(), EncodeError> {
        let (variant, payload) = match value {
            Value::Enum { variant, payload } => (variant, payload),
            other => {
                return Err(EncodeError::TypeMismatch {
                    expected: format!("enum {name}"),
                    found: other.kind_name(),
                });
            }
        };

        let (index, variant_def) =
            def.variant_index(variant)
                .ok_or_else(|| EncodeError::UnknownVariant {
                    type_name: name.to_string(),
                    variant: variant.clone(),
                })?;

        let payload_mismatch = |reason: &'static str| EncodeError::PayloadMismatch {
            type_name: name.to_string(),
            variant: variant.clone(),
            reason,
        };

        match (&variant_def.payload, payload) {
            (Some(ty), Some(payload)) => {
                let ty = instantiate(ty, type_args)?;
                w.write_uleb128(index as u64);
                self.encode_value(w, payload, &ty, depth)
            }
            (None, None) => {
                w.write_uleb128(index as u64);
                Ok(())
            }
            (Some(_), None) => Err(payload_mismatch("requires a payload")),
            (None, Some(_)) => Err(payload_mismatch("is a unit variant")),
        }
    }

    // =========================================================================
    // DECODING
    // =========================================================================

    /// Decodes a complete buffer as `tag`.
    ///
    /// Bytes left over after the value are an error unless
    /// [`BcsConfig::allow_trailing_bytes`] is set.
    pub fn decode(&self, bytes: &[u8], tag: &TypeTag) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(bytes);
        let value = self.decode_from(&mut reader, tag)?;
        if !self.config.allow_trailing_bytes && !reader.is_empty() {
            let err = DecodeError::TrailingBytes {
                remaining: reader.remaining_len(),
            };
            debug!(type_tag = %tag, error = %err, "decode failed");
            return Err(err);
        }
        Ok(value)
    }

    /// Decodes one value from `reader`, leaving the cursor just past it.
    ///
    /// On error the cursor is moved back to where it started.
    pub fn decode_from(&self, reader: &mut Reader<'_>, tag: &TypeTag) -> Result<Value, DecodeError> {
        let start = reader.position();
        match self.decode_value(reader, tag, 0) {
            Ok(value) => {
                trace!(type_tag = %tag, len = reader.position() - start, "decoded value");
                Ok(value)
            }
            Err(e) => {
                debug!(type_tag = %tag, offset = reader.position(), error = %e, "decode failed");
                reader.rewind(start);
                Err(e)
            }
        }
    }

    /// Decodes bytes as the type named by a type string.
    pub fn decode_str(&self, type_str: &str, bytes: &[u8]) -> Result<Value, Error> {
        let tag = self.parse_type(type_str)?;
        Ok(self.decode(bytes, &tag)?)
    }

    /// Decodes hex, base58 or base64 text as the type named by a type string.
    pub fn decode_encoded(&self, type_str: &str, text: &str, encoding: Encoding) -> Result<Value, Error> {
        let bytes = decode_from_str(text, encoding)?;
        self.decode_str(type_str, &bytes)
    }

    fn decode_value(&self, r: &mut Reader<'_>, tag: &TypeTag, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.config.max_depth {
            return Err(DecodeError::MaxDepthExceeded {
                max_depth: self.config.max_depth,
            });
        }
        let depth = depth + 1;
        let max_len = self.config.max_sequence_len;

        match tag {
            TypeTag::Bool => Ok(Value::Bool(r.read_bool("bool")?)),
            TypeTag::U8 => Ok(Value::U8(r.read_u8("u8")?)),
            TypeTag::U16 => Ok(Value::U16(r.read_u16("u16")?)),
            TypeTag::U32 => Ok(Value::U32(r.read_u32("u32")?)),
            TypeTag::U64 => Ok(Value::U64(r.read_u64("u64")?)),
            TypeTag::U128 => Ok(Value::U128(r.read_u128("u128")?)),
            TypeTag::U256 => Ok(Value::U256(r.read_u256("u256")?)),
            TypeTag::String => Ok(Value::String(containers::decode_string(r, max_len)?.to_string())),
            TypeTag::Bytes => Ok(Value::Bytes(containers::decode_bytes(r, max_len)?.to_vec())),
            TypeTag::FixedArray(inner, len) => {
                containers::decode_fixed_array(r, *len, |r| self.decode_value(r, inner, depth))
                    .map(Value::Vector)
            }
            TypeTag::Vector(inner) => {
                containers::decode_vector(r, max_len, |r| self.decode_value(r, inner, depth))
                    .map(Value::Vector)
            }
            TypeTag::Option(inner) => {
                containers::decode_option(r, |r| self.decode_value(r, inner, depth))
                    .map(|item| Value::Option(item.map(Box::new)))
            }
            TypeTag::Map(key_tag, value_tag) => containers::decode_map(
                r,
                max_len,
                |r| self.decode_value(r, key_tag, depth),
                |r| self.decode_value(r, value_tag, depth),
            )
            .map(Value::Map),
            TypeTag::Struct(_) | TypeTag::Enum(_) | TypeTag::Named(_) => {
                match self.registry.resolve(tag)? {
                    Resolved::Builtin(target) => self.decode_value(r, target, depth),
                    Resolved::Struct { def, type_args, .. } => {
                        self.decode_struct(r, &def.fields, type_args, depth)
                    }
                    Resolved::Enum { name, def, type_args } => {
                        self.decode_enum(r, name, def, type_args, depth)
                    }
                }
            }
            TypeTag::InlineStruct(defs) => self.decode_struct(r, defs, &[], depth),
            TypeTag::Param(index) => Err(SchemaError::UnboundParam { index: *index }.into()),
        }
    }

    fn decode_struct(
        &self,
        r: &mut Reader<'_>,
        defs: &[FieldDef],
        type_args: &[TypeTag],
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let mut fields = Vec::with_capacity(defs.len());
        for field in defs {
            let ty = instantiate(&field.ty, type_args)?;
            fields.push((field.name.clone(), self.decode_value(r, &ty, depth)?));
        }
        Ok(Value::Struct(fields))
    }

    fn decode_enum(
        &self,
        r: &mut Reader<'_>,
        name: &str,
        def: &EnumDef,
        type_args: &[TypeTag],
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let index = r.read_uleb128("enum.variant")?;
        let variant = usize::try_from(index)
            .ok()
            .and_then(|i| def.variants.get(i))
            .ok_or_else(|| DecodeError::InvalidVariantIndex {
                type_name: name.to_string(),
                index,
                variants: def.variants.len(),
            })?;

        let payload = match &variant.payload {
            Some(ty) => {
                let ty = instantiate(ty, type_args)?;
                Some(Box::new(self.decode_value(r, &ty, depth)?))
            }
            None => None,
        };
        Ok(Value::Enum {
            variant: variant.name.clone(),
            payload,
        })
    }
}

/// Binds a definition's type parameters to the arguments of one use.
fn instantiate<'t>(ty: &'t TypeTag, type_args: &[TypeTag]) -> Result<Cow<'t, TypeTag>, SchemaError> {
    if type_args.is_empty() {
        Ok(Cow::Borrowed(ty))
    } else {
        ty.substitute(type_args).map(Cow::Owned)
    }
}

fn encode_uint(w: &mut Writer, value: &Value, tag: &TypeTag, width: UintWidth) -> Result<(), EncodeError> {
    let wide = value.as_uint().ok_or_else(|| mismatch(tag, value))?;
    w.write_uint(&wide, width)
}

fn mismatch(tag: &TypeTag, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: tag.to_string(),
        found: value.kind_name(),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;
    use crate::error::ErrorKind;
    use crate::model::TypeRef;

    fn encode_hex(bcs: &Bcs, value: Value, tag: &TypeTag) -> Vec<u8> {
        bcs.encode(&value, tag).unwrap().into_bytes()
    }

    #[test]
    fn test_u64_300() {
        let bcs = Bcs::new();
        assert_eq!(
            encode_hex(&bcs, Value::U64(300), &TypeTag::U64),
            [0x2C, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_vector_length_uses_uleb128() {
        let bcs = Bcs::new();
        let value = Value::Vector(vec![Value::U8(0); 300]);
        let bytes = encode_hex(&bcs, value.clone(), &TypeTag::vector(TypeTag::U8));
        assert_eq!(&bytes[..2], &[0xAC, 0x02]);
        assert_eq!(bytes.len(), 302);
        assert_eq!(bcs.decode(&bytes, &TypeTag::vector(TypeTag::U8)).unwrap(), value);
    }

    #[test]
    fn test_string_ab() {
        let bcs = Bcs::new();
        assert_eq!(
            encode_hex(&bcs, Value::from("ab"), &TypeTag::String),
            [0x02, 0x61, 0x62]
        );
    }

    #[test]
    fn test_option_u8() {
        let bcs = Bcs::new();
        let tag = TypeTag::option(TypeTag::U8);
        assert_eq!(encode_hex(&bcs, Value::none(), &tag), [0x00]);
        assert_eq!(encode_hex(&bcs, Value::some(Value::U8(7)), &tag), [0x01, 0x07]);
    }

    #[test]
    fn test_struct_field_order() {
        let mut bcs = Bcs::new();
        bcs.register_struct(
            "Pair",
            StructDef::new().field("a", TypeTag::Bool).field("b", TypeTag::U8),
        )
        .unwrap();

        // Field order in the value does not matter; the definition decides.
        let value = Value::structure([("b", Value::U8(5)), ("a", Value::Bool(true))]);
        let tag = TypeTag::structure("Pair");
        assert_eq!(encode_hex(&bcs, value, &tag), [0x01, 0x05]);

        let decoded = bcs.decode(&[0x01, 0x05], &tag).unwrap();
        assert_eq!(
            decoded,
            Value::structure([("a", Value::Bool(true)), ("b", Value::U8(5))])
        );
    }

    #[test]
    fn test_invalid_bool() {
        let bcs = Bcs::new();
        let err = bcs.decode(&[0x05], &TypeTag::Bool).unwrap_err();
        assert_eq!(err, DecodeError::InvalidBool { value: 0x05 });
        assert_eq!(err.kind(), ErrorKind::InvalidBoolean);
    }

    #[test]
    fn test_range_error() {
        let bcs = Bcs::new();
        let err = bcs.encode(&Value::U64(256), &TypeTag::U8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        let big = U256::from(u128::MAX) + U256::from(1u8);
        let err = bcs.encode(&Value::U256(big), &TypeTag::U128).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);

        // Narrower variants widen into larger tags.
        assert_eq!(
            bcs.decode(&encode_hex(&bcs, Value::U8(9), &TypeTag::U32), &TypeTag::U32)
                .unwrap(),
            Value::U32(9)
        );
    }

    #[test]
    fn test_u256_from_string_type() {
        let bcs = Bcs::new();
        let encoded = bcs.encode_str("u256", &Value::U64(100_000)).unwrap();
        assert_eq!(
            encoded.to_hex(),
            "a086010000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_type_mismatch() {
        let bcs = Bcs::new();
        let err = bcs.encode(&Value::from("x"), &TypeTag::U8).unwrap_err();
        assert_eq!(
            err,
            EncodeError::TypeMismatch {
                expected: "u8".into(),
                found: "string"
            }
        );
    }

    #[test]
    fn test_fixed_array_arity() {
        let bcs = Bcs::new();
        let tag = TypeTag::fixed_array(TypeTag::U8, 3);
        let err = bcs.encode(&Value::byte_array(&[1, 2]), &tag).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        assert_eq!(encode_hex(&bcs, Value::byte_array(&[1, 2, 3]), &tag), [1, 2, 3]);
    }

    #[test]
    fn test_struct_missing_and_unexpected_fields() {
        let mut bcs = Bcs::new();
        bcs.register_struct_str("User", &[], &[("age", "u64"), ("name", "string")])
            .unwrap();
        let tag = TypeTag::structure("User");

        let missing = Value::structure([("age", Value::U64(30))]);
        assert!(matches!(
            bcs.encode(&missing, &tag),
            Err(EncodeError::MissingField { field, .. }) if field == "name"
        ));

        let extra = Value::structure([
            ("age", Value::U64(30)),
            ("name", Value::from("Bob")),
            ("email", Value::from("bob@example.com")),
        ]);
        assert!(matches!(
            bcs.encode(&extra, &tag),
            Err(EncodeError::UnexpectedField { field, .. }) if field == "email"
        ));

        let repeated = Value::structure([
            ("age", Value::U64(30)),
            ("age", Value::U64(31)),
            ("name", Value::from("Bob")),
        ]);
        assert!(matches!(
            bcs.encode(&repeated, &tag),
            Err(EncodeError::UnexpectedField { field, .. }) if field == "age"
        ));
    }

    fn enum_engine() -> Bcs {
        let mut bcs = Bcs::with_move_prelude();
        bcs.register_enum_str(
            "Enum",
            &[],
            &[("with_value", Some("address")), ("no_value", None)],
        )
        .unwrap();
        bcs
    }

    #[test]
    fn test_enum_roundtrip() {
        let bcs = enum_engine();
        let tag = TypeTag::enumeration("Enum");

        let addr = Value::byte_array(&[0xbb; 32]);
        let with_value = Value::variant("with_value", addr);
        let bytes = encode_hex(&bcs, with_value.clone(), &tag);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes.len(), 33);
        assert_eq!(bcs.decode(&bytes, &tag).unwrap(), with_value);

        let no_value = Value::unit_variant("no_value");
        assert_eq!(encode_hex(&bcs, no_value.clone(), &tag), [0x01]);
        assert_eq!(bcs.decode(&[0x01], &tag).unwrap(), no_value);
    }

    #[test]
    fn test_enum_errors() {
        let bcs = enum_engine();
        let tag = TypeTag::enumeration("Enum");

        assert!(matches!(
            bcs.encode(&Value::unit_variant("other"), &tag),
            Err(EncodeError::UnknownVariant { .. })
        ));
        assert!(matches!(
            bcs.encode(&Value::unit_variant("with_value"), &tag),
            Err(EncodeError::PayloadMismatch { .. })
        ));
        assert!(matches!(
            bcs.encode(&Value::variant("no_value", Value::U8(1)), &tag),
            Err(EncodeError::PayloadMismatch { .. })
        ));
        assert_eq!(
            bcs.decode(&[0x02], &tag).unwrap_err(),
            DecodeError::InvalidVariantIndex {
                type_name: "Enum".into(),
                index: 2,
                variants: 2
            }
        );
    }

    #[test]
    fn test_enum_reorder_changes_meaning() {
        let mut old = Bcs::new();
        old.register_enum("Side", EnumDef::new().variant("bid", TypeTag::U8).variant("ask", TypeTag::U64))
            .unwrap();
        let mut reordered = Bcs::with_config(BcsConfig::default().with_trailing_bytes(true));
        reordered
            .register_enum("Side", EnumDef::new().variant("ask", TypeTag::U64).variant("bid", TypeTag::U8))
            .unwrap();

        let tag = TypeTag::enumeration("Side");
        let original = Value::variant("ask", Value::U64(5));
        let bytes = old.encode(&original, &tag).unwrap();

        let decoded = reordered.decode(&bytes, &tag).unwrap();
        assert_ne!(decoded, original);
        assert_eq!(decoded, Value::variant("bid", Value::U8(5)));

        // Strict decoding notices the leftover payload bytes instead.
        let mut strict = Bcs::new();
        strict
            .register_enum("Side", EnumDef::new().variant("ask", TypeTag::U64).variant("bid", TypeTag::U8))
            .unwrap();
        assert!(matches!(
            strict.decode(&bytes, &tag),
            Err(DecodeError::TrailingBytes { remaining: 7 })
        ));
    }

    #[test]
    fn test_generics_nested() {
        let mut bcs = Bcs::with_move_prelude();
        bcs.register_struct_str("Coin", &["T"], &[("balance", "Balance<T>")])
            .unwrap();
        bcs.register_struct_str("Balance", &["T"], &[("value", "u64")])
            .unwrap();
        bcs.register_struct_str(
            "Container",
            &["T"],
            &[("owner", "address"), ("is_active", "bool"), ("item", "T")],
        )
        .unwrap();

        let tag = bcs.parse_type("Container<Coin<u8>>").unwrap();
        let value = Value::structure([
            ("owner", Value::byte_array(&[1; 32])),
            ("is_active", Value::Bool(true)),
            (
                "item",
                Value::structure([(
                    "balance",
                    Value::structure([("value", Value::U64(10_000))]),
                )]),
            ),
        ]);

        let bytes = bcs.encode(&value, &tag).unwrap();
        assert_eq!(bytes.len(), 32 + 1 + 8);
        assert_eq!(bcs.decode(&bytes, &tag).unwrap(), value);
    }

    #[test]
    fn test_generic_option_enum() {
        let mut bcs = Bcs::new();
        bcs.register_enum_str("Maybe", &["T"], &[("none", None), ("some", Some("T"))])
            .unwrap();
        let tag = TypeTag::Enum(TypeRef::generic("Maybe", vec![TypeTag::U16]));
        let bytes = bcs.encode(&Value::variant("some", Value::U16(0x0102)), &tag).unwrap();
        assert_eq!(bytes.as_bytes(), &[0x01, 0x02, 0x01]);
    }

    #[test]
    fn test_unknown_type() {
        let bcs = Bcs::new();
        let tag = TypeTag::structure("Nope");
        assert_eq!(
            bcs.encode(&Value::structure(Vec::<(String, Value)>::new()), &tag)
                .unwrap_err()
                .kind(),
            ErrorKind::UnknownType
        );
        assert_eq!(bcs.decode(&[], &tag).unwrap_err().kind(), ErrorKind::UnknownType);
    }

    #[test]
    fn test_recursive_struct_through_option() {
        let mut bcs = Bcs::new();
        bcs.register_struct_str("Node", &[], &[("value", "u8"), ("next", "Option<Node>")])
            .unwrap();
        let tag = TypeTag::structure("Node");

        let list = (0..5u8).rev().fold(Value::none(), |next, v| {
            Value::some(Value::structure([("value", Value::U8(v)), ("next", next)]))
        });
        let Value::Option(Some(head)) = list else {
            panic!("expected a non-empty list");
        };

        let bytes = bcs.encode(&head, &tag).unwrap();
        assert_eq!(bytes.as_bytes(), &[0, 1, 1, 1, 2, 1, 3, 1, 4, 0]);
        assert_eq!(&bcs.decode(&bytes, &tag).unwrap(), head.as_ref());
    }

    #[test]
    fn test_max_depth_on_self_reference() {
        let mut bcs = Bcs::with_config(BcsConfig::default().with_max_depth(16));
        // Infinite on the wire: every Loop contains a Loop and reads nothing.
        bcs.register_struct("Loop", StructDef::new().field("next", TypeTag::structure("Loop")))
            .unwrap();
        let err = bcs.decode(&[], &TypeTag::structure("Loop")).unwrap_err();
        assert_eq!(err, DecodeError::MaxDepthExceeded { max_depth: 16 });
    }

    #[test]
    fn test_max_depth_on_deep_value() {
        let bcs = Bcs::with_config(BcsConfig::default().with_max_depth(4));
        let mut tag = TypeTag::U8;
        let mut value = Value::U8(1);
        for _ in 0..8 {
            tag = TypeTag::option(tag);
            value = Value::some(value);
        }
        assert_eq!(
            bcs.encode(&value, &tag).unwrap_err(),
            EncodeError::MaxDepthExceeded { max_depth: 4 }
        );
    }

    #[test]
    fn test_trailing_bytes() {
        let bcs = Bcs::new();
        assert_eq!(
            bcs.decode(&[0x01, 0xff], &TypeTag::Bool),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        );
        let lenient = Bcs::with_config(BcsConfig::default().with_trailing_bytes(true));
        assert_eq!(lenient.decode(&[0x01, 0xff], &TypeTag::Bool), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_decode_from_sequential_values() {
        let bcs = Bcs::new();
        let mut reader = Reader::new(&[0x01, 0x02, 0x61, 0x62, 0x07]);
        assert_eq!(bcs.decode_from(&mut reader, &TypeTag::Bool), Ok(Value::Bool(true)));
        assert_eq!(bcs.decode_from(&mut reader, &TypeTag::String), Ok(Value::from("ab")));

        // A failed decode leaves the cursor where it was.
        assert!(bcs.decode_from(&mut reader, &TypeTag::U16).is_err());
        assert_eq!(reader.position(), 4);
        assert_eq!(bcs.decode_from(&mut reader, &TypeTag::U8), Ok(Value::U8(7)));
    }

    #[test]
    fn test_encode_into_leaves_writer_untouched_on_error() {
        let bcs = Bcs::new();
        let mut writer = Writer::new();
        bcs.encode_into(&mut writer, &Value::U8(1), &TypeTag::U8).unwrap();

        let tag = TypeTag::vector(TypeTag::U8);
        let bad = Value::Vector(vec![Value::U8(1), Value::Bool(true)]);
        assert!(bcs.encode_into(&mut writer, &bad, &tag).is_err());
        assert_eq!(writer.as_bytes(), &[0x01]);
    }

    #[test]
    fn test_map_keeps_caller_order() {
        let bcs = Bcs::new();
        let tag = bcs.parse_type("Map<string, u8>").unwrap();
        let value = Value::Map(vec![
            (Value::from("b"), Value::U8(2)),
            (Value::from("a"), Value::U8(1)),
        ]);
        let bytes = bcs.encode(&value, &tag).unwrap();
        assert_eq!(bytes.as_bytes(), &[0x02, 0x01, b'b', 0x02, 0x01, b'a', 0x01]);
        assert_eq!(bcs.decode(&bytes, &tag).unwrap(), value);
    }

    #[test]
    fn test_sequence_limit_on_decode() {
        let bcs = Bcs::with_config(BcsConfig::default().with_max_sequence_len(2));
        let err = bcs.decode(&[0x03, 1, 2, 3], &TypeTag::Bytes).unwrap_err();
        assert!(matches!(err, DecodeError::LengthExceedsLimit { len: 3, max: 2, .. }));
    }

    #[test]
    fn test_text_input() {
        let bcs = Bcs::new();
        let encoded = bcs.encode_str("string", &Value::from("this is a string")).unwrap();
        for encoding in [Encoding::Hex, Encoding::Base58, Encoding::Base64] {
            let text = encoded.to_string_as(encoding);
            assert_eq!(
                bcs.decode_encoded("string", &text, encoding).unwrap(),
                Value::from("this is a string")
            );
        }
    }

    #[test]
    fn test_rust_naming() {
        let mut bcs = Bcs::with_config(BcsConfig::rust_config());
        bcs.register_struct_str("User", &[], &[("name", "String"), ("scores", "Vec<u16>")])
            .unwrap();
        let value = Value::structure([
            ("name", Value::from("Adam")),
            ("scores", Value::Vector(vec![Value::U16(1), Value::U16(2)])),
        ]);
        let bytes = bcs.encode_str("User", &value).unwrap();
        assert_eq!(bcs.decode_str("User", &bytes).unwrap(), value);
        assert_eq!(
            bcs.decode_str("Vec<u8>", &[0x02, 0x01, 0x02]).unwrap(),
            Value::Vector(vec![Value::U8(1), Value::U8(2)])
        );
    }

    #[test]
    fn test_alias_string() {
        let mut bcs = Bcs::new();
        bcs.register_alias_str("ObjectDigest", "string").unwrap();
        bcs.register_struct_str(
            "ObjectRef",
            &[],
            &[("object_id", "[u8; 4]"), ("version", "u64"), ("digest", "ObjectDigest")],
        )
        .unwrap();
        let value = Value::structure([
            ("object_id", Value::byte_array(&[0x54, 0x43, 0x70, 0x00])),
            ("version", Value::U64(9180)),
            ("digest", Value::from("hahahahahaha")),
        ]);
        let bytes = bcs.encode_str("ObjectRef", &value).unwrap();
        assert_eq!(bcs.decode_str("ObjectRef", &bytes).unwrap(), value);
    }

    #[test]
    fn test_inline_struct_roundtrip() {
        let bcs = Bcs::with_move_prelude();
        let tag = bcs.parse_type("{ id: address, value: u64 }").unwrap();
        let value = Value::structure([
            ("id", Value::byte_array(&[0x01; 32])),
            ("value", Value::U64(1_000)),
        ]);
        let bytes = bcs.encode(&value, &tag).unwrap();
        assert_eq!(bytes.len(), 40);
        assert_eq!(&bytes.as_bytes()[32..], &1_000u64.to_le_bytes());
        assert_eq!(bcs.decode(bytes.as_bytes(), &tag).unwrap(), value);

        // Same bytes as the registered equivalent.
        let mut named = Bcs::with_move_prelude();
        named
            .register_struct_str("Coin", &[], &[("id", "address"), ("value", "u64")])
            .unwrap();
        assert_eq!(named.encode_str("Coin", &value).unwrap(), bytes);

        let err = bcs
            .encode(&Value::structure([("id", Value::byte_array(&[0; 32]))]), &tag)
            .unwrap_err();
        assert!(matches!(err, EncodeError::MissingField { field, .. } if field == "value"));
    }

    #[test]
    fn test_inline_struct_in_generic() {
        let mut bcs = Bcs::new();
        bcs.register_struct_str("Wrapper", &["T"], &[("inner", "{ item: T, flag: bool }")])
            .unwrap();
        let value = Value::structure([(
            "inner",
            Value::structure([("item", Value::U16(7)), ("flag", Value::Bool(true))]),
        )]);
        let bytes = bcs.encode_str("Wrapper<u16>", &value).unwrap();
        assert_eq!(bytes.as_bytes(), &[0x07, 0x00, 0x01]);
        assert_eq!(bcs.decode_str("Wrapper<u16>", bytes.as_bytes()).unwrap(), value);
    }

    #[test]
    fn test_bytes_value_for_u8_sequences() {
        let bcs = Bcs::new();
        let vector = TypeTag::vector(TypeTag::U8);
        assert_eq!(
            encode_hex(&bcs, Value::Bytes(vec![1, 2, 3]), &vector),
            [0x03, 0x01, 0x02, 0x03]
        );
        // Decoding yields the element form.
        assert_eq!(
            bcs.decode(&[0x03, 0x01, 0x02, 0x03], &vector).unwrap(),
            Value::byte_array(&[1, 2, 3])
        );

        let fixed = TypeTag::fixed_array(TypeTag::U8, 3);
        assert_eq!(encode_hex(&bcs, Value::Bytes(vec![1, 2, 3]), &fixed), [1, 2, 3]);
        assert_eq!(
            bcs.encode(&Value::Bytes(vec![1, 2]), &fixed).unwrap_err(),
            EncodeError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );

        // Only u8 element types take raw bytes.
        let err = bcs
            .encode(&Value::Bytes(vec![1]), &TypeTag::vector(TypeTag::U16))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let limited = Bcs::with_config(BcsConfig::default().with_max_sequence_len(2));
        let err = limited.encode(&Value::Bytes(vec![1, 2, 3]), &vector).unwrap_err();
        assert!(matches!(err, EncodeError::LengthExceedsLimit { len: 3, max: 2, .. }));
    }

    #[test]
    fn test_address_from_hex_text() {
        let bcs = Bcs::with_move_prelude();
        let tag = TypeTag::named("address");
        let expected = bcs.encode(&Value::byte_array(&[0xab; 32]), &tag).unwrap();

        let hex_text = "ab".repeat(32);
        assert_eq!(bcs.encode(&Value::from(hex_text.as_str()), &tag).unwrap(), expected);
        let prefixed = format!("0x{hex_text}");
        assert_eq!(bcs.encode(&Value::from(prefixed.as_str()), &tag).unwrap(), expected);

        let short = bcs.encode(&Value::from("0xabab"), &tag).unwrap_err();
        assert_eq!(
            short,
            EncodeError::LengthMismatch {
                expected: 32,
                actual: 2
            }
        );

        let bad = bcs.encode(&Value::from("0xzz"), &tag).unwrap_err();
        assert!(matches!(bad, EncodeError::InvalidByteText { encoding: Encoding::Hex, .. }));
        assert_eq!(bad.kind(), ErrorKind::Encoding);

        // Text is never accepted for non-byte arrays.
        let err = bcs
            .encode(&Value::from("0x01"), &TypeTag::fixed_array(TypeTag::U16, 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_configurable_address_length() {
        let config = BcsConfig::move_config().with_address_length(20);
        let mut bcs = Bcs::with_prelude(config);
        let tag = TypeTag::named("address");
        let bytes = bcs.encode(&Value::from("0x".to_string() + &"11".repeat(20)), &tag).unwrap();
        assert_eq!(bytes.as_bytes(), &[0x11; 20]);
        assert_eq!(
            bcs.encode(&Value::byte_array(&[0; 32]), &tag).unwrap_err().kind(),
            ErrorKind::LengthMismatch
        );

        bcs.register_address("EvmAddress", 20).unwrap();
        bcs.register_address("SuiAddress", 32).unwrap();
        assert_eq!(
            bcs.encode_str("SuiAddress", &Value::Bytes(vec![0x22; 32])).unwrap().len(),
            32
        );
        assert!(matches!(
            bcs.register_address("address", 32),
            Err(SchemaError::DuplicateDefinition { .. })
        ));
    }

    #[test]
    fn test_address_text_in_base58() {
        let config = BcsConfig::move_config()
            .with_address_length(4)
            .with_address_encoding(Encoding::Base58);
        let bcs = Bcs::with_prelude(config);
        let text = bs58::encode([1u8, 2, 3, 4]).into_string();
        assert_eq!(
            bcs.encode_str("address", &Value::from(text.as_str())).unwrap().as_bytes(),
            &[1, 2, 3, 4]
        );
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bcs>();
    }
}
