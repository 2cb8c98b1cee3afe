//! Struct, enum and alias definitions held by the registry.
//!
//! Field and variant order is the wire contract: fields are written in
//! declared order and enum variants are addressed by their zero-based index.
//! Reordering either changes the encoding of existing data.

use crate::error::SchemaError;
use crate::model::TypeTag;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeTag,
}

/// Ordered struct fields, optionally generic over named type parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructDef {
    pub type_params: Vec<String>,
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares type parameter names; fields refer to them as [`TypeTag::Param`].
    pub fn generic<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
        });
        self
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), SchemaError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::InvalidDefinition {
                    name: name.to_string(),
                    reason: format!("field `{}` twice", field.name),
                });
            }
            check_params(name, &field.ty, self.type_params.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
    pub name: String,
    /// Payload type, or `None` for a unit variant.
    pub payload: Option<TypeTag>,
}

/// Ordered enum variants, optionally generic over named type parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDef {
    pub type_params: Vec<String>,
    pub variants: Vec<VariantDef>,
}

impl EnumDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generic<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a variant carrying a payload of type `ty`.
    pub fn variant(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.variants.push(VariantDef {
            name: name.into(),
            payload: Some(ty),
        });
        self
    }

    /// Appends a unit variant.
    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.variants.push(VariantDef {
            name: name.into(),
            payload: None,
        });
        self
    }

    /// Returns the wire index and definition of the named variant.
    pub fn variant_index(&self, name: &str) -> Option<(usize, &VariantDef)> {
        self.variants.iter().enumerate().find(|(_, v)| v.name == name)
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), SchemaError> {
        if self.variants.is_empty() {
            return Err(SchemaError::InvalidDefinition {
                name: name.to_string(),
                reason: "no variants".to_string(),
            });
        }
        for (i, variant) in self.variants.iter().enumerate() {
            if self.variants[..i].iter().any(|v| v.name == variant.name) {
                return Err(SchemaError::InvalidDefinition {
                    name: name.to_string(),
                    reason: format!("variant `{}` twice", variant.name),
                });
            }
            if let Some(ty) = &variant.payload {
                check_params(name, ty, self.type_params.len())?;
            }
        }
        Ok(())
    }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Struct(StructDef),
    Enum(EnumDef),
    /// Another name for an existing type.
    Alias(TypeTag),
}

impl Definition {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Definition::Struct(_) => "struct",
            Definition::Enum(_) => "enum",
            Definition::Alias(_) => "alias",
        }
    }
}

fn check_params(name: &str, ty: &TypeTag, declared: usize) -> Result<(), SchemaError> {
    match ty.max_param() {
        Some(index) if index >= declared => Err(SchemaError::InvalidDefinition {
            name: name.to_string(),
            reason: format!("type parameter #{index} but only {declared} parameter(s)"),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_builder_preserves_order() {
        let def = StructDef::new()
            .field("b", TypeTag::U8)
            .field("a", TypeTag::Bool);
        let names: Vec<_> = def.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(def.validate("S").is_ok());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let def = StructDef::new()
            .field("a", TypeTag::U8)
            .field("a", TypeTag::Bool);
        assert!(matches!(
            def.validate("S"),
            Err(SchemaError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_undeclared_param_rejected() {
        let def = StructDef::new().field("value", TypeTag::Param(0));
        assert!(def.validate("Box").is_err());
        assert!(def.generic(["T"]).validate("Box").is_ok());
    }

    #[test]
    fn test_enum_variant_index() {
        let def = EnumDef::new().unit("none").variant("some", TypeTag::U64);
        let (index, variant) = def.variant_index("some").unwrap();
        assert_eq!(index, 1);
        assert_eq!(variant.payload, Some(TypeTag::U64));
        assert!(def.variant_index("other").is_none());
    }

    #[test]
    fn test_empty_enum_rejected() {
        assert!(EnumDef::new().validate("Never").is_err());
    }
}
