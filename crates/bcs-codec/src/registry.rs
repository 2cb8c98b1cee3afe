//! Named type definitions.
//!
//! A [`Registry`] maps type names to struct, enum and alias definitions. It is
//! populated before use and then only read. References between definitions
//! are by name and resolved on each lookup, so definitions may be registered
//! in any order and may refer to themselves (through `Option` or `vector`).

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::TypeNaming;
use crate::error::SchemaError;
use crate::limits::ADDRESS_LENGTH;
use crate::model::{parse_type_tag, Definition, EnumDef, StructDef, TypeRef, TypeTag};

/// A type tag after following registry references.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// A built-in tag (integer, string, container or type parameter).
    Builtin(&'a TypeTag),
    Struct {
        name: &'a str,
        def: &'a StructDef,
        type_args: &'a [TypeTag],
    },
    Enum {
        name: &'a str,
        def: &'a EnumDef,
        type_args: &'a [TypeTag],
    },
}

/// Name-keyed store of type definitions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defs: FxHashMap<String, Definition>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the Move prelude: `address` as `[u8; 32]`.
    pub fn with_move_prelude() -> Self {
        Self::with_address_length(ADDRESS_LENGTH)
    }

    /// Creates a registry holding `address` as `[u8; len]`.
    pub fn with_address_length(len: usize) -> Self {
        let mut defs = FxHashMap::default();
        defs.insert(
            "address".to_string(),
            Definition::Alias(TypeTag::fixed_array(TypeTag::U8, len)),
        );
        Self { defs }
    }

    /// Registers a definition under `name`.
    ///
    /// Structs, enums and aliases share one namespace; registering a name a
    /// second time fails with [`SchemaError::DuplicateDefinition`].
    pub fn register(&mut self, name: impl Into<String>, def: Definition) -> Result<(), SchemaError> {
        let name = name.into();
        if self.defs.contains_key(&name) {
            return Err(SchemaError::DuplicateDefinition { name });
        }
        match &def {
            Definition::Struct(s) => s.validate(&name)?,
            Definition::Enum(e) => e.validate(&name)?,
            Definition::Alias(target) => {
                if let Some(index) = target.max_param() {
                    return Err(SchemaError::UnboundParam { index });
                }
            }
        }
        debug!(name = %name, kind = def.kind_name(), "registered type");
        self.defs.insert(name, def);
        Ok(())
    }

    pub fn register_struct(&mut self, name: impl Into<String>, def: StructDef) -> Result<(), SchemaError> {
        self.register(name, Definition::Struct(def))
    }

    pub fn register_enum(&mut self, name: impl Into<String>, def: EnumDef) -> Result<(), SchemaError> {
        self.register(name, Definition::Enum(def))
    }

    /// Registers `name` as an alias for `[u8; len]`.
    pub fn register_address(&mut self, name: impl Into<String>, len: usize) -> Result<(), SchemaError> {
        self.register_alias(name, TypeTag::fixed_array(TypeTag::U8, len))
    }

    pub fn register_alias(&mut self, name: impl Into<String>, target: TypeTag) -> Result<(), SchemaError> {
        self.register(name, Definition::Alias(target))
    }

    /// Registers a struct whose field types are given as type strings.
    ///
    /// `type_params` names the generic parameters usable in field types.
    pub fn register_struct_str(
        &mut self,
        name: impl Into<String>,
        type_params: &[&str],
        fields: &[(&str, &str)],
        naming: TypeNaming,
    ) -> Result<(), SchemaError> {
        let mut def = StructDef::new().generic(type_params.iter().copied());
        for (field, ty) in fields {
            def = def.field(*field, parse_type_tag(ty, naming, type_params)?);
        }
        self.register_struct(name, def)
    }

    /// Registers an enum whose payload types are given as type strings;
    /// `None` declares a unit variant.
    pub fn register_enum_str(
        &mut self,
        name: impl Into<String>,
        type_params: &[&str],
        variants: &[(&str, Option<&str>)],
        naming: TypeNaming,
    ) -> Result<(), SchemaError> {
        let mut def = EnumDef::new().generic(type_params.iter().copied());
        for (variant, ty) in variants {
            def = match ty {
                Some(ty) => def.variant(*variant, parse_type_tag(ty, naming, type_params)?),
                None => def.unit(*variant),
            };
        }
        self.register_enum(name, def)
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.defs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterates over registered names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    /// Follows `tag` through the registry.
    ///
    /// Built-in tags resolve to themselves. `Struct`, `Enum` and `Named`
    /// references are looked up by name, following aliases, and checked for
    /// kind and generic arity.
    pub fn resolve<'a>(&'a self, tag: &'a TypeTag) -> Result<Resolved<'a>, SchemaError> {
        let mut current = tag;
        // Each alias hop visits a distinct entry unless the aliases form a cycle.
        for _ in 0..=self.defs.len() {
            let (type_ref, expected) = match current {
                TypeTag::Struct(r) => (r, Some("struct")),
                TypeTag::Enum(r) => (r, Some("enum")),
                TypeTag::Named(r) => (r, None),
                builtin => return Ok(Resolved::Builtin(builtin)),
            };

            let def = self.defs.get(&type_ref.name).ok_or_else(|| SchemaError::UnknownType {
                name: type_ref.name.clone(),
            })?;

            match def {
                Definition::Alias(target) => {
                    check_arity(type_ref, 0)?;
                    current = target;
                }
                Definition::Struct(s) => {
                    check_kind(type_ref, expected, "struct")?;
                    check_arity(type_ref, s.type_params.len())?;
                    return Ok(Resolved::Struct {
                        name: &type_ref.name,
                        def: s,
                        type_args: &type_ref.type_args,
                    });
                }
                Definition::Enum(e) => {
                    check_kind(type_ref, expected, "enum")?;
                    check_arity(type_ref, e.type_params.len())?;
                    return Ok(Resolved::Enum {
                        name: &type_ref.name,
                        def: e,
                        type_args: &type_ref.type_args,
                    });
                }
            }
        }

        Err(SchemaError::AliasCycle {
            name: tag.to_string(),
        })
    }
}

fn check_kind(
    type_ref: &TypeRef,
    expected: Option<&'static str>,
    found: &'static str,
) -> Result<(), SchemaError> {
    match expected {
        Some(expected) if expected != found => Err(SchemaError::KindMismatch {
            name: type_ref.name.clone(),
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

fn check_arity(type_ref: &TypeRef, expected: usize) -> Result<(), SchemaError> {
    if type_ref.type_args.len() != expected {
        return Err(SchemaError::TypeArgCount {
            name: type_ref.name.clone(),
            expected,
            found: type_ref.type_args.len(),
        });
    }
    Ok(())
}
