//! Data model types for BCS schemas and values.
//!
//! - Type tags (the shape of a value)
//! - Schema definitions (structs, enums, aliases)
//! - Dynamic values (what gets encoded and decoded)
//! - Encoded buffers

pub mod encoded;
pub mod schema;
pub mod type_tag;
pub mod value;

pub use encoded::EncodedValue;
pub use schema::{Definition, EnumDef, FieldDef, StructDef, VariantDef};
pub use type_tag::{parse_type_tag, TypeRef, TypeTag};
pub use value::Value;
