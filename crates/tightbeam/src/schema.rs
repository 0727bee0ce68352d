//! Schema descriptors: the wire shape of a message, declared once.
//!
//! A [`Schema`] is an immutable, composable description of what a
//! value looks like on the wire — which tag it carries and, for
//! composites, the schemas of its parts. Build them once at startup
//! (they are cheap to share behind an `Arc` if needed) and reference
//! them from every encode/decode call; they own no I/O state.
//!
//! This replaces the reflection/annotation scanning the format grew up
//! with: instead of discovering field ids from a host type at runtime,
//! the wire shape is an explicit value, decoupled from however the
//! application stores its data.

use std::collections::BTreeMap;

use tightbeam_wire::TypeTag;

/// Describes the wire shape of one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Float,
    Double,
    Binary,
    String,
    /// Ordered sequence of same-typed elements.
    List(Box<Schema>),
    /// Same wire layout as `List`; the distinction is semantic.
    Set(Box<Schema>),
    /// Key/value pairs, both sides uniformly typed.
    Map(Box<Schema>, Box<Schema>),
    /// Fields keyed by id. See [`StructSchema`].
    Struct(StructSchema),
}

impl Schema {
    /// Convenience constructor for `List`.
    pub fn list(element: Schema) -> Self {
        Self::List(Box::new(element))
    }

    /// Convenience constructor for `Set`.
    pub fn set(element: Schema) -> Self {
        Self::Set(Box::new(element))
    }

    /// Convenience constructor for `Map`.
    pub fn map(key: Schema, value: Schema) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// The wire tag this schema encodes under.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Bool => TypeTag::Bool,
            Self::Byte => TypeTag::Byte,
            Self::I16 => TypeTag::I16,
            Self::I32 => TypeTag::I32,
            Self::I64 => TypeTag::I64,
            Self::Float => TypeTag::Float,
            Self::Double => TypeTag::Double,
            Self::Binary => TypeTag::Binary,
            Self::String => TypeTag::String,
            Self::List(_) => TypeTag::List,
            Self::Set(_) => TypeTag::Set,
            Self::Map(_, _) => TypeTag::Map,
            Self::Struct(_) => TypeTag::Struct,
        }
    }
}

/// A struct's fields, keyed and iterated in ascending field id order.
///
/// The ordering is an invariant of the format, not a convenience:
/// struct encoding order is always ascending id, independent of the
/// order fields were declared in. The `BTreeMap` makes that invariant
/// structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSchema {
    fields: BTreeMap<u32, Schema>,
}

impl StructSchema {
    /// Starts building a struct schema.
    pub fn builder() -> StructSchemaBuilder {
        StructSchemaBuilder {
            fields: BTreeMap::new(),
        }
    }

    /// Looks up the schema declared for a field id.
    pub fn field(&self, id: u32) -> Option<&Schema> {
        self.fields.get(&id)
    }

    /// Iterates fields in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Schema)> {
        self.fields.iter().map(|(id, schema)| (*id, schema))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<StructSchema> for Schema {
    fn from(value: StructSchema) -> Self {
        Self::Struct(value)
    }
}

/// Builder for [`StructSchema`].
#[derive(Debug)]
pub struct StructSchemaBuilder {
    fields: BTreeMap<u32, Schema>,
}

impl StructSchemaBuilder {
    /// Declares a field.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate field id. Two fields sharing an id can
    /// never be told apart on the wire, so this is a programming error
    /// caught at schema construction, not an input condition.
    pub fn field(mut self, id: u32, schema: Schema) -> Self {
        if self.fields.insert(id, schema).is_some() {
            panic!("duplicate field id {id} in struct schema");
        }
        self
    }

    /// Finishes the schema.
    pub fn build(self) -> StructSchema {
        StructSchema {
            fields: self.fields,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_iterate_in_ascending_id_order() {
        // Declaration order is descending; iteration must not be.
        let schema = StructSchema::builder()
            .field(9, Schema::I64)
            .field(3, Schema::String)
            .field(1, Schema::Bool)
            .build();
        let ids: Vec<u32> = schema.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3, 9]);
    }

    #[test]
    #[should_panic(expected = "duplicate field id 2")]
    fn test_duplicate_field_id_panics() {
        let _ = StructSchema::builder()
            .field(2, Schema::I32)
            .field(2, Schema::String);
    }

    #[test]
    fn test_schema_tags() {
        assert_eq!(Schema::Bool.tag(), TypeTag::Bool);
        assert_eq!(Schema::list(Schema::I32).tag(), TypeTag::List);
        assert_eq!(Schema::set(Schema::I32).tag(), TypeTag::Set);
        assert_eq!(
            Schema::map(Schema::String, Schema::Double).tag(),
            TypeTag::Map
        );
        assert_eq!(
            Schema::from(StructSchema::builder().build()).tag(),
            TypeTag::Struct
        );
    }

    #[test]
    fn test_field_lookup() {
        let schema = StructSchema::builder()
            .field(1, Schema::I32)
            .field(2, Schema::String)
            .build();
        assert_eq!(schema.field(1), Some(&Schema::I32));
        assert_eq!(schema.field(5), None);
        assert_eq!(schema.len(), 2);
        assert!(!schema.is_empty());
    }
}
