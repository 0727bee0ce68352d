//! The generic codec engine: one traversal for every schema.
//!
//! Three mutually recursive operations drive any protocol:
//!
//! - [`write_value`] serializes a [`Value`] under a [`Schema`];
//! - [`read_value`] deserializes, tolerating schema drift;
//! - [`skip_value`] structurally consumes a value knowing only its
//!   wire tag, which is what makes unknown fields survivable.
//!
//! The tolerance policy is lenient everywhere: an unknown field id, a
//! known field whose on-wire tag disagrees with the schema, or a
//! container whose element tags disagree, are all skipped — the bytes
//! are consumed so the stream stays aligned, and the caller sees an
//! absent value. Field ids exist precisely so schemas can evolve; one
//! stale field must never abort a whole message.

use tracing::{debug, trace};

use tightbeam_wire::{
    FieldHeader, ListHeader, MapHeader, ProtocolRead, ProtocolWrite, TypeTag,
};

use crate::{CodecError, Schema, StructValue, Value};

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Serializes `value` through `proto` according to `schema`.
///
/// # Errors
///
/// [`CodecError::UnsupportedType`] when a value's variant disagrees
/// with the schema at any depth — that is a caller bug with no wire
/// representation. Wire failures propagate as
/// [`CodecError::Wire`](CodecError).
pub fn write_value(
    proto: &mut impl ProtocolWrite,
    schema: &Schema,
    value: &Value,
) -> Result<(), CodecError> {
    match (schema, value) {
        (Schema::Bool, Value::Bool(v)) => proto.write_bool(*v)?,
        (Schema::Byte, Value::Byte(v)) => proto.write_byte(*v)?,
        (Schema::I16, Value::I16(v)) => proto.write_i16(*v)?,
        (Schema::I32, Value::I32(v)) => proto.write_i32(*v)?,
        (Schema::I64, Value::I64(v)) => proto.write_i64(*v)?,
        (Schema::Float, Value::Float(v)) => proto.write_float(*v)?,
        (Schema::Double, Value::Double(v)) => proto.write_double(*v)?,
        (Schema::Binary, Value::Binary(v)) => proto.write_binary(v)?,
        (Schema::String, Value::String(v)) => proto.write_string(v)?,

        (Schema::List(element), Value::List(items)) => {
            proto.write_list_begin(ListHeader {
                element: element.tag(),
                count: items.len() as u32,
            })?;
            for item in items {
                write_value(proto, element, item)?;
            }
        }

        (Schema::Set(element), Value::Set(items)) => {
            proto.write_set_begin(ListHeader {
                element: element.tag(),
                count: items.len() as u32,
            })?;
            for item in items {
                write_value(proto, element, item)?;
            }
        }

        (Schema::Map(key, value_schema), Value::Map(entries)) => {
            proto.write_map_begin(MapHeader {
                key: key.tag(),
                value: value_schema.tag(),
                count: entries.len() as u32,
            })?;
            for (k, v) in entries {
                write_value(proto, key, k)?;
                write_value(proto, value_schema, v)?;
            }
        }

        (Schema::Struct(fields), Value::Struct(msg)) => {
            proto.write_struct_begin()?;
            // Ascending field id order, regardless of how the caller
            // filled the value. Absent fields are simply not written.
            for (id, field_schema) in fields.iter() {
                if let Some(field_value) = msg.get(id) {
                    proto.write_field_begin(FieldHeader {
                        id,
                        tag: field_schema.tag(),
                    })?;
                    write_value(proto, field_schema, field_value)?;
                }
            }
            proto.write_field_stop()?;
        }

        (schema, value) => {
            return Err(CodecError::UnsupportedType {
                schema: schema.tag(),
                value: value.kind_name(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Deserializes one value of shape `schema` from `proto`.
///
/// Returns `Ok(None)` when the value was structurally consumed but is
/// logically absent: a container whose on-wire element tags disagree
/// with the schema. The stream is left positioned after the value
/// either way, so the enclosing traversal continues cleanly.
pub fn read_value(
    proto: &mut impl ProtocolRead,
    schema: &Schema,
) -> Result<Option<Value>, CodecError> {
    let value = match schema {
        Schema::Bool => Value::Bool(proto.read_bool()?),
        Schema::Byte => Value::Byte(proto.read_byte()?),
        Schema::I16 => Value::I16(proto.read_i16()?),
        Schema::I32 => Value::I32(proto.read_i32()?),
        Schema::I64 => Value::I64(proto.read_i64()?),
        Schema::Float => Value::Float(proto.read_float()?),
        Schema::Double => Value::Double(proto.read_double()?),
        Schema::Binary => Value::Binary(proto.read_binary()?),
        Schema::String => Value::String(proto.read_string()?),

        Schema::List(element) => {
            let header = proto.read_list_begin()?;
            match read_elements(proto, element, header)? {
                Some(items) => Value::List(items),
                None => return Ok(None),
            }
        }

        Schema::Set(element) => {
            let header = proto.read_set_begin()?;
            match read_elements(proto, element, header)? {
                Some(items) => Value::Set(items),
                None => return Ok(None),
            }
        }

        Schema::Map(key_schema, value_schema) => {
            let header = proto.read_map_begin()?;
            if header.key != key_schema.tag() || header.value != value_schema.tag() {
                debug!(
                    expected_key = %key_schema.tag(),
                    expected_value = %value_schema.tag(),
                    wire_key = %header.key,
                    wire_value = %header.value,
                    "map header mismatch, skipping container"
                );
                for _ in 0..header.count {
                    skip_value(proto, header.key)?;
                    skip_value(proto, header.value)?;
                }
                return Ok(None);
            }
            let mut entries = Vec::new();
            for _ in 0..header.count {
                let k = read_value(proto, key_schema)?;
                let v = read_value(proto, value_schema)?;
                // An entry whose nested container read as absent is
                // dropped whole; its bytes were already consumed.
                if let (Some(k), Some(v)) = (k, v) {
                    entries.push((k, v));
                }
            }
            Value::Map(entries)
        }

        Schema::Struct(fields) => {
            proto.read_struct_begin()?;
            let mut msg = StructValue::new();
            loop {
                let header = proto.read_field_begin()?;
                if header.is_stop() {
                    break;
                }
                match fields.field(header.id) {
                    None => {
                        trace!(
                            field_id = header.id,
                            tag = %header.tag,
                            "skipping unknown field"
                        );
                        skip_value(proto, header.tag)?;
                    }
                    Some(declared) if declared.tag() != header.tag => {
                        debug!(
                            field_id = header.id,
                            declared = %declared.tag(),
                            wire = %header.tag,
                            "field type mismatch, leaving field absent"
                        );
                        skip_value(proto, header.tag)?;
                    }
                    Some(declared) => {
                        if let Some(value) = read_value(proto, declared)? {
                            msg.set(header.id, value);
                        }
                    }
                }
            }
            Value::Struct(msg)
        }
    };
    Ok(Some(value))
}

/// Reads a list/set body, or skips it when the element tag disagrees.
fn read_elements(
    proto: &mut impl ProtocolRead,
    element: &Schema,
    header: ListHeader,
) -> Result<Option<Vec<Value>>, CodecError> {
    if header.element != element.tag() {
        debug!(
            expected = %element.tag(),
            wire = %header.element,
            count = header.count,
            "element type mismatch, skipping container"
        );
        for _ in 0..header.count {
            skip_value(proto, header.element)?;
        }
        return Ok(None);
    }
    let mut items = Vec::new();
    for _ in 0..header.count {
        if let Some(item) = read_value(proto, element)? {
            items.push(item);
        }
    }
    Ok(Some(items))
}

// ---------------------------------------------------------------------------
// Skip
// ---------------------------------------------------------------------------

/// Consumes exactly the bytes/tokens a full read of one `tag`-typed
/// value would, discarding the result. Needs no schema — composites
/// carry enough structure in their headers to skip recursively.
pub fn skip_value(
    proto: &mut impl ProtocolRead,
    tag: TypeTag,
) -> Result<(), CodecError> {
    match tag {
        TypeTag::Null => return Err(CodecError::InvalidValueTag(tag)),
        TypeTag::Bool => {
            proto.read_bool()?;
        }
        TypeTag::Byte => {
            proto.read_byte()?;
        }
        TypeTag::I16 => {
            proto.read_i16()?;
        }
        TypeTag::I32 => {
            proto.read_i32()?;
        }
        TypeTag::I64 => {
            proto.read_i64()?;
        }
        TypeTag::Float => {
            proto.read_float()?;
        }
        TypeTag::Double => {
            proto.read_double()?;
        }
        TypeTag::Binary => {
            proto.read_binary()?;
        }
        TypeTag::String => {
            // Skipped strings are consumed as raw bytes: no reason to
            // reject UTF-8 in data the schema does not even know.
            proto.read_binary()?;
        }
        TypeTag::Struct => {
            proto.read_struct_begin()?;
            loop {
                let header = proto.read_field_begin()?;
                if header.is_stop() {
                    break;
                }
                skip_value(proto, header.tag)?;
            }
        }
        TypeTag::Map => {
            let header = proto.read_map_begin()?;
            for _ in 0..header.count {
                skip_value(proto, header.key)?;
                skip_value(proto, header.value)?;
            }
        }
        TypeTag::List => {
            let header = proto.read_list_begin()?;
            for _ in 0..header.count {
                skip_value(proto, header.element)?;
            }
        }
        TypeTag::Set => {
            let header = proto.read_set_begin()?;
            for _ in 0..header.count {
                skip_value(proto, header.element)?;
            }
        }
    }
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================
