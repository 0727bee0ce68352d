//! Schema-driven binary message codec.
//!
//! Tightbeam encodes typed messages — structs, lists, maps, sets, and
//! scalars — into a compact byte stream and back, framed when needed
//! by a small request/response envelope. The shape of every message is
//! an explicit [`Schema`] value built once at startup; decoded data
//! comes back as a dynamic [`Value`] with typed accessors. Unknown and
//! mismatched fields are skipped, not fatal, so the two ends of a
//! connection can evolve their schemas independently as long as the
//! field ids they share agree.
//!
//! # Layers
//!
//! ```text
//! serialize/deserialize (this crate)      — Schema + Value traversal
//!         ↓
//! ProtocolWrite / ProtocolRead            — framing operation set
//!         ↓
//! BinaryWriter/Reader, TextWriter/Reader  — bytes or tokens
//! ```
//!
//! # Example
//!
//! ```rust
//! use tightbeam::{Schema, StructSchema, StructValue, Value};
//!
//! // Declared once, shared by every call.
//! let login = Schema::from(
//!     StructSchema::builder()
//!         .field(1, Schema::String) // username
//!         .field(2, Schema::I32)    // retries
//!         .build(),
//! );
//!
//! let msg = Value::Struct(
//!     StructValue::new().with(1, "ada").with(2, Value::I32(3)),
//! );
//!
//! let bytes = tightbeam::serialize(&login, &msg).unwrap();
//! let decoded = tightbeam::deserialize(&bytes, &login).unwrap().unwrap();
//! assert_eq!(decoded, msg);
//! ```
//!
//! # Concurrency
//!
//! Schemas are immutable and freely shared. Writers and readers hold
//! per-instance scratch state: construct one per in-flight operation
//! and never share it across threads mid-message.

mod engine;
mod error;
mod schema;
mod value;

use std::io::{Read, Write};

pub use engine::{read_value, skip_value, write_value};
pub use error::CodecError;
pub use schema::{Schema, StructSchema, StructSchemaBuilder};
pub use value::{StructValue, Value};

// The wire layer is part of the public vocabulary: envelopes, tags,
// protocol traits, and the concrete protocols all surface here.
pub use tightbeam_wire::{
    ActionKind, BinaryReader, BinaryWriter, Envelope, ProtocolRead,
    ProtocolWrite, TypeTag, WireError,
};
#[cfg(feature = "text")]
pub use tightbeam_wire::{TextReader, TextWriter};

// ---------------------------------------------------------------------------
// Binary entry points
// ---------------------------------------------------------------------------

/// Serializes `value` under `schema` with the binary protocol.
pub fn serialize(schema: &Schema, value: &Value) -> Result<Vec<u8>, CodecError> {
    let mut writer = BinaryWriter::new(Vec::new());
    write_value(&mut writer, schema, value)?;
    Ok(writer.into_inner())
}

/// Streaming form of [`serialize`]: writes straight into `sink`.
pub fn serialize_into<W: Write>(
    sink: W,
    schema: &Schema,
    value: &Value,
) -> Result<(), CodecError> {
    let mut writer = BinaryWriter::new(sink);
    write_value(&mut writer, schema, value)
}

/// Deserializes one `schema`-shaped value with the binary protocol.
///
/// The outer `Option` is `None` only when the root itself is a
/// container whose on-wire header disagrees with the schema — the
/// same "consumed but absent" verdict a nested mismatch gets. A
/// struct root is never absent.
pub fn deserialize(
    bytes: &[u8],
    schema: &Schema,
) -> Result<Option<Value>, CodecError> {
    deserialize_from(bytes, schema)
}

/// Streaming form of [`deserialize`]: reads from `source`.
pub fn deserialize_from<R: Read>(
    source: R,
    schema: &Schema,
) -> Result<Option<Value>, CodecError> {
    let mut reader = BinaryReader::new(source);
    read_value(&mut reader, schema)
}

// ---------------------------------------------------------------------------
// Envelope entry points
// ---------------------------------------------------------------------------

/// Serializes an envelope immediately followed by its payload.
///
/// The envelope carries no struct framing of its own; it simply
/// precedes the payload on the same stream.
pub fn serialize_message(
    envelope: &Envelope,
    schema: &Schema,
    value: &Value,
) -> Result<Vec<u8>, CodecError> {
    let mut writer = BinaryWriter::new(Vec::new());
    writer.write_envelope(envelope)?;
    write_value(&mut writer, schema, value)?;
    Ok(writer.into_inner())
}

/// Inverse of [`serialize_message`]: envelope, then payload.
pub fn deserialize_message(
    bytes: &[u8],
    schema: &Schema,
) -> Result<(Envelope, Option<Value>), CodecError> {
    let mut reader = BinaryReader::new(bytes);
    let envelope = reader.read_envelope()?;
    let value = read_value(&mut reader, schema)?;
    Ok((envelope, value))
}

// ---------------------------------------------------------------------------
// Text entry points
// ---------------------------------------------------------------------------

/// Serializes `value` as a human-readable token string.
///
/// Not wire-compatible with [`serialize`]; a text message must be
/// decoded by [`deserialize_text`].
#[cfg(feature = "text")]
pub fn serialize_text(
    schema: &Schema,
    value: &Value,
) -> Result<String, CodecError> {
    let mut writer = TextWriter::new();
    write_value(&mut writer, schema, value)?;
    Ok(writer.finish())
}

/// Deserializes a token string produced by [`serialize_text`].
#[cfg(feature = "text")]
pub fn deserialize_text(
    text: &str,
    schema: &Schema,
) -> Result<Option<Value>, CodecError> {
    let mut reader = TextReader::new(text);
    read_value(&mut reader, schema)
}
