//! The protocol abstraction: how values are framed, not how bytes look.
//!
//! The generic codec engine in `tightbeam` never touches bytes. It
//! speaks exclusively through [`ProtocolWrite`] and [`ProtocolRead`],
//! and every concrete protocol — binary today, text for debugging —
//! implements the same operation set with its own materialization.
//! This is the same strategy seam the rest of the workspace uses for
//! swappable implementations: define the interface once, let callers
//! pick the concrete kind.
//!
//! The traits are split along data direction. A writer owns an
//! `io::Write` (or a token sink) plus its private scratch state; a
//! reader owns the matching source. One instance per in-flight
//! encode/decode — the scratch state is reused across primitive calls
//! within an instance and must never be shared between operations.

use crate::{Envelope, FieldHeader, ListHeader, MapHeader, WireError};

/// Serializes framing markers and scalar values to a sink.
///
/// Structural "begin" operations write the headers of composite
/// values; scalars write themselves. `write_struct_begin` exists even
/// though the binary protocol emits nothing for it, so that protocols
/// which *do* frame structs (or count nesting depth) have their hook.
pub trait ProtocolWrite {
    /// Writes the message envelope. Always precedes the payload,
    /// never framed as a struct.
    fn write_envelope(&mut self, envelope: &Envelope) -> Result<(), WireError>;

    /// Marks the start of a struct. May write nothing.
    fn write_struct_begin(&mut self) -> Result<(), WireError>;

    /// Writes one field header (id + type tag).
    fn write_field_begin(&mut self, header: FieldHeader) -> Result<(), WireError>;

    /// Terminates a struct's field list with the stop sentinel.
    fn write_field_stop(&mut self) -> Result<(), WireError> {
        self.write_field_begin(FieldHeader::STOP)
    }

    /// Writes a list header (element tag + count).
    fn write_list_begin(&mut self, header: ListHeader) -> Result<(), WireError>;

    /// Writes a set header. Wire-identical to the list header.
    fn write_set_begin(&mut self, header: ListHeader) -> Result<(), WireError> {
        self.write_list_begin(header)
    }

    /// Writes a map header (count + key/value tags).
    fn write_map_begin(&mut self, header: MapHeader) -> Result<(), WireError>;

    fn write_bool(&mut self, value: bool) -> Result<(), WireError>;
    fn write_byte(&mut self, value: u8) -> Result<(), WireError>;
    fn write_i16(&mut self, value: i16) -> Result<(), WireError>;
    fn write_i32(&mut self, value: i32) -> Result<(), WireError>;
    fn write_i64(&mut self, value: i64) -> Result<(), WireError>;
    fn write_float(&mut self, value: f32) -> Result<(), WireError>;
    fn write_double(&mut self, value: f64) -> Result<(), WireError>;

    /// Writes length-prefixed raw bytes. Not every protocol can
    /// represent this; the text protocol fails with `Unsupported`.
    fn write_binary(&mut self, value: &[u8]) -> Result<(), WireError>;

    /// Writes a string. UTF-8 over `write_binary` on the binary
    /// protocol; a single token on the text protocol.
    fn write_string(&mut self, value: &str) -> Result<(), WireError>;
}

/// Deserializes framing markers and scalar values from a source.
///
/// Mirrors [`ProtocolWrite`] operation for operation. All reads are
/// "exactly this or fail": a source that runs out mid-value surfaces
/// [`WireError::Eof`], never a partial result.
pub trait ProtocolRead {
    /// Reads the message envelope.
    fn read_envelope(&mut self) -> Result<Envelope, WireError>;

    /// Marks the start of a struct. May consume nothing.
    fn read_struct_begin(&mut self) -> Result<(), WireError>;

    /// Reads the next field header. The returned header may be the
    /// field-stop sentinel (`tag == TypeTag::Null`) — callers check
    /// [`FieldHeader::is_stop`] to terminate the field loop.
    fn read_field_begin(&mut self) -> Result<FieldHeader, WireError>;

    /// Reads a list header.
    fn read_list_begin(&mut self) -> Result<ListHeader, WireError>;

    /// Reads a set header. Wire-identical to the list header.
    fn read_set_begin(&mut self) -> Result<ListHeader, WireError> {
        self.read_list_begin()
    }

    /// Reads a map header.
    fn read_map_begin(&mut self) -> Result<MapHeader, WireError>;

    fn read_bool(&mut self) -> Result<bool, WireError>;
    fn read_byte(&mut self) -> Result<u8, WireError>;
    fn read_i16(&mut self) -> Result<i16, WireError>;
    fn read_i32(&mut self) -> Result<i32, WireError>;
    fn read_i64(&mut self) -> Result<i64, WireError>;
    fn read_float(&mut self) -> Result<f32, WireError>;
    fn read_double(&mut self) -> Result<f64, WireError>;

    /// Reads length-prefixed raw bytes. Zero-length is valid and
    /// distinct from absent.
    fn read_binary(&mut self) -> Result<Vec<u8>, WireError>;

    /// Reads a string.
    fn read_string(&mut self) -> Result<String, WireError>;
}
