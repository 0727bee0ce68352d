//! Error types for the codec engine.
//!
//! A `CodecError` is always fatal to the current serialize/deserialize
//! call. The *recoverable* mismatches — an unknown field id, a field
//! or container whose on-wire tag disagrees with the schema — never
//! appear here: the engine absorbs them, skips the offending bytes,
//! and the caller observes only an absent value.

use tightbeam_wire::{TypeTag, WireError};

/// Fatal errors from the generic codec engine.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The wire stream itself failed (truncation, corruption, I/O).
    #[error(transparent)]
    Wire(#[from] WireError),

    /// A value's variant does not match the schema it was written
    /// under. This is a caller bug, not a wire problem, and nothing
    /// has a defined encoding for it — so it fails loudly.
    #[error("schema {schema} cannot encode a {value} value")]
    UnsupportedType {
        /// The tag the schema declares at this position.
        schema: TypeTag,
        /// The kind of value actually supplied.
        value: &'static str,
    },

    /// A tag that can never head a value (the field-stop sentinel)
    /// appeared where a value was required. The stream is corrupt.
    #[error("type tag {0} cannot appear as a value")]
    InvalidValueTag(TypeTag),
}
