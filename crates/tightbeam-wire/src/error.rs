//! Error types for the wire layer.
//!
//! Each crate in Tightbeam defines its own error enum. A `WireError`
//! always means the byte/token stream itself went wrong — truncation,
//! corruption, or an operation the chosen protocol cannot express.
//! Schema-level problems live one layer up in `tightbeam::CodecError`.

/// Errors produced while reading or writing a wire stream.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The underlying transport failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ran out before a requested read could complete.
    ///
    /// Always fatal to the current operation: the stream position is
    /// no longer trustworthy, so nothing is retried internally.
    #[error("unexpected end of input")]
    Eof,

    /// A varint carried more than 10 continuation bytes.
    ///
    /// 10 bytes is the longest valid encoding of a 64-bit value; more
    /// means corrupt input, and decoding must stop rather than loop.
    #[error("varint exceeds 10 bytes")]
    VarintOverflow,

    /// A type-tag nibble held a value outside the closed 1..=14 set.
    #[error("invalid type tag {0}")]
    InvalidTypeTag(u8),

    /// An envelope's action-kind bits were neither Request nor Response.
    #[error("invalid action kind {0}")]
    InvalidActionKind(u8),

    /// A string's bytes were not valid UTF-8.
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The protocol cannot represent the requested operation
    /// (e.g., raw binary through the text protocol).
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A text-protocol token could not be parsed as the expected value.
    #[cfg(feature = "text")]
    #[error("invalid token: {0:?}")]
    InvalidToken(String),
}
