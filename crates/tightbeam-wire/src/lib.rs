//! Wire layer for Tightbeam.
//!
//! This crate defines how framed values become bytes (or tokens):
//!
//! - **Types** ([`TypeTag`], [`FieldHeader`], [`ListHeader`],
//!   [`MapHeader`], [`Envelope`]) — the tags and packed headers every
//!   protocol shares, including the shift/mask packing arithmetic.
//! - **Protocol traits** ([`ProtocolWrite`], [`ProtocolRead`]) — the
//!   operation set the generic codec engine drives; concrete protocols
//!   differ only in materialization.
//! - **Binary protocol** ([`BinaryWriter`], [`BinaryReader`]) — the
//!   compact varint/zigzag production format.
//! - **Text protocol** ([`TextWriter`], [`TextReader`]) — delimited
//!   decimal tokens for loggable messages, behind the `text` feature.
//! - **Errors** ([`WireError`]) — what can go wrong at the stream
//!   level.
//!
//! # Architecture
//!
//! The wire layer sits below the schema engine. It knows nothing about
//! schemas or dynamic values — it only frames and unframes:
//!
//! ```text
//! tightbeam (Schema + Value) → protocol traits → bytes / tokens
//! ```
//!
//! # Feature flags
//!
//! - `text` (default) — the human-readable token protocol.

mod binary;
mod error;
mod protocol;
#[cfg(feature = "text")]
mod text;
mod types;

pub use binary::{BinaryReader, BinaryWriter};
pub use error::WireError;
pub use protocol::{ProtocolRead, ProtocolWrite};
#[cfg(feature = "text")]
pub use text::{TextReader, TextWriter};
pub use types::{
    ActionKind, Envelope, FieldHeader, ListHeader, MapHeader, TypeTag,
};
