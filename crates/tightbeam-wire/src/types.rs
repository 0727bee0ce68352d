//! Core wire types: type tags, structural headers, and the envelope.
//!
//! Everything here is plain data shared by every concrete protocol.
//! The packed-header arithmetic (the shift/mask formulas) also lives
//! here, on the header types themselves, so the binary and text
//! protocols cannot drift apart: both materialize the *same* packed
//! integer, one as a varint and one as a decimal token.

use std::fmt;

use crate::WireError;

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

/// The closed set of wire type tags.
///
/// Discriminant values are part of the wire format and must never
/// change. `Null` is reserved for the struct field-stop sentinel —
/// it is not a declarable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// Field-stop sentinel. Never a value's type.
    Null = 1,
    Bool = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Float = 7,
    Double = 8,
    Binary = 9,
    String = 10,
    Struct = 11,
    Map = 12,
    List = 13,
    Set = 14,
}

impl TypeTag {
    /// Decodes a raw tag byte, rejecting anything outside the closed set.
    pub fn from_raw(raw: u8) -> Result<Self, WireError> {
        Ok(match raw {
            1 => Self::Null,
            2 => Self::Bool,
            3 => Self::Byte,
            4 => Self::I16,
            5 => Self::I32,
            6 => Self::I64,
            7 => Self::Float,
            8 => Self::Double,
            9 => Self::Binary,
            10 => Self::String,
            11 => Self::Struct,
            12 => Self::Map,
            13 => Self::List,
            14 => Self::Set,
            other => return Err(WireError::InvalidTypeTag(other)),
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// Structural headers
// ---------------------------------------------------------------------------

/// Header written before every present struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    /// Field id from the schema. Non-negative, ascending within a struct.
    pub id: u32,
    /// Declared wire type of the field's value.
    pub tag: TypeTag,
}

impl FieldHeader {
    /// The field-stop sentinel terminating a struct's field list.
    pub const STOP: Self = Self {
        id: 0,
        tag: TypeTag::Null,
    };

    /// Packs into the single `(id << 4) | tag` integer.
    pub fn pack(self) -> u64 {
        (u64::from(self.id) << 4) | (self.tag as u64 & 0xF)
    }

    /// Inverse of [`FieldHeader::pack`].
    pub fn unpack(raw: u64) -> Result<Self, WireError> {
        Ok(Self {
            id: (raw >> 4) as u32,
            tag: TypeTag::from_raw((raw & 0xF) as u8)?,
        })
    }

    /// True for the field-stop sentinel.
    pub fn is_stop(self) -> bool {
        self.tag == TypeTag::Null
    }
}

/// Header for a list. Sets reuse it — the set header is wire-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    /// Wire type of every element.
    pub element: TypeTag,
    /// Number of elements that follow.
    pub count: u32,
}

impl ListHeader {
    /// Packs into the single `(count << 4) | element` integer.
    pub fn pack(self) -> u64 {
        (u64::from(self.count) << 4) | (self.element as u64 & 0xF)
    }

    /// Inverse of [`ListHeader::pack`].
    pub fn unpack(raw: u64) -> Result<Self, WireError> {
        Ok(Self {
            element: TypeTag::from_raw((raw & 0xF) as u8)?,
            count: (raw >> 4) as u32,
        })
    }
}

/// Header for a map: entry count plus key/value wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    /// Wire type of every key.
    pub key: TypeTag,
    /// Wire type of every value.
    pub value: TypeTag,
    /// Number of key/value pairs that follow.
    pub count: u32,
}

impl MapHeader {
    /// Packs the two tags into the `(value << 4) | key` byte that
    /// follows the count on the wire.
    pub fn pack_tags(self) -> u8 {
        ((self.value as u8 & 0xF) << 4) | (self.key as u8 & 0xF)
    }

    /// Inverse of [`MapHeader::pack_tags`], combined with the count.
    pub fn unpack(count: u32, tags: u8) -> Result<Self, WireError> {
        Ok(Self {
            key: TypeTag::from_raw(tags & 0xF)?,
            value: TypeTag::from_raw(tags >> 4)?,
            count,
        })
    }
}

// ---------------------------------------------------------------------------
// Message envelope
// ---------------------------------------------------------------------------

/// Whether an envelope frames a request or its response.
///
/// Discriminants are wire-stable: they occupy the low two bits of the
/// envelope's packed action integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActionKind {
    Request = 1,
    Response = 2,
}

impl ActionKind {
    /// Decodes the two action-kind bits.
    pub fn from_raw(raw: u8) -> Result<Self, WireError> {
        match raw {
            1 => Ok(Self::Request),
            2 => Ok(Self::Response),
            other => Err(WireError::InvalidActionKind(other)),
        }
    }
}

/// The fixed three-field header framing a request/response payload.
///
/// Written immediately before a struct payload on the same stream, but
/// with none of the struct machinery: no field ids, no stop marker,
/// always all three fields. On the wire it is three varints:
/// `module`, `(action << 2) | kind`, `seq`.
///
/// Ids are unsigned because that is what the packing can carry — the
/// original format nominally used int32 but cast to unsigned before
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Which module (service) the action belongs to.
    pub module: u32,
    /// The action (method) id within the module.
    pub action: u32,
    /// Request or response.
    pub kind: ActionKind,
    /// Correlation id matching a response to its request.
    pub seq: u32,
}

impl Envelope {
    /// Packs the action id and kind into one integer.
    pub fn pack_action(self) -> u64 {
        (u64::from(self.action) << 2) | (self.kind as u64 & 0x3)
    }

    /// Inverse of [`Envelope::pack_action`].
    pub fn unpack_action(raw: u64) -> Result<(u32, ActionKind), WireError> {
        let kind = ActionKind::from_raw((raw & 0x3) as u8)?;
        Ok(((raw >> 2) as u32, kind))
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {}/{} seq={}",
            self.kind, self.module, self.action, self.seq
        )
    }
}

// =========================================================================
// Tests
// =========================================================================
