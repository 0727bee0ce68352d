//! The binary protocol: compact varint/zigzag byte layout.
//!
//! This is the production wire format. Integers travel as base-128
//! varints (signed ones through zigzag first, so small negatives stay
//! small), floats as raw little-endian IEEE-754 bit patterns, and
//! binary/string as a varint length prefix plus raw bytes. Structural
//! headers are the packed integers from [`crate::types`], written as
//! varints.
//!
//! A writer owns its sink plus a small scratch buffer reused across
//! primitive operations; a reader owns only its source. Neither is
//! meant to be shared between concurrent operations: construct one
//! per encode/decode.

use std::io::{ErrorKind, Read, Write};

use crate::{
    Envelope, FieldHeader, ListHeader, MapHeader, ProtocolRead,
    ProtocolWrite, WireError,
};

/// Longest valid varint: 10 × 7 bits covers a full 64-bit value.
/// Anything longer is corrupt input, not a bigger number.
const MAX_VARINT_BYTES: usize = 10;

/// Chunk size for length-prefixed reads, so a corrupt length hits
/// `Eof` before it can force one giant allocation.
const READ_CHUNK: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Zigzag
// ---------------------------------------------------------------------------

/// Maps a signed 32-bit integer onto an unsigned one, interleaving
/// sign so small magnitudes encode to small varints: 0→0, −1→1, 1→2.
fn zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

fn unzigzag32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

fn zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

fn unzigzag64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Binary-protocol writer over any [`std::io::Write`].
#[derive(Debug)]
pub struct BinaryWriter<W: Write> {
    sink: W,
    /// Scratch for varint and fixed-width encodings. Private to this
    /// instance; reused across calls.
    scratch: [u8; MAX_VARINT_BYTES],
}

impl<W: Write> BinaryWriter<W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            scratch: [0; MAX_VARINT_BYTES],
        }
    }

    /// Consumes the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes an unsigned base-128 varint: 7 value bits per byte,
    /// high bit set on every byte except the last.
    fn write_uvarint(&mut self, mut n: u64) -> Result<(), WireError> {
        let mut len = 0;
        loop {
            if n & !0x7F == 0 {
                self.scratch[len] = n as u8;
                len += 1;
                break;
            }
            self.scratch[len] = (n & 0x7F) as u8 | 0x80;
            len += 1;
            n >>= 7;
        }
        self.sink.write_all(&self.scratch[..len])?;
        Ok(())
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        self.sink.write_all(bytes)?;
        Ok(())
    }
}

impl<W: Write> ProtocolWrite for BinaryWriter<W> {
    fn write_envelope(&mut self, envelope: &Envelope) -> Result<(), WireError> {
        self.write_uvarint(u64::from(envelope.module))?;
        self.write_uvarint(envelope.pack_action())?;
        self.write_uvarint(u64::from(envelope.seq))
    }

    fn write_struct_begin(&mut self) -> Result<(), WireError> {
        // Structs have no framing of their own — the field headers and
        // the stop sentinel carry all the structure.
        Ok(())
    }

    fn write_field_begin(&mut self, header: FieldHeader) -> Result<(), WireError> {
        self.write_uvarint(header.pack())
    }

    fn write_list_begin(&mut self, header: ListHeader) -> Result<(), WireError> {
        self.write_uvarint(header.pack())
    }

    fn write_map_begin(&mut self, header: MapHeader) -> Result<(), WireError> {
        self.write_uvarint(u64::from(header.count))?;
        self.write_byte(header.pack_tags())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), WireError> {
        self.write_byte(u8::from(value))
    }

    fn write_byte(&mut self, value: u8) -> Result<(), WireError> {
        self.scratch[0] = value;
        self.sink.write_all(&self.scratch[..1])?;
        Ok(())
    }

    fn write_i16(&mut self, value: i16) -> Result<(), WireError> {
        self.write_uvarint(u64::from(zigzag32(i32::from(value))))
    }

    fn write_i32(&mut self, value: i32) -> Result<(), WireError> {
        self.write_uvarint(u64::from(zigzag32(value)))
    }

    fn write_i64(&mut self, value: i64) -> Result<(), WireError> {
        self.write_uvarint(zigzag64(value))
    }

    fn write_float(&mut self, value: f32) -> Result<(), WireError> {
        self.write_raw(&value.to_le_bytes())
    }

    fn write_double(&mut self, value: f64) -> Result<(), WireError> {
        self.write_raw(&value.to_le_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<(), WireError> {
        self.write_uvarint(value.len() as u64)?;
        self.write_raw(value)
    }

    fn write_string(&mut self, value: &str) -> Result<(), WireError> {
        self.write_binary(value.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Binary-protocol reader over any [`std::io::Read`].
#[derive(Debug)]
pub struct BinaryReader<R: Read> {
    source: R,
}

impl<R: Read> BinaryReader<R> {
    /// Creates a reader over `source`.
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Fills `buf` completely, looping over short reads so a slow
    /// source gets the chance to catch up. A zero-byte read before
    /// the buffer is full means the source is exhausted: `Eof`.
    fn read_all(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => return Err(WireError::Eof),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(WireError::Io(e)),
            }
        }
        Ok(())
    }

    fn read_raw_byte(&mut self) -> Result<u8, WireError> {
        let mut byte = [0u8; 1];
        self.read_all(&mut byte)?;
        Ok(byte[0])
    }

    /// Reads an unsigned base-128 varint with 64-bit accumulation,
    /// bounded at [`MAX_VARINT_BYTES`] so corrupt input cannot spin.
    fn read_uvarint(&mut self) -> Result<u64, WireError> {
        let mut result = 0u64;
        let mut shift = 0u32;
        for _ in 0..MAX_VARINT_BYTES {
            let byte = self.read_raw_byte()?;
            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(WireError::VarintOverflow)
    }
}

impl<R: Read> ProtocolRead for BinaryReader<R> {
    fn read_envelope(&mut self) -> Result<Envelope, WireError> {
        let module = self.read_uvarint()? as u32;
        let (action, kind) = Envelope::unpack_action(self.read_uvarint()?)?;
        let seq = self.read_uvarint()? as u32;
        Ok(Envelope {
            module,
            action,
            kind,
            seq,
        })
    }

    fn read_struct_begin(&mut self) -> Result<(), WireError> {
        Ok(())
    }

    fn read_field_begin(&mut self) -> Result<FieldHeader, WireError> {
        FieldHeader::unpack(self.read_uvarint()?)
    }

    fn read_list_begin(&mut self) -> Result<ListHeader, WireError> {
        ListHeader::unpack(self.read_uvarint()?)
    }

    fn read_map_begin(&mut self) -> Result<MapHeader, WireError> {
        let count = self.read_uvarint()? as u32;
        let tags = self.read_byte()?;
        MapHeader::unpack(count, tags)
    }

    fn read_bool(&mut self) -> Result<bool, WireError> {
        // Lenient: 1 is true, anything else decodes as false.
        Ok(self.read_byte()? == 1)
    }

    fn read_byte(&mut self) -> Result<u8, WireError> {
        self.read_raw_byte()
    }

    fn read_i16(&mut self) -> Result<i16, WireError> {
        Ok(unzigzag32(self.read_uvarint()? as u32) as i16)
    }

    fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(unzigzag32(self.read_uvarint()? as u32))
    }

    fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(unzigzag64(self.read_uvarint()?))
    }

    fn read_float(&mut self) -> Result<f32, WireError> {
        let mut buf = [0u8; 4];
        self.read_all(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn read_double(&mut self) -> Result<f64, WireError> {
        let mut buf = [0u8; 8];
        self.read_all(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.read_uvarint()? as usize;
        let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(READ_CHUNK);
            let start = buf.len();
            buf.resize(start + take, 0);
            self.read_all(&mut buf[start..])?;
            remaining -= take;
        }
        Ok(buf)
    }

    fn read_string(&mut self) -> Result<String, WireError> {
        Ok(String::from_utf8(self.read_binary()?)?)
    }
}

// =========================================================================
// Tests
// =========================================================================
