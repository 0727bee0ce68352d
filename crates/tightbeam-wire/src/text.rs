//! The text protocol: human-readable delimited tokens.
//!
//! Every protocol operation becomes one token; a finished message is
//! the tokens joined with `;`, with `\` and `;` backslash-escaped
//! inside each token. Integers — including the packed field, list,
//! map, and envelope headers, using the exact shift/mask arithmetic
//! from [`crate::types`] — are written as decimal strings; floats as
//! their decimal text form; strings as single raw tokens. Binary is
//! unsupported: this protocol exists for loggable, diffable messages,
//! not arbitrary payloads.
//!
//! Text and binary encodings are deliberately not interchangeable. A
//! message must be decoded by the same protocol kind that encoded it.

use std::fmt::Display;
use std::str::FromStr;

use crate::{
    Envelope, FieldHeader, ListHeader, MapHeader, ProtocolRead,
    ProtocolWrite, WireError,
};

/// Token separator in the rendered form.
const SEPARATOR: char = ';';
/// Escape character inside a token.
const ESCAPE: char = '\\';

// ---------------------------------------------------------------------------
// Token framing
// ---------------------------------------------------------------------------

fn escape_token(token: &str, out: &mut String) {
    for c in token.chars() {
        if c == SEPARATOR || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

/// Splits rendered text back into tokens, honoring escapes.
///
/// A lone trailing `\` is kept literally, and a trailing separator
/// does not produce an empty final token.
fn parse_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // True once any character lands in the current token, so "a;" ends
    // after one token but "a;;" yields ["a", ""].
    let mut open = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            SEPARATOR => {
                tokens.push(std::mem::take(&mut current));
                open = false;
            }
            ESCAPE => {
                open = true;
                match chars.peek() {
                    Some(&next) if next == SEPARATOR || next == ESCAPE => {
                        chars.next();
                        current.push(next);
                    }
                    _ => current.push(ESCAPE),
                }
            }
            _ => {
                open = true;
                current.push(c);
            }
        }
    }
    if open {
        tokens.push(current);
    }
    tokens
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Text-protocol writer accumulating tokens in memory.
#[derive(Debug, Default)]
pub struct TextWriter {
    tokens: Vec<String>,
}

impl TextWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the accumulated tokens as one escaped, `;`-joined string.
    pub fn finish(self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            escape_token(token, &mut out);
        }
        out
    }

    fn push<T: Display>(&mut self, value: T) -> Result<(), WireError> {
        self.tokens.push(value.to_string());
        Ok(())
    }
}

impl ProtocolWrite for TextWriter {
    fn write_envelope(&mut self, envelope: &Envelope) -> Result<(), WireError> {
        self.push(envelope.module)?;
        self.push(envelope.pack_action())?;
        self.push(envelope.seq)
    }

    fn write_struct_begin(&mut self) -> Result<(), WireError> {
        Ok(())
    }

    fn write_field_begin(&mut self, header: FieldHeader) -> Result<(), WireError> {
        self.push(header.pack())
    }

    fn write_list_begin(&mut self, header: ListHeader) -> Result<(), WireError> {
        self.push(header.pack())
    }

    fn write_map_begin(&mut self, header: MapHeader) -> Result<(), WireError> {
        self.push(header.count)?;
        self.push(header.pack_tags())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), WireError> {
        self.push(u8::from(value))
    }

    fn write_byte(&mut self, value: u8) -> Result<(), WireError> {
        self.push(value)
    }

    fn write_i16(&mut self, value: i16) -> Result<(), WireError> {
        self.push(value)
    }

    fn write_i32(&mut self, value: i32) -> Result<(), WireError> {
        self.push(value)
    }

    fn write_i64(&mut self, value: i64) -> Result<(), WireError> {
        self.push(value)
    }

    fn write_float(&mut self, value: f32) -> Result<(), WireError> {
        // Widen through f64 so both float widths share one text form.
        self.push(f64::from(value))
    }

    fn write_double(&mut self, value: f64) -> Result<(), WireError> {
        self.push(value)
    }

    fn write_binary(&mut self, _value: &[u8]) -> Result<(), WireError> {
        Err(WireError::Unsupported("binary in text protocol"))
    }

    fn write_string(&mut self, value: &str) -> Result<(), WireError> {
        self.tokens.push(value.to_owned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Text-protocol reader over a rendered token string.
#[derive(Debug)]
pub struct TextReader {
    tokens: Vec<String>,
    pos: usize,
}

impl TextReader {
    /// Tokenizes `text` up front.
    pub fn new(text: &str) -> Self {
        Self {
            tokens: parse_tokens(text),
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Result<&str, WireError> {
        let i = self.pos;
        if i >= self.tokens.len() {
            return Err(WireError::Eof);
        }
        self.pos = i + 1;
        Ok(&self.tokens[i])
    }

    fn parse_next<T: FromStr>(&mut self) -> Result<T, WireError> {
        let token = self.next_token()?;
        token
            .parse()
            .map_err(|_| WireError::InvalidToken(token.to_owned()))
    }
}

impl ProtocolRead for TextReader {
    fn read_envelope(&mut self) -> Result<Envelope, WireError> {
        let module = self.parse_next()?;
        let (action, kind) = Envelope::unpack_action(self.parse_next()?)?;
        let seq = self.parse_next()?;
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
        FieldHeader::unpack(self.parse_next()?)
    }

    fn read_list_begin(&mut self) -> Result<ListHeader, WireError> {
        ListHeader::unpack(self.parse_next()?)
    }

    fn read_map_begin(&mut self) -> Result<MapHeader, WireError> {
        let count = self.parse_next()?;
        let tags = self.parse_next()?;
        MapHeader::unpack(count, tags)
    }

    fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.parse_next::<u8>()? == 1)
    }

    fn read_byte(&mut self) -> Result<u8, WireError> {
        self.parse_next()
    }

    fn read_i16(&mut self) -> Result<i16, WireError> {
        self.parse_next()
    }

    fn read_i32(&mut self) -> Result<i32, WireError> {
        self.parse_next()
    }

    fn read_i64(&mut self) -> Result<i64, WireError> {
        self.parse_next()
    }

    fn read_float(&mut self) -> Result<f32, WireError> {
        Ok(self.parse_next::<f64>()? as f32)
    }

    fn read_double(&mut self) -> Result<f64, WireError> {
        self.parse_next()
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, WireError> {
        Err(WireError::Unsupported("binary in text protocol"))
    }

    fn read_string(&mut self) -> Result<String, WireError> {
        Ok(self.next_token()?.to_owned())
    }
}

// =========================================================================
// Tests
// =========================================================================
