//! Length-prefixed strings, character arrays and raw blocks.
//!
//! A string is a `u32` length, the bytes, and a trailing NUL that the length
//! does not count. The aligned variant additionally pads with zeros until the
//! absolute buffer position is a multiple of four. A character array is the
//! same length prefix followed by the bytes with no terminator.
//!
//! Decoders return borrowed views into the input. Owned and UTF-8 checked
//! forms are provided through [`Encode`]/[`Decode`] for `String` and `&str`.

use crate::{
    codec::{Decode, Encode},
    cursor::{ALIGNMENT, ReadCursor, WriteCursor},
    error::{Result, WireError},
    primitive::Primitive,
};

/// Writes `bytes` with a `u32` length prefix and a trailing NUL.
pub fn serialize_str(w: &mut WriteCursor<'_>, bytes: &[u8]) {
    w.put_len(bytes.len());
    w.put_block(bytes);
    w.put_block(&[0]);
}

/// Reads a string written by [`serialize_str`], returning the bytes without
/// their terminator.
pub fn deserialize_str<'a>(r: &mut ReadCursor<'a>) -> Result<&'a [u8]> {
    let len = u32::get(r)? as usize;
    let with_nul = len
        .checked_add(1)
        .ok_or(WireError::Truncated { needed: usize::MAX, remaining: r.remaining() })?;
    let raw = r.peek(with_nul)?;
    if raw.last() != Some(&0) {
        return Err(WireError::MissingTerminator { offset: r.position() + len });
    }
    r.skip(with_nul)?;
    Ok(&raw[..len])
}

/// Writes a string like [`serialize_str`], then pads to a 4-byte boundary.
pub fn serialize_str_align4(w: &mut WriteCursor<'_>, bytes: &[u8]) {
    serialize_str(w, bytes);
    w.pad_to(ALIGNMENT);
}

/// Reads a string written by [`serialize_str_align4`].
///
/// Padding is skipped up to the next absolute 4-byte boundary and must be
/// present in the input.
pub fn deserialize_str_align4<'a>(r: &mut ReadCursor<'a>) -> Result<&'a [u8]> {
    let bytes = deserialize_str(r)?;
    r.skip_padding(ALIGNMENT)?;
    Ok(bytes)
}

/// Writes `bytes` with a `u32` length prefix and no terminator.
pub fn serialize_char_array(w: &mut WriteCursor<'_>, bytes: &[u8]) {
    w.put_len(bytes.len());
    w.put_block(bytes);
}

/// Reads a character array written by [`serialize_char_array`].
pub fn deserialize_char_array<'a>(r: &mut ReadCursor<'a>) -> Result<&'a [u8]> {
    let len = u32::get(r)? as usize;
    r.take(len)
}

/// Writes `bytes` verbatim.
pub fn serialize_block(w: &mut WriteCursor<'_>, bytes: &[u8]) {
    w.put_block(bytes);
}

/// Reads exactly `len` raw bytes.
pub fn deserialize_block<'a>(r: &mut ReadCursor<'a>, len: usize) -> Result<&'a [u8]> {
    r.take(len)
}

pub(crate) fn utf8_at(bytes: &[u8], offset: usize) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset })
}

impl Encode for str {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_str(w, self.as_bytes());
    }
}

impl Encode for String {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        self.as_str().encode(w);
    }
}

impl<'a> Decode<'a> for &'a str {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        let offset = r.position() + 4;
        utf8_at(deserialize_str(r)?, offset)
    }
}

impl<'a> Decode<'a> for String {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        <&str>::decode(r).map(str::to_owned)
    }
}
