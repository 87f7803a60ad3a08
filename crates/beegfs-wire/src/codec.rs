//! Encode and decode traits plus the top-level entry points.
//!
//! A type that implements [`Encode`] describes its wire form once; the same
//! description is replayed against a counting cursor to size a buffer and
//! against a writing cursor to fill it. [`Decode`] borrows from its input, so
//! string views and collection previews never copy.

use tracing::debug;

use crate::{
    cursor::{ReadCursor, WriteCursor},
    error::{Result, WireError},
};

/// A value with a wire representation.
pub trait Encode {
    /// Appends this value's wire form to `w`.
    fn encode(&self, w: &mut WriteCursor<'_>);
}

/// A value that can be read back from its wire representation.
///
/// On failure the read cursor may have advanced by an unspecified amount but
/// never past the end of its input.
pub trait Decode<'a>: Sized {
    /// Reads one value from `r`.
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self>;
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        (**self).encode(w);
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        (**self).encode(w);
    }
}

/// Number of bytes `value` occupies on the wire.
pub fn encoded_len<T: Encode + ?Sized>(value: &T) -> usize {
    let mut w = WriteCursor::counting();
    value.encode(&mut w);
    w.position()
}

/// Encodes `value` at the start of `buf`, returning the bytes written.
///
/// Fails with [`WireError::CapacityExceeded`] before touching `buf` when the
/// encoding does not fit.
pub fn encode_into<T: Encode + ?Sized>(value: &T, buf: &mut [u8]) -> Result<usize> {
    let mut counter = WriteCursor::counting();
    value.encode(&mut counter);
    let required = counter.finish()?;
    if required > buf.len() {
        debug!(required, capacity = buf.len(), "encode buffer too small");
        return Err(WireError::CapacityExceeded { required, capacity: buf.len() });
    }

    let mut w = WriteCursor::writing(buf);
    value.encode(&mut w);
    w.finish()
}

/// Encodes `value` into a freshly allocated buffer of exactly the right size.
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; encoded_len(value)];
    let mut w = WriteCursor::writing(&mut buf);
    value.encode(&mut w);
    w.finish()?;
    Ok(buf)
}

/// Decodes one `T` from the start of `buf`.
///
/// Returns the value and the number of bytes consumed. Trailing bytes are left
/// for the caller.
pub fn decode_from<'a, T: Decode<'a>>(buf: &'a [u8]) -> Result<(T, usize)> {
    let mut r = ReadCursor::new(buf);
    let value = T::decode(&mut r)?;
    Ok((value, r.position()))
}
