//! Self-describing length frames.
//!
//! A nested field is a `u32` total length followed by the payload, where the
//! total counts its own four header bytes. Readers that do not understand a
//! payload can skip it by its length, and readers that understand only a
//! prefix of it still land on the next field.
//!
//! The encoder does not need to know the payload length up front: it reserves
//! the header, writes the payload, and patches the header afterwards.
//!
//! Padded fields are the headerless counterpart: a field followed by zero
//! bytes until its own length, measured from where it started, is a multiple
//! of the padding width.

use tracing::trace;

use crate::{
    codec::{Decode, Encode},
    cursor::{ReadCursor, WriteCursor, padding_for},
    error::{Result, WireError},
    primitive::Primitive,
};

/// Bytes taken by a nested frame's length header.
pub const FRAME_HEADER_LEN: usize = 4;

/// Writes the payload produced by `body` inside a nested frame.
pub fn serialize_nested(w: &mut WriteCursor<'_>, body: impl FnOnce(&mut WriteCursor<'_>)) {
    let start = w.position();
    let slot = w.reserve_u32();
    body(w);
    let total = w.position() - start;
    w.patch_len(slot, total);
}

/// Opens a nested frame and returns a cursor over its payload.
///
/// The outer cursor is advanced past the whole frame, so anything left unread
/// in the returned cursor is skipped.
pub fn deserialize_nested<'a>(r: &mut ReadCursor<'a>) -> Result<ReadCursor<'a>> {
    let declared = u32::get(r)?;
    let Some(payload_len) = (declared as usize).checked_sub(FRAME_HEADER_LEN) else {
        trace!(declared, "nested frame shorter than its header");
        return Err(WireError::FrameTooShort { declared });
    };
    r.split(payload_len)
}

/// Writes the field produced by `body`, then pads it with zeros to a multiple
/// of `align` bytes counted from the field's start.
pub fn serialize_padded(w: &mut WriteCursor<'_>, align: usize, body: impl FnOnce(&mut WriteCursor<'_>)) {
    let start = w.position();
    body(w);
    w.put_zeros(padding_for(w.position() - start, align));
}

/// Reads a field written by [`serialize_padded`] and skips its padding.
///
/// Padding bytes are not inspected.
pub fn deserialize_padded<'a, T>(
    r: &mut ReadCursor<'a>,
    align: usize,
    body: impl FnOnce(&mut ReadCursor<'a>) -> Result<T>,
) -> Result<T> {
    let start = r.position();
    let value = body(r)?;
    r.skip(padding_for(r.position() - start, align))?;
    Ok(value)
}

/// A value carried inside a nested frame.
///
/// Decoding ignores any payload bytes the inner value does not consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Framed<T>(pub T);

impl<T: Encode> Encode for Framed<T> {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_nested(w, |w| self.0.encode(w));
    }
}

impl<'a, T: Decode<'a>> Decode<'a> for Framed<T> {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        let mut payload = deserialize_nested(r)?;
        T::decode(&mut payload).map(Framed)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{decode_from, encode_to_vec};

    #[test]
    fn header_counts_itself() {
        let bytes = encode_to_vec(&Framed(0x0a0b_u16)).unwrap();
        assert_eq!(bytes, hex!("06000000 0b0a"));
    }

    #[test]
    fn empty_payload_is_four_bytes() {
        let mut counter = WriteCursor::counting();
        serialize_nested(&mut counter, |_| {});
        assert_eq!(counter.position(), FRAME_HEADER_LEN);

        let bytes = hex!("04000000");
        let mut r = ReadCursor::new(&bytes);
        let payload = deserialize_nested(&mut r).unwrap();
        assert!(payload.is_empty());
        assert!(r.is_empty());
    }

    #[test]
    fn too_short_total_is_rejected() {
        let bytes = hex!("03000000 ffffffff");
        let mut r = ReadCursor::new(&bytes);
        assert_eq!(deserialize_nested(&mut r), Err(WireError::FrameTooShort { declared: 3 }));
    }

    #[test]
    fn payload_must_be_present() {
        let bytes = hex!("0a000000 0102");
        let mut r = ReadCursor::new(&bytes);
        assert!(deserialize_nested(&mut r).unwrap_err().is_truncated());
    }

    #[test]
    fn unread_payload_is_skipped() {
        let bytes = hex!("0a000000 0100 ffffffff 07");
        let mut r = ReadCursor::new(&bytes);
        let Framed(first) = Framed::<u16>::decode(&mut r).unwrap();
        assert_eq!(first, 1);
        assert_eq!(u8::decode(&mut r), Ok(7));
    }

    #[test]
    fn padding_is_relative_to_field_start() {
        let mut buf = [0xffu8; 9];
        let mut w = WriteCursor::writing(&mut buf);
        w.put_block(&[0xaa]);
        serialize_padded(&mut w, 8, |w| 3u16.encode(w));
        assert_eq!(w.finish(), Ok(9));
        assert_eq!(buf, hex!("aa 0300 000000000000"));

        let mut r = ReadCursor::new(&buf);
        r.skip(1).unwrap();
        assert_eq!(deserialize_padded(&mut r, 8, u16::decode), Ok(3));
        assert!(r.is_empty());
    }

    #[test]
    fn missing_field_padding_is_truncation() {
        let bytes = hex!("0300 00");
        let mut r = ReadCursor::new(&bytes);
        assert!(deserialize_padded(&mut r, 4, u16::decode).unwrap_err().is_truncated());
    }

    #[test]
    fn nested_frames_compose() {
        let bytes = encode_to_vec(&Framed(Framed(1u8))).unwrap();
        assert_eq!(bytes, hex!("09000000 05000000 01"));
        assert_eq!(decode_from::<Framed<Framed<u8>>>(&bytes).unwrap(), (Framed(Framed(1)), 9));
    }
}
