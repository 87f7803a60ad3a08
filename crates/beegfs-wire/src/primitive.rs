//! Fixed-width little-endian scalars.
//!
//! Integers occupy exactly their natural width in little-endian byte order,
//! independent of host endianness. Booleans take one byte: `1` for true, `0`
//! for false, and any nonzero byte decodes as true.

use crate::{
    codec::{Decode, Encode},
    cursor::{ReadCursor, WriteCursor},
    error::Result,
};

/// A scalar with a fixed wire width.
pub trait Primitive: Copy {
    /// Bytes this type occupies on the wire.
    const WIRE_LEN: usize;

    /// Appends the little-endian form of `self`.
    fn put(self, w: &mut WriteCursor<'_>);

    /// Reads one value, failing if fewer than [`WIRE_LEN`](Self::WIRE_LEN)
    /// bytes remain.
    fn get(r: &mut ReadCursor<'_>) -> Result<Self>;
}

/// Wire width of `T`, known without encoding anything.
pub const fn serial_len<T: Primitive>() -> usize {
    T::WIRE_LEN
}

macro_rules! le_primitive {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Primitive for $ty {
                const WIRE_LEN: usize = size_of::<$ty>();

                fn put(self, w: &mut WriteCursor<'_>) {
                    w.put_block(&self.to_le_bytes());
                }

                fn get(r: &mut ReadCursor<'_>) -> Result<Self> {
                    r.take_array().map(<$ty>::from_le_bytes)
                }
            }

            impl Encode for $ty {
                fn encode(&self, w: &mut WriteCursor<'_>) {
                    self.put(w);
                }
            }

            impl<'a> Decode<'a> for $ty {
                fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
                    Self::get(r)
                }
            }
        )+
    };
}

le_primitive!(u8, i8, u16, i16, u32, i32, u64, i64);

impl Primitive for bool {
    const WIRE_LEN: usize = 1;

    fn put(self, w: &mut WriteCursor<'_>) {
        u8::from(self).put(w);
    }

    fn get(r: &mut ReadCursor<'_>) -> Result<Self> {
        u8::get(r).map(|b| b != 0)
    }
}

impl Encode for bool {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        self.put(w);
    }
}

impl<'a> Decode<'a> for bool {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        Self::get(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WireError, decode_from, encode_to_vec};

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode_to_vec(&0x0102_0304u32).unwrap(), [4, 3, 2, 1]);
        assert_eq!(encode_to_vec(&-2i16).unwrap(), [0xfe, 0xff]);
        assert_eq!(encode_to_vec(&1i64).unwrap(), [1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn widths_match_natural_size() {
        assert_eq!(serial_len::<u8>(), 1);
        assert_eq!(serial_len::<bool>(), 1);
        assert_eq!(serial_len::<i16>(), 2);
        assert_eq!(serial_len::<u32>(), 4);
        assert_eq!(serial_len::<i64>(), 8);
    }

    #[test]
    fn any_nonzero_byte_is_true() {
        assert_eq!(decode_from::<bool>(&[0]).unwrap(), (false, 1));
        assert_eq!(decode_from::<bool>(&[1]).unwrap(), (true, 1));
        assert_eq!(decode_from::<bool>(&[0x80]).unwrap(), (true, 1));
        assert_eq!(encode_to_vec(&true).unwrap(), [1]);
    }

    #[test]
    fn short_input_is_truncated() {
        assert_eq!(
            decode_from::<u64>(&[1, 2, 3]).unwrap_err(),
            WireError::Truncated { needed: 8, remaining: 3 }
        );
    }
}
