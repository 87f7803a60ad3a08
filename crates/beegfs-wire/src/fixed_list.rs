//! Count-prefixed lists of fixed-size records.
//!
//! The wire form is a `u32` count followed by `count` records laid end to end,
//! each exactly one stride long. Decoding happens in two steps:
//! [`preprocess_fixed_list`] validates that the whole span is present and
//! returns a typed zero-copy view, then [`RawFixedList::materialize`] converts
//! each record into its in-memory form. Materializing cannot fail because the
//! only way to obtain a [`RawFixedList`] is through preprocessing.
//!
//! Record layouts are described with `zerocopy` derives, so the stride is the
//! compile-time size of the raw record and viewing the span is a checked cast
//! rather than manual offset arithmetic.

use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{
    cursor::{ReadCursor, WriteCursor},
    error::{Result, WireError},
    primitive::Primitive,
};

/// A value stored on the wire as one fixed-size record.
pub trait FixedRecord: Sized {
    /// Byte layout of one record.
    type Raw: FromBytes + IntoBytes + KnownLayout + Immutable + Unaligned + 'static;

    /// Builds the raw record for `self`.
    fn to_raw(&self) -> Self::Raw;

    /// Converts a raw record back into its in-memory form.
    fn from_raw(raw: &Self::Raw) -> Self;
}

/// Wire stride of `T`.
pub const fn stride<T: FixedRecord>() -> usize {
    size_of::<T::Raw>()
}

/// Writes `items` as a count-prefixed run of fixed-size records.
pub fn serialize_fixed_list<T: FixedRecord>(w: &mut WriteCursor<'_>, items: &[T]) {
    w.put_len(items.len());
    for item in items {
        w.put_block(item.to_raw().as_bytes());
    }
}

/// Validated, not yet converted, run of fixed-size records.
pub struct RawFixedList<'a, T: FixedRecord> {
    records: &'a [T::Raw],
}

/// Validates a fixed-record list and returns a view over its records.
///
/// Fails if fewer than `count * stride` bytes follow the count. The cursor is
/// advanced past the whole list on success.
pub fn preprocess_fixed_list<'a, T: FixedRecord>(
    r: &mut ReadCursor<'a>,
) -> Result<RawFixedList<'a, T>> {
    let count = u32::get(r)? as usize;
    let stride = stride::<T>();
    let len = count
        .checked_mul(stride)
        .ok_or(WireError::Truncated { needed: usize::MAX, remaining: r.remaining() })?;
    let bytes = r.take(len)?;
    let records =
        <[T::Raw]>::ref_from_bytes(bytes).map_err(|_| WireError::RecordLayout { len, stride })?;
    Ok(RawFixedList { records })
}

impl<'a, T: FixedRecord> RawFixedList<'a, T> {
    /// Number of records.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the list holds no records.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts records one at a time.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> {
        self.records.iter().map(T::from_raw)
    }

    /// Converts every record into its in-memory form.
    pub fn materialize(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: FixedRecord> Clone for RawFixedList<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: FixedRecord> Copy for RawFixedList<'_, T> {}

impl<T: FixedRecord> fmt::Debug for RawFixedList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFixedList")
            .field("count", &self.records.len())
            .field("stride", &stride::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
    #[repr(C)]
    struct RawPair {
        a: u8,
        b: [u8; 2],
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Pair(u8, u16);

    impl FixedRecord for Pair {
        type Raw = RawPair;

        fn to_raw(&self) -> RawPair {
            RawPair { a: self.0, b: self.1.to_le_bytes() }
        }

        fn from_raw(raw: &RawPair) -> Self {
            Self(raw.a, u16::from_le_bytes(raw.b))
        }
    }

    fn encode(items: &[Pair]) -> Vec<u8> {
        let mut counter = WriteCursor::counting();
        serialize_fixed_list(&mut counter, items);
        let mut buf = vec![0u8; counter.position()];
        let mut w = WriteCursor::writing(&mut buf);
        serialize_fixed_list(&mut w, items);
        w.finish().unwrap();
        buf
    }

    #[test]
    fn records_follow_count() {
        let bytes = encode(&[Pair(1, 0x0302), Pair(4, 0x0605)]);
        assert_eq!(bytes, hex!("02000000 010203 040506"));
        assert_eq!(stride::<Pair>(), 3);
    }

    #[test]
    fn preprocess_then_materialize() {
        let bytes = hex!("02000000 010203 040506 ff");
        let mut r = ReadCursor::new(&bytes);
        let raw = preprocess_fixed_list::<Pair>(&mut r).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(r.remaining(), 1);
        assert_eq!(raw.materialize(), vec![Pair(1, 0x0302), Pair(4, 0x0605)]);
    }

    #[test]
    fn missing_records_are_rejected() {
        let bytes = hex!("03000000 010203 040506");
        let mut r = ReadCursor::new(&bytes);
        let err = preprocess_fixed_list::<Pair>(&mut r).unwrap_err();
        assert_eq!(err, WireError::Truncated { needed: 9, remaining: 6 });
    }

    #[test]
    fn empty_list_is_just_a_count() {
        assert_eq!(encode(&[]), hex!("00000000"));
        let bytes = hex!("00000000");
        let mut r = ReadCursor::new(&bytes);
        assert!(preprocess_fixed_list::<Pair>(&mut r).unwrap().is_empty());
    }
}
