//! Framed collections of scalars, strings and records.
//!
//! A collection is a nested frame whose payload is a `u32` element count
//! followed by the elements. Fixed-width elements are stored back to back, so
//! the body must be exactly `count * width` bytes. String elements are stored
//! NUL-terminated with no length prefix. Records and tuples are stored in
//! their own encoding, and the frame must end exactly where the last one does.
//!
//! Like fixed-record lists, collections decode in two steps.
//! [`preprocess_collection`] checks the frame and the body shape without
//! allocating; [`RawCollection::materialize`] then walks the body and builds
//! exactly `count` elements into any container that implements `Extend`.
//! A failed materialization drops whatever it had built. Bytes left in the
//! frame after the last element are an error for every element shape.
//!
//! `Vec`, slices, `LinkedList` and `BTreeSet` all share this wire form, so a
//! list and a vector holding the same elements encode to identical bytes.
//!
//! Some record sequences, such as node lists, use an unframed count-prefixed
//! form instead: see [`serialize_counted`] and [`deserialize_counted`].

use std::{
    collections::{BTreeSet, LinkedList},
    fmt,
    iter,
    marker::PhantomData,
};

use tracing::debug;

use crate::{
    codec::{Decode, Encode},
    cursor::{ReadCursor, WriteCursor},
    error::{Result, WireError},
    nested::{deserialize_nested, serialize_nested},
    primitive::Primitive,
    string::utf8_at,
};

/// How the elements of a collection body are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    /// Every element occupies exactly this many bytes.
    Fixed(usize),
    /// Elements are byte strings ending in NUL.
    Terminated,
    /// Elements are records or tuples that delimit themselves.
    Delimited,
}

/// A value that can be stored as one element of a framed collection.
pub trait Element {
    /// Layout of this element type in a collection body.
    const SHAPE: ElementShape;

    /// Appends this element to a collection body.
    fn encode_element(&self, w: &mut WriteCursor<'_>);
}

/// An [`Element`] that can be read back out of a collection body.
pub trait DecodeElement<'a>: Element + Sized {
    /// Reads one element from a collection body.
    fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self>;
}

macro_rules! numeric_element {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Element for $ty {
                const SHAPE: ElementShape = ElementShape::Fixed(<$ty as Primitive>::WIRE_LEN);

                fn encode_element(&self, w: &mut WriteCursor<'_>) {
                    self.put(w);
                }
            }

            impl<'a> DecodeElement<'a> for $ty {
                fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self> {
                    Self::get(r)
                }
            }
        )+
    };
}

numeric_element!(u8, i8, u16, i16, u32, i32, u64, i64);

// A string element ends at its first NUL; anything after it cannot be
// represented in a NUL-terminated body.
fn put_terminated(w: &mut WriteCursor<'_>, bytes: &[u8]) {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    w.put_block(&bytes[..end]);
    w.put_block(&[0]);
}

fn take_terminated<'a>(r: &mut ReadCursor<'a>) -> Result<(&'a [u8], usize)> {
    let offset = r.position();
    let Some(end) = r.rest().iter().position(|&b| b == 0) else {
        return Err(WireError::MissingTerminator { offset: offset + r.remaining() });
    };
    let bytes = r.take(end + 1)?;
    Ok((&bytes[..end], offset))
}

impl Element for &str {
    const SHAPE: ElementShape = ElementShape::Terminated;

    fn encode_element(&self, w: &mut WriteCursor<'_>) {
        put_terminated(w, self.as_bytes());
    }
}

impl<'a> DecodeElement<'a> for &'a str {
    fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self> {
        let (bytes, offset) = take_terminated(r)?;
        utf8_at(bytes, offset)
    }
}

impl Element for String {
    const SHAPE: ElementShape = ElementShape::Terminated;

    fn encode_element(&self, w: &mut WriteCursor<'_>) {
        put_terminated(w, self.as_bytes());
    }
}

impl<'a> DecodeElement<'a> for String {
    fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self> {
        <&str>::decode_element(r).map(str::to_owned)
    }
}

// Byte strings carry the same wire form as `String` without a UTF-8 check,
// for names that are arbitrary bytes.
impl Element for &[u8] {
    const SHAPE: ElementShape = ElementShape::Terminated;

    fn encode_element(&self, w: &mut WriteCursor<'_>) {
        put_terminated(w, self);
    }
}

impl<'a> DecodeElement<'a> for &'a [u8] {
    fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self> {
        take_terminated(r).map(|(bytes, _)| bytes)
    }
}

impl Element for Vec<u8> {
    const SHAPE: ElementShape = ElementShape::Terminated;

    fn encode_element(&self, w: &mut WriteCursor<'_>) {
        put_terminated(w, self);
    }
}

impl<'a> DecodeElement<'a> for Vec<u8> {
    fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self> {
        <&[u8]>::decode_element(r).map(<[u8]>::to_vec)
    }
}

/// Writes `items` as a framed collection.
pub fn serialize_collection<'e, T, I>(w: &mut WriteCursor<'_>, items: I)
where
    T: Element + 'e,
    I: IntoIterator<Item = &'e T>,
{
    serialize_nested(w, |w| {
        let slot = w.reserve_u32();
        let mut count = 0usize;
        for item in items {
            item.encode_element(w);
            count += 1;
        }
        w.patch_len(slot, count);
    });
}

/// A framed collection whose shape has been checked but whose elements have
/// not been built yet.
pub struct RawCollection<'a, T> {
    count: u32,
    body: ReadCursor<'a>,
    element: PhantomData<fn() -> T>,
}

/// Opens a framed collection and checks its body against the element count.
///
/// For fixed-width elements the body must be exactly `count * width` bytes.
/// For strings a non-empty collection must have a non-empty body ending in
/// NUL. Self-delimiting elements are only checked while materializing. The
/// outer cursor is advanced past the whole frame on success.
pub fn preprocess_collection<'a, T: DecodeElement<'a>>(
    r: &mut ReadCursor<'a>,
) -> Result<RawCollection<'a, T>> {
    let mut body = deserialize_nested(r)?;
    let count = u32::get(&mut body)?;
    match T::SHAPE {
        ElementShape::Fixed(width) => {
            if (count as usize).checked_mul(width) != Some(body.remaining()) {
                debug!(count, width, body_len = body.remaining(), "collection body size mismatch");
                return Err(WireError::ElementCountMismatch { count, width, body_len: body.remaining() });
            }
        },
        ElementShape::Terminated => {
            if count > 0 && body.rest().last() != Some(&0) {
                debug!(count, body_len = body.remaining(), "string collection not terminated");
                return Err(WireError::MissingTerminator { offset: body.position() + body.remaining() });
            }
        },
        ElementShape::Delimited => {},
    }
    Ok(RawCollection { count, body, element: PhantomData })
}

impl<'a, T: DecodeElement<'a>> RawCollection<'a, T> {
    /// Element count from the collection header.
    pub const fn len(&self) -> usize {
        self.count as usize
    }

    /// Returns `true` if the header announces no elements.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The element bytes following the count.
    pub const fn body(&self) -> &'a [u8] {
        self.body.rest()
    }

    /// Builds exactly `len()` elements into a new container.
    ///
    /// Fails if the body runs out early, an element does not decode, or bytes
    /// remain after the last element. The partially built container is
    /// dropped on failure.
    pub fn materialize<C: Default + Extend<T>>(&self) -> Result<C> {
        let mut out = C::default();
        let mut body = self.body;
        for decoded in 0..self.count {
            if body.is_empty() {
                debug!(expected = self.count, decoded, "collection body exhausted");
                return Err(WireError::ShortCollection { expected: self.count, decoded });
            }
            out.extend(iter::once(T::decode_element(&mut body)?));
        }
        if !body.is_empty() {
            debug!(count = self.count, unread = body.remaining(), "collection frame longer than its elements");
            return Err(WireError::UnreadCollectionBytes { unread: body.remaining() });
        }
        Ok(out)
    }
}

impl<T> Clone for RawCollection<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawCollection<'_, T> {}

impl<T> fmt::Debug for RawCollection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCollection")
            .field("count", &self.count)
            .field("body_len", &self.body.remaining())
            .finish()
    }
}

fn decode_collection<'a, T, C>(r: &mut ReadCursor<'a>) -> Result<C>
where
    T: DecodeElement<'a>,
    C: Default + Extend<T>,
{
    preprocess_collection::<T>(r)?.materialize()
}

impl<T: Element> Encode for [T] {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_collection(w, self);
    }
}

impl<T: Element> Encode for Vec<T> {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_collection(w, self);
    }
}

impl<'a, T: DecodeElement<'a>> Decode<'a> for Vec<T> {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        decode_collection(r)
    }
}

impl<T: Element> Encode for LinkedList<T> {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_collection(w, self);
    }
}

impl<'a, T: DecodeElement<'a>> Decode<'a> for LinkedList<T> {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        decode_collection(r)
    }
}

impl<T: Element + Ord> Encode for BTreeSet<T> {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_collection(w, self);
    }
}

impl<'a, T: DecodeElement<'a> + Ord> Decode<'a> for BTreeSet<T> {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        decode_collection(r)
    }
}

/// Writes `items` as a `u32` count followed by each item's own encoding, with
/// no enclosing frame.
pub fn serialize_counted<'e, T, I>(w: &mut WriteCursor<'_>, items: I)
where
    T: Encode + 'e,
    I: IntoIterator<Item = &'e T>,
{
    let slot = w.reserve_u32();
    let mut count = 0usize;
    for item in items {
        item.encode(w);
        count += 1;
    }
    w.patch_len(slot, count);
}

/// Reads a sequence written by [`serialize_counted`].
///
/// Every element must occupy at least one byte, so a count larger than the
/// remaining input is rejected before anything is decoded.
pub fn deserialize_counted<'a, T, C>(r: &mut ReadCursor<'a>) -> Result<C>
where
    T: Decode<'a>,
    C: Default + Extend<T>,
{
    let count = u32::get(r)? as usize;
    if count > r.remaining() {
        debug!(count, remaining = r.remaining(), "sequence count exceeds input");
        return Err(WireError::Truncated { needed: count, remaining: r.remaining() });
    }
    let mut out = C::default();
    for _ in 0..count {
        out.extend(iter::once(T::decode(r)?));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{decode_from, encode_to_vec};

    #[test]
    fn empty_collection_is_eight_bytes() {
        assert_eq!(encode_to_vec(&Vec::<String>::new()).unwrap(), hex!("08000000 00000000"));
        assert_eq!(encode_to_vec(&Vec::<u16>::new()).unwrap(), hex!("08000000 00000000"));
    }

    #[test]
    fn strings_are_nul_terminated_without_prefix() {
        let values = vec!["b".to_owned(), "a".to_owned()];
        let bytes = encode_to_vec(&values).unwrap();
        assert_eq!(bytes, hex!("0c000000 02000000 6200 6100"));
        assert_eq!(decode_from::<Vec<String>>(&bytes).unwrap(), (values, 12));
    }

    #[test]
    fn sets_encode_in_order() {
        let set: BTreeSet<&str> = ["b", "a"].into_iter().collect();
        assert_eq!(encode_to_vec(&set).unwrap(), hex!("0c000000 02000000 6100 6200"));
    }

    #[test]
    fn duplicate_set_elements_collapse() {
        let bytes = hex!("0e000000 03000000 6100 6100 6200");
        let (set, used) = decode_from::<BTreeSet<String>>(&bytes).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(used, bytes.len());

        let numbers = hex!("0e000000 03000000 0700 0700 0700");
        let (set, _) = decode_from::<BTreeSet<u16>>(&numbers).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [7]);
    }

    #[test]
    fn byte_strings_skip_utf8_check() {
        let bytes = hex!("0b000000 01000000 ff4100");
        assert_eq!(decode_from::<Vec<String>>(&bytes).unwrap_err(), WireError::InvalidUtf8 { offset: 8 });

        let (borrowed, _) = decode_from::<Vec<&[u8]>>(&bytes).unwrap();
        assert_eq!(borrowed, [&[0xff, 0x41][..]]);
        let (owned, used) = decode_from::<Vec<Vec<u8>>>(&bytes).unwrap();
        assert_eq!(owned, [vec![0xff, 0x41]]);
        assert_eq!(used, 11);
        assert_eq!(encode_to_vec(&owned).unwrap(), bytes);
    }

    #[test]
    fn bytes_after_last_element_are_rejected() {
        let strings = hex!("0d000000 01000000 6100 00");
        assert_eq!(
            decode_from::<Vec<String>>(&strings).unwrap_err(),
            WireError::UnreadCollectionBytes { unread: 1 }
        );
    }

    #[test]
    fn list_and_vector_share_encoding() {
        let vector = vec![1u32, 2, 3];
        let list: LinkedList<u32> = vector.iter().copied().collect();
        assert_eq!(encode_to_vec(&vector).unwrap(), encode_to_vec(&list).unwrap());
    }

    #[test]
    fn embedded_nul_ends_a_string_element() {
        let bytes = encode_to_vec(&vec!["ab\0cd"]).unwrap();
        assert_eq!(bytes, hex!("0b000000 01000000 616200"));
    }

    #[test]
    fn malformed_string_collections_fail() {
        let cases: [&[u8]; 5] = [
            &hex!("00"),
            &hex!("08000000 000000"),
            &hex!("08000000 01000000"),
            &hex!("09000000 00000000"),
            &hex!("0a000000 01000000 6161"),
        ];
        for input in cases {
            assert!(decode_from::<Vec<String>>(input).is_err(), "accepted {input:02x?}");
            assert!(decode_from::<LinkedList<String>>(input).is_err());
        }
    }

    #[test]
    fn numeric_body_must_match_count() {
        let short = hex!("0a000000 02000000 0100");
        assert_eq!(
            decode_from::<Vec<u16>>(&short).unwrap_err(),
            WireError::ElementCountMismatch { count: 2, width: 2, body_len: 2 }
        );
        let long = hex!("0e000000 01000000 0100 0200 0300");
        assert!(decode_from::<Vec<u16>>(&long).is_err());
    }

    #[test]
    fn short_string_body_is_detected() {
        let bytes = hex!("0a000000 03000000 6100");
        let mut r = ReadCursor::new(&bytes);
        let raw = preprocess_collection::<String>(&mut r).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(
            raw.materialize::<Vec<String>>().unwrap_err(),
            WireError::ShortCollection { expected: 3, decoded: 1 }
        );
    }

    #[test]
    fn borrowed_string_elements() {
        let bytes = hex!("0e000000 02000000 6869 00 796f 00");
        let (values, _) = decode_from::<Vec<&str>>(&bytes).unwrap();
        assert_eq!(values, ["hi", "yo"]);
    }

    #[test]
    fn counted_sequence_is_unframed() {
        let mut counter = WriteCursor::counting();
        serialize_counted(&mut counter, &[7u16, 8]);
        assert_eq!(counter.position(), 8);

        let bytes = hex!("02000000 0700 0800");
        let mut r = ReadCursor::new(&bytes);
        let values = deserialize_counted::<u16, Vec<u16>>(&mut r).unwrap();
        assert_eq!(values, [7, 8]);
    }

    #[test]
    fn counted_sequence_rejects_impossible_count() {
        let bytes = hex!("ffffffff 00");
        let mut r = ReadCursor::new(&bytes);
        let err = deserialize_counted::<u8, Vec<u8>>(&mut r).unwrap_err();
        assert!(err.is_truncated());
    }
}
