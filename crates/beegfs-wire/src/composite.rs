//! Tuples and ordered maps.
//!
//! A tuple is its members encoded back to back, with nothing between them.
//! Tuples delimit themselves, so they can also be elements of a framed
//! collection.
//!
//! A map is a `u32` entry count followed by each key and value in their own
//! encoding, with no enclosing frame. Entries are written in key order. When
//! a key appears more than once on the wire, the last value wins.

use std::collections::BTreeMap;

use crate::{
    codec::{Decode, Encode},
    collection::{DecodeElement, Element, ElementShape, deserialize_counted},
    cursor::{ReadCursor, WriteCursor},
    error::Result,
};

macro_rules! tuple_codec {
    ($($ty:ident $idx:tt),+) => {
        impl<$($ty: Encode),+> Encode for ($($ty,)+) {
            fn encode(&self, w: &mut WriteCursor<'_>) {
                $( self.$idx.encode(w); )+
            }
        }

        impl<'a, $($ty: Decode<'a>),+> Decode<'a> for ($($ty,)+) {
            fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
                Ok(($($ty::decode(r)?,)+))
            }
        }

        impl<$($ty: Encode),+> Element for ($($ty,)+) {
            const SHAPE: ElementShape = ElementShape::Delimited;

            fn encode_element(&self, w: &mut WriteCursor<'_>) {
                self.encode(w);
            }
        }

        impl<'a, $($ty: Encode + Decode<'a>),+> DecodeElement<'a> for ($($ty,)+) {
            fn decode_element(r: &mut ReadCursor<'a>) -> Result<Self> {
                Self::decode(r)
            }
        }
    };
}

tuple_codec!(A 0, B 1);
tuple_codec!(A 0, B 1, C 2);
tuple_codec!(A 0, B 1, C 2, D 3);

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        w.put_len(self.len());
        for (key, value) in self {
            key.encode(w);
            value.encode(w);
        }
    }
}

impl<'a, K: Decode<'a> + Ord, V: Decode<'a>> Decode<'a> for BTreeMap<K, V> {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        deserialize_counted::<(K, V), Self>(r)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{WireError, decode_from, encode_to_vec};

    #[test]
    fn pair_members_follow_each_other() {
        let pair = (7u16, "ab".to_owned());
        let bytes = encode_to_vec(&pair).unwrap();
        assert_eq!(bytes, hex!("0700 02000000 616200"));
        assert_eq!(decode_from::<(u16, String)>(&bytes).unwrap(), (pair, 9));
    }

    #[test]
    fn wider_tuples_keep_member_order() {
        let bytes = encode_to_vec(&(1u8, 2u16, 3u32, true)).unwrap();
        assert_eq!(bytes, hex!("01 0200 03000000 01"));
        assert_eq!(decode_from::<(u8, u16, u32, bool)>(&bytes).unwrap().0, (1, 2, 3, true));
    }

    #[test]
    fn map_is_count_then_sorted_entries() {
        let map: BTreeMap<u32, String> = [(9, "z".to_owned()), (2, "y".to_owned())].into_iter().collect();
        let bytes = encode_to_vec(&map).unwrap();
        assert_eq!(bytes, hex!("02000000 02000000 01000000 7900 09000000 01000000 7a00"));
        assert_eq!(decode_from::<BTreeMap<u32, String>>(&bytes).unwrap(), (map, bytes.len()));
    }

    #[test]
    fn repeated_map_key_keeps_last_value() {
        let bytes = hex!("02000000 01000000 0a00 01000000 0b00");
        let (map, used) = decode_from::<BTreeMap<u32, u16>>(&bytes).unwrap();
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 0x0b)]);
        assert_eq!(used, bytes.len());
    }

    #[test]
    fn map_count_beyond_input_is_rejected() {
        let err = decode_from::<BTreeMap<u8, u8>>(&hex!("05000000 0102")).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn tuples_are_framed_collection_elements() {
        let entries = vec![(1u8, "a".to_owned())];
        let bytes = encode_to_vec(&entries).unwrap();
        assert_eq!(bytes, hex!("0f000000 01000000 01 01000000 6100"));
        assert_eq!(decode_from::<Vec<(u8, String)>>(&bytes).unwrap(), (entries, 15));

        let padded = hex!("10000000 01000000 01 01000000 6100 ff");
        assert_eq!(
            decode_from::<Vec<(u8, String)>>(&padded).unwrap_err(),
            WireError::UnreadCollectionBytes { unread: 1 }
        );
    }
}
