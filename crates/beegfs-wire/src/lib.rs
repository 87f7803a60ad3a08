//! Binary wire serialization for BeeGFS messages.
//!
//! Messages are flat little-endian byte streams built from a handful of
//! shapes: fixed-width scalars, length-prefixed strings (optionally padded to
//! 4 bytes), self-describing nested frames, count-prefixed lists of
//! fixed-size records, framed collections of scalars, strings or records,
//! tuples and ordered maps. Records are ordered field schemas over these
//! shapes.
//!
//! Every encoder runs against a [`WriteCursor`] that either counts or writes,
//! so sizing a buffer and filling it are the same code. Every decoder reads
//! through a [`ReadCursor`] whose single checked advance keeps it inside its
//! input.
//!
//! Variable-length lists decode in two steps. A preprocess step validates the
//! shape of the data and returns a borrowed view; a materialize step builds
//! owned values from a view that is already known to be well formed.
//!
//! # Security
//!
//! Input is untrusted. No decoder reads past the end of its input, trusts a
//! length or count without checking it against the bytes present, or
//! preallocates from a count. Encoding never writes past the end of the
//! destination buffer.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod collection;
pub mod composite;
pub mod cursor;
pub mod error;
pub mod field;
pub mod fixed_list;
pub mod nested;
pub mod nic;
pub mod node;
pub mod primitive;
pub mod schema;
pub mod string;
pub mod wire_enum;

pub use codec::{Decode, Encode, decode_from, encode_into, encode_to_vec, encoded_len};
pub use collection::{
    DecodeElement, Element, ElementShape, RawCollection, deserialize_counted, preprocess_collection,
    serialize_collection, serialize_counted,
};
pub use cursor::{ALIGNMENT, ReadCursor, Slot, WriteCursor, padding_for};
pub use error::{ErrorKind, Result, WireError};
pub use field::{
    As, AsRepr, Block, ByteStr, CharArray, Counted, FieldCodec, FixedList, Nested, PadTo, Plain,
    StrAlign4,
};
pub use fixed_list::{FixedRecord, RawFixedList, preprocess_fixed_list, serialize_fixed_list, stride};
pub use nested::{
    FRAME_HEADER_LEN, Framed, deserialize_nested, deserialize_padded, serialize_nested,
    serialize_padded,
};
pub use nic::{NIC_NAME_LEN, NIC_RECORD_LEN, NicAddress, NicRecord, NicType, UnknownNicType};
pub use node::{NodeDescriptor, NodeList, NodeType};
pub use primitive::{Primitive, serial_len};
pub use schema::{Field, Record, decode_record, encode_record};
pub use string::{
    deserialize_block, deserialize_char_array, deserialize_str, deserialize_str_align4,
    serialize_block, serialize_char_array, serialize_str, serialize_str_align4,
};
pub use wire_enum::{WireEnum, deserialize_enum, serialize_enum};
