//! Codecs that describe how a record field is carried on the wire.
//!
//! A record schema pairs each field with a codec type. The codec decides the
//! wire form independently of the field's Rust type: a `String` field can be a
//! plain string or an aligned one, a `u8` field can travel widened to `u32`,
//! an enum travels as its declared integer width.

use std::marker::PhantomData;

use crate::{
    codec::{Decode, Encode},
    collection::{deserialize_counted, serialize_counted},
    cursor::{ReadCursor, WriteCursor},
    error::{Result, WireError},
    fixed_list::{FixedRecord, preprocess_fixed_list, serialize_fixed_list},
    nested::{deserialize_nested, deserialize_padded, serialize_nested, serialize_padded},
    primitive::Primitive,
    string::{
        deserialize_char_array, deserialize_str, deserialize_str_align4, serialize_char_array,
        serialize_str, serialize_str_align4, utf8_at,
    },
    wire_enum::{WireEnum, deserialize_enum, serialize_enum},
};

/// Wire form of a record field holding a `T`.
pub trait FieldCodec<T> {
    /// Appends the field to `w`.
    fn encode_field(value: &T, w: &mut WriteCursor<'_>);

    /// Reads the field from `r`.
    fn decode_field(r: &mut ReadCursor<'_>) -> Result<T>;
}

/// The type's own [`Encode`]/[`Decode`] form.
#[derive(Debug, Clone, Copy)]
pub struct Plain;

impl<T> FieldCodec<T> for Plain
where
    T: Encode + for<'a> Decode<'a>,
{
    fn encode_field(value: &T, w: &mut WriteCursor<'_>) {
        value.encode(w);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<T> {
        T::decode(r)
    }
}

/// A string padded to the next 4-byte boundary.
#[derive(Debug, Clone, Copy)]
pub struct StrAlign4;

impl FieldCodec<String> for StrAlign4 {
    fn encode_field(value: &String, w: &mut WriteCursor<'_>) {
        serialize_str_align4(w, value.as_bytes());
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<String> {
        let offset = r.position() + 4;
        let bytes = deserialize_str_align4(r)?;
        utf8_at(bytes, offset).map(str::to_owned)
    }
}

impl FieldCodec<Vec<u8>> for StrAlign4 {
    fn encode_field(value: &Vec<u8>, w: &mut WriteCursor<'_>) {
        serialize_str_align4(w, value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<Vec<u8>> {
        deserialize_str_align4(r).map(<[u8]>::to_vec)
    }
}

/// A string whose bytes are kept as they are, without a UTF-8 check.
#[derive(Debug, Clone, Copy)]
pub struct ByteStr;

impl FieldCodec<Vec<u8>> for ByteStr {
    fn encode_field(value: &Vec<u8>, w: &mut WriteCursor<'_>) {
        serialize_str(w, value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<Vec<u8>> {
        deserialize_str(r).map(<[u8]>::to_vec)
    }
}

/// Length-prefixed bytes without a terminator.
#[derive(Debug, Clone, Copy)]
pub struct CharArray;

impl FieldCodec<Vec<u8>> for CharArray {
    fn encode_field(value: &Vec<u8>, w: &mut WriteCursor<'_>) {
        serialize_char_array(w, value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<Vec<u8>> {
        deserialize_char_array(r).map(<[u8]>::to_vec)
    }
}

/// A fixed number of raw bytes with no prefix.
#[derive(Debug, Clone, Copy)]
pub struct Block;

impl<const N: usize> FieldCodec<[u8; N]> for Block {
    fn encode_field(value: &[u8; N], w: &mut WriteCursor<'_>) {
        w.put_block(value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<[u8; N]> {
        r.take_array()
    }
}

/// An enumeration carried as its declared integer width.
#[derive(Debug, Clone, Copy)]
pub struct AsRepr;

impl<E: WireEnum> FieldCodec<E> for AsRepr {
    fn encode_field(value: &E, w: &mut WriteCursor<'_>) {
        serialize_enum(w, *value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<E> {
        deserialize_enum(r)
    }
}

/// An integer carried in the wider wire type `R`.
///
/// Decoding fails with [`WireError::ValueOutOfRange`] when the wire value does
/// not fit the field.
#[derive(Debug, Clone, Copy)]
pub struct As<R>(PhantomData<R>);

impl<T, R> FieldCodec<T> for As<R>
where
    T: Copy + Into<R> + TryFrom<R>,
    R: Primitive + Into<i128>,
{
    fn encode_field(value: &T, w: &mut WriteCursor<'_>) {
        let wide: R = (*value).into();
        wide.put(w);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<T> {
        let raw = R::get(r)?;
        T::try_from(raw).map_err(|_| WireError::ValueOutOfRange { value: raw.into() })
    }
}

/// A count-prefixed list of fixed-size records.
#[derive(Debug, Clone, Copy)]
pub struct FixedList;

impl<T: FixedRecord> FieldCodec<Vec<T>> for FixedList {
    fn encode_field(value: &Vec<T>, w: &mut WriteCursor<'_>) {
        serialize_fixed_list(w, value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<Vec<T>> {
        preprocess_fixed_list::<T>(r).map(|raw| raw.materialize())
    }
}

/// A count-prefixed, unframed sequence of values in their own encoding.
#[derive(Debug, Clone, Copy)]
pub struct Counted;

impl<T> FieldCodec<Vec<T>> for Counted
where
    T: Encode + for<'a> Decode<'a>,
{
    fn encode_field(value: &Vec<T>, w: &mut WriteCursor<'_>) {
        serialize_counted(w, value);
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<Vec<T>> {
        deserialize_counted::<T, Vec<T>>(r)
    }
}

/// The inner codec `C` wrapped in a nested frame.
///
/// Payload bytes the inner codec leaves unread are skipped.
#[derive(Debug, Clone, Copy)]
pub struct Nested<C>(PhantomData<C>);

impl<T, C: FieldCodec<T>> FieldCodec<T> for Nested<C> {
    fn encode_field(value: &T, w: &mut WriteCursor<'_>) {
        serialize_nested(w, |w| C::encode_field(value, w));
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<T> {
        let mut payload = deserialize_nested(r)?;
        C::decode_field(&mut payload)
    }
}

/// The inner codec `C` padded with zeros to a multiple of `N` bytes, counted
/// from the start of the field.
#[derive(Debug, Clone, Copy)]
pub struct PadTo<C, const N: usize>(PhantomData<C>);

impl<T, C: FieldCodec<T>, const N: usize> FieldCodec<T> for PadTo<C, N> {
    fn encode_field(value: &T, w: &mut WriteCursor<'_>) {
        serialize_padded(w, N, |w| C::encode_field(value, w));
    }

    fn decode_field(r: &mut ReadCursor<'_>) -> Result<T> {
        deserialize_padded(r, N, C::decode_field)
    }
}
