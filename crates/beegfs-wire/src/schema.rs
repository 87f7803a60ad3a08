//! Records described by an ordered field schema.
//!
//! A record's wire form is the concatenation of its fields in schema order.
//! Each schema entry pairs a field with a [`FieldCodec`](crate::FieldCodec)
//! and is reduced to a pair of plain function pointers, so one description
//! drives encoding, length probing and decoding.
//!
//! Decoding starts from [`Record::init`] and fills fields one at a time. If a
//! field fails, [`Record::cleanup`] is called with the schema prefix that did
//! decode, and the original error is returned unchanged. The partially built
//! value is then dropped.
//!
//! Schemas are normally written with [`record_schema!`](crate::record_schema).

use std::fmt;

use tracing::debug;

use crate::{
    cursor::{ReadCursor, WriteCursor},
    error::Result,
};

/// One entry of a record schema.
pub struct Field<T> {
    /// Field name, used in diagnostics.
    pub name: &'static str,
    /// Appends this field of a record.
    pub encode: fn(&T, &mut WriteCursor<'_>),
    /// Reads this field into a record.
    pub decode: fn(&mut T, &mut ReadCursor<'_>) -> Result<()>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// A type whose wire form is given by an ordered field schema.
pub trait Record: Default + 'static {
    /// Record name, used in diagnostics.
    const NAME: &'static str;

    /// Fields in wire order.
    const SCHEMA: &'static [Field<Self>];

    /// Starting value that decoding fills in.
    fn init() -> Self {
        Self::default()
    }

    /// Called when decoding fails, with the fields that had already been
    /// decoded into `self`.
    fn cleanup(&mut self, decoded: &[Field<Self>]) {
        let _ = decoded;
    }
}

/// Writes every field of `value` in schema order.
pub fn encode_record<T: Record>(value: &T, w: &mut WriteCursor<'_>) {
    for field in T::SCHEMA {
        (field.encode)(value, w);
    }
}

/// Reads a record field by field.
pub fn decode_record<T: Record>(r: &mut ReadCursor<'_>) -> Result<T> {
    let mut value = T::init();
    for (index, field) in T::SCHEMA.iter().enumerate() {
        if let Err(err) = (field.decode)(&mut value, r) {
            debug!(
                record = T::NAME,
                field = field.name,
                position = r.position(),
                error = %err,
                "record decode failed"
            );
            value.cleanup(T::SCHEMA.get(..index).unwrap_or_default());
            return Err(err);
        }
    }
    Ok(value)
}

/// Declares the wire schema of a struct.
///
/// Each field is listed with the codec that carries it. The struct must
/// implement `Default`. Custom [`Record::init`] or [`Record::cleanup`] hooks go
/// in an optional `hooks` block. The record also becomes a collection
/// element, so a `Vec` of records encodes as a framed collection.
///
/// ```
/// use beegfs_wire::{Plain, StrAlign4, decode_from, encode_to_vec, record_schema};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Mount {
///     id: u32,
///     path: String,
/// }
///
/// record_schema! {
///     Mount {
///         id: Plain,
///         path: StrAlign4,
///     }
/// }
///
/// let mount = Mount { id: 1, path: "/mnt".to_owned() };
/// let bytes = encode_to_vec(&mount).unwrap();
/// assert_eq!(bytes.len(), 16);
/// assert_eq!(decode_from::<Mount>(&bytes).unwrap(), (mount, 16));
/// ```
#[macro_export]
macro_rules! record_schema {
    (
        $name:ident {
            $( $field:ident : $codec:ty ),+ $(,)?
        }
        $( hooks { $($hooks:tt)* } )?
    ) => {
        impl $crate::Record for $name {
            const NAME: &'static str = stringify!($name);

            const SCHEMA: &'static [$crate::Field<Self>] = &[
                $(
                    $crate::Field {
                        name: stringify!($field),
                        encode: |value: &$name, w: &mut $crate::WriteCursor<'_>| {
                            <$codec as $crate::FieldCodec<_>>::encode_field(&value.$field, w);
                        },
                        decode: |value: &mut $name, r: &mut $crate::ReadCursor<'_>| -> $crate::Result<()> {
                            value.$field = <$codec as $crate::FieldCodec<_>>::decode_field(r)?;
                            ::core::result::Result::Ok(())
                        },
                    },
                )+
            ];

            $( $($hooks)* )?
        }

        impl $crate::Encode for $name {
            fn encode(&self, w: &mut $crate::WriteCursor<'_>) {
                $crate::encode_record(self, w);
            }
        }

        impl<'a> $crate::Decode<'a> for $name {
            fn decode(r: &mut $crate::ReadCursor<'a>) -> $crate::Result<Self> {
                $crate::decode_record(r)
            }
        }

        impl $crate::Element for $name {
            const SHAPE: $crate::ElementShape = $crate::ElementShape::Delimited;

            fn encode_element(&self, w: &mut $crate::WriteCursor<'_>) {
                $crate::encode_record(self, w);
            }
        }

        impl<'a> $crate::DecodeElement<'a> for $name {
            fn decode_element(r: &mut $crate::ReadCursor<'a>) -> $crate::Result<Self> {
                $crate::decode_record(r)
            }
        }
    };
}
