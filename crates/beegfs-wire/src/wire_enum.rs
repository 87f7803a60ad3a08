//! Enumerations encoded through a fixed integer width.
//!
//! The wire width of an enumeration is declared next to it and has nothing to
//! do with how the compiler lays the enum out in memory. Values that name no
//! variant are rejected with [`WireError::UnknownDiscriminant`].

use crate::{
    cursor::{ReadCursor, WriteCursor},
    error::{Result, WireError},
    primitive::Primitive,
};

/// An enumeration with a fixed-width integer wire form.
pub trait WireEnum: Copy {
    /// Integer type used on the wire.
    type Repr: Primitive + Into<i128>;

    /// Name used in error messages.
    const NAME: &'static str;

    /// The wire value of this variant.
    fn to_repr(self) -> Self::Repr;

    /// The variant for a wire value, if there is one.
    fn from_repr(raw: Self::Repr) -> Option<Self>;
}

/// Writes the wire value of `value`.
pub fn serialize_enum<E: WireEnum>(w: &mut WriteCursor<'_>, value: E) {
    value.to_repr().put(w);
}

/// Reads a wire value and maps it to a variant of `E`.
pub fn deserialize_enum<E: WireEnum>(r: &mut ReadCursor<'_>) -> Result<E> {
    let raw = E::Repr::get(r)?;
    E::from_repr(raw).ok_or_else(|| {
        let value = raw.into();
        tracing::debug!(ty = E::NAME, value = %value, "unknown enum discriminant");
        WireError::UnknownDiscriminant { ty: E::NAME, value }
    })
}

/// Declares an enumeration together with its wire width and values.
///
/// The generated type implements [`WireEnum`], [`Encode`](crate::Encode) and
/// [`Decode`](crate::Decode).
///
/// ```
/// beegfs_wire::wire_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Mode: i16 {
///         Off = 0,
///         Back = -2,
///     }
/// }
///
/// assert_eq!(beegfs_wire::encode_to_vec(&Mode::Back).unwrap(), [0xfe, 0xff]);
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::WireEnum for $name {
            type Repr = $repr;

            const NAME: &'static str = stringify!($name);

            fn to_repr(self) -> $repr {
                match self {
                    $( Self::$variant => $value, )+
                }
            }

            fn from_repr(raw: $repr) -> ::core::option::Option<Self> {
                $(
                    if raw == $value {
                        return ::core::option::Option::Some(Self::$variant);
                    }
                )+
                ::core::option::Option::None
            }
        }

        impl $crate::Encode for $name {
            fn encode(&self, w: &mut $crate::WriteCursor<'_>) {
                $crate::serialize_enum(w, *self);
            }
        }

        impl<'a> $crate::Decode<'a> for $name {
            fn decode(r: &mut $crate::ReadCursor<'a>) -> $crate::Result<Self> {
                $crate::deserialize_enum(r)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{WireError, decode_from, encode_to_vec};

    crate::wire_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Direction: i16 {
            Forward = 1,
            Reverse = -2,
        }
    }

    crate::wire_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Wide: u64 {
            Only = 0x0102_0304_0506_0708,
        }
    }

    #[test]
    fn width_comes_from_declared_repr() {
        assert_eq!(encode_to_vec(&Direction::Reverse).unwrap(), [0xfe, 0xff]);
        assert_eq!(encode_to_vec(&Wide::Only).unwrap(), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(size_of::<Wide>(), 0);
    }

    #[test]
    fn known_values_decode() {
        assert_eq!(decode_from::<Direction>(&[0x01, 0x00]).unwrap(), (Direction::Forward, 2));
        assert_eq!(decode_from::<Direction>(&[0xfe, 0xff]).unwrap(), (Direction::Reverse, 2));
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert_eq!(
            decode_from::<Direction>(&[0x05, 0x00]).unwrap_err(),
            WireError::UnknownDiscriminant { ty: "Direction", value: 5 }
        );
    }
}
