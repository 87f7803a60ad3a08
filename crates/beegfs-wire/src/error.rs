//! Error types for wire encoding and decoding.
//!
//! Every decoder in this crate reports failure through [`WireError`]. Callers
//! that only need to branch on the broad failure class use
//! [`WireError::kind`]; the variant itself carries the offsets and counts
//! needed to diagnose a bad message.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WireError>;

/// Broad failure class of a [`WireError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fewer bytes remained than the next field required.
    TruncatedInput,
    /// A structural rule of the format was broken (terminator, frame length,
    /// element count, enum value).
    MalformedInvariant,
    /// The encoded value does not fit the destination.
    CapacityExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TruncatedInput => "truncated input",
            Self::MalformedInvariant => "malformed input",
            Self::CapacityExceeded => "capacity exceeded",
        })
    }
}

/// Errors produced while encoding or decoding wire data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The input ended before a field was complete.
    #[error("truncated input: need {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the field required.
        needed: usize,
        /// Bytes that were left.
        remaining: usize,
    },

    /// A string was not followed by its NUL terminator.
    #[error("missing NUL terminator at offset {offset}")]
    MissingTerminator {
        /// Absolute offset where the terminator was expected.
        offset: usize,
    },

    /// A nested frame declared a total length smaller than its own header.
    #[error("nested frame declares {declared} bytes, less than its 4-byte header")]
    FrameTooShort {
        /// The declared total length.
        declared: u32,
    },

    /// A fixed-width collection body does not hold exactly `count` elements.
    #[error("{count} elements of {width} bytes do not fill a {body_len}-byte collection body")]
    ElementCountMismatch {
        /// Element count from the collection header.
        count: u32,
        /// Wire width of one element.
        width: usize,
        /// Bytes actually present after the count.
        body_len: usize,
    },

    /// A collection body ran out before `expected` elements were decoded.
    #[error("collection ended after {decoded} of {expected} elements")]
    ShortCollection {
        /// Element count from the collection header.
        expected: u32,
        /// Elements decoded before the body ran out.
        decoded: u32,
    },

    /// A collection frame held bytes after its last element.
    #[error("collection frame has {unread} bytes after its last element")]
    UnreadCollectionBytes {
        /// Bytes left unread inside the frame.
        unread: usize,
    },

    /// A fixed-record span could not be viewed as whole records.
    #[error("{len} bytes are not a whole number of {stride}-byte records")]
    RecordLayout {
        /// Length of the span.
        len: usize,
        /// Record stride.
        stride: usize,
    },

    /// String bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 {
        /// Absolute offset of the string's first byte.
        offset: usize,
    },

    /// An enumeration value on the wire has no matching variant.
    #[error("unknown {ty} discriminant {value}")]
    UnknownDiscriminant {
        /// Name of the enumeration.
        ty: &'static str,
        /// The raw value read.
        value: i128,
    },

    /// A widened wire value does not fit the narrower in-memory field.
    #[error("wire value {value} does not fit the field type")]
    ValueOutOfRange {
        /// The raw value read.
        value: i128,
    },

    /// Encoding needs more room than the destination buffer has.
    #[error("encoding needs {required} bytes but the buffer holds {capacity}")]
    CapacityExceeded {
        /// Bytes needed to hold the write that failed.
        required: usize,
        /// Size of the destination buffer.
        capacity: usize,
    },

    /// A length or count does not fit its 32-bit wire field.
    #[error("length {len} does not fit a 32-bit length field")]
    LengthOverflow {
        /// The length that was too large.
        len: usize,
    },
}

impl WireError {
    /// Broad failure class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Truncated { .. } => ErrorKind::TruncatedInput,
            Self::CapacityExceeded { .. } | Self::LengthOverflow { .. } => {
                ErrorKind::CapacityExceeded
            },
            Self::MissingTerminator { .. }
            | Self::FrameTooShort { .. }
            | Self::ElementCountMismatch { .. }
            | Self::ShortCollection { .. }
            | Self::UnreadCollectionBytes { .. }
            | Self::RecordLayout { .. }
            | Self::InvalidUtf8 { .. }
            | Self::UnknownDiscriminant { .. }
            | Self::ValueOutOfRange { .. } => ErrorKind::MalformedInvariant,
        }
    }

    /// Returns `true` if decoding failed because the input ended early.
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind(), ErrorKind::TruncatedInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_variants() {
        assert_eq!(
            WireError::Truncated { needed: 4, remaining: 1 }.kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(WireError::FrameTooShort { declared: 3 }.kind(), ErrorKind::MalformedInvariant);
        assert_eq!(
            WireError::CapacityExceeded { required: 8, capacity: 4 }.kind(),
            ErrorKind::CapacityExceeded
        );
        assert_eq!(WireError::LengthOverflow { len: 0 }.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(WireError::UnreadCollectionBytes { unread: 1 }.kind(), ErrorKind::MalformedInvariant);
    }

    #[test]
    fn messages_carry_offsets() {
        let err = WireError::MissingTerminator { offset: 7 };
        assert_eq!(err.to_string(), "missing NUL terminator at offset 7");
    }
}
