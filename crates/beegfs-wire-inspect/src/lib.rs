//! Inspection of BeeGFS wire data.
//!
//! Decodes one named wire construct from the start of a byte buffer and
//! renders it for humans, together with how many bytes were consumed and how
//! many were left over. The binary in `main.rs` is a thin shell around
//! [`inspect`] that handles arguments, input and logging.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::fmt;

use beegfs_wire::{
    Decode, ErrorKind, NicAddress, NodeDescriptor, NodeList, ReadCursor, WireError,
    deserialize_char_array, deserialize_nested, deserialize_str, deserialize_str_align4,
    preprocess_fixed_list,
};
use clap::ValueEnum;
use thiserror::Error;
use tracing::debug;

/// Wire construct to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Construct {
    /// Length-prefixed, NUL-terminated string
    String,
    /// String padded to a 4-byte boundary
    StringAlign4,
    /// Length-prefixed bytes without terminator
    CharArray,
    /// Nested frame, shown as its raw payload
    Nested,
    /// Count-prefixed list of 24-byte interface records
    NicList,
    /// Count-prefixed list of node descriptors
    NodeList,
    /// Single node descriptor
    Node,
    /// Framed collection of strings
    StringList,
    /// Framed collection of u8
    U8List,
    /// Framed collection of u16
    U16List,
    /// Framed collection of i64
    I64List,
}

// Shown under the same name the command line accepts.
impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Ok(()),
        }
    }
}

/// How input bytes are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InputEncoding {
    /// Raw bytes
    #[default]
    Binary,
    /// Hex digits, whitespace ignored
    Hex,
}

/// Errors from reading, parsing or decoding input.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Input could not be read or output could not be written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Hex input was malformed.
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The bytes do not hold the requested construct.
    #[error("{kind}: {source}")]
    Wire {
        /// Broad failure class.
        kind: ErrorKind,
        /// The decoding error.
        source: WireError,
    },
}

impl From<WireError> for InspectError {
    fn from(source: WireError) -> Self {
        Self::Wire { kind: source.kind(), source }
    }
}

impl InspectError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) | Self::Hex(_) => 2,
            Self::Wire { kind: ErrorKind::TruncatedInput, .. } => 3,
            Self::Wire { kind: ErrorKind::MalformedInvariant, .. } => 4,
            Self::Wire { kind: ErrorKind::CapacityExceeded, .. } => 5,
        }
    }
}

/// Outcome of decoding one construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The construct that was decoded.
    pub construct: Construct,
    /// Human-readable rendering of the decoded value.
    pub rendered: String,
    /// Bytes consumed by the construct.
    pub consumed: usize,
    /// Bytes left after the construct.
    pub trailing: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} bytes)", self.construct, self.consumed)?;
        writeln!(f, "{}", self.rendered)?;
        write!(f, "trailing bytes: {}", self.trailing)
    }
}

/// Turns raw input into wire bytes according to `encoding`.
pub fn parse_input(raw: &[u8], encoding: InputEncoding) -> Result<Vec<u8>, InspectError> {
    match encoding {
        InputEncoding::Binary => Ok(raw.to_vec()),
        InputEncoding::Hex => {
            let digits: Vec<u8> = raw.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
            Ok(hex::decode(digits)?)
        },
    }
}

// Printable ASCII as is, everything else escaped.
fn quoted(bytes: &[u8]) -> String {
    format!("\"{}\"", bytes.escape_ascii())
}

/// Decodes `construct` from the start of `bytes`.
pub fn inspect(construct: Construct, bytes: &[u8]) -> Result<Report, InspectError> {
    let mut r = ReadCursor::new(bytes);
    let rendered = match construct {
        Construct::String => format!("{:?}", String::from_utf8_lossy(deserialize_str(&mut r)?)),
        Construct::StringAlign4 => {
            format!("{:?}", String::from_utf8_lossy(deserialize_str_align4(&mut r)?))
        },
        Construct::CharArray => hex::encode(deserialize_char_array(&mut r)?),
        Construct::Nested => {
            let payload = deserialize_nested(&mut r)?;
            format!("payload {} bytes: {}", payload.remaining(), hex::encode(payload.rest()))
        },
        Construct::NicList => {
            let nics = preprocess_fixed_list::<NicAddress>(&mut r)?;
            nics.iter()
                .map(|nic| format!("{} {} {:?}", nic.ipv4, quoted(&nic.name), nic.nic_type))
                .collect::<Vec<_>>()
                .join("\n")
        },
        Construct::NodeList => format!("{:#?}", NodeList::decode(&mut r)?.0),
        Construct::Node => format!("{:#?}", NodeDescriptor::decode(&mut r)?),
        Construct::StringList => {
            let names = Vec::<&[u8]>::decode(&mut r)?;
            format!("[{}]", names.iter().copied().map(quoted).collect::<Vec<_>>().join(", "))
        },
        Construct::U8List => format!("{:?}", Vec::<u8>::decode(&mut r)?),
        Construct::U16List => format!("{:?}", Vec::<u16>::decode(&mut r)?),
        Construct::I64List => format!("{:?}", Vec::<i64>::decode(&mut r)?),
    };
    debug!(construct = %construct, consumed = r.position(), trailing = r.remaining(), "decoded");
    Ok(Report { construct, rendered, consumed: r.position(), trailing: r.remaining() })
}
