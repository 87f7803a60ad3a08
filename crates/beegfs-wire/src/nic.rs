//! Network interface records.
//!
//! Each interface is a 24-byte record: the IPv4 address in network byte
//! order, a 16-byte NUL-padded interface name, a one-byte interface type and
//! three zero bytes of padding.
//!
//! Names are kept as raw bytes. The kernel allows any byte except NUL and `/`
//! in an interface name, so a name is not necessarily UTF-8.

use std::net::Ipv4Addr;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::fixed_list::FixedRecord;

/// Bytes reserved for an interface name, including its terminator.
pub const NIC_NAME_LEN: usize = 16;

/// Wire size of one interface record.
pub const NIC_RECORD_LEN: usize = 24;

/// Kind of network interface.
///
/// Unrecognized type bytes are kept as [`NicType::Other`] so a record list
/// from a newer peer still decodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NicType {
    /// Plain Ethernet (TCP/UDP).
    #[default]
    Ethernet,
    /// Sockets Direct Protocol.
    Sdp,
    /// RDMA capable interface.
    Rdma,
    /// A type byte with no named variant.
    Other(UnknownNicType),
}

/// An interface type byte that no [`NicType`] variant names.
///
/// Only obtainable from [`NicType::from_wire`], so every [`NicType`] value
/// maps to exactly one wire byte and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownNicType(u8);

impl UnknownNicType {
    /// The raw type byte.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl NicType {
    /// Maps a wire byte to an interface type.
    pub const fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::Ethernet,
            1 => Self::Sdp,
            2 => Self::Rdma,
            other => Self::Other(UnknownNicType(other)),
        }
    }

    /// The wire byte for this type.
    pub const fn to_wire(self) -> u8 {
        match self {
            Self::Ethernet => 0,
            Self::Sdp => 1,
            Self::Rdma => 2,
            Self::Other(raw) => raw.0,
        }
    }
}

/// One network interface of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NicAddress {
    /// IPv4 address.
    pub ipv4: Ipv4Addr,
    /// Interface name bytes. At most 15 bytes survive encoding, and the name
    /// ends at its first NUL.
    pub name: Vec<u8>,
    /// Interface type.
    pub nic_type: NicType,
}

impl Default for NicAddress {
    fn default() -> Self {
        Self { ipv4: Ipv4Addr::UNSPECIFIED, name: Vec::new(), nic_type: NicType::Ethernet }
    }
}

/// Wire layout of a [`NicAddress`].
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct NicRecord {
    ipv4: [u8; 4],
    name: [u8; NIC_NAME_LEN],
    nic_type: u8,
    padding: [u8; 3],
}

const _: () = assert!(size_of::<NicRecord>() == NIC_RECORD_LEN);

fn name_field(name: &[u8]) -> [u8; NIC_NAME_LEN] {
    let end = name.len().min(NIC_NAME_LEN - 1);
    let mut field = [0u8; NIC_NAME_LEN];
    field[..end].copy_from_slice(&name[..end]);
    field
}

impl FixedRecord for NicAddress {
    type Raw = NicRecord;

    fn to_raw(&self) -> NicRecord {
        NicRecord {
            ipv4: self.ipv4.octets(),
            name: name_field(&self.name),
            nic_type: self.nic_type.to_wire(),
            padding: [0; 3],
        }
    }

    fn from_raw(raw: &NicRecord) -> Self {
        let mut name = raw.name;
        name[NIC_NAME_LEN - 1] = 0;
        let end = name.iter().position(|&b| b == 0).unwrap_or(NIC_NAME_LEN);
        Self {
            ipv4: Ipv4Addr::from(raw.ipv4),
            name: name[..end].to_vec(),
            nic_type: NicType::from_wire(raw.nic_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{
        cursor::{ReadCursor, WriteCursor},
        fixed_list::{preprocess_fixed_list, serialize_fixed_list},
    };

    fn nic(ip: [u8; 4], name: &[u8], nic_type: NicType) -> NicAddress {
        NicAddress { ipv4: Ipv4Addr::from(ip), name: name.to_vec(), nic_type }
    }

    #[test]
    fn record_layout_is_24_bytes() {
        let raw = nic([10, 0, 0, 1], b"eth0", NicType::Rdma).to_raw();
        assert_eq!(
            raw.as_bytes(),
            hex!("0a000001 65746830 00000000 00000000 00000000 02 000000")
        );
    }

    #[test]
    fn long_names_are_truncated_and_terminated() {
        let long = nic([1, 2, 3, 4], b"abcdefghijklmnopqrstuvwxyz", NicType::Ethernet);
        let back = NicAddress::from_raw(&long.to_raw());
        assert_eq!(back.name, b"abcdefghijklmno");
    }

    #[test]
    fn unterminated_wire_name_is_cut_at_last_byte() {
        let mut bytes = hex!("7f000001 00000000 00000000 00000000 00000000 01 000000");
        bytes[4..20].fill(b'n');
        let raw = NicRecord::read_from_bytes(&bytes).unwrap();
        let decoded = NicAddress::from_raw(&raw);
        assert_eq!(decoded.name.len(), NIC_NAME_LEN - 1);
        assert_eq!(decoded.nic_type, NicType::Sdp);
        assert_eq!(decoded.ipv4, Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn non_utf8_name_survives_unchanged() {
        let original = nic([0; 4], &[0xff, b'x'], NicType::Ethernet);
        let raw = original.to_raw();
        assert_eq!(&raw.as_bytes()[4..7], hex!("ff7800"));
        assert_eq!(NicAddress::from_raw(&raw), original);
    }

    #[test]
    fn unknown_type_byte_is_preserved() {
        let nic_type = NicType::from_wire(9);
        assert!(matches!(nic_type, NicType::Other(unknown) if unknown.get() == 9));
        assert_eq!(nic_type.to_wire(), 9);
    }

    #[test]
    fn every_type_byte_round_trips() {
        for raw in 0..=u8::MAX {
            let nic_type = NicType::from_wire(raw);
            assert_eq!(nic_type.to_wire(), raw);
            assert_eq!(NicType::from_wire(nic_type.to_wire()), nic_type);
        }
        assert_eq!(NicType::from_wire(2), NicType::Rdma);
    }

    #[test]
    fn nic_list_round_trips() {
        let nics = vec![nic([192, 168, 1, 2], b"ib0", NicType::Rdma), nic([10, 1, 1, 1], b"eth1", NicType::Ethernet)];
        let mut counter = WriteCursor::counting();
        serialize_fixed_list(&mut counter, &nics);
        assert_eq!(counter.position(), 4 + 2 * NIC_RECORD_LEN);

        let mut buf = vec![0u8; counter.position()];
        let mut w = WriteCursor::writing(&mut buf);
        serialize_fixed_list(&mut w, &nics);
        w.finish().unwrap();

        let mut r = ReadCursor::new(&buf);
        let raw = preprocess_fixed_list::<NicAddress>(&mut r).unwrap();
        assert_eq!(raw.materialize(), nics);
        assert!(r.is_empty());
    }
}
