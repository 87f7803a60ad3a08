//! Node descriptors as exchanged between BeeGFS services.
//!
//! A node list is a `u32` node count followed by each node's fields back to
//! back, with no enclosing frame: the node ID string, its interface list, the
//! numeric ID, UDP and TCP ports, and a one-byte node type.

use crate::{
    codec::{Decode, Encode},
    collection::{deserialize_counted, serialize_counted},
    cursor::{ReadCursor, WriteCursor},
    error::Result,
    field::{AsRepr, FixedList, Plain},
    nic::NicAddress,
    record_schema, wire_enum,
};

wire_enum! {
    /// Role of a node in the file system.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub enum NodeType: u8 {
        /// Unset or unknown role.
        #[default]
        Invalid = 0,
        /// Metadata server.
        Meta = 1,
        /// Storage server.
        Storage = 2,
        /// File system client.
        Client = 3,
        /// Management server.
        Mgmt = 4,
    }
}

/// One node and its network interfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// String node ID.
    pub node_id: String,
    /// Network interfaces, in preference order.
    pub nics: Vec<NicAddress>,
    /// Numeric node ID.
    pub num_id: u32,
    /// UDP port.
    pub port_udp: u16,
    /// TCP port.
    pub port_tcp: u16,
    /// Role of the node.
    pub node_type: NodeType,
}

record_schema! {
    NodeDescriptor {
        node_id: Plain,
        nics: FixedList,
        num_id: Plain,
        port_udp: Plain,
        port_tcp: Plain,
        node_type: AsRepr,
    }
}

/// A count-prefixed sequence of [`NodeDescriptor`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList(pub Vec<NodeDescriptor>);

impl Encode for NodeList {
    fn encode(&self, w: &mut WriteCursor<'_>) {
        serialize_counted(w, &self.0);
    }
}

impl<'a> Decode<'a> for NodeList {
    fn decode(r: &mut ReadCursor<'a>) -> Result<Self> {
        deserialize_counted::<NodeDescriptor, Vec<_>>(r).map(NodeList)
    }
}
