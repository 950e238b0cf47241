/*!
The classified packet metadata record.

Packet classification itself happens outside this crate; whatever parses
raw Ethernet/IP/ARP frames hands the codec one `PacketInfo` per packet.
Holding a `PacketInfo` *is* the proof that classification ran, so
`OfpMatch::from_packet` cannot be called on an unclassified packet.
*/

/// Ethernet frame type of IPv4.
pub const ETH_TYPE_IPV4: u16 = 0x0800;
/// Ethernet frame type of ARP.
pub const ETH_TYPE_ARP: u16 = 0x0806;

/// The "protocol" byte in the IP header for ICMP.
pub const IP_PROTO_ICMP: u8 = 1;
/// The "protocol" byte in the IP header for TCP.
pub const IP_PROTO_TCP: u8 = 6;
/// The "protocol" byte in the IP header for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// An 802.1q tag carried by a classified frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanTag {
    /// VLAN id, 12 bits on the wire.
    pub vid: u16,
    /// VLAN priority, 3 bits on the wire.
    pub pcp: u8,
}

/// The IPv4 header fields a match can select on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Info {
    pub tos: u8,
    pub proto: u8,
    pub src: u32,
    pub dst: u32,
}

/// The ARP fields a match can select on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpInfo {
    /// Full 16-bit operation code as seen on the wire.
    pub opcode: u16,
    /// Sender protocol address.
    pub spa: u32,
    /// Target protocol address.
    pub tpa: u32,
}

/// The transport-layer fields a match can select on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportInfo {
    Tcp { src_port: u16, dst_port: u16 },
    Udp { src_port: u16, dst_port: u16 },
    Icmp { typ: u8, code: u8 },
}

/// Everything the classifier learned about one data-plane packet.
///
/// The layered `Option`s mirror the frame: a non-IPv4 frame has no
/// `ipv4` record, a frame without an 802.1q header has no `vlan` tag,
/// and `transport` is only meaningful when it agrees with the network
/// protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketInfo {
    pub eth_src: [u8; 6],
    pub eth_dst: [u8; 6],
    /// The frame type of the innermost Ethernet header.
    pub eth_type: u16,
    pub vlan: Option<VlanTag>,
    pub ipv4: Option<Ipv4Info>,
    pub arp: Option<ArpInfo>,
    pub transport: Option<TransportInfo>,
}
