/*!
The flow match codec and normalizer.

`OfpMatch` is a fixed 40-byte record on the wire. Encoding and decoding
are pure byte-order conversion; field-range checking lives in
`validate` and is invoked by the message validators, while `normalize`
canonicalizes contradictory wildcard/field combinations so that two
matches selecting the same packets compare equal.
*/

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};

use error::{Error, Result};
use messages::*;
use packet::{PacketInfo, TransportInfo};
use packet::{ETH_TYPE_ARP, ETH_TYPE_IPV4, IP_PROTO_ICMP, IP_PROTO_TCP, IP_PROTO_UDP};

use std::io;
use std::io::Write;

/// Switch input port.
pub const OFPFW_IN_PORT: u32 = 1 << 0;
/// VLAN id.
pub const OFPFW_DL_VLAN: u32 = 1 << 1;
/// Ethernet source address.
pub const OFPFW_DL_SRC: u32 = 1 << 2;
/// Ethernet destination address.
pub const OFPFW_DL_DST: u32 = 1 << 3;
/// Ethernet frame type.
pub const OFPFW_DL_TYPE: u32 = 1 << 4;
/// IP protocol.
pub const OFPFW_NW_PROTO: u32 = 1 << 5;
/// TCP/UDP source port.
pub const OFPFW_TP_SRC: u32 = 1 << 6;
/// TCP/UDP destination port.
pub const OFPFW_TP_DST: u32 = 1 << 7;

/* IP source address wildcard bit count. Setting this to 0 indicates that
 * the entire field must match. Setting it to X indicates that an IP
 * address will match if the first 32-X bits match. A value of 32 or more
 * wildcards the entire field. */
pub const OFPFW_NW_SRC_SHIFT: u32 = 8;
pub const OFPFW_NW_SRC_MASK: u32 = 0x3f << OFPFW_NW_SRC_SHIFT;
/// The canonical "IP source fully wildcarded" encoding.
pub const OFPFW_NW_SRC_ALL: u32 = 32 << OFPFW_NW_SRC_SHIFT;

/* IP destination address wildcard bit count, same encoding. */
pub const OFPFW_NW_DST_SHIFT: u32 = 14;
pub const OFPFW_NW_DST_MASK: u32 = 0x3f << OFPFW_NW_DST_SHIFT;
pub const OFPFW_NW_DST_ALL: u32 = 32 << OFPFW_NW_DST_SHIFT;

/// VLAN priority.
pub const OFPFW_DL_VLAN_PCP: u32 = 1 << 20;
/// IP ToS (DSCP field, 6 bits).
pub const OFPFW_NW_TOS: u32 = 1 << 21;

/// Wildcard all fields.
pub const OFPFW_ALL: u32 = (1 << 22) - 1;

/// The highest VLAN id a tagged frame can carry.
const VLAN_VID_MAX: u16 = 4095;

/// The count of ignored low-order IP source address bits.
pub fn nw_src_wild_bits(wildcards: u32) -> u32 {
    (wildcards & OFPFW_NW_SRC_MASK) >> OFPFW_NW_SRC_SHIFT
}

/// The count of ignored low-order IP destination address bits.
pub fn nw_dst_wild_bits(wildcards: u32) -> u32 {
    (wildcards & OFPFW_NW_DST_MASK) >> OFPFW_NW_DST_SHIFT
}

/// Whether a wildcards value ignores every field. The two IP prefix
/// counts make this more than a comparison against `OFPFW_ALL`: any
/// count of 32 or more wildcards the whole address.
pub fn wildcards_all(wildcards: u32) -> bool {
    let boolean = OFPFW_ALL & !(OFPFW_NW_SRC_MASK | OFPFW_NW_DST_MASK);
    (wildcards & boolean) == boolean
        && nw_src_wild_bits(wildcards) >= 32
        && nw_dst_wild_bits(wildcards) >= 32
}

/// The address bits a prefix-wildcard count leaves significant.
fn prefix_mask(wild_bits: u32) -> u32 {
    if wild_bits >= 32 {
        0
    } else {
        !0u32 << wild_bits
    }
}

fn wild_transport(m: &mut OfpMatch) {
    m.wildcards |= OFPFW_TP_SRC | OFPFW_TP_DST;
    m.tp_src = 0;
    m.tp_dst = 0;
}

fn wild_nw_addrs(m: &mut OfpMatch) {
    m.wildcards = (m.wildcards & !OFPFW_NW_SRC_MASK) | OFPFW_NW_SRC_ALL;
    m.wildcards = (m.wildcards & !OFPFW_NW_DST_MASK) | OFPFW_NW_DST_ALL;
    m.nw_src = 0;
    m.nw_dst = 0;
}

impl OfpMatch {
    /// Constructs a match that wildcards every field.
    pub fn new() -> OfpMatch {
        OfpMatch {
            wildcards: OFPFW_ALL,
            in_port: 0,
            dl_src: [0; 6],
            dl_dst: [0; 6],
            dl_vlan: 0,
            dl_vlan_pcp: 0,
            dl_type: 0,
            nw_tos: 0,
            nw_proto: 0,
            nw_src: 0,
            nw_dst: 0,
            tp_src: 0,
            tp_dst: 0,
        }
    }

    /// Serializes the fixed 40-byte record with network byte order.
    pub fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_u32::<NetworkEndian>(self.wildcards)?;
        stream.write_u16::<NetworkEndian>(self.in_port)?;
        stream.write_all(&self.dl_src)?;
        stream.write_all(&self.dl_dst)?;
        stream.write_u16::<NetworkEndian>(self.dl_vlan)?;
        stream.write_all(&[self.dl_vlan_pcp, 0])?;
        stream.write_u16::<NetworkEndian>(self.dl_type)?;
        stream.write_all(&[self.nw_tos, self.nw_proto, 0, 0])?;
        stream.write_u32::<NetworkEndian>(self.nw_src)?;
        stream.write_u32::<NetworkEndian>(self.nw_dst)?;
        stream.write_u16::<NetworkEndian>(self.tp_src)?;
        stream.write_u16::<NetworkEndian>(self.tp_dst)
    }

    /// Deserializes a 40-byte record. Pure byte-order conversion, no
    /// validation; `bytes` must hold at least `OFP_MATCH_LENGTH` bytes.
    pub fn deserialize(bytes: &[u8]) -> OfpMatch {
        let mut dl_src = [0; 6];
        dl_src.copy_from_slice(&bytes[6..12]);
        let mut dl_dst = [0; 6];
        dl_dst.copy_from_slice(&bytes[12..18]);
        OfpMatch {
            wildcards: NetworkEndian::read_u32(&bytes[0..4]),
            in_port: NetworkEndian::read_u16(&bytes[4..6]),
            dl_src,
            dl_dst,
            dl_vlan: NetworkEndian::read_u16(&bytes[18..20]),
            dl_vlan_pcp: bytes[20],
            dl_type: NetworkEndian::read_u16(&bytes[22..24]),
            nw_tos: bytes[24],
            nw_proto: bytes[25],
            nw_src: NetworkEndian::read_u32(&bytes[28..32]),
            nw_dst: NetworkEndian::read_u32(&bytes[32..36]),
            tp_src: NetworkEndian::read_u16(&bytes[36..38]),
            tp_dst: NetworkEndian::read_u16(&bytes[38..40]),
        }
    }

    /// Checks the field-range rules the message validators rely on.
    pub fn validate(&self) -> Result<()> {
        if self.wildcards & !OFPFW_ALL != 0 {
            return Err(Error::InvalidWildcards(self.wildcards));
        }
        if self.wildcards & OFPFW_IN_PORT == 0 && !port_no_valid(self.in_port) {
            return Err(Error::InvalidPortNo(self.in_port));
        }
        if self.wildcards & OFPFW_DL_VLAN == 0
            && self.dl_vlan > VLAN_VID_MAX
            && self.dl_vlan != OFP_VLAN_NONE
        {
            return Err(Error::InvalidVlanVid(self.dl_vlan));
        }
        if self.wildcards & OFPFW_DL_VLAN_PCP == 0 && self.dl_vlan_pcp > 7 {
            return Err(Error::InvalidVlanPcp(self.dl_vlan_pcp));
        }
        if self.wildcards & OFPFW_NW_TOS == 0 && self.nw_tos & 0x03 != 0 {
            return Err(Error::InvalidNwTos(self.nw_tos));
        }
        Ok(())
    }

    /// Canonicalizes the match: every field whose containing protocol
    /// layer does not apply is both wildcarded and zeroed, prefix
    /// wildcards above 32 collapse to 32, and partially wildcarded
    /// addresses are masked to their significant bits.
    ///
    /// Normalizing twice is equivalent to normalizing once.
    pub fn normalize(&self) -> OfpMatch {
        let mut m = self.clone();
        m.wildcards &= OFPFW_ALL;

        // A wildcarded field carries no information; force it to zero.
        if m.wildcards & OFPFW_IN_PORT != 0 {
            m.in_port = 0;
        }
        if m.wildcards & OFPFW_DL_SRC != 0 {
            m.dl_src = [0; 6];
        }
        if m.wildcards & OFPFW_DL_DST != 0 {
            m.dl_dst = [0; 6];
        }
        if m.wildcards & OFPFW_DL_VLAN != 0 {
            m.dl_vlan = 0;
        }
        if m.wildcards & OFPFW_DL_VLAN_PCP != 0 {
            m.dl_vlan_pcp = 0;
        }
        if m.wildcards & OFPFW_DL_TYPE != 0 {
            m.dl_type = 0;
        }
        if m.wildcards & OFPFW_NW_TOS != 0 {
            m.nw_tos = 0;
        }
        if m.wildcards & OFPFW_NW_PROTO != 0 {
            m.nw_proto = 0;
        }
        if m.wildcards & OFPFW_TP_SRC != 0 {
            m.tp_src = 0;
        }
        if m.wildcards & OFPFW_TP_DST != 0 {
            m.tp_dst = 0;
        }

        // An untagged frame has no VLAN priority to match on.
        if m.wildcards & OFPFW_DL_VLAN == 0 && m.dl_vlan == OFP_VLAN_NONE {
            m.wildcards |= OFPFW_DL_VLAN_PCP;
            m.dl_vlan_pcp = 0;
        }

        if m.wildcards & OFPFW_DL_TYPE != 0 {
            // Unknown Ethernet type: nothing above L2 is meaningful.
            m.wildcards |= OFPFW_NW_TOS | OFPFW_NW_PROTO;
            m.nw_tos = 0;
            m.nw_proto = 0;
            wild_nw_addrs(&mut m);
            wild_transport(&mut m);
        } else {
            match m.dl_type {
                ETH_TYPE_IPV4 => {
                    let transport = m.wildcards & OFPFW_NW_PROTO == 0
                        && (m.nw_proto == IP_PROTO_ICMP
                            || m.nw_proto == IP_PROTO_TCP
                            || m.nw_proto == IP_PROTO_UDP);
                    if !transport {
                        wild_transport(&mut m);
                    }
                }
                ETH_TYPE_ARP => {
                    // The ARP opcode travels in nw_proto; ToS and ports
                    // have no ARP counterpart.
                    m.wildcards |= OFPFW_NW_TOS;
                    m.nw_tos = 0;
                    wild_transport(&mut m);
                }
                _ => {
                    m.wildcards |= OFPFW_NW_TOS | OFPFW_NW_PROTO;
                    m.nw_tos = 0;
                    m.nw_proto = 0;
                    wild_nw_addrs(&mut m);
                    wild_transport(&mut m);
                }
            }
        }

        let src_bits = nw_src_wild_bits(m.wildcards);
        if src_bits >= 32 {
            m.wildcards = (m.wildcards & !OFPFW_NW_SRC_MASK) | OFPFW_NW_SRC_ALL;
            m.nw_src = 0;
        } else {
            m.nw_src &= prefix_mask(src_bits);
        }
        let dst_bits = nw_dst_wild_bits(m.wildcards);
        if dst_bits >= 32 {
            m.wildcards = (m.wildcards & !OFPFW_NW_DST_MASK) | OFPFW_NW_DST_ALL;
            m.nw_dst = 0;
        } else {
            m.nw_dst &= prefix_mask(dst_bits);
        }

        // ICMP type and code are 8 bit wide but travel in the 16-bit
        // transport port fields.
        if m.wildcards & OFPFW_DL_TYPE == 0
            && m.dl_type == ETH_TYPE_IPV4
            && m.wildcards & OFPFW_NW_PROTO == 0
            && m.nw_proto == IP_PROTO_ICMP
        {
            if m.wildcards & OFPFW_TP_SRC == 0 {
                m.tp_src &= 0xff;
            }
            if m.wildcards & OFPFW_TP_DST == 0 {
                m.tp_dst &= 0xff;
            }
        }
        m
    }

    /// Derives a match from a classified data-plane packet. Each field
    /// not covered by `wildcards` is copied from the packet metadata;
    /// covered fields stay at their zero value.
    ///
    /// Transport fields are populated only when the network protocol
    /// carries them, the ARP opcode is masked to its low 8 bits, and an
    /// untagged frame yields the `OFP_VLAN_NONE` sentinel.
    pub fn from_packet(wildcards: u32, in_port: u16, info: &PacketInfo) -> OfpMatch {
        let w = wildcards & OFPFW_ALL;
        let mut m = OfpMatch::new();
        m.wildcards = w;

        if w & OFPFW_IN_PORT == 0 {
            m.in_port = in_port;
        }
        if w & OFPFW_DL_SRC == 0 {
            m.dl_src = info.eth_src;
        }
        if w & OFPFW_DL_DST == 0 {
            m.dl_dst = info.eth_dst;
        }
        if w & OFPFW_DL_VLAN == 0 {
            m.dl_vlan = match info.vlan {
                Some(ref tag) => tag.vid,
                None => OFP_VLAN_NONE,
            };
        }
        if w & OFPFW_DL_VLAN_PCP == 0 {
            if let Some(ref tag) = info.vlan {
                m.dl_vlan_pcp = tag.pcp;
            }
        }
        if w & OFPFW_DL_TYPE == 0 {
            m.dl_type = info.eth_type;
        }

        if let Some(ref ipv4) = info.ipv4 {
            if w & OFPFW_NW_TOS == 0 {
                m.nw_tos = ipv4.tos;
            }
            if w & OFPFW_NW_PROTO == 0 {
                m.nw_proto = ipv4.proto;
            }
            m.nw_src = ipv4.src & prefix_mask(nw_src_wild_bits(w));
            m.nw_dst = ipv4.dst & prefix_mask(nw_dst_wild_bits(w));

            match info.transport {
                Some(TransportInfo::Tcp { src_port, dst_port })
                    if ipv4.proto == IP_PROTO_TCP =>
                {
                    if w & OFPFW_TP_SRC == 0 {
                        m.tp_src = src_port;
                    }
                    if w & OFPFW_TP_DST == 0 {
                        m.tp_dst = dst_port;
                    }
                }
                Some(TransportInfo::Udp { src_port, dst_port })
                    if ipv4.proto == IP_PROTO_UDP =>
                {
                    if w & OFPFW_TP_SRC == 0 {
                        m.tp_src = src_port;
                    }
                    if w & OFPFW_TP_DST == 0 {
                        m.tp_dst = dst_port;
                    }
                }
                Some(TransportInfo::Icmp { typ, code }) if ipv4.proto == IP_PROTO_ICMP => {
                    if w & OFPFW_TP_SRC == 0 {
                        m.tp_src = u16::from(typ);
                    }
                    if w & OFPFW_TP_DST == 0 {
                        m.tp_dst = u16::from(code);
                    }
                }
                _ => {}
            }
        } else if let Some(ref arp) = info.arp {
            if w & OFPFW_NW_PROTO == 0 {
                m.nw_proto = (arp.opcode & 0xff) as u8;
            }
            m.nw_src = arp.spa & prefix_mask(nw_src_wild_bits(w));
            m.nw_dst = arp.tpa & prefix_mask(nw_dst_wild_bits(w));
        }
        m
    }
}

impl Default for OfpMatch {
    fn default() -> OfpMatch {
        OfpMatch::new()
    }
}
