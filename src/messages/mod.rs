/*!
All OpenFlow 1.0 wire message primitives.

This is based on the openflow.h from OpenFlow Switch Specification 1.0.0.
The type names are changed to align with the Rust conventions.

The modules below split the codec along its two directions: `serialize`
holds the builders that assemble wire buffers from these types, and
`deserialize` holds the validators that decode and reject inbound
buffers. `matching` and `actions` carry the two sub-codecs both
directions share.
*/

pub mod actions;
pub mod deserialize;
pub mod matching;
pub mod serialize;

use error::{map_error, Error};

use std::fmt;

/* Copyright (c) 2008 The Board of Trustees of The Leland Stanford Junior University
 *
 * We are making the OpenFlow specification and associated documentation
 * (Software) available for public use and benefit with the expectation
 * that others will use, modify and enhance the Software and contribute
 * those enhancements back to the community. However, since we would
 * like to make the Software available for broadest use, with as few
 * restrictions as possible permission is hereby granted, free of
 * charge, to any person obtaining a copy of this Software to deal in
 * the Software under the copyrights without restriction, including
 * without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to
 * permit persons to whom the Software is furnished to do so, subject to
 * the following conditions:
 *
 * The above copyright notice and this permission notice shall be
 * included in all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
 * EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
 * MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT.  IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
 * BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
 * ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
 * CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 *
 * The name and trademarks of copyright holder(s) may NOT be used in
 * advertising or publicity pertaining to the Software or any
 * derivatives without specific, written prior permission.
 */

/// Version number: 0x01 = OpenFlow 1.0.
pub const OFP_VERSION: u8 = 0x01;

/// The fixed header length of 8 byte.
pub const OFP_HEADER_LENGTH: usize = 8;

/// The fixed size of an `OfpMatch` on the wire.
pub const OFP_MATCH_LENGTH: usize = 40;

/// The fixed size of an `OfpPhyPort` on the wire.
pub const OFP_PHY_PORT_LENGTH: usize = 48;

/// Maximum number of physical switch ports.
pub const OFPP_MAX: u16 = 0xff00;
/// Send the packet out the input port. Virtual port, flow mod and
/// packet out only.
pub const OFPP_IN_PORT: u16 = 0xfff8;
/// Perform actions in the flow table. Packet out only.
pub const OFPP_TABLE: u16 = 0xfff9;
/// Process with normal L2/L3 switching.
pub const OFPP_NORMAL: u16 = 0xfffa;
/// All physical ports except input port and those disabled by STP.
pub const OFPP_FLOOD: u16 = 0xfffb;
/// All physical ports except input port.
pub const OFPP_ALL: u16 = 0xfffc;
/// Send to controller.
pub const OFPP_CONTROLLER: u16 = 0xfffd;
/// Local openflow "port".
pub const OFPP_LOCAL: u16 = 0xfffe;
/// Not associated with a physical port.
pub const OFPP_NONE: u16 = 0xffff;

/// A reserved buffer ID to express that no buffer is assigned.
pub const OFP_NO_BUFFER: u32 = 0xffff_ffff;

/// Value used in `dl_vlan` to express that no VLAN tag is present.
pub const OFP_VLAN_NONE: u16 = 0xffff;

/// Value used in `idle_timeout` and `hard_timeout` to indicate that the
/// entry is permanent.
pub const OFP_FLOW_PERMANENT: u16 = 0;

/// By default, choose a priority in the middle.
pub const OFP_DEFAULT_PRIORITY: u16 = 0x8000;

/// The smallest Ethernet frame a packet-out may carry, FCS excluded.
pub const OFP_ETH_MIN_FRAME_LENGTH: usize = 60;

/// Width of the fixed-size port and table name fields.
pub const OFP_MAX_PORT_NAME_LEN: usize = 16;
pub const OFP_MAX_TABLE_NAME_LEN: usize = 32;

/// Width of the description fields in a desc stats reply.
pub const DESC_STR_LEN: usize = 256;
pub const SERIAL_NUM_LEN: usize = 32;

/// The highest defined message type byte.
pub const OFPT_MAX: u8 = OfpType::QueueGetConfigReply as u8;

/// A message's type, the most fundamental to
/// distinguish information between messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpType {
    /* Immutable messages. */
    /// Symmetric message
    Hello = 0,
    /// Symmetric message
    Error = 1,
    /// Symmetric message
    EchoRequest = 2,
    /// Symmetric message
    EchoReply = 3,
    /// Symmetric message
    Vendor = 4,

    /* Switch configuration messages. */
    /// Controller/switch message
    FeaturesRequest = 5,
    /// Controller/switch message
    FeaturesReply = 6,
    /// Controller/switch message
    GetConfigRequest = 7,
    /// Controller/switch message
    GetConfigReply = 8,
    /// Controller/switch message
    SetConfig = 9,

    /* Asynchronous messages. */
    /// Async message
    PacketIn = 10,
    /// Async message
    FlowRemoved = 11,
    /// Async message
    PortStatus = 12,

    /* Controller command messages. */
    /// Controller/switch message
    PacketOut = 13,
    /// Controller/switch message
    FlowMod = 14,
    /// Controller/switch message
    PortMod = 15,

    /* Statistics messages. */
    /// Controller/switch message
    StatsRequest = 16,
    /// Controller/switch message
    StatsReply = 17,

    /* Barrier messages. */
    /// Controller/switch message
    BarrierRequest = 18,
    /// Controller/switch message
    BarrierReply = 19,

    /* Queue Configuration messages. */
    /// Controller/switch message
    QueueGetConfigRequest = 20,
    /// Controller/switch message
    QueueGetConfigReply = 21,
}

/// Header on all OpenFlow packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpHeader {
    /// OFP_VERSION.
    pub(crate) version: u8,
    /// This packet's OfpType.
    pub(crate) typ: u8,
    /// This packet's length including this OfpHeader.
    pub(crate) length: u16,
    /// Transaction id associated with this packet.
    /// Replies use the same id as was in the request
    /// to facilitate pairing.
    pub(crate) xid: u32,
}

impl OfpHeader {
    /// Gets the packet's OpenFlow version.
    pub fn version(&self) -> u8 {
        self.version
    }
    /// Gets this packet's `OfpType`'s numerical representation.
    pub fn typ(&self) -> u8 {
        self.typ
    }
    /// Gets the packet's total length including the header.
    pub fn length(&self) -> u16 {
        self.length
    }
    /// Gets the packet's transaction id.
    pub fn xid(&self) -> u32 {
        self.xid
    }
    /// Returns the body length in byte.
    pub fn body_length(&self) -> usize {
        self.length as usize - OFP_HEADER_LENGTH
    }
}

/// Returns whether a port number names a physical port or one of the
/// defined reserved ports. `OFPP_NONE` is not a sendable port and is
/// accepted only where a message explicitly allows it.
pub fn port_no_valid(port_no: u16) -> bool {
    port_no != 0 && (port_no <= OFPP_MAX || port_no >= OFPP_IN_PORT) && port_no != OFPP_NONE
}

/* ## ------------------- ## */
/* ## Flow match fields.  ## */
/* ## ------------------- ## */

/// Fields to match against flows. A fixed 40-byte record on the wire.
///
/// The `wildcards` bitmask marks each field as "don't care"; for the two
/// IP address fields the mask encodes a count of ignored low-order bits
/// (0-32, 6 bits wide each) rather than a boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpMatch {
    /// Wildcard fields (`OFPFW_*`).
    pub wildcards: u32,
    /// Input switch port.
    pub in_port: u16,
    /// Ethernet source address.
    pub dl_src: [u8; 6],
    /// Ethernet destination address.
    pub dl_dst: [u8; 6],
    /// Input VLAN id, `OFP_VLAN_NONE` when untagged.
    pub dl_vlan: u16,
    /// Input VLAN priority.
    pub dl_vlan_pcp: u8,
    /// Ethernet frame type.
    pub dl_type: u16,
    /// IP ToS (actually DSCP field, 6 bits).
    pub nw_tos: u8,
    /// IP protocol or lower 8 bits of ARP opcode.
    pub nw_proto: u8,
    /// IP source address.
    pub nw_src: u32,
    /// IP destination address.
    pub nw_dst: u32,
    /// TCP/UDP source port, or ICMP type.
    pub tp_src: u16,
    /// TCP/UDP destination port, or ICMP code.
    pub tp_dst: u16,
}

/* ## ----------------- ## */
/* ## OpenFlow Actions. ## */
/* ## ----------------- ## */

/// The type of an OpenFlow action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpActionType {
    /// Output to switch port.
    Output = 0,
    /// Set the 802.1q VLAN id.
    SetVlanVid = 1,
    /// Set the 802.1q priority.
    SetVlanPcp = 2,
    /// Strip the 802.1q header.
    StripVlan = 3,
    /// Ethernet source address.
    SetDlSrc = 4,
    /// Ethernet destination address.
    SetDlDst = 5,
    /// IP source address.
    SetNwSrc = 6,
    /// IP destination address.
    SetNwDst = 7,
    /// IP ToS (DSCP field, 6 bits).
    SetNwTos = 8,
    /// TCP/UDP source port.
    SetTpSrc = 9,
    /// TCP/UDP destination port.
    SetTpDst = 10,
    /// Output to queue.
    Enqueue = 11,
    /// Vendor extension.
    Vendor = 0xffff,
}

/// One action record. On the wire each record is type-tagged with a
/// total length including the 4-byte record header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfpAction {
    /// Sends packets out `port`. A `max_len` of zero means no bytes of
    /// the packet should be sent to the controller.
    Output { port: u16, max_len: u16 },
    SetVlanVid(u16),
    SetVlanPcp(u8),
    StripVlan,
    SetDlSrc([u8; 6]),
    SetDlDst([u8; 6]),
    SetNwSrc(u32),
    SetNwDst(u32),
    SetNwTos(u8),
    SetTpSrc(u16),
    SetTpDst(u16),
    Enqueue { port: u16, queue_id: u32 },
    /// Vendor extension; the body length keeps the record a multiple of 8.
    Vendor { vendor: u32, body: Vec<u8> },
}

/// An ordered action list as attached to flow mod and packet out
/// messages. Appends validate their argument domains; the list never
/// holds a record that could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionList {
    pub(crate) actions: Vec<OfpAction>,
}

/* ## ------------------- ## */
/* ## Port descriptions.  ## */
/* ## ------------------- ## */

/// What changed about the physical port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpPortReason {
    /// The port was added.
    Add = 0,
    /// The port was removed.
    Delete = 1,
    /// Some attribute of the port has changed.
    Modify = 2,
}

/// Description of a physical port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPhyPort {
    pub port_no: u16,
    pub hw_addr: [u8; 6],
    /// Null-terminated on the wire, at most 15 bytes of name.
    pub(crate) name: String,
    /// Bitmap of OFPPC_* flags.
    pub config: u32,
    /// Bitmap of OFPPS_* flags.
    pub state: u32,

    /* Bitmaps of OFPPF_* that describe features. All bits zeroed if
     * unsupported or unavailable. */
    /// Current features.
    pub curr: u32,
    /// Features being advertised by the port.
    pub advertised: u32,
    /// Features supported by the port.
    pub supported: u32,
    /// Features advertised by peer.
    pub peer: u32,
}

impl OfpPhyPort {
    /// Gets the port name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/* ## ------------------ ## */
/* ## OpenFlow messages. ## */
/* ## ------------------ ## */

/// An OpenFlow Hello. Carries no body; trailing bytes on the wire are
/// tolerated and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpHello;

/// An OpenFlow Features Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpFeaturesRequest;

/// An OpenFlow Get Config Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpGetConfigRequest;

/// An OpenFlow Barrier Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpBarrierRequest;

/// An OpenFlow Barrier Reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpBarrierReply;

/// An OpenFlow Echo Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpEchoRequest {
    pub(crate) arbitrary: Vec<u8>,
}

impl OfpEchoRequest {
    /// Gets the message's content.
    pub fn arbitrary(self) -> Vec<u8> {
        self.arbitrary
    }
}

/// An OpenFlow Echo Reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpEchoReply {
    pub(crate) arbitrary: Vec<u8>,
}

impl OfpEchoReply {
    /// Gets the message's content.
    pub fn arbitrary(self) -> Vec<u8> {
        self.arbitrary
    }
}

/// A vendor extension message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpVendor {
    /// Vendor ID: the high-order byte is zero for ONF-assigned IDs, else
    /// it encodes an IEEE OUI.
    pub vendor: u32,
    /// Vendor-defined arbitrary additional data.
    pub data: Vec<u8>,
}

/// Switch features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpSwitchFeatures {
    /// Datapath unique ID. The lower 48-bits are for
    /// a MAC address, while the upper 16-bits are
    /// implementer-defined.
    pub datapath_id: u64,
    /// Max packets buffered at once.
    pub n_buffers: u32,
    /// Number of tables supported by datapath.
    pub n_tables: u8,
    /// Bitmap of supported OFPC_* capabilities.
    pub capabilities: u32,
    /// Bitmap of supported OFPAT_* action types.
    pub actions: u32,
    /// Port definitions.
    pub ports: Vec<OfpPhyPort>,
}

/// Handling of IP fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpConfigFlags {
    /// No special handling for fragments.
    FragNormal = 0,
    /// Drop fragments.
    FragDrop = 1,
    /// Reassemble (only if OFPC_IP_REASM supported).
    FragReasm = 2,
}

/// The highest defined fragment-handling flag value.
pub const OFPC_FRAG_MAX: u16 = OfpConfigFlags::FragReasm as u16;

/// Switch configuration as carried by a get config reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpGetConfigReply {
    /// One of OfpConfigFlags.
    pub flags: u16,
    /// Max bytes of new flow that the datapath should send to the controller.
    pub miss_send_len: u16,
}

/// Switch configuration as pushed by a set config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpSetConfig {
    /// One of OfpConfigFlags.
    pub flags: u16,
    /// Max bytes of new flow that the datapath should send to the controller.
    pub miss_send_len: u16,
}

/// Why is this packet being sent to the controller?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpPacketInReason {
    /// No matching flow.
    NoMatch = 0,
    /// Action explicitly output to controller.
    Action = 1,
}

/// Packet received on port (datapath -> controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPacketIn {
    /// ID assigned by datapath, `OFP_NO_BUFFER` if the packet is not
    /// buffered on the switch.
    pub buffer_id: u32,
    /// Full length of frame.
    pub total_len: u16,
    /// Port on which frame was received.
    pub in_port: u16,
    /// Reason packet is being sent, one of OfpPacketInReason.
    pub reason: u8,
    /// The (possibly truncated) Ethernet frame.
    pub data: Vec<u8>,
}

/// Why was this flow removed?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpFlowRemovedReason {
    /// Flow idle time exceeded idle_timeout.
    IdleTimeout = 0,
    /// Time exceeded hard_timeout.
    HardTimeout = 1,
    /// Evicted by a DELETE flow mod.
    Delete = 2,
}

/// Flow removed (datapath -> controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpFlowRemoved {
    /// Description of fields.
    pub match_field: OfpMatch,
    /// Opaque controller-issued identifier.
    pub cookie: u64,
    /// Priority level of flow entry.
    pub priority: u16,
    /// One of OfpFlowRemovedReason.
    pub reason: u8,
    /// Time flow was alive in seconds.
    pub duration_sec: u32,
    /// Time flow was alive in nanoseconds beyond duration_sec.
    pub duration_nsec: u32,
    /// Idle timeout from original flow mod.
    pub idle_timeout: u16,
    pub packet_count: u64,
    pub byte_count: u64,
}

/// A physical port has changed in the datapath (datapath -> controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPortStatus {
    /// One of OfpPortReason.
    pub reason: u8,
    pub desc: OfpPhyPort,
}

/// Send packet (controller -> datapath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPacketOut {
    pub(crate) buffer_id: u32,
    pub(crate) in_port: u16,
    pub(crate) actions: ActionList,
    pub(crate) data: Vec<u8>,
}

impl OfpPacketOut {
    /// Gets the buffered packet to apply to, `OFP_NO_BUFFER` if none.
    pub fn buffer_id(&self) -> u32 {
        self.buffer_id
    }
    /// Gets the packet's input port, `OFPP_NONE` if none.
    pub fn in_port(&self) -> u16 {
        self.in_port
    }
    /// Gets the actions to apply to the packet.
    pub fn actions(&self) -> &ActionList {
        &self.actions
    }
    /// Gets the carried Ethernet frame. Empty when `buffer_id` names a
    /// switch-buffered packet.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The command that is embedded in a flow mod message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpFlowModCommand {
    /// New flow.
    Add = 0,
    /// Modify all matching flows.
    Modify = 1,
    /// Modify entry strictly matching wildcards.
    ModifyStrict = 2,
    /// Delete all matching flows.
    Delete = 3,
    /// Delete entry strictly matching wildcards and priority.
    DeleteStrict = 4,
}

/// The highest defined flow mod command value. `OFPFC_DELETE_STRICT`
/// (4) ends the assigned range; commands above it are rejected.
pub const OFPFC_MAX: u16 = OfpFlowModCommand::DeleteStrict as u16;

/// Send flow removed message when flow expires or is deleted.
pub const OFPFF_SEND_FLOW_REM: u16 = 1 << 0;
/// Check for overlapping entries first.
pub const OFPFF_CHECK_OVERLAP: u16 = 1 << 1;
/// Remark this is for emergency.
pub const OFPFF_EMERG: u16 = 1 << 2;
/// All defined flow mod flags.
pub const OFPFF_ALL: u16 = OFPFF_SEND_FLOW_REM | OFPFF_CHECK_OVERLAP | OFPFF_EMERG;

/// Flow setup and teardown (controller -> datapath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpFlowMod {
    /// Fields to match.
    pub match_field: OfpMatch,
    /// Opaque controller-issued identifier.
    pub cookie: u64,
    /// One of OfpFlowModCommand.
    pub command: u16,
    /// Idle time before discarding (seconds).
    pub idle_timeout: u16,
    /// Max time before discarding (seconds).
    pub hard_timeout: u16,
    /// Priority level of flow entry.
    pub priority: u16,
    /// Buffered packet to apply to, or `OFP_NO_BUFFER`.
    /// Not meaningful for OFPFC_DELETE*.
    pub buffer_id: u32,
    /// For OFPFC_DELETE* commands, require matching entries to include
    /// this as an output port. `OFPP_NONE` indicates no restriction.
    pub out_port: u16,
    /// Bitmap of OFPFF_* flags.
    pub flags: u16,
    /// The actions to attach to the flow.
    pub actions: ActionList,
}

/// Modification of the behavior of the physical port
/// (controller -> datapath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPortMod {
    pub port_no: u16,
    /// The hardware address is not configurable. This is used to
    /// sanity-check the request, so it must be the same as returned in
    /// an OfpPhyPort struct.
    pub hw_addr: [u8; 6],
    /// Bitmap of OFPPC_* flags.
    pub config: u32,
    /// Bitmap of OFPPC_* flags to be changed.
    pub mask: u32,
    /// Bitmap of OFPPF_* flags. Zero all bits to prevent any action taking place.
    pub advertise: u32,
}

/* ## --------------------- ## */
/* ## Statistics messages.  ## */
/* ## --------------------- ## */

/// The type of a statistics request or reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpStatsType {
    /// Description of this OpenFlow switch.
    Desc = 0,
    /// Individual flow statistics.
    Flow = 1,
    /// Aggregate flow statistics.
    Aggregate = 2,
    /// Flow table statistics.
    Table = 3,
    /// Physical port statistics.
    Port = 4,
    /// Queue statistics for a port.
    Queue = 5,
    /// Vendor extension.
    Vendor = 0xffff,
}

/// The type-specific payload of a statistics request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsRequestBody {
    Desc,
    Flow {
        match_field: OfpMatch,
        /// ID of table to read, 0xff for all tables.
        table_id: u8,
        /// Require matching entries to include this as an output port.
        /// `OFPP_NONE` indicates no restriction.
        out_port: u16,
    },
    Aggregate {
        match_field: OfpMatch,
        table_id: u8,
        out_port: u16,
    },
    Table,
    Port {
        /// `OFPP_NONE` requests stats for all ports.
        port_no: u16,
    },
    Queue {
        /// `OFPP_ALL` requests stats for all ports.
        port_no: u16,
        /// `OFPQ_ALL` requests stats for all queues.
        queue_id: u32,
    },
    Vendor {
        vendor: u32,
        data: Vec<u8>,
    },
}

/// All queues configured at the given port.
pub const OFPQ_ALL: u32 = 0xffff_ffff;

/// A statistics request (controller -> datapath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpStatsRequest {
    /// None yet defined, must be zero.
    pub flags: u16,
    pub body: StatsRequestBody,
}

/// Description of this OpenFlow switch, all fields NUL-padded on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpDescStats {
    pub(crate) mfr_desc: String,
    pub(crate) hw_desc: String,
    pub(crate) sw_desc: String,
    pub(crate) serial_num: String,
    pub(crate) dp_desc: String,
}

impl OfpDescStats {
    pub fn mfr_desc(&self) -> &str {
        &self.mfr_desc
    }
    pub fn hw_desc(&self) -> &str {
        &self.hw_desc
    }
    pub fn sw_desc(&self) -> &str {
        &self.sw_desc
    }
    pub fn serial_num(&self) -> &str {
        &self.serial_num
    }
    pub fn dp_desc(&self) -> &str {
        &self.dp_desc
    }
}

/// One entry of an individual flow stats reply. The wire record carries
/// its own length because the action tail varies per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpFlowStats {
    /// ID of the table the flow came from.
    pub table_id: u8,
    pub match_field: OfpMatch,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub cookie: u64,
    pub packet_count: u64,
    pub byte_count: u64,
    pub actions: ActionList,
}

/// One entry of a flow table stats reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpTableStats {
    pub table_id: u8,
    pub(crate) name: String,
    /// Bitmap of OFPFW_* wildcards that are supported by the table.
    pub wildcards: u32,
    pub max_entries: u32,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

impl OfpTableStats {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One entry of a physical port stats reply. Counters are unsigned and
/// wrap around with no special exceptions; a value of all ones means
/// unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPortStats {
    pub port_no: u16,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_frame_err: u64,
    pub rx_over_err: u64,
    pub rx_crc_err: u64,
    pub collisions: u64,
}

/// One entry of a queue stats reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpQueueStats {
    pub port_no: u16,
    pub queue_id: u32,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
}

/// The type-specific payload of a statistics reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsReplyBody {
    Desc(OfpDescStats),
    Flow(Vec<OfpFlowStats>),
    Aggregate {
        packet_count: u64,
        byte_count: u64,
        flow_count: u32,
    },
    Table(Vec<OfpTableStats>),
    Port(Vec<OfpPortStats>),
    Queue(Vec<OfpQueueStats>),
    Vendor {
        vendor: u32,
        data: Vec<u8>,
    },
}

/// More replies to follow.
pub const OFPSF_REPLY_MORE: u16 = 1 << 0;

/// A statistics reply (datapath -> controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpStatsReply {
    /// Bitmap of OFPSF_REPLY_* flags.
    pub flags: u16,
    pub body: StatsReplyBody,
}

/* ## ----------------------- ## */
/* ## Queue configuration.    ## */
/* ## ----------------------- ## */

/// The type of a queue property record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpQueuePropType {
    /// No property defined for queue (default).
    None = 0,
    /// Minimum datarate guaranteed.
    MinRate = 1,
}

/// One property record of a packet queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfpQueueProp {
    None,
    /// The rate in 1/10 of a percent; >1000 means disabled.
    MinRate(u16),
}

/// Full description of a packet queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpPacketQueue {
    /// ID for the specific queue.
    pub queue_id: u32,
    /// List of properties.
    pub properties: Vec<OfpQueueProp>,
}

/// Query for port queue configuration (controller -> datapath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpQueueGetConfigRequest {
    /// Port to be queried. Should refer to a valid physical port
    /// (i.e. < `OFPP_MAX`).
    pub port: u16,
}

/// Queue configuration for a given port (datapath -> controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpQueueGetConfigReply {
    pub port: u16,
    pub queues: Vec<OfpPacketQueue>,
}

/* ## ---------------- ## */
/* ## Error messages.  ## */
/* ## ---------------- ## */

/// Values for 'type' in `OfpErrorMsg`. These values are immutable: they
/// will not change in future versions of the protocol (although new
/// values may be added).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpErrorType {
    /// Hello protocol failed.
    HelloFailed = 0,
    /// Request was not understood.
    BadRequest = 1,
    /// Error in action description.
    BadAction = 2,
    /// Problem modifying flow entry.
    FlowModFailed = 3,
    /// Port mod request failed.
    PortModFailed = 4,
    /// Queue operation failed.
    QueueOpFailed = 5,
}

/// `OfpErrorMsg` 'code' values for `OfpErrorType::HelloFailed`.
///
/// 'data' contains an ASCII text string that may give failure details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpHelloFailedCode {
    /// No compatible version.
    Incompatible = 0,
    /// Permissions error.
    EPerm = 1,
}

/// `OfpErrorMsg` 'code' values for `OfpErrorType::BadRequest`.
///
/// 'data' contains at least the first 64 bytes of the failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpBadRequestCode {
    /// ofp_header.version not supported.
    BadVersion = 0,
    /// ofp_header.type not supported.
    BadType = 1,
    /// ofp_stats_request.type not supported.
    BadStat = 2,
    /// Vendor not supported.
    BadVendor = 3,
    /// Vendor subtype not supported.
    BadSubtype = 4,
    /// Permissions error.
    EPerm = 5,
    /// Wrong request length for type.
    BadLen = 6,
    /// Specified buffer has already been used.
    BufferEmpty = 7,
    /// Specified buffer does not exist.
    BufferUnknown = 8,
}

/// `OfpErrorMsg` 'code' values for `OfpErrorType::BadAction`.
///
/// 'data' contains at least the first 64 bytes of the failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpBadActionCode {
    /// Unknown action type.
    BadType = 0,
    /// Length problem in actions.
    BadLen = 1,
    /// Unknown vendor id specified.
    BadVendor = 2,
    /// Unknown action type for vendor id.
    BadVendorType = 3,
    /// Problem validating output action.
    BadOutPort = 4,
    /// Bad action argument.
    BadArgument = 5,
    /// Permissions error.
    EPerm = 6,
    /// Can't handle this many actions.
    TooMany = 7,
    /// Problem validating output queue.
    BadQueue = 8,
}

/// `OfpErrorMsg` 'code' values for `OfpErrorType::FlowModFailed`.
///
/// 'data' contains at least the first 64 bytes of the failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpFlowModFailedCode {
    /// Flow not added because of full tables.
    AllTablesFull = 0,
    /// Attempted to add overlapping flow with CHECK_OVERLAP flag set.
    Overlap = 1,
    /// Permissions error.
    EPerm = 2,
    /// Flow not added because of non-zero idle/hard timeout.
    BadEmergTimeout = 3,
    /// Unknown command.
    BadCommand = 4,
    /// Unsupported action list.
    Unsupported = 5,
}

/// `OfpErrorMsg` 'code' values for `OfpErrorType::PortModFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpPortModFailedCode {
    /// Specified port does not exist.
    BadPort = 0,
    /// Specified hardware address is wrong.
    BadHwAddr = 1,
}

/// `OfpErrorMsg` 'code' values for `OfpErrorType::QueueOpFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpQueueOpFailedCode {
    /// Invalid port (or port does not exist).
    BadPort = 0,
    /// Queue does not exist.
    BadQueue = 1,
    /// Permissions error.
    EPerm = 2,
}

/// Error message (datapath -> controller or controller -> datapath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfpErrorMsg {
    pub typ: u16,
    pub code: u16,
    /// Variable-length data. Interpreted based on the type and code. No padding.
    pub data: Vec<u8>,
}

impl OfpErrorMsg {
    fn first_64_bytes(offending: &[u8]) -> Vec<u8> {
        let target_length = if offending.len() < 64 {
            offending.len()
        } else {
            64
        };
        offending[..target_length].to_vec()
    }

    /// Constructs a Hello Failed error.
    pub fn new_hello_failed(code: OfpHelloFailedCode, text: &str) -> OfpErrorMsg {
        OfpErrorMsg {
            typ: OfpErrorType::HelloFailed as u16,
            code: code as u16,
            data: text.as_bytes().to_vec(),
        }
    }

    /// Constructs an error reply for a rejected inbound message, carrying
    /// the first 64 bytes of the offending buffer. Returns `None` when the
    /// failure kind has no defined wire pair for the originating type.
    pub fn from_validation(msg_type: u8, kind: &Error, offending: &[u8]) -> Option<OfpErrorMsg> {
        map_error(msg_type, kind).map(|(typ, code)| OfpErrorMsg {
            typ,
            code,
            data: Self::first_64_bytes(offending),
        })
    }
}

impl fmt::Display for OfpErrorMsg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = self.typ;
        let typ = if t == OfpErrorType::HelloFailed as u16 {
            OfpErrorType::HelloFailed
        } else if t == OfpErrorType::BadRequest as u16 {
            OfpErrorType::BadRequest
        } else if t == OfpErrorType::BadAction as u16 {
            OfpErrorType::BadAction
        } else if t == OfpErrorType::FlowModFailed as u16 {
            OfpErrorType::FlowModFailed
        } else if t == OfpErrorType::PortModFailed as u16 {
            OfpErrorType::PortModFailed
        } else if t == OfpErrorType::QueueOpFailed as u16 {
            OfpErrorType::QueueOpFailed
        } else {
            return write!(f, "OpenFlow Error: type({}), code({})", self.typ, self.code);
        };
        write!(f, "OpenFlow Error: {:?}, code({})", typ, self.code)
    }
}

/// A decoded, validated OpenFlow message. This is what the top-level
/// validator hands to the event-dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfpMessage {
    Hello(OfpHello),
    Error(OfpErrorMsg),
    EchoRequest(OfpEchoRequest),
    EchoReply(OfpEchoReply),
    Vendor(OfpVendor),
    FeaturesRequest(OfpFeaturesRequest),
    FeaturesReply(OfpSwitchFeatures),
    GetConfigRequest(OfpGetConfigRequest),
    GetConfigReply(OfpGetConfigReply),
    SetConfig(OfpSetConfig),
    PacketIn(OfpPacketIn),
    FlowRemoved(OfpFlowRemoved),
    PortStatus(OfpPortStatus),
    PacketOut(OfpPacketOut),
    FlowMod(OfpFlowMod),
    PortMod(OfpPortMod),
    StatsRequest(OfpStatsRequest),
    StatsReply(OfpStatsReply),
    BarrierRequest(OfpBarrierRequest),
    BarrierReply(OfpBarrierReply),
    QueueGetConfigRequest(OfpQueueGetConfigRequest),
    QueueGetConfigReply(OfpQueueGetConfigReply),
}
