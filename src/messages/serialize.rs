/*!
All serialization and construction routines for the OpenFlow message primitives

Use the trait `OfpPacket` for serialization implementations of messages
that are sent. Other primitives that are part of a message should
implement a serialize function that operates on a given byte stream.

Constructors validate their argument domains, so a built message always
satisfies the header invariant: the serialized buffer's length equals
the header's declared length exactly.
*/

use byteorder::{NetworkEndian, WriteBytesExt};

use error::{Error, Result};
use messages::*;

use std::io;
use std::io::Write;

impl OfpHeader {
    /// Constructs an `OfpHeader` for a bodyless message.
    pub fn new(typ: OfpType, xid: u32) -> OfpHeader {
        OfpHeader {
            version: OFP_VERSION,
            typ: typ as u8,
            length: OFP_HEADER_LENGTH as u16,
            xid,
        }
    }

    /// Serializes this header on the given stream
    pub fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_all(&[self.version, self.typ])?;
        stream.write_u16::<NetworkEndian>(self.length)?;
        stream.write_u32::<NetworkEndian>(self.xid)
    }
}

/// Writes a string into a fixed-width field, padded with NULs. The
/// caller has already checked that at least one NUL byte fits.
fn write_padded_str<S: Write>(stream: &mut S, s: &str, width: usize) -> io::Result<()> {
    stream.write_all(s.as_bytes())?;
    stream.write_all(&vec![0; width - s.len()])
}

fn check_str_width(s: &str, width: usize) -> Result<()> {
    if s.len() >= width {
        return Err(Error::NameTooLong(s.len()));
    }
    Ok(())
}

/// An OpenFlow packet. Must be implemented for all OpenFlow messages that are sent.
pub trait OfpPacket {
    /// Constructs an OfpHeader with the given body length and transaction ID.
    /// Fails when header plus body no longer fit the 16-bit length field.
    fn header(&self, body_length: usize, xid: u32) -> Result<OfpHeader> {
        if OFP_HEADER_LENGTH + body_length > usize::from(u16::max_value()) {
            return Err(Error::InvalidBodyLength(body_length));
        }
        Ok(OfpHeader {
            version: OFP_VERSION,
            typ: Self::typ() as u8,
            length: (OFP_HEADER_LENGTH + body_length) as u16,
            xid,
        })
    }

    /// Returns the packet's type
    fn typ() -> OfpType;

    /// Serializes this packet with network byte order.
    /// The xid is used as its header's transaction id.
    fn serialize<S: Write>(&self, stream: &mut S, xid: u32) -> Result<()> {
        let mut body = vec![];
        self.serialize_body(&mut body)?;
        let header = self.header(body.len(), xid)?;
        debug!("Outgoing message: {:?}", header);
        header.serialize(stream)?;
        stream.write_all(&body)?;
        Ok(())
    }

    /// Serializes this packet's body.
    /// Implementers have to output network byte order on the given stream.
    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()>;
}

impl OfpPacket for OfpHello {
    fn typ() -> OfpType {
        OfpType::Hello
    }

    fn serialize_body<S: Write>(&self, _stream: &mut S) -> Result<()> {
        Ok(())
    }
}

impl OfpPacket for OfpErrorMsg {
    fn typ() -> OfpType {
        OfpType::Error
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.typ)?;
        stream.write_u16::<NetworkEndian>(self.code)?;
        stream.write_all(&self.data)?;
        Ok(())
    }
}

impl OfpEchoRequest {
    /// Constructs a new `OfpEchoRequest` with `arbitrary` content.
    pub fn new(arbitrary: Vec<u8>) -> OfpEchoRequest {
        OfpEchoRequest { arbitrary }
    }
}
impl OfpPacket for OfpEchoRequest {
    fn typ() -> OfpType {
        OfpType::EchoRequest
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_all(&self.arbitrary)?;
        Ok(())
    }
}

impl OfpEchoReply {
    /// Constructs a new `OfpEchoReply` with `arbitrary` content.
    /// This should be the same as in the `OfpEchoRequest` that issued this reply.
    pub fn new(arbitrary: Vec<u8>) -> OfpEchoReply {
        OfpEchoReply { arbitrary }
    }
}
impl OfpPacket for OfpEchoReply {
    fn typ() -> OfpType {
        OfpType::EchoReply
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_all(&self.arbitrary)?;
        Ok(())
    }
}

impl OfpPacket for OfpVendor {
    fn typ() -> OfpType {
        OfpType::Vendor
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u32::<NetworkEndian>(self.vendor)?;
        stream.write_all(&self.data)?;
        Ok(())
    }
}

impl OfpPacket for OfpFeaturesRequest {
    fn typ() -> OfpType {
        OfpType::FeaturesRequest
    }

    fn serialize_body<S: Write>(&self, _stream: &mut S) -> Result<()> {
        Ok(())
    }
}

impl OfpPhyPort {
    /// Constructs a port description. The name must leave room for the
    /// terminating NUL of its 16-byte wire field.
    pub fn new(port_no: u16, hw_addr: [u8; 6], name: &str) -> Result<OfpPhyPort> {
        if !port_no_valid(port_no) {
            return Err(Error::InvalidPortNo(port_no));
        }
        check_str_width(name, OFP_MAX_PORT_NAME_LEN)?;
        Ok(OfpPhyPort {
            port_no,
            hw_addr,
            name: name.to_string(),
            config: 0,
            state: 0,
            curr: 0,
            advertised: 0,
            supported: 0,
            peer: 0,
        })
    }

    fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_u16::<NetworkEndian>(self.port_no)?;
        stream.write_all(&self.hw_addr)?;
        write_padded_str(stream, &self.name, OFP_MAX_PORT_NAME_LEN)?;
        stream.write_u32::<NetworkEndian>(self.config)?;
        stream.write_u32::<NetworkEndian>(self.state)?;
        stream.write_u32::<NetworkEndian>(self.curr)?;
        stream.write_u32::<NetworkEndian>(self.advertised)?;
        stream.write_u32::<NetworkEndian>(self.supported)?;
        stream.write_u32::<NetworkEndian>(self.peer)
    }
}

impl OfpPacket for OfpSwitchFeatures {
    fn typ() -> OfpType {
        OfpType::FeaturesReply
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u64::<NetworkEndian>(self.datapath_id)?;
        stream.write_u32::<NetworkEndian>(self.n_buffers)?;
        stream.write_all(&[self.n_tables, 0, 0, 0])?;
        stream.write_u32::<NetworkEndian>(self.capabilities)?;
        stream.write_u32::<NetworkEndian>(self.actions)?;
        for port in &self.ports {
            port.serialize(stream)?;
        }
        Ok(())
    }
}

impl OfpPacket for OfpGetConfigRequest {
    fn typ() -> OfpType {
        OfpType::GetConfigRequest
    }

    fn serialize_body<S: Write>(&self, _stream: &mut S) -> Result<()> {
        Ok(())
    }
}

impl OfpGetConfigReply {
    pub fn new(flags: u16, miss_send_len: u16) -> Result<OfpGetConfigReply> {
        if flags > OFPC_FRAG_MAX {
            return Err(Error::InvalidSwitchConfigFlags(flags));
        }
        Ok(OfpGetConfigReply {
            flags,
            miss_send_len,
        })
    }
}
impl OfpPacket for OfpGetConfigReply {
    fn typ() -> OfpType {
        OfpType::GetConfigReply
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.flags)?;
        stream.write_u16::<NetworkEndian>(self.miss_send_len)?;
        Ok(())
    }
}

impl OfpSetConfig {
    pub fn new(flags: u16, miss_send_len: u16) -> Result<OfpSetConfig> {
        if flags > OFPC_FRAG_MAX {
            return Err(Error::InvalidSwitchConfigFlags(flags));
        }
        Ok(OfpSetConfig {
            flags,
            miss_send_len,
        })
    }
}
impl OfpPacket for OfpSetConfig {
    fn typ() -> OfpType {
        OfpType::SetConfig
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.flags)?;
        stream.write_u16::<NetworkEndian>(self.miss_send_len)?;
        Ok(())
    }
}

impl OfpPacketIn {
    pub fn new(
        buffer_id: u32,
        total_len: u16,
        in_port: u16,
        reason: OfpPacketInReason,
        data: Vec<u8>,
    ) -> Result<OfpPacketIn> {
        if !port_no_valid(in_port) {
            return Err(Error::InvalidPortNo(in_port));
        }
        Ok(OfpPacketIn {
            buffer_id,
            total_len,
            in_port,
            reason: reason as u8,
            data,
        })
    }
}
impl OfpPacket for OfpPacketIn {
    fn typ() -> OfpType {
        OfpType::PacketIn
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u32::<NetworkEndian>(self.buffer_id)?;
        stream.write_u16::<NetworkEndian>(self.total_len)?;
        stream.write_u16::<NetworkEndian>(self.in_port)?;
        stream.write_all(&[self.reason, 0])?;
        stream.write_all(&self.data)?;
        Ok(())
    }
}

impl OfpFlowRemoved {
    pub fn new(
        match_field: OfpMatch,
        cookie: u64,
        priority: u16,
        reason: OfpFlowRemovedReason,
        duration_sec: u32,
        duration_nsec: u32,
        idle_timeout: u16,
        packet_count: u64,
        byte_count: u64,
    ) -> Result<OfpFlowRemoved> {
        match_field.validate()?;
        Ok(OfpFlowRemoved {
            match_field,
            cookie,
            priority,
            reason: reason as u8,
            duration_sec,
            duration_nsec,
            idle_timeout,
            packet_count,
            byte_count,
        })
    }
}
impl OfpPacket for OfpFlowRemoved {
    fn typ() -> OfpType {
        OfpType::FlowRemoved
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        self.match_field.serialize(stream)?;
        stream.write_u64::<NetworkEndian>(self.cookie)?;
        stream.write_u16::<NetworkEndian>(self.priority)?;
        stream.write_all(&[self.reason, 0])?;
        stream.write_u32::<NetworkEndian>(self.duration_sec)?;
        stream.write_u32::<NetworkEndian>(self.duration_nsec)?;
        stream.write_u16::<NetworkEndian>(self.idle_timeout)?;
        stream.write_all(&[0; 2])?;
        stream.write_u64::<NetworkEndian>(self.packet_count)?;
        stream.write_u64::<NetworkEndian>(self.byte_count)?;
        Ok(())
    }
}

impl OfpPortStatus {
    pub fn new(reason: OfpPortReason, desc: OfpPhyPort) -> OfpPortStatus {
        OfpPortStatus {
            reason: reason as u8,
            desc,
        }
    }
}
impl OfpPacket for OfpPortStatus {
    fn typ() -> OfpType {
        OfpType::PortStatus
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_all(&[self.reason, 0, 0, 0, 0, 0, 0, 0])?;
        self.desc.serialize(stream)?;
        Ok(())
    }
}

impl OfpPacketOut {
    /// Constructs a packet out. A `buffer_id` of `OFP_NO_BUFFER` means
    /// the switch holds no copy of the packet, so `data` has to carry a
    /// full Ethernet frame of at least the minimum frame length.
    pub fn new(
        buffer_id: u32,
        in_port: u16,
        actions: ActionList,
        data: Vec<u8>,
    ) -> Result<OfpPacketOut> {
        if in_port != OFPP_NONE && !port_no_valid(in_port) {
            return Err(Error::InvalidPortNo(in_port));
        }
        if buffer_id == OFP_NO_BUFFER {
            if data.is_empty() {
                return Err(Error::MissingPacketData);
            }
            if data.len() < OFP_ETH_MIN_FRAME_LENGTH {
                return Err(Error::TooShortFrame(data.len()));
            }
        }
        Ok(OfpPacketOut {
            buffer_id,
            in_port,
            actions,
            data,
        })
    }
}
impl OfpPacket for OfpPacketOut {
    fn typ() -> OfpType {
        OfpType::PacketOut
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u32::<NetworkEndian>(self.buffer_id)?;
        stream.write_u16::<NetworkEndian>(self.in_port)?;
        stream.write_u16::<NetworkEndian>(self.actions.length()?)?;
        self.actions.serialize(stream)?;
        stream.write_all(&self.data)?;
        Ok(())
    }
}

impl OfpFlowMod {
    /// Constructs an `OfpFlowMod` with the given fields.
    pub fn new(
        match_field: OfpMatch,
        cookie: u64,
        command: OfpFlowModCommand,
        idle_timeout: u16,
        hard_timeout: u16,
        priority: u16,
        buffer_id: u32,
        out_port: u16,
        flags: u16,
        actions: ActionList,
    ) -> Result<OfpFlowMod> {
        match_field.validate()?;
        if flags & !OFPFF_ALL != 0 {
            return Err(Error::InvalidFlowModFlags(flags));
        }
        if out_port != OFPP_NONE && !port_no_valid(out_port) {
            return Err(Error::InvalidPortNo(out_port));
        }
        Ok(OfpFlowMod {
            match_field,
            cookie,
            command: command as u16,
            idle_timeout,
            hard_timeout,
            priority,
            buffer_id,
            out_port,
            flags,
            actions,
        })
    }
}
impl OfpPacket for OfpFlowMod {
    fn typ() -> OfpType {
        OfpType::FlowMod
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        self.match_field.serialize(stream)?;
        stream.write_u64::<NetworkEndian>(self.cookie)?;
        stream.write_u16::<NetworkEndian>(self.command)?;
        stream.write_u16::<NetworkEndian>(self.idle_timeout)?;
        stream.write_u16::<NetworkEndian>(self.hard_timeout)?;
        stream.write_u16::<NetworkEndian>(self.priority)?;
        stream.write_u32::<NetworkEndian>(self.buffer_id)?;
        stream.write_u16::<NetworkEndian>(self.out_port)?;
        stream.write_u16::<NetworkEndian>(self.flags)?;
        self.actions.serialize(stream)?;
        Ok(())
    }
}

impl OfpPortMod {
    pub fn new(
        port_no: u16,
        hw_addr: [u8; 6],
        config: u32,
        mask: u32,
        advertise: u32,
    ) -> Result<OfpPortMod> {
        if !port_no_valid(port_no) {
            return Err(Error::InvalidPortNo(port_no));
        }
        Ok(OfpPortMod {
            port_no,
            hw_addr,
            config,
            mask,
            advertise,
        })
    }
}
impl OfpPacket for OfpPortMod {
    fn typ() -> OfpType {
        OfpType::PortMod
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.port_no)?;
        stream.write_all(&self.hw_addr)?;
        stream.write_u32::<NetworkEndian>(self.config)?;
        stream.write_u32::<NetworkEndian>(self.mask)?;
        stream.write_u32::<NetworkEndian>(self.advertise)?;
        stream.write_all(&[0; 4])?;
        Ok(())
    }
}

impl StatsRequestBody {
    /// The wire stats type this body belongs to.
    pub fn stats_type(&self) -> u16 {
        match *self {
            StatsRequestBody::Desc => OfpStatsType::Desc as u16,
            StatsRequestBody::Flow { .. } => OfpStatsType::Flow as u16,
            StatsRequestBody::Aggregate { .. } => OfpStatsType::Aggregate as u16,
            StatsRequestBody::Table => OfpStatsType::Table as u16,
            StatsRequestBody::Port { .. } => OfpStatsType::Port as u16,
            StatsRequestBody::Queue { .. } => OfpStatsType::Queue as u16,
            StatsRequestBody::Vendor { .. } => OfpStatsType::Vendor as u16,
        }
    }
}

impl OfpStatsRequest {
    /// Constructs a stats request. No request flags are defined yet, so
    /// the flags field is always zero.
    pub fn new(body: StatsRequestBody) -> Result<OfpStatsRequest> {
        match body {
            StatsRequestBody::Flow { ref match_field, .. }
            | StatsRequestBody::Aggregate { ref match_field, .. } => match_field.validate()?,
            _ => {}
        }
        Ok(OfpStatsRequest { flags: 0, body })
    }
}
impl OfpPacket for OfpStatsRequest {
    fn typ() -> OfpType {
        OfpType::StatsRequest
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.body.stats_type())?;
        stream.write_u16::<NetworkEndian>(self.flags)?;
        match self.body {
            StatsRequestBody::Desc | StatsRequestBody::Table => {}
            StatsRequestBody::Flow {
                ref match_field,
                table_id,
                out_port,
            }
            | StatsRequestBody::Aggregate {
                ref match_field,
                table_id,
                out_port,
            } => {
                match_field.serialize(stream)?;
                stream.write_all(&[table_id, 0])?;
                stream.write_u16::<NetworkEndian>(out_port)?;
            }
            StatsRequestBody::Port { port_no } => {
                stream.write_u16::<NetworkEndian>(port_no)?;
                stream.write_all(&[0; 6])?;
            }
            StatsRequestBody::Queue { port_no, queue_id } => {
                stream.write_u16::<NetworkEndian>(port_no)?;
                stream.write_all(&[0; 2])?;
                stream.write_u32::<NetworkEndian>(queue_id)?;
            }
            StatsRequestBody::Vendor { vendor, ref data } => {
                stream.write_u32::<NetworkEndian>(vendor)?;
                stream.write_all(data)?;
            }
        }
        Ok(())
    }
}

impl OfpDescStats {
    /// Constructs a switch description. Every field has to leave room
    /// for the terminating NUL of its fixed-width wire field.
    pub fn new(
        mfr_desc: &str,
        hw_desc: &str,
        sw_desc: &str,
        serial_num: &str,
        dp_desc: &str,
    ) -> Result<OfpDescStats> {
        check_str_width(mfr_desc, DESC_STR_LEN)?;
        check_str_width(hw_desc, DESC_STR_LEN)?;
        check_str_width(sw_desc, DESC_STR_LEN)?;
        check_str_width(serial_num, SERIAL_NUM_LEN)?;
        check_str_width(dp_desc, DESC_STR_LEN)?;
        Ok(OfpDescStats {
            mfr_desc: mfr_desc.to_string(),
            hw_desc: hw_desc.to_string(),
            sw_desc: sw_desc.to_string(),
            serial_num: serial_num.to_string(),
            dp_desc: dp_desc.to_string(),
        })
    }

    fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        write_padded_str(stream, &self.mfr_desc, DESC_STR_LEN)?;
        write_padded_str(stream, &self.hw_desc, DESC_STR_LEN)?;
        write_padded_str(stream, &self.sw_desc, DESC_STR_LEN)?;
        write_padded_str(stream, &self.serial_num, SERIAL_NUM_LEN)?;
        write_padded_str(stream, &self.dp_desc, DESC_STR_LEN)
    }
}

impl OfpFlowStats {
    /// The entry's wire length including its action tail.
    fn length(&self) -> Result<u16> {
        let total = 88 + u32::from(self.actions.length()?);
        if total > u32::from(u16::max_value()) {
            return Err(Error::TooManyActions);
        }
        Ok(total as u16)
    }

    fn serialize<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.length()?)?;
        stream.write_all(&[self.table_id, 0])?;
        self.match_field.serialize(stream)?;
        stream.write_u32::<NetworkEndian>(self.duration_sec)?;
        stream.write_u32::<NetworkEndian>(self.duration_nsec)?;
        stream.write_u16::<NetworkEndian>(self.priority)?;
        stream.write_u16::<NetworkEndian>(self.idle_timeout)?;
        stream.write_u16::<NetworkEndian>(self.hard_timeout)?;
        stream.write_all(&[0; 6])?;
        stream.write_u64::<NetworkEndian>(self.cookie)?;
        stream.write_u64::<NetworkEndian>(self.packet_count)?;
        stream.write_u64::<NetworkEndian>(self.byte_count)?;
        self.actions.serialize(stream)?;
        Ok(())
    }
}

impl OfpTableStats {
    pub fn new(
        table_id: u8,
        name: &str,
        wildcards: u32,
        max_entries: u32,
        active_count: u32,
        lookup_count: u64,
        matched_count: u64,
    ) -> Result<OfpTableStats> {
        check_str_width(name, OFP_MAX_TABLE_NAME_LEN)?;
        Ok(OfpTableStats {
            table_id,
            name: name.to_string(),
            wildcards,
            max_entries,
            active_count,
            lookup_count,
            matched_count,
        })
    }

    fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_all(&[self.table_id, 0, 0, 0])?;
        write_padded_str(stream, &self.name, OFP_MAX_TABLE_NAME_LEN)?;
        stream.write_u32::<NetworkEndian>(self.wildcards)?;
        stream.write_u32::<NetworkEndian>(self.max_entries)?;
        stream.write_u32::<NetworkEndian>(self.active_count)?;
        stream.write_u64::<NetworkEndian>(self.lookup_count)?;
        stream.write_u64::<NetworkEndian>(self.matched_count)
    }
}

impl OfpPortStats {
    fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_u16::<NetworkEndian>(self.port_no)?;
        stream.write_all(&[0; 6])?;
        stream.write_u64::<NetworkEndian>(self.rx_packets)?;
        stream.write_u64::<NetworkEndian>(self.tx_packets)?;
        stream.write_u64::<NetworkEndian>(self.rx_bytes)?;
        stream.write_u64::<NetworkEndian>(self.tx_bytes)?;
        stream.write_u64::<NetworkEndian>(self.rx_dropped)?;
        stream.write_u64::<NetworkEndian>(self.tx_dropped)?;
        stream.write_u64::<NetworkEndian>(self.rx_errors)?;
        stream.write_u64::<NetworkEndian>(self.tx_errors)?;
        stream.write_u64::<NetworkEndian>(self.rx_frame_err)?;
        stream.write_u64::<NetworkEndian>(self.rx_over_err)?;
        stream.write_u64::<NetworkEndian>(self.rx_crc_err)?;
        stream.write_u64::<NetworkEndian>(self.collisions)
    }
}

impl OfpQueueStats {
    fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_u16::<NetworkEndian>(self.port_no)?;
        stream.write_all(&[0; 2])?;
        stream.write_u32::<NetworkEndian>(self.queue_id)?;
        stream.write_u64::<NetworkEndian>(self.tx_bytes)?;
        stream.write_u64::<NetworkEndian>(self.tx_packets)?;
        stream.write_u64::<NetworkEndian>(self.tx_errors)
    }
}

impl StatsReplyBody {
    /// The wire stats type this body belongs to.
    pub fn stats_type(&self) -> u16 {
        match *self {
            StatsReplyBody::Desc(_) => OfpStatsType::Desc as u16,
            StatsReplyBody::Flow(_) => OfpStatsType::Flow as u16,
            StatsReplyBody::Aggregate { .. } => OfpStatsType::Aggregate as u16,
            StatsReplyBody::Table(_) => OfpStatsType::Table as u16,
            StatsReplyBody::Port(_) => OfpStatsType::Port as u16,
            StatsReplyBody::Queue(_) => OfpStatsType::Queue as u16,
            StatsReplyBody::Vendor { .. } => OfpStatsType::Vendor as u16,
        }
    }
}

impl OfpStatsReply {
    pub fn new(flags: u16, body: StatsReplyBody) -> OfpStatsReply {
        OfpStatsReply { flags, body }
    }
}
impl OfpPacket for OfpStatsReply {
    fn typ() -> OfpType {
        OfpType::StatsReply
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.body.stats_type())?;
        stream.write_u16::<NetworkEndian>(self.flags)?;
        match self.body {
            StatsReplyBody::Desc(ref desc) => desc.serialize(stream)?,
            StatsReplyBody::Flow(ref entries) => {
                for entry in entries {
                    entry.serialize(stream)?;
                }
            }
            StatsReplyBody::Aggregate {
                packet_count,
                byte_count,
                flow_count,
            } => {
                stream.write_u64::<NetworkEndian>(packet_count)?;
                stream.write_u64::<NetworkEndian>(byte_count)?;
                stream.write_u32::<NetworkEndian>(flow_count)?;
                stream.write_all(&[0; 4])?;
            }
            StatsReplyBody::Table(ref entries) => {
                for entry in entries {
                    entry.serialize(stream)?;
                }
            }
            StatsReplyBody::Port(ref entries) => {
                for entry in entries {
                    entry.serialize(stream)?;
                }
            }
            StatsReplyBody::Queue(ref entries) => {
                for entry in entries {
                    entry.serialize(stream)?;
                }
            }
            StatsReplyBody::Vendor { vendor, ref data } => {
                stream.write_u32::<NetworkEndian>(vendor)?;
                stream.write_all(data)?;
            }
        }
        Ok(())
    }
}

impl OfpPacket for OfpBarrierRequest {
    fn typ() -> OfpType {
        OfpType::BarrierRequest
    }

    fn serialize_body<S: Write>(&self, _stream: &mut S) -> Result<()> {
        Ok(())
    }
}

impl OfpPacket for OfpBarrierReply {
    fn typ() -> OfpType {
        OfpType::BarrierReply
    }

    fn serialize_body<S: Write>(&self, _stream: &mut S) -> Result<()> {
        Ok(())
    }
}

impl OfpQueueGetConfigRequest {
    /// Constructs a queue config query. Only physical ports carry
    /// configurable queues, so reserved port numbers are rejected.
    pub fn new(port: u16) -> Result<OfpQueueGetConfigRequest> {
        if port == 0 || port >= OFPP_MAX {
            return Err(Error::InvalidPortNo(port));
        }
        Ok(OfpQueueGetConfigRequest { port })
    }
}
impl OfpPacket for OfpQueueGetConfigRequest {
    fn typ() -> OfpType {
        OfpType::QueueGetConfigRequest
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.port)?;
        stream.write_all(&[0; 2])?;
        Ok(())
    }
}

impl OfpQueueProp {
    fn length(&self) -> u16 {
        match *self {
            OfpQueueProp::None => 8,
            OfpQueueProp::MinRate(_) => 16,
        }
    }

    fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        let typ = match *self {
            OfpQueueProp::None => OfpQueuePropType::None,
            OfpQueueProp::MinRate(_) => OfpQueuePropType::MinRate,
        };
        stream.write_u16::<NetworkEndian>(typ as u16)?;
        stream.write_u16::<NetworkEndian>(self.length())?;
        stream.write_all(&[0; 4])?;
        if let OfpQueueProp::MinRate(rate) = *self {
            stream.write_u16::<NetworkEndian>(rate)?;
            stream.write_all(&[0; 6])?;
        }
        Ok(())
    }
}

impl OfpPacketQueue {
    /// The queue's wire length including all property records. Fails
    /// when the property list no longer fits the 16-bit length field.
    fn length(&self) -> Result<u16> {
        let total = 8 + self.properties.iter().map(|p| u32::from(p.length())).sum::<u32>();
        if total > u32::from(u16::max_value()) {
            return Err(Error::InvalidBodyLength(total as usize));
        }
        Ok(total as u16)
    }

    fn serialize<S: Write>(&self, stream: &mut S) -> Result<()> {
        let length = self.length()?;
        stream.write_u32::<NetworkEndian>(self.queue_id)?;
        stream.write_u16::<NetworkEndian>(length)?;
        stream.write_all(&[0; 2])?;
        for prop in &self.properties {
            prop.serialize(stream)?;
        }
        Ok(())
    }
}

impl OfpPacket for OfpQueueGetConfigReply {
    fn typ() -> OfpType {
        OfpType::QueueGetConfigReply
    }

    fn serialize_body<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_u16::<NetworkEndian>(self.port)?;
        stream.write_all(&[0; 6])?;
        for queue in &self.queues {
            queue.serialize(stream)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_reply_header() {
        let xid = 42;
        let expected = OfpHeader {
            version: 1,
            typ: 3,
            length: 8,
            xid,
        };
        let testee = OfpEchoReply::new(vec![]);
        assert_eq!(expected, testee.header(0, xid).unwrap());
    }

    #[test]
    fn header_length_matches_buffer_length() {
        let mut actions = ActionList::new();
        actions.append_output(OFPP_FLOOD, 0).unwrap();
        let testee = OfpFlowMod::new(
            OfpMatch::new(),
            0,
            OfpFlowModCommand::Add,
            OFP_FLOW_PERMANENT,
            OFP_FLOW_PERMANENT,
            OFP_DEFAULT_PRIORITY,
            OFP_NO_BUFFER,
            OFPP_NONE,
            OFPFF_SEND_FLOW_REM,
            actions,
        ).unwrap();
        let mut ser = vec![];
        testee.serialize(&mut ser, 7).unwrap();
        assert_eq!(72 + 8, ser.len());
        assert_eq!(&[1, 14, 0, 80], &ser[..4]);
        assert_eq!(7, ser[7]);
    }

    #[test]
    fn oversized_body_is_rejected() {
        let testee = OfpEchoRequest::new(vec![0; 70_000]);
        let mut ser = vec![];
        assert!(match testee.serialize(&mut ser, 1) {
            Err(Error::InvalidBodyLength(70_000)) => true,
            _ => false,
        });
    }

    #[test]
    fn packet_out_requires_a_frame_without_buffer() {
        assert!(match OfpPacketOut::new(OFP_NO_BUFFER, OFPP_NONE, ActionList::new(), vec![]) {
            Err(Error::MissingPacketData) => true,
            _ => false,
        });
        assert!(match OfpPacketOut::new(OFP_NO_BUFFER, OFPP_NONE, ActionList::new(), vec![0; 59]) {
            Err(Error::TooShortFrame(59)) => true,
            _ => false,
        });
        assert!(OfpPacketOut::new(OFP_NO_BUFFER, OFPP_NONE, ActionList::new(), vec![0; 60]).is_ok());
        // A switch-buffered packet needs no frame at all.
        assert!(OfpPacketOut::new(3, 1, ActionList::new(), vec![]).is_ok());
    }

    #[test]
    fn phy_port_name_must_fit_its_field() {
        assert!(OfpPhyPort::new(1, [0; 6], "a-fifteen-chars").is_ok());
        assert!(match OfpPhyPort::new(1, [0; 6], "sixteen-chars-xx") {
            Err(Error::NameTooLong(16)) => true,
            _ => false,
        });
    }

    #[test]
    fn desc_stats_body_is_fixed_width() {
        let desc = OfpDescStats::new("acme", "hw", "sw", "serial", "dp").unwrap();
        let reply = OfpStatsReply::new(0, StatsReplyBody::Desc(desc));
        let mut ser = vec![];
        reply.serialize_body(&mut ser).unwrap();
        assert_eq!(4 + 1056, ser.len());
    }

    #[test]
    fn queue_config_reply_serialization() {
        let reply = OfpQueueGetConfigReply {
            port: 2,
            queues: vec![OfpPacketQueue {
                queue_id: 1,
                properties: vec![OfpQueueProp::MinRate(500), OfpQueueProp::None],
            }],
        };
        let mut ser = vec![];
        reply.serialize_body(&mut ser).unwrap();
        assert_eq!(8 + 8 + 16 + 8, ser.len());
        // The queue record declares its own length including properties.
        assert_eq!(&[0, 32], &ser[12..14]);
    }

    #[test]
    fn oversized_queue_property_list_fails_loudly() {
        let reply = OfpQueueGetConfigReply {
            port: 2,
            queues: vec![OfpPacketQueue {
                queue_id: 1,
                properties: vec![OfpQueueProp::MinRate(1); 4096],
            }],
        };
        let mut ser = vec![];
        assert!(match reply.serialize_body(&mut ser) {
            Err(Error::InvalidBodyLength(65_544)) => true,
            _ => false,
        });
    }

    #[test]
    fn flow_mod_rejects_undefined_flags() {
        assert!(match OfpFlowMod::new(
            OfpMatch::new(),
            0,
            OfpFlowModCommand::Add,
            0,
            0,
            0,
            OFP_NO_BUFFER,
            OFPP_NONE,
            1 << 3,
            ActionList::new(),
        ) {
            Err(Error::InvalidFlowModFlags(_)) => true,
            _ => false,
        });
    }
}
