/*!
All deserialization and validation routines for the OpenFlow message
primitives

The header uses a special deserialization because its size is known.
Use the trait `Deserialize` for any other deserialization implementation.

Every validator is a pure function of one buffer, composed as a short
pipeline with early exit: `check_header`, then the fixed body fields,
then the variable tail. The first failure wins and names its specific
kind. `validate_message` reads the type byte and routes to the matching
validator.
*/

use byteorder::{ByteOrder, NetworkEndian};

use error::{Error, Result};
use messages::actions::deserialize_actions;
use messages::matching::{wildcards_all, OFPFW_ALL};
use messages::*;

impl OfpHeader {
    /// Deserializes an OpenFlow header
    pub fn deserialize(bytes: &[u8; OFP_HEADER_LENGTH]) -> OfpHeader {
        OfpHeader {
            version: bytes[0],
            typ: bytes[1],
            length: NetworkEndian::read_u16(&bytes[2..4]),
            xid: NetworkEndian::read_u32(&bytes[4..]),
        }
    }
}

/// Verifies the header of a whole inbound buffer: protocol version,
/// the expected type, a declared length within `[min_length,
/// max_length]`, and that the declared length equals the physical
/// buffer length exactly. Too short and too long are distinct failures.
pub fn check_header(
    bytes: &[u8],
    expected: OfpType,
    min_length: usize,
    max_length: usize,
) -> Result<OfpHeader> {
    if bytes.len() < OFP_HEADER_LENGTH {
        return Err(Error::TooShortMessage {
            declared: OFP_HEADER_LENGTH,
            actual: bytes.len(),
        });
    }
    let mut header_bytes = [0; OFP_HEADER_LENGTH];
    header_bytes.copy_from_slice(&bytes[..OFP_HEADER_LENGTH]);
    let header = OfpHeader::deserialize(&header_bytes);
    if header.version != OFP_VERSION {
        return Err(Error::UnsupportedVersion(header.version));
    }
    if header.typ > OFPT_MAX {
        return Err(Error::UndefinedType(header.typ));
    }
    if header.typ != expected as u8 {
        return Err(Error::TypeMismatch {
            expected: expected as u8,
            actual: header.typ,
        });
    }
    let declared = header.length as usize;
    if declared < min_length || declared > max_length {
        return Err(Error::InvalidLength {
            length: header.length,
            min: min_length as u16,
            max: max_length as u16,
        });
    }
    if declared > bytes.len() {
        return Err(Error::TooShortMessage {
            declared,
            actual: bytes.len(),
        });
    }
    if declared < bytes.len() {
        return Err(Error::TooLongMessage {
            declared,
            actual: bytes.len(),
        });
    }
    Ok(header)
}

/// To be implemented by all OpenFlow messages that are received.
pub trait Deserialize {
    /// The type to deserialize
    type R;

    /// The message type this validator accepts
    fn typ() -> OfpType;

    /// Validates and deserializes a whole message buffer including
    /// its header.
    fn deserialize(bytes: &[u8]) -> Result<Self::R> {
        check_header(bytes, Self::typ(), Self::min_length(), Self::max_length())?;
        Self::deserialize_body(&bytes[OFP_HEADER_LENGTH..])
    }

    /// Deserializes the message body (network byte order).
    /// Implementers can rely on the buffer's size being within the
    /// bounds their `min_length`/`max_length` declare.
    fn deserialize_body(body: &[u8]) -> Result<Self::R>;

    /// The minimum length of the whole message in bytes
    fn min_length() -> usize {
        OFP_HEADER_LENGTH
    }

    /// The maximum length of the whole message in bytes
    fn max_length() -> usize {
        0xffff
    }
}

/// Reads a NUL-padded fixed-width string field.
fn read_fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn read_mac(bytes: &[u8]) -> [u8; 6] {
    let mut addr = [0; 6];
    addr.copy_from_slice(&bytes[..6]);
    addr
}

/// A flow carrying a concrete (not fully wildcarded) match has to use
/// the highest priority in removed and mod messages.
fn check_flow_priority(wildcards: u32, priority: u16) -> Result<()> {
    if !wildcards_all(wildcards) && priority != u16::max_value() {
        return Err(Error::InvalidFlowPriority(priority));
    }
    Ok(())
}

/// The flow stats form of the priority rule, written as a strict
/// comparison; for a u16 both forms agree.
fn check_stats_priority(wildcards: u32, priority: u16) -> Result<()> {
    if !wildcards_all(wildcards) && priority < u16::max_value() {
        return Err(Error::InvalidFlowPriority(priority));
    }
    Ok(())
}

impl Deserialize for OfpHello {
    type R = OfpHello;

    fn typ() -> OfpType {
        OfpType::Hello
    }

    // Trailing bytes are a future-version body and are ignored.
    fn deserialize_body(_body: &[u8]) -> Result<Self::R> {
        Ok(OfpHello)
    }
}

fn max_error_code(error_type: u16) -> Option<u16> {
    match error_type {
        t if t == OfpErrorType::HelloFailed as u16 => Some(OfpHelloFailedCode::EPerm as u16),
        t if t == OfpErrorType::BadRequest as u16 => {
            Some(OfpBadRequestCode::BufferUnknown as u16)
        }
        t if t == OfpErrorType::BadAction as u16 => Some(OfpBadActionCode::BadQueue as u16),
        t if t == OfpErrorType::FlowModFailed as u16 => {
            Some(OfpFlowModFailedCode::Unsupported as u16)
        }
        t if t == OfpErrorType::PortModFailed as u16 => {
            Some(OfpPortModFailedCode::BadHwAddr as u16)
        }
        t if t == OfpErrorType::QueueOpFailed as u16 => Some(OfpQueueOpFailedCode::EPerm as u16),
        _ => None,
    }
}

impl Deserialize for OfpErrorMsg {
    type R = OfpErrorMsg;

    fn typ() -> OfpType {
        OfpType::Error
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let typ = NetworkEndian::read_u16(&body[0..2]);
        let code = NetworkEndian::read_u16(&body[2..4]);
        let max_code = max_error_code(typ).ok_or(Error::InvalidErrorType(typ))?;
        if code > max_code {
            return Err(Error::InvalidErrorCode {
                error_type: typ,
                code,
            });
        }
        Ok(OfpErrorMsg {
            typ,
            code,
            data: body[4..].to_vec(),
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }
}

impl Deserialize for OfpEchoRequest {
    type R = OfpEchoRequest;

    fn typ() -> OfpType {
        OfpType::EchoRequest
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        Ok(OfpEchoRequest {
            arbitrary: body.to_vec(),
        })
    }
}

impl Deserialize for OfpEchoReply {
    type R = OfpEchoReply;

    fn typ() -> OfpType {
        OfpType::EchoReply
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        Ok(OfpEchoReply {
            arbitrary: body.to_vec(),
        })
    }
}

impl Deserialize for OfpVendor {
    type R = OfpVendor;

    fn typ() -> OfpType {
        OfpType::Vendor
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        Ok(OfpVendor {
            vendor: NetworkEndian::read_u32(&body[0..4]),
            data: body[4..].to_vec(),
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }
}

impl Deserialize for OfpFeaturesRequest {
    type R = OfpFeaturesRequest;

    fn typ() -> OfpType {
        OfpType::FeaturesRequest
    }

    fn deserialize_body(_body: &[u8]) -> Result<Self::R> {
        Ok(OfpFeaturesRequest)
    }

    fn max_length() -> usize {
        OFP_HEADER_LENGTH
    }
}

impl OfpPhyPort {
    /// Deserializes one 48-byte port record.
    fn deserialize(bytes: &[u8]) -> Result<OfpPhyPort> {
        let port_no = NetworkEndian::read_u16(&bytes[0..2]);
        if !port_no_valid(port_no) {
            return Err(Error::InvalidPortNo(port_no));
        }
        Ok(OfpPhyPort {
            port_no,
            hw_addr: read_mac(&bytes[2..8]),
            name: read_fixed_str(&bytes[8..24]),
            config: NetworkEndian::read_u32(&bytes[24..28]),
            state: NetworkEndian::read_u32(&bytes[28..32]),
            curr: NetworkEndian::read_u32(&bytes[32..36]),
            advertised: NetworkEndian::read_u32(&bytes[36..40]),
            supported: NetworkEndian::read_u32(&bytes[40..44]),
            peer: NetworkEndian::read_u32(&bytes[44..48]),
        })
    }
}

impl Deserialize for OfpSwitchFeatures {
    type R = OfpSwitchFeatures;

    fn typ() -> OfpType {
        OfpType::FeaturesReply
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        if (body.len() - 24) % OFP_PHY_PORT_LENGTH != 0 {
            return Err(Error::InvalidBodyLength(body.len()));
        }
        let ports = body[24..]
            .chunks(OFP_PHY_PORT_LENGTH)
            .map(OfpPhyPort::deserialize)
            .collect::<Result<Vec<_>>>()?;
        Ok(OfpSwitchFeatures {
            datapath_id: NetworkEndian::read_u64(&body[0..8]),
            n_buffers: NetworkEndian::read_u32(&body[8..12]),
            n_tables: body[12],
            capabilities: NetworkEndian::read_u32(&body[16..20]),
            actions: NetworkEndian::read_u32(&body[20..24]),
            ports,
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 24
    }
}

impl Deserialize for OfpGetConfigRequest {
    type R = OfpGetConfigRequest;

    fn typ() -> OfpType {
        OfpType::GetConfigRequest
    }

    fn deserialize_body(_body: &[u8]) -> Result<Self::R> {
        Ok(OfpGetConfigRequest)
    }

    fn max_length() -> usize {
        OFP_HEADER_LENGTH
    }
}

fn deserialize_switch_config(body: &[u8]) -> Result<(u16, u16)> {
    let flags = NetworkEndian::read_u16(&body[0..2]);
    if flags > OFPC_FRAG_MAX {
        return Err(Error::InvalidSwitchConfigFlags(flags));
    }
    Ok((flags, NetworkEndian::read_u16(&body[2..4])))
}

impl Deserialize for OfpGetConfigReply {
    type R = OfpGetConfigReply;

    fn typ() -> OfpType {
        OfpType::GetConfigReply
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let (flags, miss_send_len) = deserialize_switch_config(body)?;
        Ok(OfpGetConfigReply {
            flags,
            miss_send_len,
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }

    fn max_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }
}

impl Deserialize for OfpSetConfig {
    type R = OfpSetConfig;

    fn typ() -> OfpType {
        OfpType::SetConfig
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let (flags, miss_send_len) = deserialize_switch_config(body)?;
        Ok(OfpSetConfig {
            flags,
            miss_send_len,
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }

    fn max_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }
}

impl Deserialize for OfpPacketIn {
    type R = OfpPacketIn;

    fn typ() -> OfpType {
        OfpType::PacketIn
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let in_port = NetworkEndian::read_u16(&body[6..8]);
        if !port_no_valid(in_port) {
            return Err(Error::InvalidPortNo(in_port));
        }
        let reason = body[8];
        if reason > OfpPacketInReason::Action as u8 {
            return Err(Error::InvalidPacketInReason(reason));
        }
        Ok(OfpPacketIn {
            buffer_id: NetworkEndian::read_u32(&body[0..4]),
            total_len: NetworkEndian::read_u16(&body[4..6]),
            in_port,
            reason,
            data: body[10..].to_vec(),
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 10
    }
}

impl Deserialize for OfpFlowRemoved {
    type R = OfpFlowRemoved;

    fn typ() -> OfpType {
        OfpType::FlowRemoved
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let match_field = OfpMatch::deserialize(&body[0..OFP_MATCH_LENGTH]);
        match_field.validate()?;
        let priority = NetworkEndian::read_u16(&body[48..50]);
        check_flow_priority(match_field.wildcards, priority)?;
        let reason = body[50];
        if reason > OfpFlowRemovedReason::Delete as u8 {
            return Err(Error::InvalidFlowRemovedReason(reason));
        }
        Ok(OfpFlowRemoved {
            match_field,
            cookie: NetworkEndian::read_u64(&body[40..48]),
            priority,
            reason,
            duration_sec: NetworkEndian::read_u32(&body[52..56]),
            duration_nsec: NetworkEndian::read_u32(&body[56..60]),
            idle_timeout: NetworkEndian::read_u16(&body[60..62]),
            packet_count: NetworkEndian::read_u64(&body[64..72]),
            byte_count: NetworkEndian::read_u64(&body[72..80]),
        })
    }

    fn min_length() -> usize {
        88
    }

    fn max_length() -> usize {
        88
    }
}

impl Deserialize for OfpPortStatus {
    type R = OfpPortStatus;

    fn typ() -> OfpType {
        OfpType::PortStatus
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let reason = body[0];
        if reason > OfpPortReason::Modify as u8 {
            return Err(Error::InvalidPortStatusReason(reason));
        }
        Ok(OfpPortStatus {
            reason,
            desc: OfpPhyPort::deserialize(&body[8..56])?,
        })
    }

    fn min_length() -> usize {
        64
    }

    fn max_length() -> usize {
        64
    }
}

impl Deserialize for OfpPacketOut {
    type R = OfpPacketOut;

    fn typ() -> OfpType {
        OfpType::PacketOut
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let buffer_id = NetworkEndian::read_u32(&body[0..4]);
        let in_port = NetworkEndian::read_u16(&body[4..6]);
        if in_port != OFPP_NONE && !port_no_valid(in_port) {
            return Err(Error::InvalidPortNo(in_port));
        }
        let actions_len = NetworkEndian::read_u16(&body[6..8]) as usize;
        if 8 + actions_len > body.len() {
            return Err(Error::InvalidBodyLength(actions_len));
        }
        let actions = deserialize_actions(&body[8..8 + actions_len])?;
        let data = body[8 + actions_len..].to_vec();
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

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 8
    }
}

impl Deserialize for OfpFlowMod {
    type R = OfpFlowMod;

    fn typ() -> OfpType {
        OfpType::FlowMod
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let match_field = OfpMatch::deserialize(&body[0..OFP_MATCH_LENGTH]);
        match_field.validate()?;
        let command = NetworkEndian::read_u16(&body[48..50]);
        if command > OFPFC_MAX {
            return Err(Error::InvalidFlowModCommand(command));
        }
        let priority = NetworkEndian::read_u16(&body[54..56]);
        check_flow_priority(match_field.wildcards, priority)?;
        let out_port = NetworkEndian::read_u16(&body[60..62]);
        if out_port != OFPP_NONE && !port_no_valid(out_port) {
            return Err(Error::InvalidPortNo(out_port));
        }
        let flags = NetworkEndian::read_u16(&body[62..64]);
        if flags & !OFPFF_ALL != 0 {
            return Err(Error::InvalidFlowModFlags(flags));
        }
        Ok(OfpFlowMod {
            match_field,
            cookie: NetworkEndian::read_u64(&body[40..48]),
            command,
            idle_timeout: NetworkEndian::read_u16(&body[50..52]),
            hard_timeout: NetworkEndian::read_u16(&body[52..54]),
            priority,
            buffer_id: NetworkEndian::read_u32(&body[56..60]),
            out_port,
            flags,
            actions: deserialize_actions(&body[64..])?,
        })
    }

    fn min_length() -> usize {
        72
    }
}

impl Deserialize for OfpPortMod {
    type R = OfpPortMod;

    fn typ() -> OfpType {
        OfpType::PortMod
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let port_no = NetworkEndian::read_u16(&body[0..2]);
        if !port_no_valid(port_no) {
            return Err(Error::InvalidPortNo(port_no));
        }
        Ok(OfpPortMod {
            port_no,
            hw_addr: read_mac(&body[2..8]),
            config: NetworkEndian::read_u32(&body[8..12]),
            mask: NetworkEndian::read_u32(&body[12..16]),
            advertise: NetworkEndian::read_u32(&body[16..20]),
        })
    }

    fn min_length() -> usize {
        32
    }

    fn max_length() -> usize {
        32
    }
}

/// Requires the tail to be exactly `expected` bytes long.
fn check_tail_length(rest: &[u8], expected: usize) -> Result<()> {
    if rest.len() != expected {
        return Err(Error::InvalidBodyLength(rest.len()));
    }
    Ok(())
}

impl Deserialize for OfpStatsRequest {
    type R = OfpStatsRequest;

    fn typ() -> OfpType {
        OfpType::StatsRequest
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let stats_type = NetworkEndian::read_u16(&body[0..2]);
        let flags = NetworkEndian::read_u16(&body[2..4]);
        let rest = &body[4..];
        let stats_body = match stats_type {
            t if t == OfpStatsType::Desc as u16 => {
                check_tail_length(rest, 0)?;
                StatsRequestBody::Desc
            }
            t if t == OfpStatsType::Flow as u16 || t == OfpStatsType::Aggregate as u16 => {
                check_tail_length(rest, 44)?;
                let match_field = OfpMatch::deserialize(&rest[0..OFP_MATCH_LENGTH]);
                match_field.validate()?;
                let table_id = rest[40];
                let out_port = NetworkEndian::read_u16(&rest[42..44]);
                if out_port != OFPP_NONE && !port_no_valid(out_port) {
                    return Err(Error::InvalidPortNo(out_port));
                }
                if t == OfpStatsType::Flow as u16 {
                    StatsRequestBody::Flow {
                        match_field,
                        table_id,
                        out_port,
                    }
                } else {
                    StatsRequestBody::Aggregate {
                        match_field,
                        table_id,
                        out_port,
                    }
                }
            }
            t if t == OfpStatsType::Table as u16 => {
                check_tail_length(rest, 0)?;
                StatsRequestBody::Table
            }
            t if t == OfpStatsType::Port as u16 => {
                check_tail_length(rest, 8)?;
                let port_no = NetworkEndian::read_u16(&rest[0..2]);
                if port_no != OFPP_NONE && !port_no_valid(port_no) {
                    return Err(Error::InvalidPortNo(port_no));
                }
                StatsRequestBody::Port { port_no }
            }
            t if t == OfpStatsType::Queue as u16 => {
                check_tail_length(rest, 8)?;
                let port_no = NetworkEndian::read_u16(&rest[0..2]);
                if port_no != OFPP_ALL && !port_no_valid(port_no) {
                    return Err(Error::InvalidPortNo(port_no));
                }
                StatsRequestBody::Queue {
                    port_no,
                    queue_id: NetworkEndian::read_u32(&rest[4..8]),
                }
            }
            t if t == OfpStatsType::Vendor as u16 => {
                if rest.len() < 4 {
                    return Err(Error::InvalidBodyLength(rest.len()));
                }
                StatsRequestBody::Vendor {
                    vendor: NetworkEndian::read_u32(&rest[0..4]),
                    data: rest[4..].to_vec(),
                }
            }
            t => return Err(Error::UnsupportedStatsType(t)),
        };
        Ok(OfpStatsRequest {
            flags,
            body: stats_body,
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }
}

impl OfpFlowStats {
    /// Deserializes one flow stats entry whose `length` field has
    /// already been bounds-checked by the caller.
    fn deserialize(bytes: &[u8]) -> Result<OfpFlowStats> {
        let match_field = OfpMatch::deserialize(&bytes[4..44]);
        match_field.validate()?;
        let priority = NetworkEndian::read_u16(&bytes[52..54]);
        check_stats_priority(match_field.wildcards, priority)?;
        Ok(OfpFlowStats {
            table_id: bytes[2],
            match_field,
            duration_sec: NetworkEndian::read_u32(&bytes[44..48]),
            duration_nsec: NetworkEndian::read_u32(&bytes[48..52]),
            priority,
            idle_timeout: NetworkEndian::read_u16(&bytes[54..56]),
            hard_timeout: NetworkEndian::read_u16(&bytes[56..58]),
            cookie: NetworkEndian::read_u64(&bytes[64..72]),
            packet_count: NetworkEndian::read_u64(&bytes[72..80]),
            byte_count: NetworkEndian::read_u64(&bytes[80..88]),
            actions: deserialize_actions(&bytes[88..])?,
        })
    }
}

/// Walks the flow stats entries of a reply tail. Each entry declares
/// its own length because the action tail varies per entry; the tail
/// has to be consumed exactly.
fn deserialize_flow_stats(mut rest: &[u8]) -> Result<Vec<OfpFlowStats>> {
    let mut entries = vec![];
    while !rest.is_empty() {
        if rest.len() < 88 {
            return Err(Error::InvalidBodyLength(rest.len()));
        }
        let entry_len = NetworkEndian::read_u16(&rest[0..2]) as usize;
        if entry_len < 88 || entry_len > rest.len() {
            return Err(Error::InvalidBodyLength(entry_len));
        }
        entries.push(OfpFlowStats::deserialize(&rest[..entry_len])?);
        rest = &rest[entry_len..];
    }
    Ok(entries)
}

impl OfpTableStats {
    fn deserialize(bytes: &[u8]) -> Result<OfpTableStats> {
        let wildcards = NetworkEndian::read_u32(&bytes[36..40]);
        if wildcards & !OFPFW_ALL != 0 {
            return Err(Error::InvalidWildcards(wildcards));
        }
        Ok(OfpTableStats {
            table_id: bytes[0],
            name: read_fixed_str(&bytes[4..36]),
            wildcards,
            max_entries: NetworkEndian::read_u32(&bytes[40..44]),
            active_count: NetworkEndian::read_u32(&bytes[44..48]),
            lookup_count: NetworkEndian::read_u64(&bytes[48..56]),
            matched_count: NetworkEndian::read_u64(&bytes[56..64]),
        })
    }
}

impl OfpPortStats {
    fn deserialize(bytes: &[u8]) -> Result<OfpPortStats> {
        let port_no = NetworkEndian::read_u16(&bytes[0..2]);
        if !port_no_valid(port_no) {
            return Err(Error::InvalidPortNo(port_no));
        }
        Ok(OfpPortStats {
            port_no,
            rx_packets: NetworkEndian::read_u64(&bytes[8..16]),
            tx_packets: NetworkEndian::read_u64(&bytes[16..24]),
            rx_bytes: NetworkEndian::read_u64(&bytes[24..32]),
            tx_bytes: NetworkEndian::read_u64(&bytes[32..40]),
            rx_dropped: NetworkEndian::read_u64(&bytes[40..48]),
            tx_dropped: NetworkEndian::read_u64(&bytes[48..56]),
            rx_errors: NetworkEndian::read_u64(&bytes[56..64]),
            tx_errors: NetworkEndian::read_u64(&bytes[64..72]),
            rx_frame_err: NetworkEndian::read_u64(&bytes[72..80]),
            rx_over_err: NetworkEndian::read_u64(&bytes[80..88]),
            rx_crc_err: NetworkEndian::read_u64(&bytes[88..96]),
            collisions: NetworkEndian::read_u64(&bytes[96..104]),
        })
    }
}

impl OfpQueueStats {
    fn deserialize(bytes: &[u8]) -> Result<OfpQueueStats> {
        Ok(OfpQueueStats {
            port_no: NetworkEndian::read_u16(&bytes[0..2]),
            queue_id: NetworkEndian::read_u32(&bytes[4..8]),
            tx_bytes: NetworkEndian::read_u64(&bytes[8..16]),
            tx_packets: NetworkEndian::read_u64(&bytes[16..24]),
            tx_errors: NetworkEndian::read_u64(&bytes[24..32]),
        })
    }
}

/// Walks a tail of fixed-size records.
fn deserialize_entries<T, F>(rest: &[u8], entry_len: usize, deserialize: F) -> Result<Vec<T>>
where
    F: Fn(&[u8]) -> Result<T>,
{
    if rest.len() % entry_len != 0 {
        return Err(Error::InvalidBodyLength(rest.len()));
    }
    rest.chunks(entry_len).map(deserialize).collect()
}

impl Deserialize for OfpStatsReply {
    type R = OfpStatsReply;

    fn typ() -> OfpType {
        OfpType::StatsReply
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let stats_type = NetworkEndian::read_u16(&body[0..2]);
        let flags = NetworkEndian::read_u16(&body[2..4]);
        let rest = &body[4..];
        let stats_body = match stats_type {
            t if t == OfpStatsType::Desc as u16 => {
                check_tail_length(rest, 4 * DESC_STR_LEN + SERIAL_NUM_LEN)?;
                StatsReplyBody::Desc(OfpDescStats {
                    mfr_desc: read_fixed_str(&rest[0..256]),
                    hw_desc: read_fixed_str(&rest[256..512]),
                    sw_desc: read_fixed_str(&rest[512..768]),
                    serial_num: read_fixed_str(&rest[768..800]),
                    dp_desc: read_fixed_str(&rest[800..1056]),
                })
            }
            t if t == OfpStatsType::Flow as u16 => {
                StatsReplyBody::Flow(deserialize_flow_stats(rest)?)
            }
            t if t == OfpStatsType::Aggregate as u16 => {
                check_tail_length(rest, 24)?;
                StatsReplyBody::Aggregate {
                    packet_count: NetworkEndian::read_u64(&rest[0..8]),
                    byte_count: NetworkEndian::read_u64(&rest[8..16]),
                    flow_count: NetworkEndian::read_u32(&rest[16..20]),
                }
            }
            t if t == OfpStatsType::Table as u16 => {
                StatsReplyBody::Table(deserialize_entries(rest, 64, OfpTableStats::deserialize)?)
            }
            t if t == OfpStatsType::Port as u16 => {
                StatsReplyBody::Port(deserialize_entries(rest, 104, OfpPortStats::deserialize)?)
            }
            t if t == OfpStatsType::Queue as u16 => {
                StatsReplyBody::Queue(deserialize_entries(rest, 32, OfpQueueStats::deserialize)?)
            }
            t if t == OfpStatsType::Vendor as u16 => {
                if rest.len() < 4 {
                    return Err(Error::InvalidBodyLength(rest.len()));
                }
                StatsReplyBody::Vendor {
                    vendor: NetworkEndian::read_u32(&rest[0..4]),
                    data: rest[4..].to_vec(),
                }
            }
            t => return Err(Error::UnsupportedStatsType(t)),
        };
        Ok(OfpStatsReply {
            flags,
            body: stats_body,
        })
    }

    fn min_length() -> usize {
        OFP_HEADER_LENGTH + 4
    }
}

impl Deserialize for OfpBarrierRequest {
    type R = OfpBarrierRequest;

    fn typ() -> OfpType {
        OfpType::BarrierRequest
    }

    fn deserialize_body(_body: &[u8]) -> Result<Self::R> {
        Ok(OfpBarrierRequest)
    }

    fn max_length() -> usize {
        OFP_HEADER_LENGTH
    }
}

impl Deserialize for OfpBarrierReply {
    type R = OfpBarrierReply;

    fn typ() -> OfpType {
        OfpType::BarrierReply
    }

    fn deserialize_body(_body: &[u8]) -> Result<Self::R> {
        Ok(OfpBarrierReply)
    }

    fn max_length() -> usize {
        OFP_HEADER_LENGTH
    }
}

impl Deserialize for OfpQueueGetConfigRequest {
    type R = OfpQueueGetConfigRequest;

    fn typ() -> OfpType {
        OfpType::QueueGetConfigRequest
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let port = NetworkEndian::read_u16(&body[0..2]);
        if port == 0 || port >= OFPP_MAX {
            return Err(Error::InvalidPortNo(port));
        }
        Ok(OfpQueueGetConfigRequest { port })
    }

    fn min_length() -> usize {
        12
    }

    fn max_length() -> usize {
        12
    }
}

/// Walks the property records of one packet queue.
fn deserialize_queue_props(mut rest: &[u8]) -> Result<Vec<OfpQueueProp>> {
    let mut props = vec![];
    while !rest.is_empty() {
        if rest.len() < 8 {
            return Err(Error::InvalidBodyLength(rest.len()));
        }
        let property = NetworkEndian::read_u16(&rest[0..2]);
        let length = NetworkEndian::read_u16(&rest[2..4]);
        if length as usize > rest.len() {
            return Err(Error::InvalidQueuePropertyLength { property, length });
        }
        let prop = match property {
            p if p == OfpQueuePropType::None as u16 => {
                if length != 8 {
                    return Err(Error::InvalidQueuePropertyLength { property, length });
                }
                OfpQueueProp::None
            }
            p if p == OfpQueuePropType::MinRate as u16 => {
                if length != 16 {
                    return Err(Error::InvalidQueuePropertyLength { property, length });
                }
                OfpQueueProp::MinRate(NetworkEndian::read_u16(&rest[8..10]))
            }
            p => return Err(Error::UndefinedQueueProperty(p)),
        };
        props.push(prop);
        rest = &rest[length as usize..];
    }
    Ok(props)
}

impl Deserialize for OfpQueueGetConfigReply {
    type R = OfpQueueGetConfigReply;

    fn typ() -> OfpType {
        OfpType::QueueGetConfigReply
    }

    fn deserialize_body(body: &[u8]) -> Result<Self::R> {
        let port = NetworkEndian::read_u16(&body[0..2]);
        if port == 0 || port >= OFPP_MAX {
            return Err(Error::InvalidPortNo(port));
        }
        let mut queues = vec![];
        let mut rest = &body[8..];
        while !rest.is_empty() {
            if rest.len() < 8 {
                return Err(Error::InvalidBodyLength(rest.len()));
            }
            let queue_len = NetworkEndian::read_u16(&rest[4..6]) as usize;
            if queue_len < 8 || queue_len > rest.len() {
                return Err(Error::InvalidBodyLength(queue_len));
            }
            queues.push(OfpPacketQueue {
                queue_id: NetworkEndian::read_u32(&rest[0..4]),
                properties: deserialize_queue_props(&rest[8..queue_len])?,
            });
            rest = &rest[queue_len..];
        }
        Ok(OfpQueueGetConfigReply { port, queues })
    }

    fn min_length() -> usize {
        16
    }
}

/// Validates a whole inbound buffer and hands back its typed form. The
/// type byte routes to the matching validator; values above the known
/// range fail as an undefined type.
pub fn validate_message(bytes: &[u8]) -> Result<OfpMessage> {
    if bytes.len() < OFP_HEADER_LENGTH {
        return Err(Error::TooShortMessage {
            declared: OFP_HEADER_LENGTH,
            actual: bytes.len(),
        });
    }
    let typ = bytes[1];
    trace!("Validating inbound message: type {}, {} bytes", typ, bytes.len());
    match typ {
        0 => OfpHello::deserialize(bytes).map(OfpMessage::Hello),
        1 => OfpErrorMsg::deserialize(bytes).map(OfpMessage::Error),
        2 => OfpEchoRequest::deserialize(bytes).map(OfpMessage::EchoRequest),
        3 => OfpEchoReply::deserialize(bytes).map(OfpMessage::EchoReply),
        4 => OfpVendor::deserialize(bytes).map(OfpMessage::Vendor),
        5 => OfpFeaturesRequest::deserialize(bytes).map(OfpMessage::FeaturesRequest),
        6 => OfpSwitchFeatures::deserialize(bytes).map(OfpMessage::FeaturesReply),
        7 => OfpGetConfigRequest::deserialize(bytes).map(OfpMessage::GetConfigRequest),
        8 => OfpGetConfigReply::deserialize(bytes).map(OfpMessage::GetConfigReply),
        9 => OfpSetConfig::deserialize(bytes).map(OfpMessage::SetConfig),
        10 => OfpPacketIn::deserialize(bytes).map(OfpMessage::PacketIn),
        11 => OfpFlowRemoved::deserialize(bytes).map(OfpMessage::FlowRemoved),
        12 => OfpPortStatus::deserialize(bytes).map(OfpMessage::PortStatus),
        13 => OfpPacketOut::deserialize(bytes).map(OfpMessage::PacketOut),
        14 => OfpFlowMod::deserialize(bytes).map(OfpMessage::FlowMod),
        15 => OfpPortMod::deserialize(bytes).map(OfpMessage::PortMod),
        16 => OfpStatsRequest::deserialize(bytes).map(OfpMessage::StatsRequest),
        17 => OfpStatsReply::deserialize(bytes).map(OfpMessage::StatsReply),
        18 => OfpBarrierRequest::deserialize(bytes).map(OfpMessage::BarrierRequest),
        19 => OfpBarrierReply::deserialize(bytes).map(OfpMessage::BarrierReply),
        20 => OfpQueueGetConfigRequest::deserialize(bytes).map(OfpMessage::QueueGetConfigRequest),
        21 => OfpQueueGetConfigReply::deserialize(bytes).map(OfpMessage::QueueGetConfigReply),
        t => Err(Error::UndefinedType(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messages::matching::OFPFW_IN_PORT;
    use messages::serialize::OfpPacket;

    fn serialized<P: OfpPacket>(packet: &P, xid: u32) -> Vec<u8> {
        let mut ser = vec![];
        packet.serialize(&mut ser, xid).unwrap();
        ser
    }

    #[test]
    fn header_deserialization() {
        let expected = OfpHeader {
            version: 1,
            typ: 2,
            length: 0x5234,
            xid: 0x12345678,
        };
        let bytes = [1, 2, 0x52, 0x34, 0x12, 0x34, 0x56, 0x78];
        assert_eq!(expected, OfpHeader::deserialize(&bytes));
    }

    #[test]
    fn hello_tolerates_a_future_version_body() {
        let bytes = [1, 0, 0, 9, 0, 0, 0, 1, 0xaa];
        assert_eq!(OfpMessage::Hello(OfpHello), validate_message(&bytes).unwrap());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let bytes = [4, 0, 0, 8, 0, 0, 0, 1];
        assert!(match validate_message(&bytes) {
            Err(Error::UnsupportedVersion(4)) => true,
            _ => false,
        });
    }

    #[test]
    fn type_bytes_above_the_defined_range_are_rejected() {
        let bytes = [1, 22, 0, 8, 0, 0, 0, 1];
        assert!(match validate_message(&bytes) {
            Err(Error::UndefinedType(22)) => true,
            _ => false,
        });
        let bytes = [1, 0xff, 0, 8, 0, 0, 0, 1];
        assert!(match validate_message(&bytes) {
            Err(Error::UndefinedType(0xff)) => true,
            _ => false,
        });
    }

    #[test]
    fn declared_length_must_match_the_buffer_exactly() {
        let req = OfpFeaturesRequest;
        let mut ser = serialized(&req, 2);
        ser.push(0);
        assert!(match validate_message(&ser) {
            Err(Error::TooLongMessage {
                declared: 8,
                actual: 9,
            }) => true,
            _ => false,
        });
        let ser = serialized(&req, 2);
        assert!(match validate_message(&ser[..7]) {
            Err(Error::TooShortMessage { .. }) => true,
            _ => false,
        });
    }

    #[test]
    fn features_reply_roundtrip() {
        let reply = OfpSwitchFeatures {
            datapath_id: 0x12345600,
            n_buffers: 128,
            n_tables: 1,
            capabilities: 0xc7,
            actions: 0xfff,
            ports: vec![
                OfpPhyPort::new(1, [2, 0, 0, 0, 0, 1], "Brown").unwrap(),
                OfpPhyPort::new(OFPP_LOCAL, [2, 0, 0, 0, 0, 0xfe], "Amber").unwrap(),
            ],
        };
        let ser = serialized(&reply, 3);
        assert_eq!(32 + 2 * 48, ser.len());
        assert_eq!(
            OfpMessage::FeaturesReply(reply),
            validate_message(&ser).unwrap()
        );
    }

    #[test]
    fn features_reply_rejects_a_partial_port_record() {
        let reply = OfpSwitchFeatures {
            datapath_id: 1,
            n_buffers: 0,
            n_tables: 1,
            capabilities: 0,
            actions: 0,
            ports: vec![],
        };
        let mut ser = serialized(&reply, 3);
        ser.extend_from_slice(&[0; 20]);
        let length = ser.len() as u16;
        NetworkEndian::write_u16(&mut ser[2..4], length);
        assert!(match validate_message(&ser) {
            Err(Error::InvalidBodyLength(44)) => true,
            _ => false,
        });
    }

    #[test]
    fn packet_in_reason_must_be_defined() {
        let msg = OfpPacketIn::new(OFP_NO_BUFFER, 64, 7, OfpPacketInReason::NoMatch, vec![0; 18])
            .unwrap();
        let mut ser = serialized(&msg, 9);
        assert!(validate_message(&ser).is_ok());
        ser[16] = 2; // one past OFPR_ACTION
        assert!(match validate_message(&ser) {
            Err(Error::InvalidPacketInReason(2)) => true,
            _ => false,
        });
    }

    #[test]
    fn flow_mod_command_boundary() {
        let build = |command| {
            OfpFlowMod::new(
                OfpMatch::new(),
                0,
                command,
                0,
                0,
                OFP_DEFAULT_PRIORITY,
                OFP_NO_BUFFER,
                OFPP_NONE,
                0,
                ActionList::new(),
            ).unwrap()
        };
        let ser = serialized(&build(OfpFlowModCommand::DeleteStrict), 4);
        assert!(validate_message(&ser).is_ok());

        let mut ser = serialized(&build(OfpFlowModCommand::Add), 4);
        ser[57] = OFPFC_MAX as u8 + 1;
        assert!(match validate_message(&ser) {
            Err(Error::InvalidFlowModCommand(5)) => true,
            _ => false,
        });
    }

    #[test]
    fn flow_mod_roundtrip_with_actions() {
        let mut actions = ActionList::new();
        actions.append_set_vlan_vid(7).unwrap();
        actions.append_output(OFPP_CONTROLLER, 0xffff).unwrap();
        let msg = OfpFlowMod::new(
            OfpMatch::new(),
            0xfeed,
            OfpFlowModCommand::Add,
            30,
            0,
            OFP_DEFAULT_PRIORITY,
            OFP_NO_BUFFER,
            OFPP_NONE,
            OFPFF_SEND_FLOW_REM,
            actions,
        ).unwrap();
        let ser = serialized(&msg, 5);
        assert_eq!(OfpMessage::FlowMod(msg), validate_message(&ser).unwrap());
    }

    #[test]
    fn concrete_match_requires_the_highest_priority() {
        let mut match_field = OfpMatch::new();
        match_field.wildcards &= !OFPFW_IN_PORT;
        match_field.in_port = 1;
        let build = |priority| {
            OfpFlowMod::new(
                match_field.clone(),
                0,
                OfpFlowModCommand::Add,
                0,
                0,
                priority,
                OFP_NO_BUFFER,
                OFPP_NONE,
                0,
                ActionList::new(),
            ).unwrap()
        };
        let ser = serialized(&build(0xffff), 6);
        assert!(validate_message(&ser).is_ok());
        let ser = serialized(&build(OFP_DEFAULT_PRIORITY), 6);
        assert!(match validate_message(&ser) {
            Err(Error::InvalidFlowPriority(OFP_DEFAULT_PRIORITY)) => true,
            _ => false,
        });
    }

    #[test]
    fn packet_out_rejects_a_truncated_action_tail() {
        let mut actions = ActionList::new();
        actions.append_output(2, 0).unwrap();
        let msg = OfpPacketOut::new(17, 1, actions, vec![]).unwrap();
        let mut ser = serialized(&msg, 8);
        assert!(validate_message(&ser).is_ok());
        // Claim a longer action tail than the body holds.
        ser[15] = 16;
        assert!(match validate_message(&ser) {
            Err(Error::InvalidBodyLength(16)) => true,
            _ => false,
        });
    }

    #[test]
    fn stats_request_type_boundary() {
        let req = OfpStatsRequest::new(StatsRequestBody::Table).unwrap();
        let mut ser = serialized(&req, 10);
        assert!(validate_message(&ser).is_ok());
        ser[9] = 6; // one past OFPST_QUEUE
        assert!(match validate_message(&ser) {
            Err(Error::UnsupportedStatsType(6)) => true,
            _ => false,
        });
    }

    #[test]
    fn flow_stats_reply_roundtrip() {
        let mut actions = ActionList::new();
        actions.append_output(3, 0).unwrap();
        let entry = |cookie| OfpFlowStats {
            table_id: 0,
            match_field: OfpMatch::new(),
            duration_sec: 10,
            duration_nsec: 500,
            priority: OFP_DEFAULT_PRIORITY,
            idle_timeout: 60,
            hard_timeout: 0,
            cookie,
            packet_count: 12,
            byte_count: 768,
            actions: actions.clone(),
        };
        let reply = OfpStatsReply::new(0, StatsReplyBody::Flow(vec![entry(1), entry(2)]));
        let ser = serialized(&reply, 11);
        assert_eq!(12 + 2 * 96, ser.len());
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());

        // A trailing partial entry fails the walk.
        let mut truncated = ser.clone();
        truncated.truncate(ser.len() - 40);
        let length = truncated.len() as u16;
        NetworkEndian::write_u16(&mut truncated[2..4], length);
        assert!(match validate_message(&truncated) {
            Err(Error::InvalidBodyLength(_)) => true,
            _ => false,
        });
    }

    #[test]
    fn desc_stats_reply_roundtrip() {
        let desc = OfpDescStats::new("acme", "fast switch", "1.2", "sn-042", "lab dp").unwrap();
        let reply = OfpStatsReply::new(0, StatsReplyBody::Desc(desc));
        let ser = serialized(&reply, 12);
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());
    }

    #[test]
    fn error_message_code_must_fit_its_type() {
        let msg = OfpErrorMsg::new_hello_failed(OfpHelloFailedCode::Incompatible, "bad version");
        let mut ser = serialized(&msg, 13);
        assert!(validate_message(&ser).is_ok());
        ser[11] = 2; // one past OFPHFC_EPERM
        assert!(match validate_message(&ser) {
            Err(Error::InvalidErrorCode {
                error_type: 0,
                code: 2,
            }) => true,
            _ => false,
        });
    }

    #[test]
    fn queue_config_reply_roundtrip() {
        let reply = OfpQueueGetConfigReply {
            port: 4,
            queues: vec![
                OfpPacketQueue {
                    queue_id: 0,
                    properties: vec![OfpQueueProp::None],
                },
                OfpPacketQueue {
                    queue_id: 1,
                    properties: vec![OfpQueueProp::MinRate(100)],
                },
            ],
        };
        let ser = serialized(&reply, 14);
        assert_eq!(
            OfpMessage::QueueGetConfigReply(reply),
            validate_message(&ser).unwrap()
        );
    }

    #[test]
    fn undefined_queue_property_is_rejected() {
        let reply = OfpQueueGetConfigReply {
            port: 4,
            queues: vec![OfpPacketQueue {
                queue_id: 0,
                properties: vec![OfpQueueProp::None],
            }],
        };
        let mut ser = serialized(&reply, 15);
        ser[25] = 2; // one past OFPQT_MIN_RATE
        assert!(match validate_message(&ser) {
            Err(Error::UndefinedQueueProperty(2)) => true,
            _ => false,
        });
    }

    #[test]
    fn echo_roundtrip() {
        let req = OfpEchoRequest::new(vec![1, 2, 3, 4]);
        let ser = serialized(&req, 16);
        match validate_message(&ser).unwrap() {
            OfpMessage::EchoRequest(msg) => assert_eq!(vec![1, 2, 3, 4], msg.arbitrary()),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn flow_removed_roundtrip() {
        let msg = OfpFlowRemoved::new(
            OfpMatch::new(),
            0xfeed,
            OFP_DEFAULT_PRIORITY,
            OfpFlowRemovedReason::IdleTimeout,
            300,
            250,
            60,
            18,
            1200,
        ).unwrap();
        let ser = serialized(&msg, 17);
        assert_eq!(88, ser.len());
        assert_eq!(OfpMessage::FlowRemoved(msg), validate_message(&ser).unwrap());
    }

    #[test]
    fn flow_removed_reason_must_be_defined() {
        let msg = OfpFlowRemoved::new(
            OfpMatch::new(),
            0,
            OFP_DEFAULT_PRIORITY,
            OfpFlowRemovedReason::Delete,
            1,
            0,
            0,
            0,
            0,
        ).unwrap();
        let mut ser = serialized(&msg, 18);
        ser[58] = 3; // one past OFPRR_DELETE
        assert!(match validate_message(&ser) {
            Err(Error::InvalidFlowRemovedReason(3)) => true,
            _ => false,
        });
    }

    #[test]
    fn port_status_roundtrip() {
        let desc = OfpPhyPort::new(3, [2, 0, 0, 0, 0, 3], "Cedar").unwrap();
        let msg = OfpPortStatus::new(OfpPortReason::Add, desc);
        let ser = serialized(&msg, 19);
        assert_eq!(64, ser.len());
        assert_eq!(OfpMessage::PortStatus(msg), validate_message(&ser).unwrap());
    }

    #[test]
    fn port_status_reason_must_be_defined() {
        let desc = OfpPhyPort::new(3, [2, 0, 0, 0, 0, 3], "Cedar").unwrap();
        let msg = OfpPortStatus::new(OfpPortReason::Modify, desc);
        let mut ser = serialized(&msg, 20);
        ser[8] = 3; // one past OFPPR_MODIFY
        assert!(match validate_message(&ser) {
            Err(Error::InvalidPortStatusReason(3)) => true,
            _ => false,
        });
    }

    #[test]
    fn port_mod_roundtrip() {
        let msg = OfpPortMod::new(3, [2, 0, 0, 0, 0, 3], 1, 1, 0).unwrap();
        let ser = serialized(&msg, 21);
        assert_eq!(32, ser.len());
        assert_eq!(OfpMessage::PortMod(msg), validate_message(&ser).unwrap());
    }

    #[test]
    fn port_mod_rejects_a_reserved_port() {
        let msg = OfpPortMod::new(3, [2, 0, 0, 0, 0, 3], 0, 0, 0).unwrap();
        let mut ser = serialized(&msg, 22);
        ser[8] = 0xff;
        ser[9] = 0xff;
        assert!(match validate_message(&ser) {
            Err(Error::InvalidPortNo(OFPP_NONE)) => true,
            _ => false,
        });
    }

    #[test]
    fn vendor_roundtrip() {
        let msg = OfpVendor {
            vendor: 0x2320,
            data: vec![0xde, 0xad, 0xbe, 0xef],
        };
        let ser = serialized(&msg, 23);
        assert_eq!(16, ser.len());
        assert_eq!(OfpMessage::Vendor(msg), validate_message(&ser).unwrap());
    }

    #[test]
    fn vendor_requires_room_for_its_id() {
        let bytes = [1, 4, 0, 11, 0, 0, 0, 1, 0, 0, 0];
        assert!(match validate_message(&bytes) {
            Err(Error::InvalidLength {
                length: 11,
                min: 12,
                ..
            }) => true,
            _ => false,
        });
    }

    #[test]
    fn switch_config_roundtrips() {
        let reply = OfpGetConfigReply::new(OfpConfigFlags::FragDrop as u16, 128).unwrap();
        let ser = serialized(&reply, 24);
        assert_eq!(12, ser.len());
        assert_eq!(
            OfpMessage::GetConfigReply(reply),
            validate_message(&ser).unwrap()
        );

        let set = OfpSetConfig::new(OfpConfigFlags::FragNormal as u16, 0xffff).unwrap();
        let ser = serialized(&set, 25);
        assert_eq!(OfpMessage::SetConfig(set), validate_message(&ser).unwrap());
    }

    #[test]
    fn switch_config_flags_must_be_defined() {
        let reply = OfpGetConfigReply::new(OfpConfigFlags::FragReasm as u16, 128).unwrap();
        let mut ser = serialized(&reply, 26);
        ser[9] = 3; // one past OFPC_FRAG_REASM
        assert!(match validate_message(&ser) {
            Err(Error::InvalidSwitchConfigFlags(3)) => true,
            _ => false,
        });
    }

    #[test]
    fn barrier_roundtrips() {
        let ser = serialized(&OfpBarrierRequest, 27);
        assert_eq!(8, ser.len());
        assert_eq!(
            OfpMessage::BarrierRequest(OfpBarrierRequest),
            validate_message(&ser).unwrap()
        );
        let ser = serialized(&OfpBarrierReply, 28);
        assert_eq!(
            OfpMessage::BarrierReply(OfpBarrierReply),
            validate_message(&ser).unwrap()
        );
    }

    #[test]
    fn queue_config_request_roundtrip() {
        let req = OfpQueueGetConfigRequest::new(9).unwrap();
        let ser = serialized(&req, 29);
        assert_eq!(12, ser.len());
        assert_eq!(
            OfpMessage::QueueGetConfigRequest(req),
            validate_message(&ser).unwrap()
        );
    }

    #[test]
    fn queue_config_request_rejects_a_reserved_port() {
        let req = OfpQueueGetConfigRequest::new(9).unwrap();
        let mut ser = serialized(&req, 30);
        ser[8] = 0xff;
        ser[9] = 0;
        assert!(match validate_message(&ser) {
            Err(Error::InvalidPortNo(OFPP_MAX)) => true,
            _ => false,
        });
    }

    #[test]
    fn stats_request_body_roundtrips() {
        let bodies = vec![
            StatsRequestBody::Flow {
                match_field: OfpMatch::new(),
                table_id: 0xff,
                out_port: OFPP_NONE,
            },
            StatsRequestBody::Aggregate {
                match_field: OfpMatch::new(),
                table_id: 0,
                out_port: OFPP_NONE,
            },
            StatsRequestBody::Port { port_no: OFPP_NONE },
            StatsRequestBody::Queue {
                port_no: OFPP_ALL,
                queue_id: OFPQ_ALL,
            },
            StatsRequestBody::Vendor {
                vendor: 0x2320,
                data: vec![0xde, 0xad],
            },
        ];
        for body in bodies {
            let req = OfpStatsRequest::new(body).unwrap();
            let ser = serialized(&req, 31);
            assert_eq!(
                OfpMessage::StatsRequest(req),
                validate_message(&ser).unwrap()
            );
        }
    }

    #[test]
    fn table_stats_reply_roundtrip() {
        let table = OfpTableStats::new(0, "classifier", OFPFW_ALL, 1024, 2, 100, 80).unwrap();
        let reply = OfpStatsReply::new(0, StatsReplyBody::Table(vec![table]));
        let ser = serialized(&reply, 32);
        assert_eq!(12 + 64, ser.len());
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());
    }

    #[test]
    fn table_stats_reply_rejects_a_partial_entry() {
        let table = OfpTableStats::new(0, "classifier", OFPFW_ALL, 1024, 2, 100, 80).unwrap();
        let reply = OfpStatsReply::new(0, StatsReplyBody::Table(vec![table]));
        let mut ser = serialized(&reply, 33);
        ser.extend_from_slice(&[0; 8]);
        let length = ser.len() as u16;
        NetworkEndian::write_u16(&mut ser[2..4], length);
        assert!(match validate_message(&ser) {
            Err(Error::InvalidBodyLength(72)) => true,
            _ => false,
        });
    }

    #[test]
    fn port_stats_reply_roundtrip() {
        let entry = OfpPortStats {
            port_no: 1,
            rx_packets: 10,
            tx_packets: 20,
            rx_bytes: 640,
            tx_bytes: 1280,
            rx_dropped: 0,
            tx_dropped: 0,
            rx_errors: 1,
            tx_errors: 0,
            rx_frame_err: 0,
            rx_over_err: 0,
            rx_crc_err: 1,
            collisions: 0,
        };
        let reply = OfpStatsReply::new(0, StatsReplyBody::Port(vec![entry]));
        let ser = serialized(&reply, 34);
        assert_eq!(12 + 104, ser.len());
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());
    }

    #[test]
    fn queue_stats_reply_roundtrip() {
        let entry = OfpQueueStats {
            port_no: 1,
            queue_id: 0,
            tx_bytes: 512,
            tx_packets: 4,
            tx_errors: 0,
        };
        let reply = OfpStatsReply::new(0, StatsReplyBody::Queue(vec![entry]));
        let ser = serialized(&reply, 35);
        assert_eq!(12 + 32, ser.len());
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());
    }

    #[test]
    fn aggregate_stats_reply_roundtrip() {
        let reply = OfpStatsReply::new(
            0,
            StatsReplyBody::Aggregate {
                packet_count: 9,
                byte_count: 900,
                flow_count: 3,
            },
        );
        let ser = serialized(&reply, 36);
        assert_eq!(12 + 24, ser.len());
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());
    }

    #[test]
    fn vendor_stats_reply_roundtrip() {
        let reply = OfpStatsReply::new(
            0,
            StatsReplyBody::Vendor {
                vendor: 0x2320,
                data: vec![7, 7],
            },
        );
        let ser = serialized(&reply, 37);
        assert_eq!(OfpMessage::StatsReply(reply), validate_message(&ser).unwrap());
    }

    #[test]
    fn flow_stats_entries_with_a_concrete_match_need_the_top_priority() {
        let mut match_field = OfpMatch::new();
        match_field.wildcards &= !OFPFW_IN_PORT;
        match_field.in_port = 1;
        let entry = |priority| OfpFlowStats {
            table_id: 0,
            match_field: match_field.clone(),
            duration_sec: 1,
            duration_nsec: 0,
            priority,
            idle_timeout: 0,
            hard_timeout: 0,
            cookie: 0,
            packet_count: 0,
            byte_count: 0,
            actions: ActionList::new(),
        };
        let reply = OfpStatsReply::new(0, StatsReplyBody::Flow(vec![entry(0xffff)]));
        let ser = serialized(&reply, 38);
        assert!(validate_message(&ser).is_ok());

        let reply = OfpStatsReply::new(
            0,
            StatsReplyBody::Flow(vec![entry(OFP_DEFAULT_PRIORITY)]),
        );
        let ser = serialized(&reply, 38);
        assert!(match validate_message(&ser) {
            Err(Error::InvalidFlowPriority(OFP_DEFAULT_PRIORITY)) => true,
            _ => false,
        });
    }

    #[test]
    fn corrupting_the_type_byte_of_a_packet_in_fails_validation() {
        let msg = OfpPacketIn::new(OFP_NO_BUFFER, 64, 7, OfpPacketInReason::NoMatch, vec![0; 18])
            .unwrap();
        let mut ser = serialized(&msg, 39);
        ser[1] = 0xff;
        assert!(match validate_message(&ser) {
            Err(Error::UndefinedType(0xff)) => true,
            _ => false,
        });
    }
}
