/*!
The action list codec.

An action list is a contiguous run of type-tagged, variable-length
records; the owning message declares the total byte length of the run
rather than a record count. Appends validate their argument domains at
call time so that a built list always encodes cleanly; decoding walks
the declared length exactly and rejects unknown record types instead of
skipping them.
*/

use byteorder::{ByteOrder, NetworkEndian, ReadBytesExt, WriteBytesExt};

use error::{Error, Result};
use messages::*;

use std::io;
use std::io::{Cursor, Write};

/// The 4-byte record header every action starts with.
const ACTION_HEADER_LENGTH: u16 = 4;

impl OfpAction {
    /// The wire type tag of this record.
    pub fn type_code(&self) -> u16 {
        match *self {
            OfpAction::Output { .. } => OfpActionType::Output as u16,
            OfpAction::SetVlanVid(_) => OfpActionType::SetVlanVid as u16,
            OfpAction::SetVlanPcp(_) => OfpActionType::SetVlanPcp as u16,
            OfpAction::StripVlan => OfpActionType::StripVlan as u16,
            OfpAction::SetDlSrc(_) => OfpActionType::SetDlSrc as u16,
            OfpAction::SetDlDst(_) => OfpActionType::SetDlDst as u16,
            OfpAction::SetNwSrc(_) => OfpActionType::SetNwSrc as u16,
            OfpAction::SetNwDst(_) => OfpActionType::SetNwDst as u16,
            OfpAction::SetNwTos(_) => OfpActionType::SetNwTos as u16,
            OfpAction::SetTpSrc(_) => OfpActionType::SetTpSrc as u16,
            OfpAction::SetTpDst(_) => OfpActionType::SetTpDst as u16,
            OfpAction::Enqueue { .. } => OfpActionType::Enqueue as u16,
            OfpAction::Vendor { .. } => OfpActionType::Vendor as u16,
        }
    }

    /// The total record length including the 4-byte header.
    pub fn length(&self) -> usize {
        match *self {
            OfpAction::SetDlSrc(_) | OfpAction::SetDlDst(_) | OfpAction::Enqueue { .. } => 16,
            OfpAction::Vendor { ref body, .. } => 8 + body.len(),
            _ => 8,
        }
    }

    /// Serializes one record with network byte order.
    pub fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_u16::<NetworkEndian>(self.type_code())?;
        stream.write_u16::<NetworkEndian>(self.length() as u16)?;
        match *self {
            OfpAction::Output { port, max_len } => {
                stream.write_u16::<NetworkEndian>(port)?;
                stream.write_u16::<NetworkEndian>(max_len)
            }
            OfpAction::SetVlanVid(vid) => {
                stream.write_u16::<NetworkEndian>(vid)?;
                stream.write_all(&[0; 2])
            }
            OfpAction::SetVlanPcp(pcp) => stream.write_all(&[pcp, 0, 0, 0]),
            OfpAction::StripVlan => stream.write_all(&[0; 4]),
            OfpAction::SetDlSrc(ref addr) | OfpAction::SetDlDst(ref addr) => {
                stream.write_all(addr)?;
                stream.write_all(&[0; 6])
            }
            OfpAction::SetNwSrc(addr) | OfpAction::SetNwDst(addr) => {
                stream.write_u32::<NetworkEndian>(addr)
            }
            OfpAction::SetNwTos(tos) => stream.write_all(&[tos, 0, 0, 0]),
            OfpAction::SetTpSrc(port) | OfpAction::SetTpDst(port) => {
                stream.write_u16::<NetworkEndian>(port)?;
                stream.write_all(&[0; 2])
            }
            OfpAction::Enqueue { port, queue_id } => {
                stream.write_u16::<NetworkEndian>(port)?;
                stream.write_all(&[0; 6])?;
                stream.write_u32::<NetworkEndian>(queue_id)
            }
            OfpAction::Vendor { vendor, ref body } => {
                stream.write_u32::<NetworkEndian>(vendor)?;
                stream.write_all(body)
            }
        }
    }
}

impl ActionList {
    /// Constructs an empty action list.
    pub fn new() -> ActionList {
        ActionList { actions: vec![] }
    }

    /// Gets the appended records in order.
    pub fn actions(&self) -> &[OfpAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The encoded byte length of the whole list. Fails when the sum
    /// no longer fits the 16-bit length field of the owning message.
    pub fn length(&self) -> Result<u16> {
        let total: usize = self.actions.iter().map(|a| a.length()).sum();
        if total > usize::from(u16::max_value()) {
            return Err(Error::TooManyActions);
        }
        Ok(total as u16)
    }

    /// Serializes each record in append order.
    pub fn serialize<S: Write>(&self, stream: &mut S) -> io::Result<()> {
        for action in &self.actions {
            action.serialize(stream)?;
        }
        Ok(())
    }

    /// Appends an output action. The port must be sendable, so
    /// `OFPP_NONE` is rejected along with out-of-range numbers.
    pub fn append_output(&mut self, port: u16, max_len: u16) -> Result<()> {
        if !port_no_valid(port) {
            return Err(Error::InvalidPortNo(port));
        }
        self.actions.push(OfpAction::Output { port, max_len });
        Ok(())
    }

    /// Appends a set VLAN id action; the id must fit 12 bits.
    pub fn append_set_vlan_vid(&mut self, vid: u16) -> Result<()> {
        if vid > 4095 {
            return Err(Error::InvalidVlanVid(vid));
        }
        self.actions.push(OfpAction::SetVlanVid(vid));
        Ok(())
    }

    /// Appends a set VLAN priority action; the priority must fit 3 bits.
    pub fn append_set_vlan_pcp(&mut self, pcp: u8) -> Result<()> {
        if pcp > 7 {
            return Err(Error::InvalidVlanPcp(pcp));
        }
        self.actions.push(OfpAction::SetVlanPcp(pcp));
        Ok(())
    }

    pub fn append_strip_vlan(&mut self) {
        self.actions.push(OfpAction::StripVlan);
    }

    pub fn append_set_dl_src(&mut self, addr: [u8; 6]) {
        self.actions.push(OfpAction::SetDlSrc(addr));
    }

    pub fn append_set_dl_dst(&mut self, addr: [u8; 6]) {
        self.actions.push(OfpAction::SetDlDst(addr));
    }

    pub fn append_set_nw_src(&mut self, addr: u32) {
        self.actions.push(OfpAction::SetNwSrc(addr));
    }

    pub fn append_set_nw_dst(&mut self, addr: u32) {
        self.actions.push(OfpAction::SetNwDst(addr));
    }

    /// Appends a set IP ToS action; only the six DSCP bits may be set.
    pub fn append_set_nw_tos(&mut self, tos: u8) -> Result<()> {
        if tos & 0x03 != 0 {
            return Err(Error::InvalidNwTos(tos));
        }
        self.actions.push(OfpAction::SetNwTos(tos));
        Ok(())
    }

    pub fn append_set_tp_src(&mut self, port: u16) {
        self.actions.push(OfpAction::SetTpSrc(port));
    }

    pub fn append_set_tp_dst(&mut self, port: u16) {
        self.actions.push(OfpAction::SetTpDst(port));
    }

    /// Appends an enqueue action. The port must refer to a valid
    /// physical port or `OFPP_IN_PORT`.
    pub fn append_enqueue(&mut self, port: u16, queue_id: u32) -> Result<()> {
        if !(port != 0 && port <= OFPP_MAX || port == OFPP_IN_PORT) {
            return Err(Error::InvalidPortNo(port));
        }
        self.actions.push(OfpAction::Enqueue { port, queue_id });
        Ok(())
    }

    /// Appends a vendor action. The record must stay 64-bit aligned, so
    /// the body length has to be a multiple of 8.
    pub fn append_vendor(&mut self, vendor: u32, body: Vec<u8>) -> Result<()> {
        if body.len() % 8 != 0 {
            return Err(Error::InvalidActionLength {
                action_type: OfpActionType::Vendor as u16,
                length: (8 + body.len()) as u16,
            });
        }
        self.actions.push(OfpAction::Vendor { vendor, body });
        Ok(())
    }
}

fn expected_length(action_type: u16) -> Option<u16> {
    match action_type {
        t if t == OfpActionType::SetDlSrc as u16
            || t == OfpActionType::SetDlDst as u16
            || t == OfpActionType::Enqueue as u16 =>
        {
            Some(16)
        }
        t if t <= OfpActionType::SetTpDst as u16 => Some(8),
        _ => None,
    }
}

/// Decodes one record body whose length has already been checked.
fn deserialize_action(action_type: u16, length: u16, body: &[u8]) -> Result<OfpAction> {
    let mut bytes = Cursor::new(body);
    let action = match action_type {
        t if t == OfpActionType::Output as u16 => {
            let port = bytes.read_u16::<NetworkEndian>()?;
            if !port_no_valid(port) {
                return Err(Error::InvalidPortNo(port));
            }
            OfpAction::Output {
                port,
                max_len: bytes.read_u16::<NetworkEndian>()?,
            }
        }
        t if t == OfpActionType::SetVlanVid as u16 => {
            let vid = bytes.read_u16::<NetworkEndian>()?;
            if vid > 4095 {
                return Err(Error::InvalidVlanVid(vid));
            }
            OfpAction::SetVlanVid(vid)
        }
        t if t == OfpActionType::SetVlanPcp as u16 => {
            let pcp = bytes.read_u8()?;
            if pcp > 7 {
                return Err(Error::InvalidVlanPcp(pcp));
            }
            OfpAction::SetVlanPcp(pcp)
        }
        t if t == OfpActionType::StripVlan as u16 => OfpAction::StripVlan,
        t if t == OfpActionType::SetDlSrc as u16 || t == OfpActionType::SetDlDst as u16 => {
            let mut addr = [0; 6];
            addr.copy_from_slice(&body[0..6]);
            if t == OfpActionType::SetDlSrc as u16 {
                OfpAction::SetDlSrc(addr)
            } else {
                OfpAction::SetDlDst(addr)
            }
        }
        t if t == OfpActionType::SetNwSrc as u16 => {
            OfpAction::SetNwSrc(bytes.read_u32::<NetworkEndian>()?)
        }
        t if t == OfpActionType::SetNwDst as u16 => {
            OfpAction::SetNwDst(bytes.read_u32::<NetworkEndian>()?)
        }
        t if t == OfpActionType::SetNwTos as u16 => {
            let tos = bytes.read_u8()?;
            if tos & 0x03 != 0 {
                return Err(Error::InvalidNwTos(tos));
            }
            OfpAction::SetNwTos(tos)
        }
        t if t == OfpActionType::SetTpSrc as u16 => {
            OfpAction::SetTpSrc(bytes.read_u16::<NetworkEndian>()?)
        }
        t if t == OfpActionType::SetTpDst as u16 => {
            OfpAction::SetTpDst(bytes.read_u16::<NetworkEndian>()?)
        }
        t if t == OfpActionType::Enqueue as u16 => {
            let port = bytes.read_u16::<NetworkEndian>()?;
            if !(port != 0 && port <= OFPP_MAX || port == OFPP_IN_PORT) {
                return Err(Error::InvalidPortNo(port));
            }
            OfpAction::Enqueue {
                port,
                queue_id: NetworkEndian::read_u32(&body[8..12]),
            }
        }
        t if t == OfpActionType::Vendor as u16 => {
            if length % 8 != 0 {
                return Err(Error::InvalidActionLength {
                    action_type,
                    length,
                });
            }
            OfpAction::Vendor {
                vendor: bytes.read_u32::<NetworkEndian>()?,
                body: body[4..].to_vec(),
            }
        }
        _ => return Err(Error::UndefinedActionType(action_type)),
    };
    Ok(action)
}

/// Walks a declared-length action tail. The slice must be consumed
/// exactly: a record overrunning the end or trailing bytes too short
/// for a record header are sub-record failures, never silently dropped.
pub fn deserialize_actions(bytes: &[u8]) -> Result<ActionList> {
    let mut list = ActionList::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        if rest.len() < ACTION_HEADER_LENGTH as usize {
            return Err(Error::InvalidBodyLength(rest.len()));
        }
        let action_type = NetworkEndian::read_u16(&rest[0..2]);
        let length = NetworkEndian::read_u16(&rest[2..4]);
        if length < ACTION_HEADER_LENGTH || length as usize > rest.len() {
            return Err(Error::InvalidActionLength {
                action_type,
                length,
            });
        }
        match expected_length(action_type) {
            Some(expected) if expected != length => {
                return Err(Error::InvalidActionLength {
                    action_type,
                    length,
                });
            }
            Some(_) => {}
            None if action_type == OfpActionType::Vendor as u16 => {
                if length < 8 {
                    return Err(Error::InvalidActionLength {
                        action_type,
                        length,
                    });
                }
            }
            None => return Err(Error::UndefinedActionType(action_type)),
        }
        let action = deserialize_action(action_type, length, &rest[4..length as usize])?;
        list.actions.push(action);
        rest = &rest[length as usize..];
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> ActionList {
        let mut list = ActionList::new();
        list.append_set_vlan_vid(42).unwrap();
        list.append_set_dl_dst([2, 0, 0, 0, 0, 9]);
        list.append_enqueue(3, 7).unwrap();
        list.append_output(OFPP_CONTROLLER, 128).unwrap();
        list
    }

    #[test]
    fn appends_preserve_order_and_length() {
        let list = sample_list();
        assert_eq!(4, list.actions().len());
        assert_eq!(8 + 16 + 16 + 8, list.length().unwrap());
    }

    #[test]
    fn append_validates_argument_domains() {
        let mut list = ActionList::new();
        assert!(match list.append_set_vlan_vid(4096) {
            Err(Error::InvalidVlanVid(4096)) => true,
            _ => false,
        });
        assert!(match list.append_set_vlan_pcp(8) {
            Err(Error::InvalidVlanPcp(8)) => true,
            _ => false,
        });
        assert!(match list.append_set_nw_tos(0x01) {
            Err(Error::InvalidNwTos(_)) => true,
            _ => false,
        });
        assert!(match list.append_output(OFPP_NONE, 0) {
            Err(Error::InvalidPortNo(_)) => true,
            _ => false,
        });
        assert!(match list.append_enqueue(OFPP_FLOOD, 0) {
            Err(Error::InvalidPortNo(_)) => true,
            _ => false,
        });
        assert!(match list.append_vendor(0x2320, vec![0; 3]) {
            Err(Error::InvalidActionLength { .. }) => true,
            _ => false,
        });
        assert!(list.is_empty());
    }

    #[test]
    fn action_list_roundtrip() {
        let list = sample_list();
        let mut ser = vec![];
        list.serialize(&mut ser).unwrap();
        assert_eq!(usize::from(list.length().unwrap()), ser.len());
        assert_eq!(list, deserialize_actions(&ser).unwrap());
    }

    #[test]
    fn exact_consumption_is_enforced() {
        let list = sample_list();
        let mut ser = vec![];
        list.serialize(&mut ser).unwrap();

        // One byte short: the final record overruns the tail.
        assert!(deserialize_actions(&ser[..ser.len() - 1]).is_err());

        // One declared byte too many: a dangling byte cannot hold a
        // record header.
        let mut padded = ser.clone();
        padded.push(0);
        assert!(match deserialize_actions(&padded) {
            Err(Error::InvalidBodyLength(1)) => true,
            _ => false,
        });
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let mut ser = vec![];
        OfpAction::StripVlan.serialize(&mut ser).unwrap();
        ser[1] = 12; // one past OFPAT_ENQUEUE
        assert!(match deserialize_actions(&ser) {
            Err(Error::UndefinedActionType(12)) => true,
            _ => false,
        });
    }

    #[test]
    fn record_length_must_match_its_type() {
        let mut ser = vec![];
        OfpAction::SetNwSrc(1).serialize(&mut ser).unwrap();
        ser[3] = 12; // claims 12 bytes for a fixed 8-byte record
        assert!(match deserialize_actions(&ser) {
            Err(Error::InvalidActionLength { .. }) => true,
            _ => false,
        });
    }

    #[test]
    fn overflowing_list_fails_loudly() {
        let mut list = ActionList::new();
        for _ in 0..8192 {
            list.append_output(1, 0).unwrap();
        }
        assert!(match list.length() {
            Err(Error::TooManyActions) => true,
            _ => false,
        });
    }
}
