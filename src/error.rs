/*!
The validation failure taxonomy and the wire error-code translator.

Every builder and validator in this crate reports the specific kind of
failure to its immediate caller as an `Error` value. Nothing in here is
used for control flow across module boundaries other than `Result`
propagation, and no component ever substitutes a default value for an
invalid field.

`map_error` is the only place that turns an internal failure kind into
the `(error type, error code)` pair an OpenFlow `OFPT_ERROR` reply
carries on the wire.
*/

use messages::*;

use std::error;
use std::fmt;
use std::io;
use std::result;

/// Every way a wire buffer or a builder argument can be rejected.
#[derive(Debug)]
pub enum Error {
    /// A stream error while writing a message.
    Io(io::Error),

    /* Structural failures. */
    /// The header's version byte is not `OFP_VERSION`.
    UnsupportedVersion(u8),
    /// The header's type byte is above the highest defined message type.
    UndefinedType(u8),
    /// The header's type byte does not match what the caller expected.
    TypeMismatch { expected: u8, actual: u8 },
    /// The declared length lies outside the type's `[min, max]` range.
    InvalidLength { length: u16, min: u16, max: u16 },
    /// The buffer is shorter than the header declares.
    TooShortMessage { declared: usize, actual: usize },
    /// The buffer is longer than the header declares.
    TooLongMessage { declared: usize, actual: usize },
    /// A fixed-shape body or repeated-record tail has an impossible size.
    InvalidBodyLength(usize),

    /* Field-domain failures. */
    /// Wildcard bits set outside the defined 22-bit range.
    InvalidWildcards(u32),
    /// A VLAN id above 4095 that is not the "no VLAN" sentinel.
    InvalidVlanVid(u16),
    /// A VLAN priority above 7.
    InvalidVlanPcp(u8),
    /// An IP ToS value with the two low (non-DSCP) bits set.
    InvalidNwTos(u8),
    /// A port number of zero, or above `OFPP_MAX` without being one of
    /// the defined reserved ports.
    InvalidPortNo(u16),
    InvalidPacketInReason(u8),
    InvalidFlowRemovedReason(u8),
    InvalidPortStatusReason(u8),
    InvalidFlowModCommand(u16),
    InvalidFlowModFlags(u16),
    InvalidSwitchConfigFlags(u16),
    InvalidFlowPriority(u16),
    /// A stats type inside the 16-bit range but not one of the defined
    /// request/reply kinds.
    UnsupportedStatsType(u16),
    InvalidErrorType(u16),
    InvalidErrorCode { error_type: u16, code: u16 },

    /* Sub-record failures. */
    /// An action type that is neither a defined action nor the vendor tag.
    UndefinedActionType(u16),
    /// An action record whose declared length is inconsistent with its
    /// type's fixed or minimum size, or which overruns the list tail.
    InvalidActionLength { action_type: u16, length: u16 },
    UndefinedQueueProperty(u16),
    InvalidQueuePropertyLength { property: u16, length: u16 },

    /* Argument-domain failures (builder side). */
    /// An action list whose encoded size exceeds the 16-bit length field.
    TooManyActions,
    /// A packet-out without a buffer id needs a caller-supplied frame.
    MissingPacketData,
    /// A caller-supplied frame below the minimum Ethernet frame length.
    TooShortFrame(usize),
    /// A fixed-width name field cannot hold the supplied string.
    NameTooLong(usize),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = result::Result<T, Error>;

fn structural(kind: &Error) -> Option<(u16, u16)> {
    let bad_request = OfpErrorType::BadRequest as u16;
    match *kind {
        Error::UnsupportedVersion(_) => {
            Some((bad_request, OfpBadRequestCode::BadVersion as u16))
        }
        Error::UndefinedType(_) | Error::TypeMismatch { .. } => {
            Some((bad_request, OfpBadRequestCode::BadType as u16))
        }
        Error::InvalidLength { .. }
        | Error::TooShortMessage { .. }
        | Error::TooLongMessage { .. }
        | Error::InvalidBodyLength(_) => Some((bad_request, OfpBadRequestCode::BadLen as u16)),
        Error::UnsupportedStatsType(_) => {
            Some((bad_request, OfpBadRequestCode::BadStat as u16))
        }
        _ => None,
    }
}

fn bad_action(kind: &Error) -> Option<(u16, u16)> {
    let bad_action = OfpErrorType::BadAction as u16;
    match *kind {
        Error::UndefinedActionType(_) => Some((bad_action, OfpBadActionCode::BadType as u16)),
        Error::InvalidActionLength { .. } => Some((bad_action, OfpBadActionCode::BadLen as u16)),
        Error::InvalidPortNo(_) => Some((bad_action, OfpBadActionCode::BadOutPort as u16)),
        Error::InvalidVlanVid(_) | Error::InvalidVlanPcp(_) | Error::InvalidNwTos(_) => {
            Some((bad_action, OfpBadActionCode::BadArgument as u16))
        }
        Error::TooManyActions => Some((bad_action, OfpBadActionCode::TooMany as u16)),
        _ => None,
    }
}

/// Maps an internal validation failure to the `(error type, error code)`
/// pair an OpenFlow error reply must carry, per originating message type.
///
/// An unknown `msg_type` always maps to bad request / bad type. A failure
/// kind with no defined mapping for an otherwise-known message type yields
/// `None`; callers must treat that as "no mapping available" rather than
/// guess a pair.
pub fn map_error(msg_type: u8, kind: &Error) -> Option<(u16, u16)> {
    if msg_type > OFPT_MAX {
        return Some((
            OfpErrorType::BadRequest as u16,
            OfpBadRequestCode::BadType as u16,
        ));
    }
    let common = structural(kind);
    match msg_type {
        t if t == OfpType::FlowMod as u8 => common.or_else(|| bad_action(kind)).or_else(|| {
            match *kind {
                Error::InvalidFlowModCommand(_) => Some((
                    OfpErrorType::FlowModFailed as u16,
                    OfpFlowModFailedCode::BadCommand as u16,
                )),
                Error::InvalidFlowModFlags(_) => Some((
                    OfpErrorType::FlowModFailed as u16,
                    OfpFlowModFailedCode::Unsupported as u16,
                )),
                _ => None,
            }
        }),
        t if t == OfpType::PacketOut as u8 => common.or_else(|| bad_action(kind)),
        t if t == OfpType::PortMod as u8 => common.or_else(|| match *kind {
            Error::InvalidPortNo(_) => Some((
                OfpErrorType::PortModFailed as u16,
                OfpPortModFailedCode::BadPort as u16,
            )),
            _ => None,
        }),
        t if t == OfpType::QueueGetConfigRequest as u8
            || t == OfpType::QueueGetConfigReply as u8 =>
        {
            common.or_else(|| match *kind {
                Error::InvalidPortNo(_) => Some((
                    OfpErrorType::QueueOpFailed as u16,
                    OfpQueueOpFailedCode::BadPort as u16,
                )),
                Error::UndefinedQueueProperty(_)
                | Error::InvalidQueuePropertyLength { .. } => Some((
                    OfpErrorType::QueueOpFailed as u16,
                    OfpQueueOpFailedCode::BadQueue as u16,
                )),
                _ => None,
            })
        }
        t if t == OfpType::Vendor as u8 => common.or_else(|| match *kind {
            Error::InvalidBodyLength(_) => Some((
                OfpErrorType::BadRequest as u16,
                OfpBadRequestCode::BadVendor as u16,
            )),
            _ => None,
        }),
        t if t == OfpType::StatsRequest as u8 || t == OfpType::StatsReply as u8 => {
            common.or_else(|| bad_action(kind))
        }
        _ => common,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_message_type_maps_to_bad_type() {
        let kind = Error::InvalidVlanVid(0x2000);
        let pair = map_error(0xff, &kind);
        assert_eq!(
            Some((
                OfpErrorType::BadRequest as u16,
                OfpBadRequestCode::BadType as u16
            )),
            pair
        );
    }

    #[test]
    fn flow_mod_command_maps_to_flow_mod_failed() {
        let kind = Error::InvalidFlowModCommand(6);
        let pair = map_error(OfpType::FlowMod as u8, &kind);
        assert_eq!(
            Some((
                OfpErrorType::FlowModFailed as u16,
                OfpFlowModFailedCode::BadCommand as u16
            )),
            pair
        );
    }

    #[test]
    fn action_failures_map_per_originating_type() {
        let kind = Error::UndefinedActionType(12);
        let pair = map_error(OfpType::PacketOut as u8, &kind);
        assert_eq!(
            Some((
                OfpErrorType::BadAction as u16,
                OfpBadActionCode::BadType as u16
            )),
            pair
        );
    }

    #[test]
    fn unmapped_kind_is_reported_not_defaulted() {
        // A packet-in reason failure has no wire pair when the nominal
        // originator is a barrier reply.
        let kind = Error::InvalidPacketInReason(9);
        assert_eq!(None, map_error(OfpType::BarrierReply as u8, &kind));
    }

    #[test]
    fn structural_failures_map_to_bad_request() {
        let kind = Error::TooShortMessage {
            declared: 100,
            actual: 60,
        };
        let pair = map_error(OfpType::Hello as u8, &kind);
        assert_eq!(
            Some((
                OfpErrorType::BadRequest as u16,
                OfpBadRequestCode::BadLen as u16
            )),
            pair
        );
    }
}
