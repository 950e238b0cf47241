/*!
An OpenFlow 1.0 wire message codec and validator.

The crate turns typed, in-memory representations of OpenFlow 1.0
control-plane messages into network-byte-order wire buffers and inspects
inbound wire buffers for structural and semantic correctness before any
higher layer trusts their contents.

It deliberately owns nothing else: the transport layer that frames raw
bytes on a TCP connection, the event dispatch that routes decoded
messages to callbacks, and the classification of raw Ethernet frames all
live in the calling application. They interact with this crate through
byte slices, the `messages::OfpMessage` union, and the opaque
`packet::PacketInfo` record.
*/

#[macro_use]
extern crate log;
extern crate byteorder;

pub mod error;
pub mod messages;
pub mod packet;
pub mod xid;
