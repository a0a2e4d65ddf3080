//! Art-Net datagram decoding.
//!
//! The decoder validates the `Art-Net\0` header, rejects protocol versions
//! older than 14 and dispatches on the opcode to one of three payload
//! decoders: ArtPoll, ArtPollReply and ArtDMX. The result is an immutable
//! [`Packet`] whose payload is a sum type, plus 1-based channel accessors for
//! DMX data.
//!
//! Decoding is byte-oriented and free of I/O. Receiving datagrams is left to
//! the caller; the `source` and `replay` modules only read capture files.
//! Decoders emit `tracing` events at `debug`/`trace` level and never install
//! a subscriber.
//!
//! Invariants:
//! - ArtDMX `length` never exceeds 512; larger values are rejected.
//! - Every fixed-offset read is bounds-checked (`TruncatedPacket`).
//! - Sequence tracking across calls only happens through an explicit
//!   [`SequenceTracker`].
//!
//! # Examples
//! ```
//! use std::net::SocketAddr;
//!
//! use artwire_core::decode;
//!
//! let mut datagram = b"Art-Net\0".to_vec();
//! datagram.extend_from_slice(&[0x00, 0x50, 0x00, 0x0e, 5, 1, 0x00, 0x01, 0x00, 0x02, 0x10, 0x20]);
//! let source: SocketAddr = "10.0.0.7:6454".parse()?;
//!
//! let packet = decode(&datagram, source)?;
//! assert_eq!(packet.channel(1)?, Some(0x10));
//! assert_eq!(packet.channels_as_joined_string(1, 3, " ")?, "16 32 0");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod packet;
mod protocols;
mod replay;
mod report;
mod sequence;
mod source;

pub use packet::{ChannelData, ChannelError, OpCode, Packet, Payload, PollInfo, PollReplyInfo};
pub use protocols::artnet::error::{ArtNetError, DecodeError};
pub use protocols::artnet::layout::{DMX_MAX_SLOTS, MIN_PROTOCOL_VERSION};
pub use protocols::artnet::{decode, decode_buffer, decode_tracked};
pub use replay::{ARTNET_PORT, PortFilter, ReplayError, replay_pcap_file, replay_source};
pub use report::{
    DEFAULT_GENERATED_AT, InputInfo, PacketRecord, REPORT_VERSION, RecordOutcome, ReplayReport,
    ReplaySummary, ToolInfo, ts_to_rfc3339,
};
pub use sequence::SequenceTracker;
pub use source::udp::{UdpDatagram, UdpError, parse_udp_datagram};
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
