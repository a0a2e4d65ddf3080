//! Art-Net protocol decoding.
//!
//! The header is validated first (signature, minimum size, protocol version
//! 14 or newer), then the opcode selects one of three payload decoders:
//! ArtPoll, ArtPollReply or ArtDMX. Every fixed-offset read goes through
//! `reader`, so short datagrams surface as `TruncatedPacket` instead of
//! reading past the buffer.
//!
//! Byte positions live in `layout`. Decoders are pure; the only shared state
//! is an optional, caller-supplied `SequenceTracker`.

pub mod dmx;
pub mod error;
pub mod header;
pub mod layout;
pub mod parser;
pub mod poll;
pub mod poll_reply;
pub mod reader;

pub use parser::{decode, decode_buffer, decode_tracked};
