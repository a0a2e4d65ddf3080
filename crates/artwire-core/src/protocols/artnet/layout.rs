//! Absolute byte positions inside an Art-Net datagram.

use std::ops::Range;

pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
pub const ARTNET_ID_RANGE: Range<usize> = 0..8;

pub const OP_CODE_RANGE: Range<usize> = 8..10;
pub const PROTOCOL_VERSION_RANGE: Range<usize> = 10..12;
pub const MIN_PACKET_LEN: usize = 14;
pub const MIN_PROTOCOL_VERSION: u16 = 14;

pub const OP_POLL: u16 = 0x0020;
pub const OP_POLL_REPLY: u16 = 0x0021;
pub const OP_DMX: u16 = 0x0050;

pub const POLL_FLAGS_OFFSET: usize = 12;
pub const POLL_PRIORITY_OFFSET: usize = 13;
pub const POLL_MIN_LEN: usize = POLL_PRIORITY_OFFSET + 1;

pub const POLL_FLAG_NOTIFY_ON_CHANGE: u8 = 1 << 1;
pub const POLL_FLAG_SEND_DIAGNOSTICS: u8 = 1 << 2;
pub const POLL_FLAG_DIAGNOSTICS_UNICAST: u8 = 1 << 3;
pub const POLL_FLAG_SEND_VLC: u8 = 1 << 4;

// ArtPollReply carries no protocol version; the IP starts right after the opcode.
pub const POLL_REPLY_IP_RANGE: Range<usize> = 10..14;
pub const POLL_REPLY_PORT_RANGE: Range<usize> = 14..16;
pub const POLL_REPLY_VERSION_RANGE: Range<usize> = 16..18;
pub const POLL_REPLY_OEM_RANGE: Range<usize> = 20..22;
pub const POLL_REPLY_NAME_RANGE: Range<usize> = 26..44;
pub const POLL_REPLY_LONG_NAME_RANGE: Range<usize> = 44..108;
pub const POLL_REPLY_STATUS_RANGE: Range<usize> = 108..172;
pub const POLL_REPLY_MIN_LEN: usize = POLL_REPLY_STATUS_RANGE.end;

pub const DMX_SEQUENCE_OFFSET: usize = 12;
pub const DMX_PHYSICAL_OFFSET: usize = 13;
pub const DMX_SUB_UNI_OFFSET: usize = 14;
pub const DMX_NET_OFFSET: usize = 15;
pub const DMX_LENGTH_RANGE: Range<usize> = 16..18;
pub const DMX_DATA_OFFSET: usize = 18;
pub const DMX_MAX_SLOTS: usize = 512;
