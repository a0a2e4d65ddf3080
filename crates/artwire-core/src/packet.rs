//! Decoded packets and read-only views over their DMX channels.
//!
//! Channel positions are 1-based in this API: channel `n` is byte `n - 1` of
//! the universe. Only the first `length` channels came off the wire; the rest
//! of the 512-slot buffer reads as zero.

use std::fmt;
use std::net::SocketAddr;
use std::ops::Range;

use thiserror::Error;

use crate::protocols::artnet::layout;
pub use crate::protocols::artnet::poll::PollInfo;
pub use crate::protocols::artnet::poll_reply::PollReplyInfo;

/// Art-Net operation carried by a datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Poll,
    PollReply,
    ChannelData,
    Unknown(u16),
}

impl OpCode {
    pub fn from_u16(value: u16) -> Self {
        match value {
            layout::OP_POLL => OpCode::Poll,
            layout::OP_POLL_REPLY => OpCode::PollReply,
            layout::OP_DMX => OpCode::ChannelData,
            other => OpCode::Unknown(other),
        }
    }

    pub fn value(self) -> u16 {
        match self {
            OpCode::Poll => layout::OP_POLL,
            OpCode::PollReply => layout::OP_POLL_REPLY,
            OpCode::ChannelData => layout::OP_DMX,
            OpCode::Unknown(value) => value,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OpCode::Poll => "poll",
            OpCode::PollReply => "poll_reply",
            OpCode::ChannelData => "channel_data",
            OpCode::Unknown(_) => "unknown",
        }
    }
}

/// Opcode-specific content of a packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Poll(PollInfo),
    PollReply(PollReplyInfo),
    ChannelData(ChannelData),
    /// No payload was decoded (only seen on partial packets).
    Unknown,
}

/// Errors from the channel accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel {index} is outside 1..=512")]
    OutOfRange { index: usize },
    #[error("channels {from}..+{amount} run outside 1..=512")]
    RangeOutOfBounds { from: usize, amount: usize },
}

/// DMX data from an ArtDMX packet.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelData {
    sequence: u8,
    physical_port: u8,
    port_address: u16,
    length: u16,
    channels: [u8; layout::DMX_MAX_SLOTS],
}

impl ChannelData {
    pub(crate) fn new(
        sequence: u8,
        physical_port: u8,
        port_address: u16,
        length: u16,
        channels: [u8; layout::DMX_MAX_SLOTS],
    ) -> Self {
        Self {
            sequence,
            physical_port,
            port_address,
            length,
            channels,
        }
    }

    /// Sender sequence number; wraps at 256 and may skip values.
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn physical_port(&self) -> u8 {
        self.physical_port
    }

    /// Net in the high byte, sub-net/universe in the low byte.
    pub fn port_address(&self) -> u16 {
        self.port_address
    }

    /// Number of channels present on the wire (0..=512).
    pub fn length(&self) -> u16 {
        self.length
    }

    /// The channels that were actually transmitted.
    pub fn valid_channels(&self) -> &[u8] {
        &self.channels[..self.length as usize]
    }

    /// The whole universe buffer, including slots past `length`.
    pub fn buffer(&self) -> &[u8; layout::DMX_MAX_SLOTS] {
        &self.channels
    }

    /// Value of 1-based channel `n`.
    ///
    /// # Examples
    /// ```
    /// use std::net::SocketAddr;
    ///
    /// use artwire_core::decode;
    ///
    /// let mut datagram = b"Art-Net\0".to_vec();
    /// datagram.extend_from_slice(&[0x00, 0x50, 0x00, 0x0e, 1, 0, 0, 0, 0x00, 0x02, 10, 20]);
    /// let source: SocketAddr = "10.0.0.1:6454".parse()?;
    /// let packet = decode(&datagram, source)?;
    /// let dmx = packet.channel_data().expect("ArtDMX");
    ///
    /// assert_eq!(dmx.channel(2)?, 20);
    /// assert_eq!(dmx.channel(3)?, 0);
    /// assert!(dmx.channel(0).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn channel(&self, n: usize) -> Result<u8, ChannelError> {
        if !(1..=layout::DMX_MAX_SLOTS).contains(&n) {
            return Err(ChannelError::OutOfRange { index: n });
        }
        Ok(self.channels[n - 1])
    }

    /// `amount` consecutive channels starting at 1-based `from`.
    pub fn channels_as_list(&self, from: usize, amount: usize) -> Result<&[u8], ChannelError> {
        let range = slot_range(from, amount)?;
        Ok(&self.channels[range])
    }

    pub fn channels_as_strings(
        &self,
        from: usize,
        amount: usize,
    ) -> Result<Vec<String>, ChannelError> {
        Ok(self
            .channels_as_list(from, amount)?
            .iter()
            .map(|value| value.to_string())
            .collect())
    }

    pub fn channels_as_joined_string(
        &self,
        from: usize,
        amount: usize,
        delimiter: &str,
    ) -> Result<String, ChannelError> {
        Ok(self.channels_as_strings(from, amount)?.join(delimiter))
    }
}

impl fmt::Debug for ChannelData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelData")
            .field("sequence", &self.sequence)
            .field("physical_port", &self.physical_port)
            .field("port_address", &self.port_address)
            .field("length", &self.length)
            .field("channels", &self.valid_channels())
            .finish()
    }
}

fn slot_range(from: usize, amount: usize) -> Result<Range<usize>, ChannelError> {
    let out_of_bounds = ChannelError::RangeOutOfBounds { from, amount };
    if !(1..=layout::DMX_MAX_SLOTS).contains(&from) {
        return Err(out_of_bounds);
    }
    let start = from - 1;
    let end = start.checked_add(amount).ok_or(out_of_bounds.clone())?;
    if end > layout::DMX_MAX_SLOTS {
        return Err(out_of_bounds);
    }
    Ok(start..end)
}

/// One decoded Art-Net datagram.
///
/// Built only by the decoder and never modified afterwards; the payload
/// variant always matches the opcode.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    source: SocketAddr,
    opcode: OpCode,
    protocol_version: u16,
    payload: Payload,
}

impl Packet {
    /// Packet for a datagram whose header could not be read.
    pub(crate) fn unread(source: SocketAddr) -> Self {
        Self::partial(source, OpCode::Unknown(0), 0)
    }

    pub(crate) fn partial(source: SocketAddr, opcode: OpCode, protocol_version: u16) -> Self {
        Self {
            source,
            opcode,
            protocol_version,
            payload: Payload::Unknown,
        }
    }

    pub(crate) fn with_payload(self, payload: Payload) -> Self {
        Self { payload, ..self }
    }

    pub fn source(&self) -> SocketAddr {
        self.source
    }

    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Zero when the header was never read.
    pub fn protocol_version(&self) -> u16 {
        self.protocol_version
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn poll(&self) -> Option<&PollInfo> {
        match &self.payload {
            Payload::Poll(poll) => Some(poll),
            _ => None,
        }
    }

    pub fn poll_reply(&self) -> Option<&PollReplyInfo> {
        match &self.payload {
            Payload::PollReply(reply) => Some(reply),
            _ => None,
        }
    }

    pub fn channel_data(&self) -> Option<&ChannelData> {
        match &self.payload {
            Payload::ChannelData(data) => Some(data),
            _ => None,
        }
    }

    pub fn has_channel_data(&self) -> bool {
        self.channel_data().is_some()
    }

    /// Sequence number of an ArtDMX packet.
    pub fn sequence(&self) -> Option<u8> {
        self.channel_data().map(ChannelData::sequence)
    }

    /// Value of 1-based channel `n`, or `None` when the packet has no
    /// channel data.
    ///
    /// # Errors
    /// `n` outside 1..=512 is a caller bug and reported as
    /// `ChannelError::OutOfRange`, with or without channel data.
    pub fn channel(&self, n: usize) -> Result<Option<u8>, ChannelError> {
        if !(1..=layout::DMX_MAX_SLOTS).contains(&n) {
            return Err(ChannelError::OutOfRange { index: n });
        }
        self.channel_data().map(|data| data.channel(n)).transpose()
    }

    /// Channels `from..from + amount` (1-based); empty without channel data.
    pub fn channels_as_list(&self, from: usize, amount: usize) -> Result<&[u8], ChannelError> {
        let range = slot_range(from, amount)?;
        Ok(match self.channel_data() {
            Some(data) => &data.channels[range],
            None => &[],
        })
    }

    pub fn channels_as_strings(
        &self,
        from: usize,
        amount: usize,
    ) -> Result<Vec<String>, ChannelError> {
        slot_range(from, amount)?;
        match self.channel_data() {
            Some(data) => data.channels_as_strings(from, amount),
            None => Ok(Vec::new()),
        }
    }

    /// Channels rendered as decimal text joined by `delimiter`; empty
    /// without channel data.
    pub fn channels_as_joined_string(
        &self,
        from: usize,
        amount: usize,
        delimiter: &str,
    ) -> Result<String, ChannelError> {
        slot_range(from, amount)?;
        match self.channel_data() {
            Some(data) => data.channels_as_joined_string(from, amount, delimiter),
            None => Ok(String::new()),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Poll(poll) => write!(f, "ArtPoll (priority {})", poll.priority),
            Payload::PollReply(reply) => write!(
                f,
                "ArtPollReply: {:?} @ {} ({:?})",
                reply.name,
                reply.ip(),
                reply.status
            ),
            Payload::ChannelData(data) => {
                let preview = data.channels_as_list(1, 16).map_err(|_| fmt::Error)?;
                let preview: Vec<String> = preview.iter().map(|v| v.to_string()).collect();
                write!(
                    f,
                    "#{:3} PHY{} P{}. 1-16/{}: {}",
                    data.sequence,
                    data.physical_port,
                    data.port_address,
                    data.length,
                    preview.join(" ")
                )
            }
            Payload::Unknown => write!(f, "opcode {:#06x}", self.opcode.value()),
        }
    }
}
