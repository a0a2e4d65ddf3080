use std::net::SocketAddr;

use crate::packet::{OpCode, Packet, Payload};
use crate::sequence::SequenceTracker;

use super::dmx::decode_channel_data;
use super::error::{ArtNetError, DecodeError};
use super::header::{check_version, read_header};
use super::poll::decode_poll;
use super::poll_reply::decode_poll_reply;
use super::reader::ArtNetReader;

/// Decode one received datagram; the whole slice is treated as valid data.
///
/// # Examples
/// ```
/// use std::net::SocketAddr;
///
/// use artwire_core::{OpCode, decode};
///
/// let mut datagram = b"Art-Net\0".to_vec();
/// datagram.extend_from_slice(&[0x00, 0x20, 0x00, 0x0e, 0x00, 0x80]);
/// let source: SocketAddr = "10.0.0.1:6454".parse()?;
///
/// let packet = decode(&datagram, source)?;
/// assert_eq!(packet.opcode(), OpCode::Poll);
/// assert_eq!(packet.poll().map(|poll| poll.priority), Some(128));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// Returns a `DecodeError` holding the kind of failure and a partial packet.
pub fn decode(datagram: &[u8], source: SocketAddr) -> Result<Packet, DecodeError> {
    decode_inner(datagram, source, None)
}

/// Decode the first `n` bytes of a receive buffer.
///
/// `n` larger than the buffer is reported as `TruncatedPacket`.
pub fn decode_buffer(buf: &[u8], n: usize, source: SocketAddr) -> Result<Packet, DecodeError> {
    match buf.get(..n) {
        Some(datagram) => decode_inner(datagram, source, None),
        None => Err(reject(
            Packet::unread(source),
            ArtNetError::TruncatedPacket {
                needed: n,
                actual: buf.len(),
            },
        )),
    }
}

/// Like [`decode`], recording ArtDMX sequence numbers into `tracker`.
pub fn decode_tracked(
    datagram: &[u8],
    source: SocketAddr,
    tracker: &SequenceTracker,
) -> Result<Packet, DecodeError> {
    decode_inner(datagram, source, Some(tracker))
}

fn decode_inner(
    datagram: &[u8],
    source: SocketAddr,
    tracker: Option<&SequenceTracker>,
) -> Result<Packet, DecodeError> {
    let reader = ArtNetReader::new(datagram);

    let header = match read_header(&reader) {
        Ok(header) => header,
        Err(err) => return Err(reject(Packet::unread(source), err)),
    };
    let partial = Packet::partial(source, header.opcode, header.protocol_version);
    if let Err(err) = check_version(&header) {
        return Err(reject(partial, err));
    }

    let payload = match header.opcode {
        OpCode::Poll => decode_poll(&reader).map(Payload::Poll),
        OpCode::PollReply => decode_poll_reply(&reader).map(Payload::PollReply),
        OpCode::ChannelData => decode_channel_data(&reader, tracker).map(Payload::ChannelData),
        OpCode::Unknown(opcode) => Err(ArtNetError::UnsupportedOpcode { opcode }),
    };

    match payload {
        Ok(payload) => Ok(partial.with_payload(payload)),
        Err(err) => Err(reject(partial, err)),
    }
}

fn reject(partial: Packet, err: ArtNetError) -> DecodeError {
    tracing::debug!(source = %partial.source(), error = %err, "rejected datagram");
    DecodeError::new(partial, err)
}
