use std::net::Ipv4Addr;

use super::error::ArtNetError;
use super::layout;
use super::reader::ArtNetReader;

/// Node identity and status reported in an ArtPollReply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReplyInfo {
    pub ip_address: [u8; 4],
    /// UDP port the node listens on (little-endian on the wire).
    pub port: u16,
    pub firmware_version: u16,
    pub oem: u16,
    pub name: String,
    pub long_name: String,
    pub status: String,
}

impl PollReplyInfo {
    /// Node address; its `Display` is dotted decimal.
    pub fn ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ip_address)
    }
}

pub fn decode_poll_reply(reader: &ArtNetReader<'_>) -> Result<PollReplyInfo, ArtNetError> {
    reader.require_len(layout::POLL_REPLY_MIN_LEN)?;

    let reply = PollReplyInfo {
        ip_address: reader.read_array::<4>(layout::POLL_REPLY_IP_RANGE.clone())?,
        port: reader.read_u16_le(layout::POLL_REPLY_PORT_RANGE.clone())?,
        firmware_version: reader.read_u16_be(layout::POLL_REPLY_VERSION_RANGE.clone())?,
        oem: reader.read_u16_be(layout::POLL_REPLY_OEM_RANGE.clone())?,
        name: reader.read_padded_string(layout::POLL_REPLY_NAME_RANGE.clone())?,
        long_name: reader.read_padded_string(layout::POLL_REPLY_LONG_NAME_RANGE.clone())?,
        status: reader.read_padded_string(layout::POLL_REPLY_STATUS_RANGE.clone())?,
    };
    tracing::debug!(
        name = %reply.name,
        ip = %reply.ip(),
        status = %reply.status,
        "ArtPollReply packet"
    );
    Ok(reply)
}
