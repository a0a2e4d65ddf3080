use crate::packet::OpCode;

use super::error::ArtNetError;
use super::layout;
use super::reader::ArtNetReader;

/// Fields shared by every Art-Net datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub opcode: OpCode,
    pub protocol_version: u16,
}

/// Checks the minimum size and the `Art-Net\0` signature, then extracts the
/// opcode and protocol version.
pub fn read_header(reader: &ArtNetReader<'_>) -> Result<Header, ArtNetError> {
    if reader.len() < layout::MIN_PACKET_LEN {
        return Err(ArtNetError::NotArtNet {
            reason: format!("too short, {} bytes", reader.len()),
        });
    }

    let signature = reader.read_signature()?;
    if signature != layout::ARTNET_ID {
        return Err(ArtNetError::NotArtNet {
            reason: format!("header is {:?}", String::from_utf8_lossy(signature)),
        });
    }

    let opcode = reader.read_u16_be(layout::OP_CODE_RANGE.clone())?;
    let protocol_version = reader.read_u16_be(layout::PROTOCOL_VERSION_RANGE.clone())?;
    tracing::trace!(opcode, protocol_version, "read Art-Net header");

    Ok(Header {
        opcode: OpCode::from_u16(opcode),
        protocol_version,
    })
}

/// Rejects protocol revisions older than 14, whatever the opcode.
pub fn check_version(header: &Header) -> Result<(), ArtNetError> {
    if header.protocol_version < layout::MIN_PROTOCOL_VERSION {
        return Err(ArtNetError::UnsupportedVersion {
            version: header.protocol_version,
        });
    }
    Ok(())
}
