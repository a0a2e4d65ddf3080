use thiserror::Error;

use crate::packet::Packet;

/// Reasons an Art-Net datagram cannot be decoded.
///
/// # Examples
/// ```
/// use artwire_core::ArtNetError;
///
/// let err = ArtNetError::InvalidLength { length: 513 };
/// assert!(err.to_string().contains("invalid ArtDMX length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtNetError {
    #[error("not an Art-Net packet ({reason})")]
    NotArtNet { reason: String },
    #[error("unsupported protocol version: {version}")]
    UnsupportedVersion { version: u16 },
    #[error("unsupported opcode: {opcode:#06x}")]
    UnsupportedOpcode { opcode: u16 },
    #[error("invalid ArtDMX length: {length}")]
    InvalidLength { length: u16 },
    #[error("truncated packet: need {needed} bytes, got {actual}")]
    TruncatedPacket { needed: usize, actual: usize },
}

impl ArtNetError {
    /// Stable, machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ArtNetError::NotArtNet { .. } => "not_artnet",
            ArtNetError::UnsupportedVersion { .. } => "unsupported_version",
            ArtNetError::UnsupportedOpcode { .. } => "unsupported_opcode",
            ArtNetError::InvalidLength { .. } => "invalid_length",
            ArtNetError::TruncatedPacket { .. } => "truncated_packet",
        }
    }
}

/// A failed decode, carrying whatever was known about the datagram.
///
/// The partial packet always has its source set. Opcode and protocol version
/// are filled in once the header has been read; the payload is never
/// populated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct DecodeError {
    partial: Box<Packet>,
    error: ArtNetError,
}

impl DecodeError {
    pub(crate) fn new(partial: Packet, error: ArtNetError) -> Self {
        Self {
            partial: Box::new(partial),
            error,
        }
    }

    pub fn error(&self) -> &ArtNetError {
        &self.error
    }

    pub fn partial(&self) -> &Packet {
        &self.partial
    }

    pub fn into_parts(self) -> (Packet, ArtNetError) {
        (*self.partial, self.error)
    }
}
