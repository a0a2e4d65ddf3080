use std::ops::Range;

use super::error::ArtNetError;
use super::layout;

/// Bounds-checked view over a received datagram.
///
/// Offsets are absolute; any read past the end reports `TruncatedPacket`.
pub struct ArtNetReader<'a> {
    datagram: &'a [u8],
}

impl<'a> ArtNetReader<'a> {
    pub fn new(datagram: &'a [u8]) -> Self {
        Self { datagram }
    }

    pub fn len(&self) -> usize {
        self.datagram.len()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ArtNetError> {
        if self.datagram.len() < needed {
            return Err(ArtNetError::TruncatedPacket {
                needed,
                actual: self.datagram.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ArtNetError> {
        self.datagram
            .get(offset)
            .copied()
            .ok_or(ArtNetError::TruncatedPacket {
                needed: offset + 1,
                actual: self.datagram.len(),
            })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, ArtNetError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u16_le(&self, range: Range<usize>) -> Result<u16, ArtNetError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], ArtNetError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| ArtNetError::TruncatedPacket {
            needed: N,
            actual: bytes.len(),
        })
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], ArtNetError> {
        self.datagram
            .get(range.clone())
            .ok_or(ArtNetError::TruncatedPacket {
                needed: range.end,
                actual: self.datagram.len(),
            })
    }

    pub fn read_signature(&self) -> Result<&'a [u8], ArtNetError> {
        self.read_slice(layout::ARTNET_ID_RANGE.clone())
    }

    /// Text field padded with NUL bytes on the wire.
    pub fn read_padded_string(&self, range: Range<usize>) -> Result<String, ArtNetError> {
        let bytes = self.read_slice(range)?;
        let raw = String::from_utf8_lossy(bytes);
        Ok(raw.trim_end_matches('\0').to_string())
    }
}
