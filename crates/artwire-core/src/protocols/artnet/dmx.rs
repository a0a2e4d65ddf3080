use crate::packet::ChannelData;
use crate::sequence::SequenceTracker;

use super::error::ArtNetError;
use super::layout;
use super::reader::ArtNetReader;

/// Decodes an ArtDMX payload.
///
/// The sequence is recorded into `tracker` as soon as it is read, even when
/// the rest of the payload turns out to be invalid.
pub fn decode_channel_data(
    reader: &ArtNetReader<'_>,
    tracker: Option<&SequenceTracker>,
) -> Result<ChannelData, ArtNetError> {
    let sequence = reader.read_u8(layout::DMX_SEQUENCE_OFFSET)?;
    if let Some(tracker) = tracker {
        tracker.record(sequence);
    }

    let physical_port = reader.read_u8(layout::DMX_PHYSICAL_OFFSET)?;
    let sub_uni = reader.read_u8(layout::DMX_SUB_UNI_OFFSET)?;
    let net = reader.read_u8(layout::DMX_NET_OFFSET)?;
    // Net is the high byte.
    let port_address = u16::from_be_bytes([net, sub_uni]);

    let length = reader.read_u16_be(layout::DMX_LENGTH_RANGE.clone())?;
    if length as usize > layout::DMX_MAX_SLOTS {
        return Err(ArtNetError::InvalidLength { length });
    }

    let data_len = length as usize;
    let end = layout::DMX_DATA_OFFSET + data_len;
    reader.require_len(end)?;
    let data = reader.read_slice(layout::DMX_DATA_OFFSET..end)?;
    let mut channels = [0u8; layout::DMX_MAX_SLOTS];
    channels[..data_len].copy_from_slice(data);

    let decoded = ChannelData::new(sequence, physical_port, port_address, length, channels);
    tracing::debug!(
        sequence,
        physical_port,
        port_address,
        length,
        "ArtDMX packet"
    );
    Ok(decoded)
}
