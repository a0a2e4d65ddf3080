use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, Linktype, PcapBlockOwned, PcapError, create_reader};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    captured_bytes, legacy_ts_to_seconds, linktype_for_interface, pcapng_ts_to_seconds,
};

/// Frames read from a legacy PCAP or a PCAPNG file.
pub struct PcapFileSource {
    reader: Box<dyn PcapReaderIterator>,
    linktypes: Vec<Linktype>,
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        open_reader(path).map_err(SourceError::from)
    }
}

fn open_reader(path: &Path) -> Result<PcapFileSource, PcapSourceError> {
    let file = File::open(path)?;
    let reader = create_reader(layout::PCAP_READER_BUFFER_SIZE, file)
        .map_err(|err| PcapSourceError::pcap("capture reader init", err))?;
    Ok(PcapFileSource {
        reader,
        linktypes: Vec::new(),
    })
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        next_packet(self.reader.as_mut(), &mut self.linktypes).map_err(SourceError::from)
    }
}

fn next_packet(
    reader: &mut dyn PcapReaderIterator,
    linktypes: &mut Vec<Linktype>,
) -> Result<Option<PacketEvent>, PcapSourceError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = block_to_event(block, linktypes);
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|err| PcapSourceError::pcap("capture reader refill", err))?;
            }
            Err(err) => return Err(PcapSourceError::pcap("capture reader next", err)),
        }
    }
}

/// Updates interface state from header blocks and turns packet blocks into
/// events.
fn block_to_event(block: PcapBlockOwned<'_>, linktypes: &mut Vec<Linktype>) -> Option<PacketEvent> {
    match block {
        PcapBlockOwned::LegacyHeader(header) => {
            *linktypes = vec![header.network];
            None
        }
        PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
            ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec)),
            linktype: linktype_for_interface(linktypes, 0),
            data: packet.data.to_vec(),
        }),
        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
            linktypes.clear();
            None
        }
        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
            linktypes.push(intf.linktype);
            None
        }
        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
            ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
            linktype: linktype_for_interface(linktypes, packet.if_id),
            data: captured_bytes(packet.data, packet.caplen).to_vec(),
        }),
        PcapBlockOwned::NG(Block::SimplePacket(packet)) => Some(PacketEvent {
            ts: None,
            linktype: linktype_for_interface(linktypes, 0),
            data: packet.data.to_vec(),
        }),
        _ => None,
    }
}
