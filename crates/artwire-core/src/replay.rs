//! Offline replay of captured Art-Net traffic.

use std::path::Path;

use thiserror::Error;

use crate::protocols::artnet::decode_tracked;
use crate::report::{
    DEFAULT_GENERATED_AT, InputInfo, PacketRecord, REPORT_VERSION, ReplayReport, ReplaySummary,
    ToolInfo, ts_to_rfc3339,
};
use crate::sequence::SequenceTracker;
use crate::source::udp::parse_udp_datagram;
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

/// UDP port assigned to Art-Net.
pub const ARTNET_PORT: u16 = 6454;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Which UDP datagrams of a capture are handed to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortFilter {
    /// Datagrams whose source or destination port matches.
    Port(u16),
    Any,
}

impl Default for PortFilter {
    fn default() -> Self {
        PortFilter::Port(ARTNET_PORT)
    }
}

/// Decode every matching UDP datagram of a PCAP/PCAPNG file.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use artwire_core::{PortFilter, replay_pcap_file};
///
/// let report = replay_pcap_file(Path::new("capture.pcapng"), PortFilter::default())?;
/// println!("decoded {} datagrams", report.summary.decoded);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn replay_pcap_file(path: &Path, filter: PortFilter) -> Result<ReplayReport, ReplayError> {
    let source = PcapFileSource::open(path)?;
    replay_source(path, source, filter)
}

pub fn replay_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    filter: PortFilter,
) -> Result<ReplayReport, ReplayError> {
    let tracker = SequenceTracker::new();
    let mut summary = ReplaySummary::default();
    let mut records = Vec::new();
    let mut first_ts: Option<f64> = None;
    let mut last_ts: Option<f64> = None;

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        summary.frames_total += 1;
        if let Some(ts) = ts {
            first_ts = Some(first_ts.map_or(ts, |first| first.min(ts)));
            last_ts = Some(last_ts.map_or(ts, |last| last.max(ts)));
        }

        let udp = match parse_udp_datagram(linktype, &data) {
            Ok(Some(udp)) => udp,
            Ok(None) => continue,
            Err(err) => {
                tracing::trace!(error = %err, "skipping frame");
                continue;
            }
        };
        if let PortFilter::Port(port) = filter {
            if !udp.uses_port(port) {
                continue;
            }
        }

        let result = decode_tracked(udp.payload, udp.src, &tracker);
        summary.count(&result);
        records.push(PacketRecord::from_result(&result, ts));
    }

    summary.last_sequence = tracker.last();
    summary.time_start = ts_to_rfc3339(first_ts);
    summary.time_end = ts_to_rfc3339(last_ts);
    tracing::debug!(
        frames = summary.frames_total,
        datagrams = summary.datagrams,
        decoded = summary.decoded,
        "replay finished"
    );

    let generated_at = summary
        .time_end
        .clone()
        .or_else(|| summary.time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    Ok(ReplayReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "artwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at,
        input: InputInfo {
            path: path.display().to_string(),
            bytes: path.metadata()?.len(),
        },
        summary,
        records,
    })
}
