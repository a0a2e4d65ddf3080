//! Serializable records of decode results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::packet::{Packet, Payload};
use crate::protocols::artnet::error::DecodeError;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of replaying a capture file through the decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last captured frame, or the epoch.
    pub generated_at: String,
    pub input: InputInfo,
    pub summary: ReplaySummary,
    /// One record per datagram on the Art-Net port, in capture order.
    pub records: Vec<PacketRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    pub path: String,
    pub bytes: u64,
}

/// Counters over a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Frames read from the capture, UDP or not.
    pub frames_total: u64,
    /// UDP datagrams handed to the decoder.
    pub datagrams: u64,
    /// Datagrams decoded successfully.
    pub decoded: u64,
    /// Successful decodes per opcode name.
    pub opcodes: BTreeMap<String, u64>,
    /// Failures per error kind.
    pub errors: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sequence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

impl ReplaySummary {
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|count| *count > 0)
    }

    pub(crate) fn count(&mut self, result: &Result<Packet, DecodeError>) {
        self.datagrams += 1;
        match result {
            Ok(packet) => {
                self.decoded += 1;
                *self
                    .opcodes
                    .entry(packet.opcode().name().to_string())
                    .or_default() += 1;
            }
            Err(err) => {
                *self.errors.entry(err.error().kind().to_string()).or_default() += 1;
            }
        }
    }
}

/// One decoded (or rejected) datagram.
///
/// # Examples
/// ```
/// use std::net::SocketAddr;
///
/// use artwire_core::{PacketRecord, RecordOutcome, decode};
///
/// let mut datagram = b"Art-Net\0".to_vec();
/// datagram.extend_from_slice(&[0x00, 0x20, 0x00, 0x0e, 0x00, 0x80]);
/// let source: SocketAddr = "10.0.0.1:6454".parse()?;
///
/// let record = PacketRecord::from_result(&decode(&datagram, source), None);
/// assert!(matches!(record.outcome, RecordOutcome::Poll { priority: 128, .. }));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub source: String,
    pub opcode: String,
    pub opcode_value: u16,
    pub protocol_version: u16,
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordOutcome {
    Poll {
        priority: u8,
        notify_on_change: bool,
        send_diagnostics: bool,
        diagnostics_unicast: bool,
        send_vlc: bool,
        explanation: Vec<String>,
    },
    PollReply {
        ip: String,
        port: u16,
        firmware_version: u16,
        oem: u16,
        name: String,
        long_name: String,
        status: String,
    },
    ChannelData {
        sequence: u8,
        physical_port: u8,
        port_address: u16,
        length: u16,
        /// Only the channels present on the wire.
        channels: Vec<u8>,
    },
    Error {
        kind: String,
        message: String,
    },
}

impl PacketRecord {
    pub fn from_result(result: &Result<Packet, DecodeError>, ts: Option<f64>) -> Self {
        match result {
            Ok(packet) => Self::from_packet(packet, outcome_for(packet), ts),
            Err(err) => Self::from_packet(
                err.partial(),
                RecordOutcome::Error {
                    kind: err.error().kind().to_string(),
                    message: err.error().to_string(),
                },
                ts,
            ),
        }
    }

    fn from_packet(packet: &Packet, outcome: RecordOutcome, ts: Option<f64>) -> Self {
        Self {
            timestamp: ts_to_rfc3339(ts),
            source: packet.source().to_string(),
            opcode: packet.opcode().name().to_string(),
            opcode_value: packet.opcode().value(),
            protocol_version: packet.protocol_version(),
            outcome,
        }
    }
}

fn outcome_for(packet: &Packet) -> RecordOutcome {
    match packet.payload() {
        Payload::Poll(poll) => RecordOutcome::Poll {
            priority: poll.priority,
            notify_on_change: poll.notify_on_change,
            send_diagnostics: poll.send_diagnostics,
            diagnostics_unicast: poll.diagnostics_unicast,
            send_vlc: poll.send_vlc,
            explanation: poll.explain_flags().iter().map(|s| s.to_string()).collect(),
        },
        Payload::PollReply(reply) => RecordOutcome::PollReply {
            ip: reply.ip().to_string(),
            port: reply.port,
            firmware_version: reply.firmware_version,
            oem: reply.oem,
            name: reply.name.clone(),
            long_name: reply.long_name.clone(),
            status: reply.status.clone(),
        },
        Payload::ChannelData(data) => RecordOutcome::ChannelData {
            sequence: data.sequence(),
            physical_port: data.physical_port(),
            port_address: data.port_address(),
            length: data.length(),
            channels: data.valid_channels().to_vec(),
        },
        Payload::Unknown => RecordOutcome::Error {
            kind: "unknown".to_string(),
            message: "no payload decoded".to_string(),
        },
    }
}

/// Format seconds since the Unix epoch as RFC3339.
pub fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
