mod common;

use std::fs;

use artwire_core::{PacketSource, PcapFileSource, PortFilter, RecordOutcome, replay_pcap_file};
use common::{ARTNET_PORT, artdmx, artpoll, temp_path, udp_frame, write_pcapng};

#[test]
fn pcap_source_reads_generated_capture() {
    let path = temp_path("frames.pcapng");
    write_pcapng(
        &path,
        &[
            udp_frame(ARTNET_PORT, ARTNET_PORT, &artpoll(0, 0)),
            udp_frame(ARTNET_PORT, ARTNET_PORT, &artdmx(1, 0, 0, 0, &[1, 2])),
        ],
    );

    let mut source = PcapFileSource::open(&path).unwrap();
    let mut timestamps = Vec::new();
    while let Some(event) = source.next_packet().unwrap() {
        timestamps.push(event.ts);
    }
    let _ = fs::remove_file(&path);

    assert_eq!(timestamps, vec![Some(1.0), Some(2.0)]);
}

#[test]
fn replay_decodes_artnet_datagrams() {
    let path = temp_path("replay.pcapng");
    write_pcapng(
        &path,
        &[
            udp_frame(ARTNET_PORT, ARTNET_PORT, &artpoll(0b0000_0010, 0x10)),
            udp_frame(ARTNET_PORT, ARTNET_PORT, &artdmx(7, 1, 0x02, 0x00, &[255, 0, 128])),
            udp_frame(5568, 5568, &artdmx(8, 1, 0x02, 0x00, &[1])),
            udp_frame(40000, ARTNET_PORT, b"Art-Net\0\x00\x50\x00\x0e\x09\x00\x00\x00\x7f\xff"),
        ],
    );

    let report = replay_pcap_file(&path, PortFilter::default()).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(report.summary.frames_total, 4);
    assert_eq!(report.summary.datagrams, 3);
    assert_eq!(report.summary.decoded, 2);
    assert_eq!(report.summary.errors.get("invalid_length"), Some(&1));
    assert_eq!(report.summary.last_sequence, Some(9));
    assert!(matches!(
        report.records[0].outcome,
        RecordOutcome::Poll {
            priority: 0x10,
            notify_on_change: true,
            ..
        }
    ));
    assert_eq!(
        report.records[1].outcome,
        RecordOutcome::ChannelData {
            sequence: 7,
            physical_port: 1,
            port_address: 2,
            length: 3,
            channels: vec![255, 0, 128],
        }
    );
    assert_eq!(report.records[2].source, "10.0.0.1:40000");
}

#[test]
fn pcap_source_rejects_truncated_file() {
    let path = temp_path("truncated.pcapng");
    fs::write(&path, [0x0a, 0x0d, 0x0d]).unwrap();
    let result = PcapFileSource::open(&path).and_then(|mut source| source.next_packet());
    let _ = fs::remove_file(&path);

    assert!(result.is_err());
}

#[test]
fn missing_capture_is_io_error() {
    let path = temp_path("missing.pcapng");
    let err = match PcapFileSource::open(&path) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, artwire_core::SourceError::Io(_)));
}
