mod common;

use std::net::SocketAddr;

use artwire_core::{
    ArtNetError, OpCode, Payload, SequenceTracker, decode, decode_buffer, decode_tracked,
};
use common::{ARTNET_ID, artdmx, artpoll, artpoll_reply, header};

fn source() -> SocketAddr {
    "192.168.1.50:6454".parse().unwrap()
}

#[test]
fn every_short_buffer_is_not_artnet() {
    let mut full = artpoll(0, 0);
    full.truncate(14);
    for len in 0..14 {
        let err = decode(&full[..len], source()).unwrap_err();
        assert!(
            matches!(err.error(), ArtNetError::NotArtNet { .. }),
            "length {len}: {err}"
        );
        assert_eq!(err.partial().source(), source());
    }
}

#[test]
fn any_signature_mismatch_is_not_artnet() {
    for idx in 0..ARTNET_ID.len() {
        let mut data = artdmx(1, 0, 0, 0, &[1, 2, 3]);
        data[idx] ^= 0x20;
        let err = decode(&data, source()).unwrap_err();
        assert!(matches!(err.error(), ArtNetError::NotArtNet { .. }));
    }
}

#[test]
fn old_versions_are_rejected_for_every_opcode() {
    for opcode in [0x0020u16, 0x0021, 0x0050, 0x7777] {
        for version in [0u16, 1, 13] {
            let mut data = header(opcode, version);
            data.resize(200, 0);
            let err = decode(&data, source()).unwrap_err();
            assert_eq!(err.error(), &ArtNetError::UnsupportedVersion { version });
            assert_eq!(err.partial().opcode(), OpCode::from_u16(opcode));
        }
    }
}

#[test]
fn unknown_opcodes_are_unsupported() {
    for opcode in [0x0000u16, 0x0099, 0x2000, 0x5000, 0xffff] {
        let data = header(opcode, 14);
        assert_eq!(data.len(), 14);
        let err = decode(&data, source()).unwrap_err();
        assert_eq!(err.error(), &ArtNetError::UnsupportedOpcode { opcode });
        assert_eq!(err.error().kind(), "unsupported_opcode");
        assert_eq!(err.partial().opcode(), OpCode::Unknown(opcode));
        assert_eq!(err.partial().payload(), &Payload::Unknown);
        assert!(!err.partial().has_channel_data());
    }
}

#[test]
fn channel_data_lengths_survive_decoding() {
    for len in [0usize, 1, 2, 3, 255, 256, 511, 512] {
        let channels: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
        let packet = decode(&artdmx(1, 0, 0, 0, &channels), source()).unwrap();
        let data = packet.channel_data().unwrap();
        assert_eq!(data.length() as usize, len);
        assert_eq!(data.valid_channels(), channels.as_slice());
    }
}

#[test]
fn length_over_512_is_invalid_and_copies_nothing() {
    let mut data = header(0x0050, 14);
    data.extend_from_slice(&[1, 0, 0, 0, 0x02, 0x01]);
    data.extend(std::iter::repeat_n(0xAA, 513));
    let err = decode(&data, source()).unwrap_err();
    assert_eq!(err.error(), &ArtNetError::InvalidLength { length: 513 });
    assert_eq!(err.partial().payload(), &Payload::Unknown);
    assert!(!err.partial().has_channel_data());
}

#[test]
fn channels_past_length_read_as_zero() {
    let packet = decode(&artdmx(1, 0, 0, 0, &[9, 9]), source()).unwrap();
    assert!(packet.has_channel_data());
    for n in 3..=512 {
        assert_eq!(packet.channel(n), Ok(Some(0)));
    }
}

#[test]
fn poll_flags() {
    let packet = decode(&artpoll(0b0001_1110, 0), source()).unwrap();
    let poll = packet.poll().unwrap();
    assert!(poll.notify_on_change && poll.send_diagnostics);
    assert!(poll.diagnostics_unicast && poll.send_vlc);

    let packet = decode(&artpoll(0x00, 0), source()).unwrap();
    let poll = packet.poll().unwrap();
    assert!(!poll.notify_on_change && !poll.send_diagnostics);
    assert!(!poll.diagnostics_unicast && !poll.send_vlc);
}

#[test]
fn channel_data_scenario() {
    let mut buf = [0u8; 1024];
    let mut datagram = ARTNET_ID.to_vec();
    datagram.extend_from_slice(&[
        0x00, 0x50, 0x00, 0x0E, 5, 1, 0x00, 0x01, 0x00, 0x02, 0x10, 0x20,
    ]);
    assert_eq!(datagram.len(), 20);
    buf[..20].copy_from_slice(&datagram);

    let packet = decode_buffer(&buf, 20, source()).unwrap();
    assert_eq!(packet.opcode(), OpCode::ChannelData);
    assert_eq!(packet.sequence(), Some(5));
    let data = packet.channel_data().unwrap();
    assert_eq!(data.physical_port(), 1);
    assert_eq!(data.port_address(), 256);
    assert_eq!(data.length(), 2);
    assert_eq!(packet.channel(1), Ok(Some(0x10)));
    assert_eq!(packet.channel(2), Ok(Some(0x20)));
    assert!(packet.has_channel_data());
}

#[test]
fn invalid_length_scenario() {
    let mut datagram = ARTNET_ID.to_vec();
    datagram.extend_from_slice(&[
        0x00, 0x50, 0x00, 0x0E, 5, 1, 0x00, 0x01, 0x02, 0x01, 0x10, 0x20,
    ]);
    let err = decode(&datagram, source()).unwrap_err();
    assert_eq!(err.error(), &ArtNetError::InvalidLength { length: 513 });
    let (partial, _) = err.into_parts();
    assert_eq!(partial.channel(1), Ok(None));
}

#[test]
fn poll_scenario() {
    let mut datagram = ARTNET_ID.to_vec();
    datagram.extend_from_slice(&[0x00, 0x20, 0x00, 0x0E, 0x00, 0x80]);
    let packet = decode(&datagram, source()).unwrap();
    assert_eq!(packet.opcode(), OpCode::Poll);
    let poll = packet.poll().unwrap();
    assert_eq!(poll.priority, 128);
    assert!(!poll.notify_on_change);
    assert!(!poll.send_diagnostics);
    assert!(!poll.diagnostics_unicast);
    assert!(!poll.send_vlc);
}

#[test]
fn poll_reply_identity() {
    let data = artpoll_reply([2, 0, 0, 10], "Node", "Upstage Node", "Ready");
    let packet = decode(&data, source()).unwrap();
    let reply = packet.poll_reply().unwrap();
    assert_eq!(reply.ip().to_string(), "2.0.0.10");
    assert_eq!(reply.port, 6454);
    assert_eq!(reply.name, "Node");
    assert_eq!(reply.long_name, "Upstage Node");
    assert_eq!(reply.status, "Ready");
    assert_eq!(packet.to_string(), "ArtPollReply: \"Node\" @ 2.0.0.10 (\"Ready\")");
}

#[test]
fn short_poll_reply_is_truncated() {
    let data = artpoll_reply([2, 0, 0, 10], "Node", "", "");
    let err = decode(&data[..100], source()).unwrap_err();
    assert_eq!(
        err.error(),
        &ArtNetError::TruncatedPacket {
            needed: 172,
            actual: 100
        }
    );
    assert_eq!(err.partial().opcode(), OpCode::PollReply);
}

#[test]
fn tracker_follows_the_most_recent_sender() {
    let tracker = SequenceTracker::new();
    let other: SocketAddr = "192.168.1.51:6454".parse().unwrap();
    decode_tracked(&artdmx(10, 0, 0, 0, &[1]), source(), &tracker).unwrap();
    decode_tracked(&artdmx(200, 0, 0, 0, &[1]), other, &tracker).unwrap();
    assert_eq!(tracker.last(), Some(200));

    let plain = decode(&artdmx(3, 0, 0, 0, &[1]), source()).unwrap();
    assert_eq!(plain.sequence(), Some(3));
    assert_eq!(tracker.last(), Some(200));
}
