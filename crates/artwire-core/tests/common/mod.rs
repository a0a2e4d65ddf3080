#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use etherparse::PacketBuilder;

pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
pub const ARTNET_PORT: u16 = 6454;

pub fn header(opcode: u16, version: u16) -> Vec<u8> {
    let mut data = ARTNET_ID.to_vec();
    data.extend_from_slice(&opcode.to_be_bytes());
    data.extend_from_slice(&version.to_be_bytes());
    data
}

pub fn artdmx(sequence: u8, physical: u8, sub_uni: u8, net: u8, channels: &[u8]) -> Vec<u8> {
    let mut data = header(0x0050, 14);
    data.extend_from_slice(&[sequence, physical, sub_uni, net]);
    data.extend_from_slice(&(channels.len() as u16).to_be_bytes());
    data.extend_from_slice(channels);
    data
}

pub fn artpoll(flags: u8, priority: u8) -> Vec<u8> {
    let mut data = header(0x0020, 14);
    data.extend_from_slice(&[flags, priority]);
    data
}

pub fn artpoll_reply(ip: [u8; 4], name: &str, long_name: &str, status: &str) -> Vec<u8> {
    let mut data = vec![0u8; 172];
    data[..8].copy_from_slice(ARTNET_ID);
    data[8..10].copy_from_slice(&0x0021u16.to_be_bytes());
    data[10..14].copy_from_slice(&ip);
    data[14..16].copy_from_slice(&ARTNET_PORT.to_le_bytes());
    data[26..26 + name.len()].copy_from_slice(name.as_bytes());
    data[44..44 + long_name.len()].copy_from_slice(long_name.as_bytes());
    data[108..108 + status.len()].copy_from_slice(status.as_bytes());
    data
}

pub fn udp_frame(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x01, 0x02, 0x03, 0x04, 0x05, 0x06], [0xff; 6])
        .ipv4([10, 0, 0, 1], [10, 0, 0, 255], 64)
        .udp(src_port, dst_port);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).expect("build frame");
    frame
}

pub fn temp_path(name: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("artwire_{unique}_{name}"))
}

/// Writes Ethernet frames as a big-endian PCAPNG file, one second apart.
pub fn write_pcapng(path: &Path, frames: &[Vec<u8>]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D_0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body()));
    for (idx, frame) in frames.iter().enumerate() {
        let ts_us = (idx as u64 + 1) * 1_000_000;
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(ts_us, frame)));
    }
    fs::write(path, output).expect("write capture");
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B_3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&((ts_us >> 32) as u32).to_be_bytes());
    body.extend_from_slice(&(ts_us as u32).to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    body.resize(body.len() + (4 - data.len() % 4) % 4, 0);
    body
}
