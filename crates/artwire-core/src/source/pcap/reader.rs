use pcap_parser::Linktype;

use super::layout;

/// Link type of the interface a PCAPNG block was captured on.
///
/// Unknown interfaces fall back to Ethernet.
pub fn linktype_for_interface(linktypes: &[Linktype], if_id: u32) -> Linktype {
    linktypes
        .get(if_id as usize)
        .copied()
        .unwrap_or(Linktype::ETHERNET)
}

/// PCAPNG timestamps default to microsecond resolution split over two words.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ts as f64 / layout::MICROS_PER_SECOND
}

/// PCAPNG block data is padded to 32 bits; keep only the captured bytes.
pub fn captured_bytes(data: &[u8], caplen: u32) -> &[u8] {
    data.get(..caplen as usize).unwrap_or(data)
}

pub fn legacy_ts_to_seconds(ts_sec: u32, ts_usec: u32) -> f64 {
    f64::from(ts_sec) + f64::from(ts_usec) / layout::MICROS_PER_SECOND
}
