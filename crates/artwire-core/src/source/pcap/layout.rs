pub const PCAP_READER_BUFFER_SIZE: usize = 64 * 1024;
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;
