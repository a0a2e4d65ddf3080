//! PCAP/PCAPNG source implementation.
//!
//! Format detection is left to `pcap-parser`; this module tracks link types
//! per interface and converts capture timestamps to seconds.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
