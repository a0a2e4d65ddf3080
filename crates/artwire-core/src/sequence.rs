//! Last-seen ArtDMX sequence number, shared across decode calls.
//!
//! The tracker is handed to [`decode_tracked`](crate::decode_tracked)
//! explicitly; plain [`decode`](crate::decode) never touches it. It is not
//! per sender: whichever ArtDMX packet was decoded last wins.

use std::sync::atomic::{AtomicU16, Ordering};

const EMPTY: u16 = u16::MAX;

#[derive(Debug)]
pub struct SequenceTracker {
    last: AtomicU16,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self {
            last: AtomicU16::new(EMPTY),
        }
    }

    pub fn record(&self, sequence: u8) {
        self.last.store(u16::from(sequence), Ordering::Relaxed);
    }

    /// `None` until the first ArtDMX packet has been seen.
    pub fn last(&self) -> Option<u8> {
        match self.last.load(Ordering::Relaxed) {
            EMPTY => None,
            value => u8::try_from(value).ok(),
        }
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
