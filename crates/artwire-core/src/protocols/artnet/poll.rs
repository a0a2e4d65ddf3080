use super::error::ArtNetError;
use super::layout;
use super::reader::ArtNetReader;

/// Decoded ArtPoll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollInfo {
    pub priority: u8,
    pub notify_on_change: bool,
    pub send_diagnostics: bool,
    pub diagnostics_unicast: bool,
    pub send_vlc: bool,
}

impl PollInfo {
    /// Plain-language reading of the talk-to-me flags, one sentence per flag.
    ///
    /// # Examples
    /// ```
    /// use artwire_core::PollInfo;
    ///
    /// let poll = PollInfo {
    ///     send_diagnostics: true,
    ///     ..PollInfo::default()
    /// };
    /// assert_eq!(poll.explain_flags()[1], "Transmit diagnostic messages.");
    /// ```
    pub fn explain_flags(&self) -> [&'static str; 4] {
        [
            if self.notify_on_change {
                "Transmit ArtPollReply on status change."
            } else {
                "Transmit ArtPollReply only in response to ArtPoll."
            },
            if self.send_diagnostics {
                "Transmit diagnostic messages."
            } else {
                "Do not transmit diagnostic messages."
            },
            if self.diagnostics_unicast {
                "Diagnostic messages are unicast to sender of ArtPoll packet."
            } else {
                "Diagnostic messages are broadcast."
            },
            if self.send_vlc {
                "Node should transmit VLC data."
            } else {
                "Node should ignore ArtVlc packets."
            },
        ]
    }
}

pub fn decode_poll(reader: &ArtNetReader<'_>) -> Result<PollInfo, ArtNetError> {
    reader.require_len(layout::POLL_MIN_LEN)?;
    let flags = reader.read_u8(layout::POLL_FLAGS_OFFSET)?;
    let priority = reader.read_u8(layout::POLL_PRIORITY_OFFSET)?;

    let poll = PollInfo {
        priority,
        notify_on_change: flags & layout::POLL_FLAG_NOTIFY_ON_CHANGE != 0,
        send_diagnostics: flags & layout::POLL_FLAG_SEND_DIAGNOSTICS != 0,
        diagnostics_unicast: flags & layout::POLL_FLAG_DIAGNOSTICS_UNICAST != 0,
        send_vlc: flags & layout::POLL_FLAG_SEND_VLC != 0,
    };
    tracing::debug!(priority, flags, "ArtPoll packet");
    Ok(poll)
}
