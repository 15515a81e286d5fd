use std::time::{Instant, SystemTime};

use crate::icmp::v4::SequenceNumber;
use crate::metrics::RTT_TIMED_OUT_MS;

/// Per-host probing record, exclusively owned by the one loop driving that
/// host. Tracks sequencing, timing, and the last result.
pub struct ProbeState {
    sequence_number: Option<SequenceNumber>,
    send_time: Option<Instant>,
    // wall-clock twin of `send_time`, used as the reported timestamp
    sent_at: Option<SystemTime>,
    receive_time: Option<Instant>,
    rtt_ms: f64,
    consecutive_matches: u32,
}

impl ProbeState {
    pub(crate) fn new() -> ProbeState {
        ProbeState {
            sequence_number: None,
            send_time: None,
            sent_at: None,
            receive_time: None,
            rtt_ms: 0.0,
            consecutive_matches: 0,
        }
    }

    /// Steps to the next sequence number and returns it.
    pub(crate) fn advance_sequence(&mut self) -> SequenceNumber {
        let next = match self.sequence_number {
            None => SequenceNumber::start_value(),
            Some(sequence_number) => sequence_number.next(),
        };
        self.sequence_number = Some(next);
        next
    }

    pub(crate) fn record_send(&mut self, send_time: Instant, sent_at: SystemTime) {
        self.send_time = Some(send_time);
        self.sent_at = Some(sent_at);
    }

    /// Resolves the round as matched and returns the round-trip time in
    /// milliseconds, truncated at microsecond resolution.
    pub(crate) fn record_match(&mut self, receive_time: Instant) -> f64 {
        let send_time = self.send_time.expect("logic error: match recorded before send");
        let elapsed_micros = receive_time.duration_since(send_time).as_micros();
        self.rtt_ms = (elapsed_micros as f64) / 1000.0;
        self.receive_time = Some(receive_time);
        self.consecutive_matches += 1;
        self.rtt_ms
    }

    /// Resolves the round as timed out.
    pub(crate) fn record_timeout(&mut self) {
        self.rtt_ms = RTT_TIMED_OUT_MS;
        self.consecutive_matches = 0;
    }

    pub(crate) fn send_time(&self) -> Option<Instant> {
        self.send_time
    }

    pub(crate) fn sent_at(&self) -> Option<SystemTime> {
        self.sent_at
    }

    pub fn last_receive_time(&self) -> Option<Instant> {
        self.receive_time
    }

    pub fn last_rtt_ms(&self) -> f64 {
        self.rtt_ms
    }

    pub fn consecutive_matches(&self) -> u32 {
        self.consecutive_matches
    }
}
