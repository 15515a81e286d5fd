use std::time::SystemTime;

use crate::GenericError;

/// Reported round-trip value meaning "no reply within the timeout window",
/// distinct from any measured non-negative latency.
pub const RTT_TIMED_OUT_MS: f64 = -1.0;

/// Tags attached to every recorded sample.
#[derive(Clone, Copy, Debug)]
pub struct SampleTags<'a> {
    pub address: &'a str,
    pub name: &'a str,
}

/// Receiver of completed probe rounds. One handle is shared by all probe
/// loops and called concurrently without any serialization around it, so
/// implementations must tolerate concurrent calls. The wire format of the
/// store behind it is not this crate's concern.
pub trait MetricsSink: Send + Sync {
    /// Records one completed round: the send timestamp of the request and
    /// the round-trip time in milliseconds, `RTT_TIMED_OUT_MS` when the
    /// round timed out.
    fn record(
        &self,
        tags: SampleTags<'_>,
        timestamp: SystemTime,
        rtt_ms: f64,
    ) -> Result<(), GenericError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    pub(crate) struct RecordedSample {
        pub address: String,
        pub name: String,
        pub timestamp: SystemTime,
        pub rtt_ms: f64,
    }

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        samples: Mutex<Vec<RecordedSample>>,
    }

    impl RecordingSink {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn rtts(&self) -> Vec<f64> {
            self.samples.lock().unwrap().iter().map(|s| s.rtt_ms).collect()
        }

        pub(crate) fn timestamps(&self) -> Vec<SystemTime> {
            self.samples.lock().unwrap().iter().map(|s| s.timestamp).collect()
        }

        pub(crate) fn should_record_number_of_samples(&self, n: usize) -> &Self {
            assert!(n == self.samples.lock().unwrap().len());
            self
        }

        pub(crate) fn should_record_tags(&self, address: &str, name: &str) -> &Self {
            assert!(self
                .samples
                .lock()
                .unwrap()
                .iter()
                .all(|s| s.address == address && s.name == name));
            self
        }
    }

    impl MetricsSink for RecordingSink {
        fn record(
            &self,
            tags: SampleTags<'_>,
            timestamp: SystemTime,
            rtt_ms: f64,
        ) -> Result<(), GenericError> {
            self.samples.lock().unwrap().push(RecordedSample {
                address: tags.address.to_owned(),
                name: tags.name.to_owned(),
                timestamp,
                rtt_ms,
            });
            Ok(())
        }
    }

    /// Sink that fails every write; probe loops must keep running anyway.
    pub(crate) struct FailingSink;

    impl MetricsSink for FailingSink {
        fn record(
            &self,
            _tags: SampleTags<'_>,
            _timestamp: SystemTime,
            _rtt_ms: f64,
        ) -> Result<(), GenericError> {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulating sink failure",
            )))
        }
    }
}
