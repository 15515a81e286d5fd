use rand::Rng;
use std::cmp;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::icmp::v4::{IcmpV4, SequenceNumber, Socket};
use crate::metrics::{MetricsSink, SampleTags, RTT_TIMED_OUT_MS};
use crate::probe_error::ProbeResult;
use crate::probe_state::ProbeState;
use crate::resolve::resolve_ipv4;
use crate::shutdown::ShutdownSignal;
use crate::Host;

/// Upper bound of the random delay before a host's first probe, so that many
/// loops starting together do not send a synchronized burst.
const STARTUP_JITTER_MS: u64 = 2000;

/// Floor for the shrinking receive window, keeping the socket read timeout
/// away from zero (zero would disable it).
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Resolution of one probe round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProbeOutcome {
    Matched { rtt_ms: f64 },
    TimedOut,
}

/// The per-host probe loop: send an echo request, await the matching reply
/// under the configured timeout, record and report the result, sleep out the
/// rest of the interval, repeat. Hosts are fully independent; each engine
/// owns its socket and state exclusively.
pub struct ProbeEngine<S> {
    host: Host,
    state: ProbeState,
    icmpv4: IcmpV4<S>,
    shutdown: ShutdownSignal,
    sink: Option<Arc<dyn MetricsSink>>,
}

impl<S> ProbeEngine<S>
where
    S: Socket + 'static,
{
    pub fn new(
        host: Host,
        socket: S,
        shutdown: ShutdownSignal,
        sink: Option<Arc<dyn MetricsSink>>,
    ) -> Self {
        ProbeEngine {
            host,
            state: ProbeState::new(),
            icmpv4: IcmpV4::new(socket),
            shutdown,
            sink,
        }
    }

    pub fn state(&self) -> &ProbeState {
        &self.state
    }

    /// Drives the loop until shutdown is requested. Resolution and socket
    /// failures end this host's loop only; other hosts are unaffected.
    pub fn run(&mut self) -> ProbeResult<()> {
        let ipv4 = match resolve_ipv4(self.host.address()) {
            Ok(ipv4) => ipv4,
            Err(e) => {
                tracing::error!("could not resolve {}: {}", self.host.address(), e);
                return Err(e.into());
            }
        };
        tracing::debug!("{} resolved to {}", self.host.address(), ipv4);

        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..STARTUP_JITTER_MS));
        if self.shutdown.wait_timeout(jitter) {
            return Ok(());
        }

        loop {
            if self.shutdown.is_requested() {
                break;
            }
            if let Err(e) = self.run_round(ipv4) {
                tracing::error!("probe round for {} failed: {}", self.host.address(), e);
                return Err(e);
            }
            self.sleep_until_next_round();
        }
        tracing::debug!("probe loop for {} stopped", self.host.address());
        Ok(())
    }

    /// One full round: send, await the matching reply, record, report.
    fn run_round(&mut self, ipv4: Ipv4Addr) -> ProbeResult<ProbeOutcome> {
        let sequence_number = self.state.advance_sequence();
        let send_time = self
            .icmpv4
            .send_to(ipv4, self.host.ident(), sequence_number)?;
        self.state.record_send(send_time, SystemTime::now());

        let deadline = send_time + self.host.timeout();
        let outcome = self.await_reply(sequence_number, deadline)?;

        let rtt_ms = match outcome {
            ProbeOutcome::Matched { rtt_ms } => {
                tracing::info!("{} {} {:.2}", self.host.address(), self.host.name(), rtt_ms);
                rtt_ms
            }
            ProbeOutcome::TimedOut => {
                tracing::warn!("{} {} timeout", self.host.address(), self.host.name());
                RTT_TIMED_OUT_MS
            }
        };
        let sent_at = self
            .state
            .sent_at()
            .expect("logic error: round reported before send");
        self.report(sent_at, rtt_ms);

        Ok(outcome)
    }

    /// Receives until the matching reply arrives or the deadline passes.
    /// Non-matching frames (stale sequence, foreign identifier, malformed)
    /// are discarded and the wait continues under the same deadline.
    fn await_reply(
        &mut self,
        sequence_number: SequenceNumber,
        deadline: Instant,
    ) -> ProbeResult<ProbeOutcome> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                self.state.record_timeout();
                return Ok(ProbeOutcome::TimedOut);
            }
            let remaining = cmp::max(deadline - now, MIN_READ_TIMEOUT);
            self.icmpv4.set_read_timeout(remaining)?;

            let Some(reply) = self.icmpv4.try_receive()? else {
                continue;
            };
            if reply.header.is_echo_reply()
                && reply.header.ident == self.host.ident()
                && reply.header.sequence_number == sequence_number
            {
                let rtt_ms = self.state.record_match(reply.receive_time);
                return Ok(ProbeOutcome::Matched { rtt_ms });
            }
            tracing::trace!(
                "{}: discarding non-matching frame (type {}, ident {}, sequence {:?})",
                self.host.address(),
                reply.header.icmp_type,
                reply.header.ident,
                reply.header.sequence_number
            );
        }
    }

    fn report(&self, sent_at: SystemTime, rtt_ms: f64) {
        let Some(sink) = &self.sink else {
            return;
        };
        let tags = SampleTags {
            address: self.host.address(),
            name: self.host.name(),
        };
        if let Err(e) = sink.record(tags, sent_at, rtt_ms) {
            tracing::error!("could not record sample for {}: {}", self.host.address(), e);
        }
    }

    /// Sleeps out the remainder of the probe interval, measured from the
    /// last send. Nothing is left of it when the timeout already consumed
    /// the whole interval; the next round then starts immediately.
    fn sleep_until_next_round(&self) {
        let Some(send_time) = self.state.send_time() else {
            return;
        };
        let next_round = send_time + self.host.interval();
        let now = Instant::now();
        if next_round > now {
            self.shutdown.wait_timeout(next_round - now);
        }
    }
}
