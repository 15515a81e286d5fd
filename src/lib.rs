#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use host::Host;
pub use icmp::v4::{RawSocket, Socket};
pub use metrics::{MetricsSink, SampleTags, RTT_TIMED_OUT_MS};
pub use monitor::Monitor;
pub use probe::{ProbeEngine, ProbeOutcome};
pub use probe_error::{GenericError, ProbeError, ProbeResult};
pub use probe_state::ProbeState;
pub use registry::HostRegistry;
pub use resolve::resolve_ipv4;
pub use shutdown::ShutdownSignal;

mod host;
mod icmp;
mod metrics;
mod monitor;
mod probe;
mod probe_error;
mod probe_state;
mod registry;
mod resolve;
mod shutdown;
