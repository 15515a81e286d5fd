use std::sync::Arc;
use std::thread::JoinHandle;

use crate::icmp::v4::Socket;
use crate::metrics::MetricsSink;
use crate::probe::ProbeEngine;
use crate::probe_error::ProbeResult;
use crate::registry::HostRegistry;
use crate::shutdown::ShutdownSignal;

/// Front end over the probe loops: spawns one thread per registry entry and
/// joins them on shutdown. Each thread opens its own socket; a failure in
/// one thread never affects another.
pub struct Monitor {
    shutdown: ShutdownSignal,
    threads: Vec<JoinHandle<()>>,
}

impl Monitor {
    pub fn start<S>(
        registry: &HostRegistry,
        sink: Option<Arc<dyn MetricsSink>>,
    ) -> ProbeResult<Monitor>
    where
        S: Socket + 'static,
    {
        let shutdown = ShutdownSignal::new();
        let mut threads = Vec::with_capacity(registry.len());

        for host in registry.iter() {
            let host = host.clone();
            let shutdown_handle = shutdown.clone();
            let sink = sink.clone();
            let thread_name = format!("probe-{}", host.address());
            let handle = std::thread::Builder::new().name(thread_name).spawn(move || {
                let socket = match S::new(host.timeout()) {
                    Ok(socket) => *socket,
                    Err(e) => {
                        tracing::error!("could not open socket for {}: {}", host.address(), e);
                        return;
                    }
                };
                let mut engine = ProbeEngine::new(host, socket, shutdown_handle, sink);
                // run() logs its own errors before returning them
                let _ = engine.run();
            })?;
            threads.push(handle);
        }

        Ok(Monitor { shutdown, threads })
    }

    /// The only control surface once probing has started: flips the shared
    /// shutdown flag. Every loop observes it at its round boundary and
    /// inside any in-flight wait.
    pub fn request_shutdown(&self) {
        self.shutdown.request();
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Blocks until every probe thread has stopped.
    pub fn wait(mut self) -> std::thread::Result<()> {
        for handle in self.threads.drain(..) {
            handle.join()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::v4::SocketMock;
    use crate::Host;
    use std::time::Duration;

    fn registry_of(addresses: &[&str]) -> HostRegistry {
        let mut registry = HostRegistry::new();
        for address in addresses {
            registry.append(address, Host::new(address, address, Duration::from_millis(100)));
        }
        registry
    }

    #[test]
    fn shutdown_stops_all_probe_threads() {
        let registry = registry_of(&["127.0.0.1", "127.0.0.2"]);

        let monitor = Monitor::start::<SocketMock>(&registry, None).unwrap();
        monitor.request_shutdown();

        monitor.wait().unwrap();
    }

    #[test]
    fn shutdown_via_cloned_signal_stops_the_monitor() {
        let registry = registry_of(&["127.0.0.1"]);

        let monitor = Monitor::start::<SocketMock>(&registry, None).unwrap();
        let signal = monitor.shutdown_signal();
        signal.request();

        monitor.wait().unwrap();
    }

    #[test]
    fn empty_registry_starts_and_stops() {
        let registry = HostRegistry::new();

        let monitor = Monitor::start::<SocketMock>(&registry, None).unwrap();

        monitor.wait().unwrap();
    }
}
