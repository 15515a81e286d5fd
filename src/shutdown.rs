use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Process-wide cooperative termination flag. Write-once (false to true),
/// shared by every probe loop; waiting on it makes in-flight sleeps end
/// promptly once shutdown is requested.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    condition: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> ShutdownSignal {
        ShutdownSignal::default()
    }

    pub fn request(&self) {
        let (lock, cvar) = &*self.condition;
        let mut requested = lock.lock().expect("shutdown signal lock poisoned");
        *requested = true;
        cvar.notify_all();
    }

    pub fn is_requested(&self) -> bool {
        let (lock, _) = &*self.condition;
        *lock.lock().expect("shutdown signal lock poisoned")
    }

    /// Waits up to `timeout` or until shutdown is requested, whichever comes
    /// first. Returns whether shutdown has been requested.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.condition;
        let requested = lock.lock().expect("shutdown signal lock poisoned");
        let (requested, _) = cvar
            .wait_timeout_while(requested, timeout, |requested| !*requested)
            .expect("shutdown signal lock poisoned");
        *requested
    }
}
