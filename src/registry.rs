use std::collections::HashMap;

use crate::Host;

/// Insertion-ordered, deduplicated collection of monitored endpoints, keyed
/// by address. Populated single-threaded before probing starts; the probe
/// loops never touch it.
///
/// Invariant: `queue` and `index` always contain exactly the same keys.
#[derive(Default)]
pub struct HostRegistry {
    queue: Vec<String>,
    index: HashMap<String, Host>,
}

impl HostRegistry {
    pub fn new() -> HostRegistry {
        HostRegistry::default()
    }

    /// Stores the host and appends the key to the iteration order. A no-op
    /// if the key is already present.
    pub fn append(&mut self, key: &str, host: Host) {
        if !self.index.contains_key(key) {
            self.index.insert(key.to_owned(), host);
            self.queue.push(key.to_owned());
        }
    }

    /// Removes the key from both the order and the index. A no-op if the key
    /// is absent.
    pub fn delete(&mut self, key: &str) {
        if self.index.remove(key).is_some() {
            self.queue.retain(|k| k != key);
        }
    }

    /// Yields hosts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Host> {
        self.queue.iter().filter_map(|key| self.index.get(key))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
