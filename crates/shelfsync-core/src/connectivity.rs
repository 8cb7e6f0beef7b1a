use tokio::sync::watch;
use tracing::info;

/// Publishes online/offline transitions
///
/// Whatever knows about the network (an OS hook, a reachability probe, a
/// test) calls `set_connected`. Only real transitions reach subscribers;
/// reporting the same state twice is swallowed.
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(connected: bool) -> Self {
        let (tx, _rx) = watch::channel(connected);
        Self { tx }
    }

    /// Report the current state; returns true if it was a transition
    pub fn set_connected(&self, connected: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });

        if changed {
            info!("Connectivity changed: {}", if connected { "online" } else { "offline" });
        }
        changed
    }

    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
