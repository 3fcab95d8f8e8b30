use std::sync::{Arc, RwLock, RwLockReadGuard};

use cv_core::clipboard::Snapshot;
use cv_core::ports::SnapshotListener;
use tracing::trace;

/// Fans one snapshot out to every registered listener, in registration order.
#[derive(Default)]
pub struct SnapshotBroadcaster {
    listeners: RwLock<Vec<Arc<dyn SnapshotListener>>>,
}

impl SnapshotBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn SnapshotListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn SnapshotListener>>> {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotListener for SnapshotBroadcaster {
    fn on_snapshot(&self, snapshot: Arc<Snapshot>) {
        let listeners = self.read();
        trace!(listeners = listeners.len(), "Broadcasting snapshot");
        for listener in listeners.iter() {
            listener.on_snapshot(snapshot.clone());
        }
    }
}
