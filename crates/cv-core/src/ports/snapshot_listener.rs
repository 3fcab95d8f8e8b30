use std::sync::Arc;

use crate::clipboard::Snapshot;

/// Consumer of emitted snapshots.
///
/// Called synchronously on the monitor task, in registration order. Keep the
/// work short: a slow listener delays the next capture cycle.
pub trait SnapshotListener: Send + Sync {
    fn on_snapshot(&self, snapshot: Arc<Snapshot>);
}
