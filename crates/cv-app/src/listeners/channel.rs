use std::sync::Arc;

use cv_core::clipboard::Snapshot;
use cv_core::ports::SnapshotListener;
use tokio::sync::mpsc;
use tracing::debug;

/// Forwards snapshots into an unbounded channel so consumers can do slow work
/// off the monitor task.
pub struct ChannelSnapshotListener {
    tx: mpsc::UnboundedSender<Arc<Snapshot>>,
}

impl ChannelSnapshotListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Arc<Snapshot>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SnapshotListener for ChannelSnapshotListener {
    fn on_snapshot(&self, snapshot: Arc<Snapshot>) {
        if self.tx.send(snapshot).is_err() {
            debug!("Snapshot receiver dropped");
        }
    }
}
