//! clipvault application layer
//!
//! Use cases that run inside the monitor's capture and load cycles, snapshot
//! listeners, and history maintenance.

pub mod listeners;
pub mod usecases;

pub use listeners::{ChannelSnapshotListener, OwnerAppFilter, OwnerFilteringListener, SnapshotBroadcaster};
pub use usecases::{
    CaptureSnapshotDeps, CaptureSnapshotUseCase, CleanupHistoryUseCase, ClipboardCycleService,
    PurgeHistoryUseCase, SetClipboardDataUseCase,
};
