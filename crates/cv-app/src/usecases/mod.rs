//! Business logic use cases
//!
//! [MonitorRuntime] (cv-platform)
//!         ↓ RunCapture / SetClipboardData
//! ClipboardCycleService
//!         ↓
//! CaptureSnapshotUseCase → SnapshotBroadcaster → listeners
//! SetClipboardDataUseCase
//!
//! CleanupHistoryUseCase / PurgeHistoryUseCase run outside the cycle.

mod capture_snapshot;
mod cycle_service;
mod history_maintenance;
mod set_clipboard_data;

pub use capture_snapshot::{CaptureSnapshotDeps, CaptureSnapshotUseCase};
pub use cycle_service::ClipboardCycleService;
pub use history_maintenance::{CleanupHistoryUseCase, CleanupOutcome, PurgeHistoryUseCase};
pub use set_clipboard_data::SetClipboardDataUseCase;
