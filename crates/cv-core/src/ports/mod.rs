//! Port interfaces for the application layer
//!
//! Ports define the contract between the capture logic and the outside world:
//! the native clipboard, hashing, image codecs, the history store, process
//! lookups, the clock and snapshot consumers. This follows Hexagonal
//! Architecture principles, allowing the core business logic to remain
//! independent of external dependencies.

mod app_dirs;
mod clipboard;
mod clock;
mod cycle_handler;
mod hash;
mod history_store;
mod image_codec;
mod process_info;
mod snapshot_listener;

pub use app_dirs::{AppDirs, AppDirsError, AppDirsPort};
pub use clipboard::{ClipboardBackendError, SystemClipboardPort};
pub use clock::ClockPort;
pub use cycle_handler::{CaptureContext, ClipboardCycleHandler};
pub use hash::ContentHashPort;
pub use history_store::{HistoryStorePort, StorageError};
pub use image_codec::{CodecError, ImageCodecPort};
pub use process_info::ProcessInfoPort;
pub use snapshot_listener::SnapshotListener;
