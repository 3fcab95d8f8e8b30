//! # cv-core
//!
//! Core domain models and business logic for clipvault.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the format catalog, change detection, the clipboard lock protocol and the
//! monitor state machine. Everything that touches the OS, the filesystem or a
//! codec is reached through [`ports`].

// Public module exports
pub mod catalog;
pub mod change;
pub mod clipboard;
pub mod config;
pub mod gateway;
pub mod history;
pub mod monitor;
pub mod ports;

// Re-export commonly used types at the crate root
pub use catalog::{CatalogError, FormatCatalog, FormatRule};
pub use change::{ChangeDetector, FingerprintMap, PreviousState};
pub use clipboard::{
    CapturedItem, ContentFingerprint, HashAlgorithm, LoadError, LoadRequest, LogicalFormat,
    OsFormat, Record, Representation, Snapshot, WindowHandle,
};
pub use config::AppConfig;
pub use gateway::{AcquirePolicy, ClipboardGateway, ClipboardSession};
pub use history::RetentionPeriod;
pub use monitor::{MonitorAction, MonitorError, MonitorEvent, MonitorPhase, MonitorState};
