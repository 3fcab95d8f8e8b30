//! # cv-platform
//!
//! Platform-specific implementations for clipvault.
//!
//! Clipboard backends, owner-process lookup, raw change notifications,
//! application directories and the monitor runtime that ties them to the
//! state machine in cv-core.

pub mod app_dirs;
pub mod clipboard;
pub mod notify;
pub mod process;
pub mod runtime;
