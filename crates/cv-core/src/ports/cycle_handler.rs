//! Clipboard cycle handler port
//!
//! The platform runtime decides *when* a capture or load runs; the application
//! layer implements *what* it does. It follows the Dependency Inversion Principle:
//! - Platform layer (low-level) depends on this abstraction
//! - App layer (high-level) implements this interface

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::change::PreviousState;
use crate::clipboard::{LoadError, LoadRequest, Snapshot};
use crate::gateway::ClipboardGateway;

/// State one capture cycle works on, lent by the monitor for the cycle's duration.
pub struct CaptureContext<'a> {
    pub gateway: &'a mut ClipboardGateway,
    pub previous: &'a mut PreviousState,
    /// Owner path cached when the triggering notification arrived.
    pub owner_path: Option<PathBuf>,
}

#[async_trait]
pub trait ClipboardCycleHandler: Send + Sync {
    /// Run one capture cycle. Returns the emitted snapshot, or `None` when the
    /// cycle was abandoned or found nothing new.
    async fn capture(&self, ctx: CaptureContext<'_>) -> Option<Arc<Snapshot>>;

    /// Put `request` back on the clipboard through `gateway`.
    async fn load(
        &self,
        gateway: &mut ClipboardGateway,
        request: LoadRequest,
    ) -> Result<(), LoadError>;
}
