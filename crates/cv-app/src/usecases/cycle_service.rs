use std::sync::Arc;

use async_trait::async_trait;
use cv_core::ports::{CaptureContext, ClipboardCycleHandler};
use cv_core::{ClipboardGateway, LoadError, LoadRequest, Snapshot};

/// [`ClipboardCycleHandler`] handed to the monitor runtime.
pub struct ClipboardCycleService {
    capture: Arc<super::CaptureSnapshotUseCase>,
    set_data: Arc<super::SetClipboardDataUseCase>,
}

impl ClipboardCycleService {
    pub fn new(
        capture: Arc<super::CaptureSnapshotUseCase>,
        set_data: Arc<super::SetClipboardDataUseCase>,
    ) -> Self {
        Self { capture, set_data }
    }
}

#[async_trait]
impl ClipboardCycleHandler for ClipboardCycleService {
    async fn capture(&self, ctx: CaptureContext<'_>) -> Option<Arc<Snapshot>> {
        self.capture.execute(ctx).await
    }

    async fn load(
        &self,
        gateway: &mut ClipboardGateway,
        request: LoadRequest,
    ) -> Result<(), LoadError> {
        self.set_data.execute(gateway, request).await
    }
}
