use std::path::Path;
use std::sync::Arc;

use cv_core::ports::{HistoryStorePort, ImageCodecPort};
use cv_core::{ClipboardGateway, FormatCatalog, LoadError, LoadRequest, LogicalFormat, OsFormat};
use tracing::{debug, info, info_span, warn, Instrument};

type Payloads = Vec<(OsFormat, Vec<u8>)>;

/// Puts stored representations back on the clipboard.
///
/// Payloads are prepared (history files read, images decoded) before the lock
/// is taken. Under the lock the clipboard is cleared and every prepared format
/// is written in catalog order. The write is marked as self-originated so the
/// monitor ignores the change notification it causes.
pub struct SetClipboardDataUseCase {
    catalog: FormatCatalog,
    history: Arc<dyn HistoryStorePort>,
    codec: Arc<dyn ImageCodecPort>,
}

impl SetClipboardDataUseCase {
    pub fn new(
        catalog: FormatCatalog,
        history: Arc<dyn HistoryStorePort>,
        codec: Arc<dyn ImageCodecPort>,
    ) -> Self {
        Self {
            catalog,
            history,
            codec,
        }
    }

    pub async fn execute(
        &self,
        gateway: &mut ClipboardGateway,
        request: LoadRequest,
    ) -> Result<(), LoadError> {
        let span = info_span!("usecase.set_clipboard_data.execute", formats = request.len());
        self.run(gateway, request).instrument(span).await
    }

    async fn run(&self, gateway: &mut ClipboardGateway, request: LoadRequest) -> Result<(), LoadError> {
        if request.is_empty() {
            return Err(LoadError::EmptyRequest);
        }

        let prepared = self.prepare(&request).await;
        if prepared.is_empty() {
            return Err(LoadError::NothingPrepared);
        }

        let mut session = gateway.try_acquire().ok_or(LoadError::Contention)?;
        session.clear()?;
        session.mark_self_originated();
        for (format, payloads) in &prepared {
            for (os_format, bytes) in payloads {
                session.write(*os_format, bytes).map_err(|err| {
                    warn!(format = %format, os_format = %os_format, error = %err, "Clipboard write failed");
                    err
                })?;
            }
        }
        session.release();

        info!(formats = prepared.len(), "Clipboard data set");
        Ok(())
    }

    async fn prepare(&self, request: &LoadRequest) -> Vec<(LogicalFormat, Payloads)> {
        for format in request.formats().filter(|format| !self.catalog.contains(*format)) {
            debug!(format = %format, "Format not in catalog, ignored");
        }

        let mut prepared = Vec::new();
        for rule in self.catalog.rules() {
            let format = rule.format();
            let Some(value) = request.get(format) else {
                continue;
            };

            let loading = rule.loading();
            let stored = if loading.reads_stored_file() {
                match self.history.read_entry(Path::new(value)).await {
                    Ok(bytes) => Some(bytes),
                    Err(err) => {
                        warn!(format = %format, error = %err, "Stored entry unreadable, format skipped");
                        continue;
                    }
                }
            } else {
                None
            };

            match loading.payloads(rule.primary(), value, stored.as_deref(), self.codec.as_ref()) {
                Ok(payloads) => prepared.push((format, payloads)),
                Err(err) => warn!(format = %format, error = %err, "Representation skipped"),
            }
        }
        prepared
    }
}
