use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use cv_core::catalog::HistoryLayout;
use cv_core::clipboard::dropfiles;
use cv_core::ports::{
    CaptureContext, ClockPort, HistoryStorePort, ImageCodecPort, ProcessInfoPort,
    SnapshotListener,
};
use cv_core::{
    CapturedItem, ChangeDetector, ClipboardGateway, ClipboardSession, FingerprintMap,
    FormatCatalog, FormatRule, LogicalFormat, OsFormat, Record, Representation, Snapshot,
};
use tracing::{debug, info, info_span, trace, warn, Instrument};

/// Collaborators of [`CaptureSnapshotUseCase`].
pub struct CaptureSnapshotDeps {
    pub catalog: FormatCatalog,
    /// Largest item kept, in bytes (joined path text for file lists, pixel
    /// array for bitmaps).
    pub max_item_bytes: usize,
    pub detector: ChangeDetector,
    pub history: Arc<dyn HistoryStorePort>,
    pub codec: Arc<dyn ImageCodecPort>,
    pub process_info: Arc<dyn ProcessInfoPort>,
    pub clock: Arc<dyn ClockPort>,
    pub listener: Arc<dyn SnapshotListener>,
}

/// One capture cycle: extract under the clipboard lock, then fingerprint,
/// compare, persist and emit with the lock released.
///
/// # Behavior
/// - Contention abandons the cycle.
/// - Formats are tried in catalog order; the first alias that is present and
///   extracts within the size limit wins for its format.
/// - Bitmap is skipped when a PNG alias is on the clipboard.
/// - Files are only taken when the drop effect allows copying.
/// - Nothing extracted, or nothing changed since the last emitted snapshot,
///   means no snapshot and an untouched previous state.
/// - A record whose history write fails is left out; the rest still emit.
pub struct CaptureSnapshotUseCase {
    deps: CaptureSnapshotDeps,
}

impl CaptureSnapshotUseCase {
    pub fn new(deps: CaptureSnapshotDeps) -> Self {
        Self { deps }
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.deps.catalog
    }

    pub async fn execute(&self, ctx: CaptureContext<'_>) -> Option<Arc<Snapshot>> {
        let span = info_span!("usecase.capture_snapshot.execute");
        self.run(ctx).instrument(span).await
    }

    async fn run(&self, ctx: CaptureContext<'_>) -> Option<Arc<Snapshot>> {
        let CaptureContext {
            gateway,
            previous,
            owner_path,
        } = ctx;

        let items = self.extract(gateway)?;

        let fingerprints = match self.deps.detector.fingerprint_items(&items) {
            Ok(fingerprints) => fingerprints,
            Err(err) => {
                warn!(error = %err, "Fingerprinting failed, capture abandoned");
                return None;
            }
        };
        if !ChangeDetector::has_changed(&fingerprints, previous) {
            debug!(formats = items.len(), "Clipboard content unchanged");
            return None;
        }
        previous.replace(fingerprints.clone());

        let records = self.persist(items, &fingerprints).await;
        if records.is_empty() {
            warn!("Every captured item failed to persist, nothing emitted");
            return None;
        }

        let owner_path = owner_path.or_else(|| {
            gateway
                .owner_window()
                .and_then(|window| self.deps.process_info.path_of(window))
        });
        let owner_icon = match &owner_path {
            Some(path) => self.deps.process_info.icon_bytes_of(path).await,
            None => None,
        };

        let snapshot = Arc::new(
            Snapshot::new(self.deps.clock.now_local(), records).with_owner(owner_path, owner_icon),
        );
        info!(
            formats = snapshot.records().len(),
            owner = ?snapshot.owner_path(),
            "Snapshot captured"
        );
        self.deps.listener.on_snapshot(snapshot.clone());
        Some(snapshot)
    }

    /// Lock-scoped part of the cycle. Returns `None` when the lock was not
    /// taken or no format could be extracted.
    fn extract(&self, gateway: &mut ClipboardGateway) -> Option<Vec<CapturedItem>> {
        let Some(session) = gateway.try_acquire() else {
            debug!("Clipboard busy, capture abandoned");
            return None;
        };

        let png_present = self.deps.catalog.contains(LogicalFormat::Png)
            && session.any_present(FormatRule::of(LogicalFormat::Png).aliases());

        let mut items = Vec::new();
        for rule in self.deps.catalog.rules() {
            match rule.format() {
                LogicalFormat::Bitmap if png_present => {
                    trace!("PNG present, raster bitmap skipped");
                    continue;
                }
                LogicalFormat::Files if !copy_allowed(&session) => {
                    trace!("File list without copy effect skipped");
                    continue;
                }
                _ => {}
            }
            if let Some(item) = self.extract_rule(&session, rule) {
                items.push(item);
            }
        }
        session.release();

        if items.is_empty() {
            debug!("No supported format on the clipboard");
            return None;
        }
        Some(items)
    }

    fn extract_rule(&self, session: &ClipboardSession<'_>, rule: &FormatRule) -> Option<CapturedItem> {
        for alias in rule.aliases() {
            if !session.probe(*alias) {
                continue;
            }
            let Some(raw) = session.read(*alias) else {
                debug!(format = %rule.format(), alias = %alias, "Entry vanished before read");
                continue;
            };
            match rule.extract(&raw, self.deps.max_item_bytes) {
                Ok(item) => {
                    trace!(format = %rule.format(), alias = %alias, bytes = item.len(), "Extracted");
                    return Some(item);
                }
                Err(err) => {
                    debug!(format = %rule.format(), alias = %alias, error = %err, "Extraction skipped");
                }
            }
        }
        None
    }

    async fn persist(&self, items: Vec<CapturedItem>, fingerprints: &FingerprintMap) -> Vec<Record> {
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let format = item.format();
            let Some(fingerprint) = fingerprints.get(&format).cloned() else {
                continue;
            };
            let representation = match FormatRule::of(format).history() {
                None => Representation::Inline(FormatRule::inline_text(&item)),
                Some(layout) => match self.store(layout, &item).await {
                    Ok(path) => Representation::Stored(path),
                    Err(err) => {
                        warn!(format = %format, error = %err, "History write failed, record omitted");
                        continue;
                    }
                },
            };
            records.push(Record {
                format,
                representation,
                fingerprint,
            });
        }
        records
    }

    async fn store(&self, layout: &HistoryLayout, item: &CapturedItem) -> Result<PathBuf> {
        let bytes = layout.encode(item, self.deps.codec.as_ref())?;
        Ok(self.deps.history.write_entry(layout, &bytes).await?)
    }
}

fn copy_allowed(session: &ClipboardSession<'_>) -> bool {
    session
        .read(OsFormat::PREFERRED_DROP_EFFECT)
        .and_then(|data| dropfiles::decode_drop_effect(&data))
        .is_some_and(dropfiles::allows_copy)
}
