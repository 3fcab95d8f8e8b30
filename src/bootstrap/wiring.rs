//! Dependency wiring: settings and platform parts in, a ready monitor out.

use std::sync::Arc;

use anyhow::{Context, Result};
use cv_app::{
    CaptureSnapshotDeps, CaptureSnapshotUseCase, CleanupHistoryUseCase, ClipboardCycleService,
    OwnerAppFilter, OwnerFilteringListener, PurgeHistoryUseCase, SetClipboardDataUseCase,
    SnapshotBroadcaster,
};
use cv_core::ports::{
    ClockPort, HistoryStorePort, ImageCodecPort, ProcessInfoPort, SystemClipboardPort,
};
use cv_core::{ChangeDetector, ClipboardGateway, FormatCatalog};
use cv_infra::config::CaptureSettings;
use cv_infra::{hasher_for, FsHistoryStore, ImageCrateCodec, SystemClock};
use cv_platform::clipboard::InMemoryClipboard;
use cv_platform::notify::{ManualNotificationSource, ManualNotifier, NotificationSource};
use cv_platform::runtime::{MonitorHandle, MonitorRuntime};
use tracing::info;

/// OS-facing pieces the monitor is built from.
pub struct PlatformParts {
    pub backend: Arc<dyn SystemClipboardPort>,
    pub process_info: Arc<dyn ProcessInfoPort>,
    pub source: Box<dyn NotificationSource>,
}

/// Native clipboard, owner lookup and change notifications.
#[cfg(windows)]
pub fn native_platform() -> PlatformParts {
    use cv_platform::clipboard::Win32Clipboard;
    use cv_platform::notify::ClipboardRsWatcherSource;
    use cv_platform::process::Win32ProcessInfo;

    PlatformParts {
        backend: Arc::new(Win32Clipboard::new()),
        process_info: Arc::new(Win32ProcessInfo),
        source: Box::new(ClipboardRsWatcherSource::new()),
    }
}

/// Without a native backend the monitor runs on a process-local clipboard.
#[cfg(not(windows))]
pub fn native_platform() -> PlatformParts {
    let (parts, _clipboard, _notifier) = in_memory_platform();
    parts
}

/// Process-local clipboard whose changes are reported through the returned notifier.
pub fn in_memory_platform() -> (PlatformParts, Arc<InMemoryClipboard>, ManualNotifier) {
    let clipboard = Arc::new(InMemoryClipboard::new());
    let (source, notifier) = ManualNotificationSource::new();
    clipboard.attach_notifier(notifier.clone());
    let parts = PlatformParts {
        backend: clipboard.clone(),
        process_info: Arc::new(cv_platform::process::NoopProcessInfo),
        source: Box::new(source),
    };
    (parts, clipboard, notifier)
}

/// Everything a command needs. `monitor` must be spawned for `handle` to answer.
pub struct AppRuntime {
    pub catalog: FormatCatalog,
    pub broadcaster: Arc<SnapshotBroadcaster>,
    pub owner_filters: Vec<Arc<OwnerAppFilter>>,
    pub cleanup: CleanupHistoryUseCase,
    pub purge: PurgeHistoryUseCase,
    pub monitor: MonitorRuntime,
    pub handle: MonitorHandle,
}

pub fn wire(settings: &CaptureSettings, platform: PlatformParts) -> Result<AppRuntime> {
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let codec: Arc<dyn ImageCodecPort> = Arc::new(ImageCrateCodec);
    let history: Arc<dyn HistoryStorePort> =
        Arc::new(FsHistoryStore::new(settings.history_root.clone(), clock.clone()));
    let catalog = settings.catalog();

    let owner_filters = settings
        .owner_filters
        .iter()
        .map(|filter| {
            OwnerAppFilter::new(filter.name.clone(), filter.pattern.clone())
                .map(Arc::new)
                .with_context(|| format!("Invalid owner filter '{}'", filter.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let broadcaster = Arc::new(SnapshotBroadcaster::new());
    let listener = Arc::new(OwnerFilteringListener::new(
        owner_filters.clone(),
        broadcaster.clone(),
    ));

    let capture = Arc::new(CaptureSnapshotUseCase::new(CaptureSnapshotDeps {
        catalog: catalog.clone(),
        max_item_bytes: settings.max_item_bytes,
        detector: ChangeDetector::new(hasher_for(settings.hash_algorithm)),
        history: history.clone(),
        codec: codec.clone(),
        process_info: platform.process_info.clone(),
        clock: clock.clone(),
        listener,
    }));
    let set_data = Arc::new(SetClipboardDataUseCase::new(
        catalog.clone(),
        history.clone(),
        codec,
    ));

    let (monitor, handle) = MonitorRuntime::new(
        ClipboardGateway::new(platform.backend, settings.acquire),
        platform.process_info,
        platform.source,
        Arc::new(ClipboardCycleService::new(capture, set_data)),
        settings.debounce,
    );

    info!(
        formats = catalog.len(),
        history_root = %settings.history_root.display(),
        retention = %settings.retention,
        "Application wired"
    );

    Ok(AppRuntime {
        catalog,
        broadcaster,
        owner_filters,
        cleanup: CleanupHistoryUseCase::new(history.clone(), clock, settings.retention),
        purge: PurgeHistoryUseCase::new(history),
        monitor,
        handle,
    })
}
