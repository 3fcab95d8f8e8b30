use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clipboard_rs::{
    ClipboardHandler, ClipboardWatcher as RSClipboardWatcher, ClipboardWatcherContext,
    WatcherShutdown,
};
use cv_core::clipboard::WindowHandle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{NotificationSource, RawClipboardEvent, RawEventSender};

struct ChangeForwarder {
    window: WindowHandle,
    events: RawEventSender,
}

impl ClipboardHandler for ChangeForwarder {
    fn on_clipboard_change(&mut self) {
        if let Err(err) = self.events.try_send(RawClipboardEvent::Changed {
            window: self.window,
        }) {
            warn!(error = %err, "Dropped clipboard change notification");
        }
    }
}

/// Called on the watcher thread once its message loop has returned.
///
/// Unless the loop was stopped through [`NotificationSource::unsubscribe`],
/// the listening window is gone and the monitor is told so.
fn watch_loop_ended(window: WindowHandle, stopping: &AtomicBool, events: &RawEventSender) {
    if stopping.load(Ordering::SeqCst) {
        info!("clipboard watch stopped");
        return;
    }
    warn!(window = %window, "Clipboard watch loop ended unexpectedly");
    if events
        .blocking_send(RawClipboardEvent::WindowDestroyed { window })
        .is_err()
    {
        debug!("Monitor gone before the watcher ended");
    }
}

struct RunningWatcher {
    window: WindowHandle,
    shutdown: WatcherShutdown,
    stopping: Arc<AtomicBool>,
    _join: JoinHandle<()>,
}

/// Native change notifications through `clipboard-rs`'s watcher, which runs
/// its own message loop on a blocking thread.
#[derive(Default)]
pub struct ClipboardRsWatcherSource {
    running: Option<RunningWatcher>,
}

impl ClipboardRsWatcherSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSource for ClipboardRsWatcherSource {
    fn subscribe(&mut self, window: WindowHandle, events: RawEventSender) -> anyhow::Result<()> {
        if self.running.is_some() {
            debug!("Clipboard watcher already running, skipping start");
            return Ok(());
        }

        let mut watcher_ctx = ClipboardWatcherContext::new()
            .map_err(|e| anyhow::anyhow!("Failed to create watcher context: {}", e))?;
        let lifecycle_events = events.clone();
        let shutdown = watcher_ctx
            .add_handler(ChangeForwarder { window, events })
            .get_shutdown_channel();

        let stopping = Arc::new(AtomicBool::new(false));
        let loop_stopping = stopping.clone();
        let join = tokio::task::spawn_blocking(move || {
            info!("start clipboard watch");
            watcher_ctx.start_watch();
            watch_loop_ended(window, &loop_stopping, &lifecycle_events);
        });

        self.running = Some(RunningWatcher {
            window,
            shutdown,
            stopping,
            _join: join,
        });
        Ok(())
    }

    fn unsubscribe(&mut self, window: WindowHandle) {
        match self.running.take() {
            Some(running) if running.window == window => {
                running.stopping.store(true, Ordering::SeqCst);
                running.shutdown.stop();
                info!("Clipboard watcher stopped");
            }
            other => {
                self.running = other;
                debug!(window = %window, "Clipboard watcher not running for this window");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    const WINDOW: WindowHandle = WindowHandle(0x42);

    #[test]
    fn unexpected_loop_exit_reports_the_window_destroyed() {
        let (tx, mut rx) = mpsc::channel(4);

        watch_loop_ended(WINDOW, &AtomicBool::new(false), &tx);

        assert_eq!(
            rx.try_recv().unwrap(),
            RawClipboardEvent::WindowDestroyed { window: WINDOW }
        );
    }

    #[test]
    fn requested_stop_reports_nothing() {
        let (tx, mut rx) = mpsc::channel(4);

        watch_loop_ended(WINDOW, &AtomicBool::new(true), &tx);

        assert!(rx.try_recv().is_err());
    }
}
