//! Raw clipboard notification sources.
//!
//! A source delivers "clipboard changed" and "window destroyed" facts for the
//! window it was subscribed on. It never filters or coalesces: deduplication
//! and debouncing belong to the monitor.

mod manual;
mod watcher;

pub use manual::{ManualNotificationSource, ManualNotifier};
pub use watcher::ClipboardRsWatcherSource;

use cv_core::clipboard::WindowHandle;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawClipboardEvent {
    Changed { window: WindowHandle },
    WindowDestroyed { window: WindowHandle },
}

pub type RawEventSender = mpsc::Sender<RawClipboardEvent>;
pub type RawEventReceiver = mpsc::Receiver<RawClipboardEvent>;

pub trait NotificationSource: Send {
    /// Start delivering events for `window` into `events`.
    fn subscribe(&mut self, window: WindowHandle, events: RawEventSender) -> anyhow::Result<()>;

    fn unsubscribe(&mut self, window: WindowHandle);
}
