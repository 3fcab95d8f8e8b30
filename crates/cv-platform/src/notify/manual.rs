use std::sync::{Arc, Mutex, MutexGuard};

use cv_core::clipboard::WindowHandle;
use tracing::warn;

use super::{NotificationSource, RawClipboardEvent, RawEventSender};

type Subscription = Option<(WindowHandle, RawEventSender)>;

fn lock(shared: &Mutex<Subscription>) -> MutexGuard<'_, Subscription> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Source whose events are raised by hand through a [`ManualNotifier`].
///
/// Pairs with [`crate::clipboard::InMemoryClipboard`], which fires the
/// notifier whenever its content changes.
pub struct ManualNotificationSource {
    shared: Arc<Mutex<Subscription>>,
}

/// Trigger side of a [`ManualNotificationSource`]. Events raised while nothing
/// is subscribed are dropped, like native notifications for an unregistered window.
#[derive(Clone)]
pub struct ManualNotifier {
    shared: Arc<Mutex<Subscription>>,
}

impl ManualNotificationSource {
    pub fn new() -> (Self, ManualNotifier) {
        let shared = Arc::new(Mutex::new(None));
        (
            Self {
                shared: shared.clone(),
            },
            ManualNotifier { shared },
        )
    }
}

impl NotificationSource for ManualNotificationSource {
    fn subscribe(&mut self, window: WindowHandle, events: RawEventSender) -> anyhow::Result<()> {
        *lock(&self.shared) = Some((window, events));
        Ok(())
    }

    fn unsubscribe(&mut self, window: WindowHandle) {
        let mut subscription = lock(&self.shared);
        if matches!(subscription.as_ref(), Some((current, _)) if *current == window) {
            *subscription = None;
        }
    }
}

impl ManualNotifier {
    pub fn subscribed_window(&self) -> Option<WindowHandle> {
        lock(&self.shared).as_ref().map(|(window, _)| *window)
    }

    pub fn clipboard_changed(&self) {
        self.send(|window| RawClipboardEvent::Changed { window });
    }

    pub fn window_destroyed(&self) {
        self.send(|window| RawClipboardEvent::WindowDestroyed { window });
    }

    fn send(&self, event: impl FnOnce(WindowHandle) -> RawClipboardEvent) {
        let subscription = lock(&self.shared);
        if let Some((window, tx)) = subscription.as_ref() {
            if let Err(err) = tx.try_send(event(*window)) {
                warn!(error = %err, "Dropped raw clipboard notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn events_reach_the_subscribed_window_only_while_subscribed() {
        let (mut source, notifier) = ManualNotificationSource::new();
        let (tx, mut rx) = mpsc::channel(8);
        let window = WindowHandle(7);

        notifier.clipboard_changed();
        source.subscribe(window, tx).unwrap();
        notifier.clipboard_changed();
        notifier.window_destroyed();
        source.unsubscribe(WindowHandle(8));
        assert_eq!(notifier.subscribed_window(), Some(window));
        source.unsubscribe(window);
        notifier.clipboard_changed();

        assert_eq!(rx.recv().await, Some(RawClipboardEvent::Changed { window }));
        assert_eq!(
            rx.recv().await,
            Some(RawClipboardEvent::WindowDestroyed { window })
        );
        assert!(rx.try_recv().is_err());
    }
}
