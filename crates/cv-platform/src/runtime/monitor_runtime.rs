use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cv_core::change::PreviousState;
use cv_core::clipboard::Snapshot;
use cv_core::gateway::ClipboardGateway;
use cv_core::monitor::{MonitorAction, MonitorEvent, MonitorState};
use cv_core::ports::{CaptureContext, ClipboardCycleHandler, ProcessInfoPort};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use super::command::{MonitorCommand, MonitorCommandReceiver, MonitorHandle};
use crate::notify::{NotificationSource, RawClipboardEvent, RawEventReceiver, RawEventSender};

const CHANNEL_CAPACITY: usize = 64;

/// Single task that owns the monitor state and runs every capture and load.
///
/// Raw notifications, control commands and the debounce deadline are
/// multiplexed in one loop, so cycles never overlap and the state needs no
/// locking. Notifications that arrive during a cycle wait in the channel.
pub struct MonitorRuntime {
    state: MonitorState,
    previous: PreviousState,
    gateway: ClipboardGateway,
    process_info: Arc<dyn ProcessInfoPort>,
    source: Box<dyn NotificationSource>,
    handler: Arc<dyn ClipboardCycleHandler>,
    debounce: Duration,
    deadline: Option<Instant>,
    owner_path: Option<PathBuf>,
    raw_tx: RawEventSender,
    raw_rx: RawEventReceiver,
    cmd_rx: MonitorCommandReceiver,
    shutting_down: bool,
}

impl MonitorRuntime {
    pub fn new(
        gateway: ClipboardGateway,
        process_info: Arc<dyn ProcessInfoPort>,
        source: Box<dyn NotificationSource>,
        handler: Arc<dyn ClipboardCycleHandler>,
        debounce: Duration,
    ) -> (Self, MonitorHandle) {
        let (raw_tx, raw_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let runtime = Self {
            state: MonitorState::new(),
            previous: PreviousState::new(),
            gateway,
            process_info,
            source,
            handler,
            debounce,
            deadline: None,
            owner_path: None,
            raw_tx,
            raw_rx,
            cmd_rx,
            shutting_down: false,
        };
        (runtime, MonitorHandle::new(cmd_tx))
    }

    /// Sender for feeding raw events from a source that is wired up outside
    /// [`NotificationSource::subscribe`].
    pub fn raw_sender(&self) -> RawEventSender {
        self.raw_tx.clone()
    }

    pub async fn run(mut self) {
        info!("Monitor runtime started");
        while !self.shutting_down {
            let deadline = self.deadline;
            let debounce_timer = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                Some(event) = self.raw_rx.recv() => {
                    self.handle_raw_event(event).await;
                }
                command = self.cmd_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("All monitor handles dropped");
                        self.shutting_down = true;
                    }
                },
                _ = debounce_timer => {
                    self.deadline = None;
                    self.dispatch(MonitorEvent::TimerFired).await;
                }
            }
        }

        self.dispatch(MonitorEvent::Stop).await;
        info!("Monitor runtime stopped");
    }

    async fn handle_raw_event(&mut self, event: RawClipboardEvent) {
        match event {
            RawClipboardEvent::Changed { window } => {
                let sequence = self.gateway.sequence_number();
                debug!(window = %window, sequence, "Clipboard change notification");
                self.dispatch(MonitorEvent::Notification { window, sequence })
                    .await;
            }
            RawClipboardEvent::WindowDestroyed { window } => {
                info!(window = %window, "Monitored window destroyed");
                self.dispatch(MonitorEvent::WindowDestroyed { window }).await;
            }
        }
    }

    async fn handle_command(&mut self, command: MonitorCommand) {
        match command {
            MonitorCommand::Start { window, reply } => {
                let sequence = self.gateway.sequence_number();
                let result = match self.state.apply(MonitorEvent::Start { window, sequence }) {
                    Ok(actions) => {
                        self.execute(actions).await;
                        info!(window = %window, sequence, "Monitoring started");
                        Ok(())
                    }
                    Err(err) => {
                        warn!(error = %err, "Start rejected");
                        Err(err)
                    }
                };
                let _ = reply.send(result);
            }
            MonitorCommand::Stop { reply } => {
                self.dispatch(MonitorEvent::Stop).await;
                let _ = reply.send(());
            }
            MonitorCommand::CaptureNow { reply } => {
                let snapshot = self.dispatch(MonitorEvent::CaptureRequested).await;
                let _ = reply.send(snapshot);
            }
            MonitorCommand::SetClipboardData { request, reply } => {
                let result = self.handler.load(&mut self.gateway, request).await;
                if let Err(err) = &result {
                    warn!(error = %err, "Set clipboard data failed");
                }
                if self.gateway.take_self_originated() {
                    self.dispatch(MonitorEvent::SelfWriteCompleted).await;
                }
                let _ = reply.send(result);
            }
            MonitorCommand::Phase { reply } => {
                let _ = reply.send(self.state.phase());
            }
            MonitorCommand::Shutdown => {
                info!("Monitor runtime shutting down");
                self.shutting_down = true;
            }
        }
    }

    async fn dispatch(&mut self, event: MonitorEvent) -> Option<Arc<Snapshot>> {
        match self.state.apply(event) {
            Ok(actions) => self.execute(actions).await,
            Err(err) => {
                warn!(error = %err, "Monitor event rejected");
                None
            }
        }
    }

    async fn execute(&mut self, actions: Vec<MonitorAction>) -> Option<Arc<Snapshot>> {
        let mut emitted = None;
        for action in actions {
            match action {
                MonitorAction::Subscribe { window } => {
                    if let Err(err) = self.source.subscribe(window, self.raw_tx.clone()) {
                        error!(window = %window, error = %err, "Failed to subscribe to clipboard notifications");
                    }
                }
                MonitorAction::Unsubscribe { window } => {
                    self.source.unsubscribe(window);
                    info!(window = %window, "Monitoring stopped");
                }
                MonitorAction::ResetPreviousState => {
                    self.previous.clear();
                    self.owner_path = None;
                }
                MonitorAction::StartDebounceTimer => {
                    self.deadline = Some(Instant::now() + self.debounce);
                }
                MonitorAction::CancelDebounceTimer => {
                    self.deadline = None;
                }
                MonitorAction::ResolveOwner => {
                    self.owner_path = self
                        .gateway
                        .owner_window()
                        .and_then(|window| self.process_info.path_of(window));
                }
                MonitorAction::RunCapture => {
                    let ctx = CaptureContext {
                        gateway: &mut self.gateway,
                        previous: &mut self.previous,
                        owner_path: self.owner_path.take(),
                    };
                    emitted = self.handler.capture(ctx).await;
                }
            }
        }
        emitted
    }
}
