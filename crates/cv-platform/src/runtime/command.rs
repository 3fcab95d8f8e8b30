use std::sync::Arc;

use cv_core::clipboard::{LoadError, LoadRequest, Snapshot, WindowHandle};
use cv_core::monitor::{MonitorError, MonitorPhase};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

pub enum MonitorCommand {
    /// Start monitoring `window`.
    Start {
        window: WindowHandle,
        reply: oneshot::Sender<Result<(), MonitorError>>,
    },
    /// Stop monitoring. Idempotent.
    Stop { reply: oneshot::Sender<()> },
    /// Run a capture cycle now.
    CaptureNow {
        reply: oneshot::Sender<Option<Arc<Snapshot>>>,
    },
    /// Put representations back on the clipboard.
    SetClipboardData {
        request: LoadRequest,
        reply: oneshot::Sender<Result<(), LoadError>>,
    },
    /// Current phase of the monitor.
    Phase { reply: oneshot::Sender<MonitorPhase> },
    /// Stop and exit the runtime loop.
    Shutdown,
}

pub type MonitorCommandSender = mpsc::Sender<MonitorCommand>;
pub type MonitorCommandReceiver = mpsc::Receiver<MonitorCommand>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("monitor runtime is not running")]
    ChannelClosed,

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Cloneable control surface of a running [`super::MonitorRuntime`].
#[derive(Clone)]
pub struct MonitorHandle {
    cmd_tx: MonitorCommandSender,
}

impl MonitorHandle {
    pub fn new(cmd_tx: MonitorCommandSender) -> Self {
        Self { cmd_tx }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> MonitorCommand,
    ) -> Result<T, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(command(reply))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn start(&self, window: WindowHandle) -> Result<(), RuntimeError> {
        self.request(|reply| MonitorCommand::Start { window, reply })
            .await?
            .map_err(RuntimeError::from)
    }

    pub async fn stop(&self) -> Result<(), RuntimeError> {
        self.request(|reply| MonitorCommand::Stop { reply }).await
    }

    pub async fn capture_now(&self) -> Result<Option<Arc<Snapshot>>, RuntimeError> {
        self.request(|reply| MonitorCommand::CaptureNow { reply })
            .await
    }

    pub async fn set_clipboard_data(&self, request: LoadRequest) -> Result<(), RuntimeError> {
        self.request(|reply| MonitorCommand::SetClipboardData { request, reply })
            .await?
            .map_err(RuntimeError::from)
    }

    pub async fn phase(&self) -> Result<MonitorPhase, RuntimeError> {
        self.request(|reply| MonitorCommand::Phase { reply }).await
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(MonitorCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}
