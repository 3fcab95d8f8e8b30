//! Monitor runtime: executes the monitor state machine on one tokio task.

mod command;
mod monitor_runtime;

pub use command::{
    MonitorCommand, MonitorCommandReceiver, MonitorCommandSender, MonitorHandle, RuntimeError,
};
pub use monitor_runtime::MonitorRuntime;
