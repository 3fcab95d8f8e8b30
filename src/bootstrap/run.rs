use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cv_app::ChannelSnapshotListener;
use cv_app::usecases::CleanupOutcome;
use cv_core::ports::AppDirsPort;
use cv_core::{FormatCatalog, LoadRequest, LogicalFormat, Snapshot, WindowHandle};
use cv_platform::app_dirs::DirsAppDirsAdapter;
use tracing::{info, warn};

use super::config::resolve_settings;
use super::tracing::init_tracing_subscriber;
use super::wiring::{native_platform, wire, AppRuntime};
use crate::cli::{Cli, Command, RestoreArgs};

/// How often `watch` asks for a retention sweep; the sweep itself throttles
/// to once per cleanup interval.
const CLEANUP_POLL: Duration = Duration::from_secs(60 * 60);

/// Entry point behind `main`.
pub async fn run_cli(cli: Cli) -> Result<()> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application data directory")?;
    init_tracing_subscriber(&app_dirs.logs_dir())?;

    let settings = resolve_settings(cli.config.as_deref(), &app_dirs.app_data_root)?;

    if let Command::Formats = cli.command {
        print_formats(&settings.catalog());
        return Ok(());
    }

    let app = wire(&settings, native_platform())?;
    run_command(cli.command, app).await
}

pub async fn run_command(command: Command, app: AppRuntime) -> Result<()> {
    let AppRuntime {
        catalog,
        broadcaster,
        owner_filters,
        cleanup,
        purge,
        monitor,
        handle,
    } = app;
    let monitor_task = tokio::spawn(monitor.run());

    match command {
        Command::Watch => {
            let (listener, mut snapshots) = ChannelSnapshotListener::new();
            broadcaster.register(Arc::new(listener));
            handle.start(cli_window()).await?;
            info!("Watching clipboard, press Ctrl-C to stop");

            let mut cleanup_tick = tokio::time::interval(CLEANUP_POLL);
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    Some(snapshot) = snapshots.recv() => print_snapshot(&snapshot)?,
                    _ = cleanup_tick.tick() => {
                        if let Err(err) = cleanup.execute().await {
                            warn!(error = %err, "History cleanup failed");
                        }
                    }
                }
            }

            for filter in &owner_filters {
                info!(filter = filter.name(), filtered = filter.filtered_count(), "Owner filter summary");
            }
        }
        Command::Capture => match handle.capture_now().await? {
            Some(snapshot) => print_snapshot(&snapshot)?,
            None => eprintln!("No new clipboard content"),
        },
        Command::Restore(args) => {
            handle.set_clipboard_data(load_request(&args)?).await?;
        }
        Command::Cleanup => match cleanup.execute_now().await? {
            CleanupOutcome::Removed(count) => println!("Removed {count} history entries"),
            CleanupOutcome::KeepAll => println!("Retention keeps all history"),
            CleanupOutcome::Skipped => {}
        },
        Command::Purge => {
            let count = purge.execute().await?;
            println!("Removed {count} history entries");
        }
        Command::Formats => print_formats(&catalog),
    }

    handle.shutdown().await?;
    monitor_task.await?;
    Ok(())
}

/// Synthetic window id the CLI subscribes under.
fn cli_window() -> WindowHandle {
    WindowHandle(std::process::id() as isize)
}

pub fn load_request(args: &RestoreArgs) -> Result<LoadRequest> {
    let mut request = LoadRequest::new();
    if let Some(text) = &args.text {
        request.insert(LogicalFormat::Text, text.as_str());
    }
    if let Some(files) = &args.files {
        request.insert(LogicalFormat::Files, files.as_str());
    }
    for entry in &args.stored {
        let Some((name, path)) = entry.split_once('=') else {
            bail!("Expected FORMAT=PATH, got '{entry}'");
        };
        let format = LogicalFormat::from_name(name.trim())?;
        request.insert(format, path);
    }
    if request.is_empty() {
        bail!("Nothing to restore: pass --text, --files or --stored");
    }
    Ok(request)
}

fn print_snapshot(snapshot: &Snapshot) -> Result<()> {
    println!("{}", serde_json::to_string(snapshot)?);
    Ok(())
}

fn print_formats(catalog: &FormatCatalog) {
    for rule in catalog.rules() {
        let aliases = rule
            .aliases()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let storage = rule
            .history()
            .map(|layout| format!("{}/*.{}", layout.folder, layout.extension))
            .unwrap_or_else(|| "inline".to_string());
        println!("{:<18} {:<28} {}", rule.format().name(), aliases, storage);
    }
}
