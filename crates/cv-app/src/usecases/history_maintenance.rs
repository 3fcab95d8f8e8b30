use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Duration;
use cv_core::history::CLEANUP_INTERVAL_HOURS;
use cv_core::ports::{ClockPort, HistoryStorePort};
use cv_core::RetentionPeriod;
use tracing::{debug, info, info_span, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// A sweep already ran within the cleanup interval.
    Skipped,
    /// Retention keeps everything.
    KeepAll,
    Removed(usize),
}

/// Deletes history entries older than the retention period, at most once per
/// cleanup interval.
pub struct CleanupHistoryUseCase {
    history: Arc<dyn HistoryStorePort>,
    clock: Arc<dyn ClockPort>,
    retention: RetentionPeriod,
    last_run_ms: Mutex<Option<i64>>,
}

impl CleanupHistoryUseCase {
    pub fn new(
        history: Arc<dyn HistoryStorePort>,
        clock: Arc<dyn ClockPort>,
        retention: RetentionPeriod,
    ) -> Self {
        Self {
            history,
            clock,
            retention,
            last_run_ms: Mutex::new(None),
        }
    }

    pub fn retention(&self) -> RetentionPeriod {
        self.retention
    }

    pub async fn execute(&self) -> Result<CleanupOutcome> {
        let now_ms = self.clock.now_ms();
        {
            let mut last_run = self
                .last_run_ms
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let interval_ms = Duration::hours(CLEANUP_INTERVAL_HOURS).num_milliseconds();
            if matches!(*last_run, Some(at) if now_ms - at < interval_ms) {
                debug!("History cleanup ran recently, skipped");
                return Ok(CleanupOutcome::Skipped);
            }
            *last_run = Some(now_ms);
        }
        self.sweep().await
    }

    /// Sweep regardless of when the last one ran.
    pub async fn execute_now(&self) -> Result<CleanupOutcome> {
        *self
            .last_run_ms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(self.clock.now_ms());
        self.sweep().await
    }

    async fn sweep(&self) -> Result<CleanupOutcome> {
        let span = info_span!("usecase.cleanup_history.execute", retention = %self.retention);
        async {
            let now = self.clock.now_local().naive_local();
            let Some(cutoff) = self.retention.cutoff(now) else {
                debug!("Retention keeps all history");
                return Ok(CleanupOutcome::KeepAll);
            };

            let removed = self
                .history
                .remove_entries_older_than(cutoff)
                .await
                .with_context(|| format!("failed to remove history entries older than {cutoff}"))?;
            info!(removed, cutoff = %cutoff, "History cleanup finished");
            Ok(CleanupOutcome::Removed(removed))
        }
        .instrument(span)
        .await
    }
}

/// Deletes every persisted history entry.
pub struct PurgeHistoryUseCase {
    history: Arc<dyn HistoryStorePort>,
}

impl PurgeHistoryUseCase {
    pub fn new(history: Arc<dyn HistoryStorePort>) -> Self {
        Self { history }
    }

    pub async fn execute(&self) -> Result<usize> {
        let span = info_span!("usecase.purge_history.execute");
        async {
            let removed = self
                .history
                .purge()
                .await
                .context("failed to purge history")?;
            info!(removed, "History purged");
            Ok(removed)
        }
        .instrument(span)
        .await
    }
}
