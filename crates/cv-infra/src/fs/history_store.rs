use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Timelike};
use cv_core::catalog::HistoryLayout;
use cv_core::ports::{ClockPort, HistoryStorePort, StorageError};
use cv_core::{FormatRule, LogicalFormat};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const STAMP_LEN: usize = 15;
/// One candidate name per millisecond of the current second and beyond.
const MAX_NAME_ATTEMPTS: i64 = 1000;

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// History store rooted at a directory, one sub-folder per persisted format.
///
/// Files are named `{yyyyMMdd_HHmmss}{ms:03}.{ext}` from the local time of
/// the write, e.g. `RtfFormat/20260305_142233017.rtf`.
pub struct FsHistoryStore {
    root: PathBuf,
    clock: Arc<dyn ClockPort>,
}

impl FsHistoryStore {
    pub fn new(root: PathBuf, clock: Arc<dyn ClockPort>) -> Self {
        Self { root, clock }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folders of every format with a history layout.
    pub fn folders(&self) -> Vec<PathBuf> {
        LogicalFormat::ALL
            .into_iter()
            .filter_map(|format| FormatRule::of(format).history())
            .map(|layout| self.root.join(layout.folder))
            .collect()
    }

    pub fn file_name(at: NaiveDateTime, extension: &str) -> String {
        format!(
            "{}{:03}.{}",
            at.format(STAMP_FORMAT),
            (at.nanosecond() / 1_000_000) % 1000,
            extension
        )
    }

    /// Timestamp encoded in a history file name, if it is one.
    pub fn parse_file_stamp(path: &Path) -> Option<NaiveDateTime> {
        let stem = path.file_stem()?.to_str()?;
        if stem.len() != STAMP_LEN + 3 || !stem.is_ascii() {
            return None;
        }
        let seconds = NaiveDateTime::parse_from_str(&stem[..STAMP_LEN], STAMP_FORMAT).ok()?;
        let millis: i64 = stem[STAMP_LEN..].parse().ok()?;
        Some(seconds + Duration::milliseconds(millis))
    }
}

#[async_trait]
impl HistoryStorePort for FsHistoryStore {
    async fn write_entry(
        &self,
        layout: &HistoryLayout,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let dir = self.root.join(layout.folder);
        if bytes.is_empty() {
            return Err(StorageError::EmptyEntry(dir));
        }
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        let now = self.clock.now_local().naive_local();
        for offset in 0..MAX_NAME_ATTEMPTS {
            let at = now + Duration::milliseconds(offset);
            let path = dir.join(Self::file_name(at, layout.extension));

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "History name taken, advancing");
                    continue;
                }
                Err(e) => return Err(io_error(&path, e)),
            };

            file.write_all(bytes)
                .await
                .map_err(|e| io_error(&path, e))?;
            file.flush().await.map_err(|e| io_error(&path, e))?;
            debug!(path = %path.display(), bytes = bytes.len(), "History entry written");
            return Ok(path);
        }

        Err(StorageError::NameExhausted(dir))
    }

    async fn read_entry(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let bytes = fs::read(path).await.map_err(|e| io_error(path, e))?;
        if bytes.is_empty() {
            return Err(StorageError::EmptyEntry(path.to_path_buf()));
        }
        Ok(bytes)
    }

    async fn remove_entries_older_than(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<usize, StorageError> {
        let mut removed = 0;
        for dir in self.folders() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(&dir, e)),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| io_error(&dir, e))?
            {
                let path = entry.path();
                let Some(stamp) = Self::parse_file_stamp(&path) else {
                    continue;
                };
                if stamp >= cutoff {
                    continue;
                }
                match fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove expired history entry"),
                }
            }
        }
        Ok(removed)
    }

    async fn purge(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        for dir in self.folders() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(&dir, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| io_error(&dir, e))?
            {
                let is_file = entry
                    .file_type()
                    .await
                    .map(|t| t.is_file())
                    .unwrap_or(false);
                if is_file {
                    removed += 1;
                }
            }
            fs::remove_dir_all(&dir)
                .await
                .map_err(|e| io_error(&dir, e))?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use tempfile::TempDir;

    use super::*;

    struct FixedClock(DateTime<Local>);

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0.timestamp_millis()
        }

        fn now_local(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn naive(day: u32, hour: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_milli_opt(hour, 22, 33, ms)
            .unwrap()
    }

    fn store_at(dir: &TempDir, at: NaiveDateTime) -> FsHistoryStore {
        let local = Local.from_local_datetime(&at).earliest().unwrap();
        FsHistoryStore::new(dir.path().to_path_buf(), Arc::new(FixedClock(local)))
    }

    fn rtf() -> &'static HistoryLayout {
        FormatRule::of(LogicalFormat::Rtf).history().unwrap()
    }

    #[test]
    fn file_names_carry_millisecond_suffix() {
        assert_eq!(
            FsHistoryStore::file_name(naive(5, 14, 17), "rtf"),
            "20260305_142233017.rtf"
        );
        assert_eq!(
            FsHistoryStore::parse_file_stamp(Path::new("RtfFormat/20260305_142233017.rtf")),
            Some(naive(5, 14, 17))
        );
        assert_eq!(FsHistoryStore::parse_file_stamp(Path::new("notes.rtf")), None);
    }

    #[tokio::test]
    async fn write_entry_places_file_under_format_folder() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, naive(5, 14, 17));

        let path = store.write_entry(rtf(), b"{\\rtf1 hi}").await.unwrap();

        assert_eq!(path, dir.path().join("RtfFormat").join("20260305_142233017.rtf"));
        assert_eq!(store.read_entry(&path).await.unwrap(), b"{\\rtf1 hi}");
    }

    #[tokio::test]
    async fn collisions_advance_the_millisecond_suffix() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, naive(5, 14, 999));

        let first = store.write_entry(rtf(), b"a").await.unwrap();
        let second = store.write_entry(rtf(), b"b").await.unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("20260305_142234000.rtf"));
        assert_eq!(store.read_entry(&first).await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn empty_entries_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, naive(5, 14, 0));

        assert!(matches!(
            store.write_entry(rtf(), b"").await,
            Err(StorageError::EmptyEntry(_))
        ));

        let empty = dir.path().join("empty.rtf");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(
            store.read_entry(&empty).await,
            Err(StorageError::EmptyEntry(_))
        ));
        assert!(matches!(
            store.read_entry(&dir.path().join("missing.rtf")).await,
            Err(StorageError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn cleanup_removes_only_entries_before_cutoff() {
        let dir = TempDir::new().unwrap();
        let old = store_at(&dir, naive(1, 10, 0))
            .write_entry(rtf(), b"old")
            .await
            .unwrap();
        let store = store_at(&dir, naive(9, 10, 0));
        let fresh = store.write_entry(rtf(), b"fresh").await.unwrap();
        std::fs::write(dir.path().join("RtfFormat").join("keep-me.txt"), b"x").unwrap();

        let removed = store.remove_entries_older_than(naive(5, 0, 0)).await.unwrap();

        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(dir.path().join("RtfFormat").join("keep-me.txt").exists());
    }

    #[tokio::test]
    async fn purge_removes_every_history_folder() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir, naive(5, 14, 0));
        store.write_entry(rtf(), b"a").await.unwrap();
        store.write_entry(rtf(), b"b").await.unwrap();
        let png = FormatRule::of(LogicalFormat::Png).history().unwrap();
        store.write_entry(png, b"\x89PNG").await.unwrap();

        assert_eq!(store.purge().await.unwrap(), 3);
        assert!(!dir.path().join("RtfFormat").exists());
        assert!(!dir.path().join("PngFormat").exists());
        assert_eq!(store.purge().await.unwrap(), 0);
    }
}
