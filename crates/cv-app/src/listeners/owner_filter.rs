use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cv_core::clipboard::Snapshot;
use cv_core::ports::SnapshotListener;
use regex::Regex;
use tracing::debug;

/// Suppresses snapshots produced by a given application.
///
/// `pattern` is compared against the owner executable path with `/` as the
/// separator and without regard to case. `*` matches any run of characters,
/// so `*/KeePass.exe` hides every KeePass install.
#[derive(Debug)]
pub struct OwnerAppFilter {
    name: String,
    pattern: String,
    matcher: Regex,
    filtered: AtomicU64,
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

impl OwnerAppFilter {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let body = normalize(&pattern)
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let matcher = Regex::new(&format!("(?is)^{body}$"))?;

        Ok(Self {
            name: name.into(),
            pattern,
            matcher,
            filtered: AtomicU64::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Snapshots suppressed by this filter so far.
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.matcher.is_match(&normalize(&path.to_string_lossy()))
    }
}

/// Listener decorator that drops snapshots whose owner matches a filter.
pub struct OwnerFilteringListener {
    filters: Vec<Arc<OwnerAppFilter>>,
    inner: Arc<dyn SnapshotListener>,
}

impl OwnerFilteringListener {
    pub fn new(filters: Vec<Arc<OwnerAppFilter>>, inner: Arc<dyn SnapshotListener>) -> Self {
        Self { filters, inner }
    }

    pub fn filters(&self) -> &[Arc<OwnerAppFilter>] {
        &self.filters
    }
}

impl SnapshotListener for OwnerFilteringListener {
    fn on_snapshot(&self, snapshot: Arc<Snapshot>) {
        if let Some(owner) = snapshot.owner_path() {
            if let Some(filter) = self.filters.iter().find(|filter| filter.matches(owner)) {
                filter.filtered.fetch_add(1, Ordering::Relaxed);
                debug!(filter = %filter.name, owner = %owner.display(), "Snapshot filtered by owner");
                return;
            }
        }
        self.inner.on_snapshot(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;

    use chrono::Local;

    use super::*;

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl SnapshotListener for Counter {
        fn on_snapshot(&self, _snapshot: Arc<Snapshot>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn owned_by(path: Option<&str>) -> Arc<Snapshot> {
        Arc::new(Snapshot::new(Local::now(), Vec::new()).with_owner(path.map(PathBuf::from), None))
    }

    #[test]
    fn exact_patterns_ignore_case_and_separator_style() {
        let filter = OwnerAppFilter::new("keepass", r"C:\Program Files\KeePass\KeePass.exe").unwrap();

        assert!(filter.matches(Path::new("c:/program files/keepass/KEEPASS.EXE")));
        assert!(!filter.matches(Path::new("C:/Program Files/KeePass/KeePass.exe.bak")));
    }

    #[test]
    fn wildcards_match_any_run_of_characters() {
        let filter = OwnerAppFilter::new("vault", "*/vault*.exe").unwrap();

        assert!(filter.matches(Path::new(r"D:\tools\Vault-2.exe")));
        assert!(!filter.matches(Path::new(r"D:\tools\vault.dll")));
    }

    #[test]
    fn regex_metacharacters_in_patterns_are_literal() {
        let filter = OwnerAppFilter::new("plus", "C:/a+b/(x).exe").unwrap();

        assert!(filter.matches(Path::new("C:/a+b/(x).exe")));
        assert!(!filter.matches(Path::new("C:/aab/x.exe")));
    }

    #[test]
    fn matching_snapshots_are_counted_and_not_forwarded() {
        let counter = Arc::new(Counter::default());
        let filter = Arc::new(OwnerAppFilter::new("secret", "*/secret.exe").unwrap());
        let listener = OwnerFilteringListener::new(vec![filter.clone()], counter.clone());

        listener.on_snapshot(owned_by(Some("C:/apps/secret.exe")));
        listener.on_snapshot(owned_by(Some("C:/apps/editor.exe")));
        listener.on_snapshot(owned_by(None));

        assert_eq!(filter.filtered_count(), 1);
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
