use std::collections::BTreeMap;

use thiserror::Error;

use super::{LogicalFormat, Snapshot};
use crate::ports::ClipboardBackendError;

/// Representations to put back on the clipboard, keyed by logical format.
///
/// Values are either inline text (Text, Files) or a path to a stored history
/// entry (Rtf, Html, Png, Bitmap), exactly as found in a snapshot record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadRequest {
    entries: BTreeMap<LogicalFormat, String>,
}

impl LoadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, format: LogicalFormat, value: impl Into<String>) -> Self {
        self.insert(format, value);
        self
    }

    pub fn insert(&mut self, format: LogicalFormat, value: impl Into<String>) {
        self.entries.insert(format, value.into());
    }

    pub fn get(&self, format: LogicalFormat) -> Option<&str> {
        self.entries.get(&format).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn formats(&self) -> impl Iterator<Item = LogicalFormat> + '_ {
        self.entries.keys().copied()
    }
}

impl FromIterator<(LogicalFormat, String)> for LoadRequest {
    fn from_iter<T: IntoIterator<Item = (LogicalFormat, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<&Snapshot> for LoadRequest {
    fn from(snapshot: &Snapshot) -> Self {
        snapshot
            .records()
            .iter()
            .map(|record| (record.format, record.representation.to_request_value()))
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("load request is empty")]
    EmptyRequest,

    #[error("clipboard lock could not be acquired")]
    Contention,

    #[error("no representation in the request could be prepared")]
    NothingPrepared,

    #[error(transparent)]
    Backend(#[from] ClipboardBackendError),
}
