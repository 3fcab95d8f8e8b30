use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{ContentFingerprint, LogicalFormat};

/// How a captured item survives the capture cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Representation {
    /// Decoded text kept in the record itself.
    Inline(String),
    /// Path of the history file written for this item.
    Stored(PathBuf),
}

impl Representation {
    pub fn as_inline(&self) -> Option<&str> {
        match self {
            Representation::Inline(text) => Some(text),
            Representation::Stored(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Representation::Inline(_) => None,
            Representation::Stored(path) => Some(path),
        }
    }

    /// Value used when the record is loaded back onto the clipboard.
    pub fn to_request_value(&self) -> String {
        match self {
            Representation::Inline(text) => text.clone(),
            Representation::Stored(path) => path.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub format: LogicalFormat,
    pub representation: Representation,
    pub fingerprint: ContentFingerprint,
}

/// The result of one capture cycle that observed new content.
///
/// Immutable once built; listeners receive it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    captured_at: DateTime<Local>,
    records: Vec<Record>,
    owner_path: Option<PathBuf>,
    #[serde(skip)]
    owner_icon: Option<Vec<u8>>,
}

impl Snapshot {
    pub fn new(captured_at: DateTime<Local>, records: Vec<Record>) -> Self {
        Self {
            captured_at,
            records,
            owner_path: None,
            owner_icon: None,
        }
    }

    pub fn with_owner(mut self, path: Option<PathBuf>, icon: Option<Vec<u8>>) -> Self {
        self.owner_path = path;
        self.owner_icon = icon;
        self
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, format: LogicalFormat) -> Option<&Record> {
        self.records.iter().find(|record| record.format == format)
    }

    pub fn formats(&self) -> impl Iterator<Item = LogicalFormat> + '_ {
        self.records.iter().map(|record| record.format)
    }

    pub fn owner_path(&self) -> Option<&Path> {
        self.owner_path.as_deref()
    }

    pub fn owner_icon(&self) -> Option<&[u8]> {
        self.owner_icon.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
