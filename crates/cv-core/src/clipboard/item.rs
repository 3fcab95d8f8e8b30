use bytes::Bytes;

use super::LogicalFormat;

/// Bytes extracted for one logical format during a capture cycle.
///
/// The item owns its buffers; they are released when the item (or the record
/// built from it) goes out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedItem {
    format: LogicalFormat,
    data: Bytes,
    header: Option<Bytes>,
}

impl CapturedItem {
    pub fn new(format: LogicalFormat, data: impl Into<Bytes>) -> Self {
        Self {
            format,
            data: data.into(),
            header: None,
        }
    }

    /// Attach a secondary header blob (bitmap info header for rasters).
    pub fn with_header(mut self, header: impl Into<Bytes>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn format(&self) -> LogicalFormat {
        self.format
    }

    /// Content bytes. These, and only these, determine the fingerprint.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn header(&self) -> Option<&[u8]> {
        self.header.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
