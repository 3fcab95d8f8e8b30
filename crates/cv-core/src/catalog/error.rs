use thiserror::Error;

use crate::clipboard::LogicalFormat;
use crate::ports::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("format {0} is not registered in this catalog")]
    UnknownFormat(LogicalFormat),

    #[error("unknown clipboard format name: {0}")]
    UnknownFormatName(String),
}

/// Why a single format was skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("clipboard entry is empty")]
    Empty,

    #[error("{size} bytes exceed the {max} byte limit")]
    SizeExceeded { size: usize, max: usize },

    #[error("malformed clipboard data: {0}")]
    Malformed(String),
}

/// Why a representation could not be turned into clipboard payloads (or a
/// captured item into history bytes).
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("representation value is empty")]
    EmptyValue,

    #[error("stored history entry was not provided")]
    MissingStoredBytes,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
