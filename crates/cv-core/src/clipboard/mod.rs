//! Clipboard domain models.
//!
//! Logical formats and their OS identifiers, captured items, fingerprints,
//! snapshots, load requests and the byte-level helpers used to move those
//! values on and off the native clipboard.
mod fingerprint;
mod format;
mod item;
mod load;
mod snapshot;
mod window;

pub mod dib;
pub mod dropfiles;
pub mod text;

pub use fingerprint::{ContentFingerprint, HashAlgorithm};
pub use format::{
    LogicalFormat, OsFormat, CF_DIB, CF_HDROP, CF_UNICODETEXT, HTML_FORMAT_NAME,
    IMAGE_PNG_FORMAT_NAME, PNG_FORMAT_NAME, PREFERRED_DROP_EFFECT_NAME, RTF_FORMAT_NAME,
};
pub use item::CapturedItem;
pub use load::{LoadError, LoadRequest};
pub use snapshot::{Record, Representation, Snapshot};
pub use window::WindowHandle;
