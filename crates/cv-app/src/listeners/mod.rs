//! Snapshot consumers.

mod broadcaster;
mod channel;
mod owner_filter;

pub use broadcaster::SnapshotBroadcaster;
pub use channel::ChannelSnapshotListener;
pub use owner_filter::{OwnerAppFilter, OwnerFilteringListener};
