//! # cv-infra
//!
//! Infrastructure adapters behind the cv-core ports: fingerprint hashers, the
//! filesystem history store, the image codec, the system clock and
//! configuration loading.

pub mod codec;
pub mod config;
pub mod fs;
pub mod hashing;
pub mod time;

pub use codec::ImageCrateCodec;
pub use fs::FsHistoryStore;
pub use hashing::{hasher_for, Blake3Hasher, Sha256Hasher};
pub use time::SystemClock;
