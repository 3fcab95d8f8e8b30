use anyhow::Result;

use crate::clipboard::{ContentFingerprint, HashAlgorithm};

pub trait ContentHashPort: Send + Sync {
    fn algorithm(&self) -> HashAlgorithm;

    fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentFingerprint>;
}
