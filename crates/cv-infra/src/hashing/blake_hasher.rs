use anyhow::Result;
use cv_core::ports::ContentHashPort;
use cv_core::{ContentFingerprint, HashAlgorithm};

pub struct Blake3Hasher;

impl ContentHashPort for Blake3Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Blake3V1
    }

    fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentFingerprint> {
        let hash = blake3::hash(bytes);
        Ok(ContentFingerprint::new(HashAlgorithm::Blake3V1, hash.into()))
    }
}
