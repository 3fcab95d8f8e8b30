use anyhow::Result;
use cv_core::ports::ContentHashPort;
use cv_core::{ContentFingerprint, HashAlgorithm};
use sha2::{Digest, Sha256};

pub struct Sha256Hasher;

impl ContentHashPort for Sha256Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }

    fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentFingerprint> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(ContentFingerprint::new(HashAlgorithm::Sha256, bytes))
    }
}
