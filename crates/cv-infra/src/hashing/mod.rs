mod blake_hasher;
mod sha256_hasher;

pub use blake_hasher::Blake3Hasher;
pub use sha256_hasher::Sha256Hasher;

use std::sync::Arc;

use cv_core::ports::ContentHashPort;
use cv_core::HashAlgorithm;

pub fn hasher_for(alg: HashAlgorithm) -> Arc<dyn ContentHashPort> {
    match alg {
        HashAlgorithm::Sha256 => Arc::new(Sha256Hasher),
        HashAlgorithm::Blake3V1 => Arc::new(Blake3Hasher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_digest() {
        let fp = Sha256Hasher.hash_bytes(b"hello").unwrap();
        assert_eq!(
            fp.to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(fp.alg, HashAlgorithm::Sha256);
    }

    #[test]
    fn fingerprints_are_stable_and_sensitive_to_single_bytes() {
        for alg in [HashAlgorithm::Sha256, HashAlgorithm::Blake3V1] {
            let hasher = hasher_for(alg);
            let a = hasher.hash_bytes(b"clipboard payload").unwrap();
            let b = hasher.hash_bytes(b"clipboard payload").unwrap();
            let c = hasher.hash_bytes(b"clipboard paylaod").unwrap();

            assert_eq!(a, b);
            assert_ne!(a, c);
            assert_eq!(hasher.algorithm(), alg);
        }
    }

    #[test]
    fn algorithms_never_compare_equal() {
        let sha = Sha256Hasher.hash_bytes(b"x").unwrap();
        let blake = Blake3Hasher.hash_bytes(b"x").unwrap();
        assert_ne!(sha, blake);
    }
}
