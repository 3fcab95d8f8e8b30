use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Sha256,
    Blake3V1,
}

/// Fixed-length content hash of a captured item.
///
/// Two fingerprints are equal only if both the algorithm and the digest match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint {
    pub alg: HashAlgorithm,
    #[serde(with = "hex::serde")]
    pub bytes: [u8; 32],
}

impl ContentFingerprint {
    pub fn new(alg: HashAlgorithm, bytes: [u8; 32]) -> Self {
        Self { alg, bytes }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
