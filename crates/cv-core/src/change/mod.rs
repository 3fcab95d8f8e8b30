//! Change detection.
//!
//! A capture cycle fingerprints every captured item and compares the whole
//! fingerprint map with the one from the last emitted snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;

use crate::clipboard::{CapturedItem, ContentFingerprint, LogicalFormat};
use crate::ports::ContentHashPort;

pub type FingerprintMap = BTreeMap<LogicalFormat, ContentFingerprint>;

/// Fingerprints of the last emitted capture. Empty when monitoring starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousState {
    fingerprints: FingerprintMap,
}

impl PreviousState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, format: LogicalFormat) -> Option<&ContentFingerprint> {
        self.fingerprints.get(&format)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn formats(&self) -> impl Iterator<Item = LogicalFormat> + '_ {
        self.fingerprints.keys().copied()
    }

    /// Swap in the fingerprints of a newly emitted capture.
    pub fn replace(&mut self, fingerprints: FingerprintMap) {
        self.fingerprints = fingerprints;
    }

    pub fn clear(&mut self) {
        self.fingerprints.clear();
    }
}

impl From<FingerprintMap> for PreviousState {
    fn from(fingerprints: FingerprintMap) -> Self {
        Self { fingerprints }
    }
}

pub struct ChangeDetector {
    hasher: Arc<dyn ContentHashPort>,
}

impl ChangeDetector {
    pub fn new(hasher: Arc<dyn ContentHashPort>) -> Self {
        Self { hasher }
    }

    pub fn fingerprint(&self, bytes: &[u8]) -> Result<ContentFingerprint> {
        self.hasher.hash_bytes(bytes)
    }

    /// Fingerprint each item's content bytes. Header blobs are not hashed.
    pub fn fingerprint_items(&self, items: &[CapturedItem]) -> Result<FingerprintMap> {
        items
            .iter()
            .map(|item| Ok((item.format(), self.fingerprint(item.data())?)))
            .collect()
    }

    /// True when key sets differ or any shared key carries a different fingerprint.
    ///
    /// Walks every entry instead of returning at the first difference.
    pub fn has_changed(current: &FingerprintMap, previous: &PreviousState) -> bool {
        let mut changed = current.len() != previous.len();
        for (format, fingerprint) in current {
            changed |= match previous.get(*format) {
                Some(prev) => prev != fingerprint,
                None => true,
            };
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::HashAlgorithm;

    /// Deterministic toy hasher: byte sum and length spread over the digest.
    struct SumHasher;

    impl ContentHashPort for SumHasher {
        fn algorithm(&self) -> HashAlgorithm {
            HashAlgorithm::Sha256
        }

        fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentFingerprint> {
            let mut digest = [0u8; 32];
            for (i, byte) in bytes.iter().enumerate() {
                digest[i % 32] = digest[i % 32].wrapping_add(*byte).wrapping_add(i as u8);
            }
            digest[31] = bytes.len() as u8;
            Ok(ContentFingerprint::new(HashAlgorithm::Sha256, digest))
        }
    }

    fn fp(seed: u8) -> ContentFingerprint {
        ContentFingerprint::new(HashAlgorithm::Sha256, [seed; 32])
    }

    fn map(entries: &[(LogicalFormat, u8)]) -> FingerprintMap {
        entries.iter().map(|(f, s)| (*f, fp(*s))).collect()
    }

    #[test]
    fn empty_against_empty_is_unchanged() {
        assert!(!ChangeDetector::has_changed(&FingerprintMap::new(), &PreviousState::new()));
    }

    #[test]
    fn identical_maps_are_unchanged() {
        let current = map(&[(LogicalFormat::Text, 1), (LogicalFormat::Html, 2)]);
        let previous = PreviousState::from(current.clone());
        assert!(!ChangeDetector::has_changed(&current, &previous));
    }

    #[test]
    fn differing_fingerprint_is_a_change() {
        let previous = PreviousState::from(map(&[(LogicalFormat::Text, 1)]));
        let current = map(&[(LogicalFormat::Text, 2)]);
        assert!(ChangeDetector::has_changed(&current, &previous));
    }

    #[test]
    fn differing_algorithm_is_a_change() {
        let previous = PreviousState::from(map(&[(LogicalFormat::Text, 1)]));
        let mut current = FingerprintMap::new();
        current.insert(
            LogicalFormat::Text,
            ContentFingerprint::new(HashAlgorithm::Blake3V1, [1; 32]),
        );
        assert!(ChangeDetector::has_changed(&current, &previous));
    }

    #[test]
    fn key_set_differences_are_changes() {
        let previous = PreviousState::from(map(&[(LogicalFormat::Text, 1)]));

        let superset = map(&[(LogicalFormat::Text, 1), (LogicalFormat::Rtf, 1)]);
        assert!(ChangeDetector::has_changed(&superset, &previous));

        let swapped = map(&[(LogicalFormat::Html, 1)]);
        assert!(ChangeDetector::has_changed(&swapped, &previous));

        assert!(ChangeDetector::has_changed(&FingerprintMap::new(), &previous));
    }

    #[test]
    fn fingerprint_items_ignores_header_blobs() {
        let detector = ChangeDetector::new(Arc::new(SumHasher));
        let plain = CapturedItem::new(LogicalFormat::Bitmap, vec![1, 2, 3, 4]);
        let with_header = plain.clone().with_header(vec![9; 40]);

        let a = detector.fingerprint_items(&[plain]).unwrap();
        let b = detector.fingerprint_items(&[with_header]).unwrap();

        assert_eq!(a, b);
    }

    mockall::mock! {
        Hasher {}

        impl ContentHashPort for Hasher {
            fn algorithm(&self) -> HashAlgorithm;
            fn hash_bytes(&self, bytes: &[u8]) -> Result<ContentFingerprint>;
        }
    }

    #[test]
    fn hashing_failure_fails_the_whole_map() {
        let mut hasher = MockHasher::new();
        hasher
            .expect_hash_bytes()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("digest unavailable")));
        let detector = ChangeDetector::new(Arc::new(hasher));

        let items = [
            CapturedItem::new(LogicalFormat::Text, vec![b'a', 0]),
            CapturedItem::new(LogicalFormat::Rtf, b"{}".to_vec()),
        ];

        assert!(detector.fingerprint_items(&items).is_err());
    }
}
