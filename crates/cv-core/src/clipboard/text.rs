//! UTF-16LE helpers for native clipboard text.

/// Encode text as UTF-16LE without a terminator.
pub fn encode_utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Encode text as UTF-16LE followed by a NUL code unit, the layout
/// `CF_UNICODETEXT` expects.
pub fn encode_utf16_nul(text: &str) -> Vec<u8> {
    let mut bytes = encode_utf16(text);
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

/// Decode UTF-16LE bytes, dropping trailing NUL padding.
///
/// A dangling odd byte is ignored and unpaired surrogates are replaced.
pub fn decode_utf16_trimmed(bytes: &[u8]) -> String {
    let mut units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    while units.last() == Some(&0) {
        units.pop();
    }
    String::from_utf16_lossy(&units)
}
