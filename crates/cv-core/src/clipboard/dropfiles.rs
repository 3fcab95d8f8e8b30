//! `CF_HDROP` file lists and the "Preferred DropEffect" companion entry.
//!
//! Layout of a `DROPFILES` block:
//!
//! ```text
//! offset  size  field
//! 0       4     pFiles  (offset of the path list, 20 for this header)
//! 4       8     pt      (drop point, unused)
//! 12      4     fNC     (non-client flag, unused)
//! 16      4     fWide   (1 = UTF-16 paths, 0 = ANSI)
//! 20      ...   NUL-terminated paths, list ends with an extra NUL
//! ```

use bytes::BufMut;

use crate::catalog::ExtractError;

/// Separator used when a file list is flattened into one string.
pub const FILE_PATHS_SEPARATOR: char = '|';

pub const DROPEFFECT_COPY: u32 = 1;
pub const DROPEFFECT_MOVE: u32 = 2;

const DROPFILES_HEADER_LEN: usize = 20;

/// Build a wide `DROPFILES` block for the given paths.
pub fn encode_file_list<S: AsRef<str>>(paths: &[S]) -> Vec<u8> {
    let units: usize = paths
        .iter()
        .map(|path| path.as_ref().encode_utf16().count() + 1)
        .sum();
    let mut buf = Vec::with_capacity(DROPFILES_HEADER_LEN + (units + 1) * 2);

    buf.put_u32_le(DROPFILES_HEADER_LEN as u32);
    buf.put_i32_le(0);
    buf.put_i32_le(0);
    buf.put_u32_le(0);
    buf.put_u32_le(1);

    for path in paths {
        for unit in path.as_ref().encode_utf16() {
            buf.put_u16_le(unit);
        }
        buf.put_u16_le(0);
    }
    buf.put_u16_le(0);

    buf
}

/// Parse a `DROPFILES` block into its paths, in order.
pub fn decode_file_list(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    if data.len() < DROPFILES_HEADER_LEN {
        return Err(ExtractError::Malformed("DROPFILES header truncated".into()));
    }

    let offset = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let wide = u32::from_le_bytes([data[16], data[17], data[18], data[19]]) != 0;
    if offset < DROPFILES_HEADER_LEN || offset > data.len() {
        return Err(ExtractError::Malformed(format!(
            "DROPFILES path offset {offset} outside {} byte block",
            data.len()
        )));
    }

    let list = &data[offset..];
    let paths = if wide {
        let units: Vec<u16> = list
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        units
            .split(|unit| *unit == 0)
            .take_while(|path| !path.is_empty())
            .map(String::from_utf16_lossy)
            .collect()
    } else {
        list.split(|byte| *byte == 0)
            .take_while(|path| !path.is_empty())
            .map(|path| String::from_utf8_lossy(path).into_owned())
            .collect()
    };

    Ok(paths)
}

pub fn join_paths<S: AsRef<str>>(paths: &[S]) -> String {
    let mut joined = String::new();
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            joined.push(FILE_PATHS_SEPARATOR);
        }
        joined.push_str(path.as_ref());
    }
    joined
}

/// Split a flattened file list; empty segments are dropped.
pub fn split_paths(joined: &str) -> Vec<&str> {
    joined
        .split(FILE_PATHS_SEPARATOR)
        .filter(|path| !path.is_empty())
        .collect()
}

pub fn encode_drop_effect(effect: u32) -> Vec<u8> {
    effect.to_le_bytes().to_vec()
}

pub fn decode_drop_effect(data: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

pub fn allows_copy(effect: u32) -> bool {
    effect & DROPEFFECT_COPY == DROPEFFECT_COPY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_header_points_past_itself_and_is_wide() {
        let block = encode_file_list(&["C:\\a.txt"]);
        assert_eq!(&block[0..4], &20u32.to_le_bytes());
        assert_eq!(&block[16..20], &1u32.to_le_bytes());
        assert_eq!(&block[block.len() - 4..], &[0, 0, 0, 0], "path NUL + list NUL");
    }

    #[test]
    fn decode_preserves_path_order() {
        let block = encode_file_list(&["C:\\a.txt", "C:\\b.txt", "D:\\dir\\ü.bin"]);
        let paths = decode_file_list(&block).unwrap();
        assert_eq!(paths, vec!["C:\\a.txt", "C:\\b.txt", "D:\\dir\\ü.bin"]);
    }

    #[test]
    fn decode_reads_ansi_lists() {
        let mut block = vec![0u8; 20];
        block[0] = 20;
        block.extend_from_slice(b"C:\\x.txt\0C:\\y.txt\0\0");
        assert_eq!(
            decode_file_list(&block).unwrap(),
            vec!["C:\\x.txt", "C:\\y.txt"]
        );
    }

    #[test]
    fn decode_rejects_truncated_and_out_of_range_blocks() {
        assert!(matches!(
            decode_file_list(&[0u8; 10]),
            Err(ExtractError::Malformed(_))
        ));

        let mut block = encode_file_list(&["C:\\a.txt"]);
        block[0] = 0xFF;
        assert!(matches!(
            decode_file_list(&block),
            Err(ExtractError::Malformed(_))
        ));
    }

    #[test]
    fn join_and_split_are_inverse_for_non_empty_paths() {
        let joined = join_paths(&["C:\\a.txt", "C:\\b.txt"]);
        assert_eq!(joined, "C:\\a.txt|C:\\b.txt");
        assert_eq!(split_paths(&joined), vec!["C:\\a.txt", "C:\\b.txt"]);
        assert!(split_paths("||").is_empty());
    }

    #[test]
    fn drop_effect_copy_bit() {
        assert_eq!(decode_drop_effect(&encode_drop_effect(5)), Some(5));
        assert!(allows_copy(DROPEFFECT_COPY));
        assert!(allows_copy(DROPEFFECT_COPY | DROPEFFECT_MOVE));
        assert!(!allows_copy(DROPEFFECT_MOVE));
        assert_eq!(decode_drop_effect(&[1, 0]), None);
    }
}
