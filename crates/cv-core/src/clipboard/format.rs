use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// Standard clipboard format: Unicode text (UTF-16LE, NUL terminated).
pub const CF_UNICODETEXT: u32 = 13;

/// Standard clipboard format: device-independent bitmap.
pub const CF_DIB: u32 = 8;

/// Standard clipboard format: file drop list (`DROPFILES`).
pub const CF_HDROP: u32 = 15;

pub const PNG_FORMAT_NAME: &str = "PNG";
pub const IMAGE_PNG_FORMAT_NAME: &str = "image/png";
pub const HTML_FORMAT_NAME: &str = "HTML Format";
pub const RTF_FORMAT_NAME: &str = "Rich Text Format";
pub const PREFERRED_DROP_EFFECT_NAME: &str = "Preferred DropEffect";

/// Content kind tracked by the engine.
///
/// This is the stable key used by catalogs, fingerprint maps and snapshots.
/// It is deliberately decoupled from OS format codes: one logical format may
/// claim several [`OsFormat`] aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogicalFormat {
    Text,
    Bitmap,
    Files,
    Rtf,
    Html,
    Png,
}

impl LogicalFormat {
    pub const ALL: [LogicalFormat; 6] = [
        LogicalFormat::Text,
        LogicalFormat::Bitmap,
        LogicalFormat::Files,
        LogicalFormat::Rtf,
        LogicalFormat::Html,
        LogicalFormat::Png,
    ];

    /// Native name of the format as shown to users and stored by consumers.
    pub fn name(&self) -> &'static str {
        match self {
            LogicalFormat::Text => "CF_UNICODETEXT",
            LogicalFormat::Bitmap => "CF_BITMAP",
            LogicalFormat::Files => "CF_HDROP",
            LogicalFormat::Rtf => RTF_FORMAT_NAME,
            LogicalFormat::Html => HTML_FORMAT_NAME,
            LogicalFormat::Png => PNG_FORMAT_NAME,
        }
    }

    /// Reverse lookup of [`LogicalFormat::name`].
    ///
    /// Variant identifiers (`"Text"`, `"Png"`, ...) are accepted as well so that
    /// configuration files can use either spelling.
    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        LogicalFormat::ALL
            .into_iter()
            .find(|format| format.name() == name || format.variant_name() == name)
            .ok_or_else(|| CatalogError::UnknownFormatName(name.to_string()))
    }

    fn variant_name(&self) -> &'static str {
        match self {
            LogicalFormat::Text => "Text",
            LogicalFormat::Bitmap => "Bitmap",
            LogicalFormat::Files => "Files",
            LogicalFormat::Rtf => "Rtf",
            LogicalFormat::Html => "Html",
            LogicalFormat::Png => "Png",
        }
    }
}

impl fmt::Display for LogicalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalFormat::from_name(s)
    }
}

/// An OS-level clipboard format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFormat {
    /// Predefined numeric format (`CF_*`).
    Standard(u32),
    /// Format registered by name at runtime; the numeric id is resolved by the backend.
    Registered(&'static str),
}

impl OsFormat {
    pub const UNICODE_TEXT: OsFormat = OsFormat::Standard(CF_UNICODETEXT);
    pub const DIB: OsFormat = OsFormat::Standard(CF_DIB);
    pub const HDROP: OsFormat = OsFormat::Standard(CF_HDROP);
    pub const PNG: OsFormat = OsFormat::Registered(PNG_FORMAT_NAME);
    pub const IMAGE_PNG: OsFormat = OsFormat::Registered(IMAGE_PNG_FORMAT_NAME);
    pub const HTML: OsFormat = OsFormat::Registered(HTML_FORMAT_NAME);
    pub const RTF: OsFormat = OsFormat::Registered(RTF_FORMAT_NAME);
    pub const PREFERRED_DROP_EFFECT: OsFormat = OsFormat::Registered(PREFERRED_DROP_EFFECT_NAME);
}

impl fmt::Display for OsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFormat::Standard(CF_UNICODETEXT) => f.write_str("CF_UNICODETEXT"),
            OsFormat::Standard(CF_DIB) => f.write_str("CF_DIB"),
            OsFormat::Standard(CF_HDROP) => f.write_str("CF_HDROP"),
            OsFormat::Standard(id) => write!(f, "CF#{id}"),
            OsFormat::Registered(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for format in LogicalFormat::ALL {
            assert_eq!(LogicalFormat::from_name(format.name()).unwrap(), format);
        }
    }

    #[test]
    fn from_name_accepts_variant_identifiers() {
        assert_eq!("Png".parse::<LogicalFormat>().unwrap(), LogicalFormat::Png);
        assert_eq!(
            "Rich Text Format".parse::<LogicalFormat>().unwrap(),
            LogicalFormat::Rtf
        );
    }

    #[test]
    fn from_name_rejects_unknown_names() {
        let err = LogicalFormat::from_name("CF_WAVE").unwrap_err();
        assert_eq!(err, CatalogError::UnknownFormatName("CF_WAVE".to_string()));
    }

    #[test]
    fn os_format_display_uses_native_names() {
        assert_eq!(OsFormat::UNICODE_TEXT.to_string(), "CF_UNICODETEXT");
        assert_eq!(OsFormat::Standard(2).to_string(), "CF#2");
        assert_eq!(OsFormat::IMAGE_PNG.to_string(), "image/png");
    }
}
