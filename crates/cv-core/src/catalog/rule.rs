use std::borrow::Cow;

use tracing::warn;

use super::{ExtractError, PayloadError};
use crate::clipboard::{dib, dropfiles, text, CapturedItem, LogicalFormat, OsFormat};
use crate::ports::ImageCodecPort;

/// How raw clipboard bytes become a [`CapturedItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Copy the bytes as they are.
    Raw,
    /// Copy UTF-16 text; text that is empty once NUL padding is gone is rejected.
    UnicodeText,
    /// Parse a `DROPFILES` block and keep the `|`-joined paths as UTF-16.
    FileList,
    /// Normalise a DIB; pixels become the data, the info header the header blob.
    Bitmap,
}

impl Extraction {
    pub fn extract(
        &self,
        format: LogicalFormat,
        raw: &[u8],
        max_bytes: usize,
    ) -> Result<CapturedItem, ExtractError> {
        match self {
            Extraction::Raw => {
                check_size(raw.len(), max_bytes)?;
                Ok(CapturedItem::new(format, raw.to_vec()))
            }
            Extraction::UnicodeText => {
                check_size(raw.len(), max_bytes)?;
                if text::decode_utf16_trimmed(raw).is_empty() {
                    return Err(ExtractError::Empty);
                }
                Ok(CapturedItem::new(format, raw.to_vec()))
            }
            Extraction::FileList => {
                let paths = dropfiles::decode_file_list(raw)?;
                if paths.is_empty() {
                    return Err(ExtractError::Empty);
                }
                let joined = text::encode_utf16(&dropfiles::join_paths(&paths));
                check_size(joined.len(), max_bytes)?;
                Ok(CapturedItem::new(format, joined))
            }
            Extraction::Bitmap => {
                let normalized = dib::normalize(raw, max_bytes)?;
                Ok(CapturedItem::new(format, normalized.pixels).with_header(normalized.header))
            }
        }
    }
}

fn check_size(size: usize, max: usize) -> Result<(), ExtractError> {
    if size == 0 {
        return Err(ExtractError::Empty);
    }
    if size > max {
        return Err(ExtractError::SizeExceeded { size, max });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEncoding {
    /// Write the captured bytes unchanged.
    Verbatim,
    /// Encode the captured raster as PNG.
    PngRaster,
}

/// Where and how a format is written to the history store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLayout {
    pub folder: &'static str,
    pub extension: &'static str,
    pub encoding: HistoryEncoding,
}

impl HistoryLayout {
    /// Bytes to write for `item`.
    pub fn encode<'a>(
        &self,
        item: &'a CapturedItem,
        codec: &dyn ImageCodecPort,
    ) -> Result<Cow<'a, [u8]>, PayloadError> {
        match self.encoding {
            HistoryEncoding::Verbatim => Ok(Cow::Borrowed(item.data())),
            HistoryEncoding::PngRaster => {
                let header = item
                    .header()
                    .ok_or_else(|| ExtractError::Malformed("bitmap item has no header".into()))?;
                let (width, height) = dib::header_dimensions(header)?;
                let raster = dib::bgra_to_raster(width, height, item.data())?;
                Ok(Cow::Owned(codec.encode_png(&raster)?))
            }
        }
    }
}

/// How a stored representation is put back on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    UnicodeText,
    FileList,
    StoredFile,
    StoredImage,
    StoredBitmap,
}

impl Loading {
    /// True if the representation is a path whose file content must be read
    /// before payloads can be built.
    pub fn reads_stored_file(&self) -> bool {
        matches!(
            self,
            Loading::StoredFile | Loading::StoredImage | Loading::StoredBitmap
        )
    }

    /// Build the `(OS format, bytes)` pairs to write, primary format first.
    pub fn payloads(
        &self,
        primary: OsFormat,
        value: &str,
        stored: Option<&[u8]>,
        codec: &dyn ImageCodecPort,
    ) -> Result<Vec<(OsFormat, Vec<u8>)>, PayloadError> {
        match self {
            Loading::UnicodeText => {
                if value.is_empty() {
                    return Err(PayloadError::EmptyValue);
                }
                Ok(vec![(primary, text::encode_utf16_nul(value))])
            }
            Loading::FileList => {
                let paths = dropfiles::split_paths(value);
                if paths.is_empty() {
                    return Err(PayloadError::EmptyValue);
                }
                Ok(vec![
                    (primary, dropfiles::encode_file_list(&paths)),
                    (
                        OsFormat::PREFERRED_DROP_EFFECT,
                        dropfiles::encode_drop_effect(dropfiles::DROPEFFECT_COPY),
                    ),
                ])
            }
            Loading::StoredFile => Ok(vec![(primary, stored_bytes(stored)?.to_vec())]),
            Loading::StoredImage => {
                let png = stored_bytes(stored)?;
                let mut payloads = vec![(primary, png.to_vec())];
                match codec.decode(png) {
                    Ok(raster) => payloads.push((OsFormat::DIB, dib::raster_to_dib(&raster))),
                    Err(err) => {
                        warn!(error = %err, "Stored image could not be decoded, raster alias skipped")
                    }
                }
                Ok(payloads)
            }
            Loading::StoredBitmap => {
                let raster = codec.decode(stored_bytes(stored)?)?;
                Ok(vec![(primary, dib::raster_to_dib(&raster))])
            }
        }
    }
}

fn stored_bytes(stored: Option<&[u8]>) -> Result<&[u8], PayloadError> {
    match stored {
        None => Err(PayloadError::MissingStoredBytes),
        Some([]) => Err(PayloadError::EmptyValue),
        Some(bytes) => Ok(bytes),
    }
}

/// Everything the engine knows about one logical format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRule {
    format: LogicalFormat,
    aliases: &'static [OsFormat],
    extraction: Extraction,
    history: Option<HistoryLayout>,
    loading: Loading,
}

static FILES_RULE: FormatRule = FormatRule {
    format: LogicalFormat::Files,
    aliases: &[OsFormat::HDROP],
    extraction: Extraction::FileList,
    history: None,
    loading: Loading::FileList,
};

static PNG_RULE: FormatRule = FormatRule {
    format: LogicalFormat::Png,
    aliases: &[OsFormat::PNG, OsFormat::IMAGE_PNG],
    extraction: Extraction::Raw,
    history: Some(HistoryLayout {
        folder: "PngFormat",
        extension: "png",
        encoding: HistoryEncoding::Verbatim,
    }),
    loading: Loading::StoredImage,
};

static HTML_RULE: FormatRule = FormatRule {
    format: LogicalFormat::Html,
    aliases: &[OsFormat::HTML],
    extraction: Extraction::Raw,
    history: Some(HistoryLayout {
        folder: "HtmlFormat",
        extension: "html",
        encoding: HistoryEncoding::Verbatim,
    }),
    loading: Loading::StoredFile,
};

static RTF_RULE: FormatRule = FormatRule {
    format: LogicalFormat::Rtf,
    aliases: &[OsFormat::RTF],
    extraction: Extraction::Raw,
    history: Some(HistoryLayout {
        folder: "RtfFormat",
        extension: "rtf",
        encoding: HistoryEncoding::Verbatim,
    }),
    loading: Loading::StoredFile,
};

static BITMAP_RULE: FormatRule = FormatRule {
    format: LogicalFormat::Bitmap,
    aliases: &[OsFormat::DIB],
    extraction: Extraction::Bitmap,
    history: Some(HistoryLayout {
        folder: "BitmapFormat",
        extension: "bmp",
        encoding: HistoryEncoding::PngRaster,
    }),
    loading: Loading::StoredBitmap,
};

static TEXT_RULE: FormatRule = FormatRule {
    format: LogicalFormat::Text,
    aliases: &[OsFormat::UNICODE_TEXT],
    extraction: Extraction::UnicodeText,
    history: None,
    loading: Loading::UnicodeText,
};

impl FormatRule {
    pub fn of(format: LogicalFormat) -> &'static FormatRule {
        match format {
            LogicalFormat::Files => &FILES_RULE,
            LogicalFormat::Png => &PNG_RULE,
            LogicalFormat::Html => &HTML_RULE,
            LogicalFormat::Rtf => &RTF_RULE,
            LogicalFormat::Bitmap => &BITMAP_RULE,
            LogicalFormat::Text => &TEXT_RULE,
        }
    }

    pub fn format(&self) -> LogicalFormat {
        self.format
    }

    /// OS identifiers to probe, highest priority first.
    pub fn aliases(&self) -> &'static [OsFormat] {
        self.aliases
    }

    /// Identifier written by the load path.
    pub fn primary(&self) -> OsFormat {
        self.aliases[0]
    }

    pub fn extraction(&self) -> Extraction {
        self.extraction
    }

    pub fn history(&self) -> Option<&HistoryLayout> {
        self.history.as_ref()
    }

    pub fn loading(&self) -> Loading {
        self.loading
    }

    pub fn extract(&self, raw: &[u8], max_bytes: usize) -> Result<CapturedItem, ExtractError> {
        self.extraction.extract(self.format, raw, max_bytes)
    }

    /// Inline form of an item that has no history layout.
    pub fn inline_text(item: &CapturedItem) -> String {
        text::decode_utf16_trimmed(item.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::dib::RasterImage;
    use crate::ports::CodecError;

    struct FakeCodec;

    impl ImageCodecPort for FakeCodec {
        fn encode_png(&self, image: &RasterImage) -> Result<Vec<u8>, CodecError> {
            let mut out = b"PNG:".to_vec();
            out.extend_from_slice(&image.rgba);
            Ok(out)
        }

        fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError> {
            match bytes.strip_prefix(b"PNG:") {
                Some(rgba) => Ok(RasterImage {
                    width: 1,
                    height: (rgba.len() / 4) as u32,
                    rgba: rgba.to_vec(),
                }),
                None => Err(CodecError::Decode("not a fake png".into())),
            }
        }
    }

    #[test]
    fn every_format_has_a_rule_naming_itself() {
        for format in LogicalFormat::ALL {
            assert_eq!(FormatRule::of(format).format(), format);
            assert!(!FormatRule::of(format).aliases().is_empty());
        }
    }

    #[test]
    fn png_prefers_the_canonical_alias() {
        let rule = FormatRule::of(LogicalFormat::Png);
        assert_eq!(rule.aliases(), &[OsFormat::PNG, OsFormat::IMAGE_PNG]);
        assert_eq!(rule.primary(), OsFormat::PNG);
    }

    #[test]
    fn only_text_and_files_stay_inline() {
        let inline: Vec<_> = LogicalFormat::ALL
            .into_iter()
            .filter(|f| FormatRule::of(*f).history().is_none())
            .collect();
        assert_eq!(inline, vec![LogicalFormat::Text, LogicalFormat::Files]);
    }

    #[test]
    fn raw_extraction_limit_is_inclusive() {
        let rule = FormatRule::of(LogicalFormat::Html);
        assert_eq!(rule.extract(b"12345", 5).unwrap().len(), 5);
        assert_eq!(
            rule.extract(b"123456", 5).unwrap_err(),
            ExtractError::SizeExceeded { size: 6, max: 5 }
        );
        assert_eq!(rule.extract(b"", 5).unwrap_err(), ExtractError::Empty);
    }

    #[test]
    fn text_of_only_padding_is_rejected() {
        let rule = FormatRule::of(LogicalFormat::Text);
        assert_eq!(rule.extract(&[0, 0], 64).unwrap_err(), ExtractError::Empty);
        let item = rule.extract(&text::encode_utf16_nul("hi"), 64).unwrap();
        assert_eq!(FormatRule::inline_text(&item), "hi");
    }

    #[test]
    fn file_list_extraction_joins_paths() {
        let rule = FormatRule::of(LogicalFormat::Files);
        let block = dropfiles::encode_file_list(&["C:\\a.txt", "C:\\b.txt"]);
        let item = rule.extract(&block, usize::MAX).unwrap();
        assert_eq!(FormatRule::inline_text(&item), "C:\\a.txt|C:\\b.txt");

        let limit = item.len() - 1;
        assert!(matches!(
            rule.extract(&block, limit),
            Err(ExtractError::SizeExceeded { .. })
        ));
    }

    #[test]
    fn bitmap_history_is_png_encoded_raster() {
        let mut raw = dib::top_down_header(1, 1);
        raw.extend_from_slice(&[1, 2, 3, 255]);
        let rule = FormatRule::of(LogicalFormat::Bitmap);
        let item = rule.extract(&raw, usize::MAX).unwrap();

        let bytes = rule.history().unwrap().encode(&item, &FakeCodec).unwrap();

        assert_eq!(&bytes[..], b"PNG:\x03\x02\x01\xff");
        assert_eq!(rule.history().unwrap().extension, "bmp");
    }

    #[test]
    fn file_list_load_writes_drop_effect_copy() {
        let payloads = Loading::FileList
            .payloads(OsFormat::HDROP, "C:\\a.txt|C:\\b.txt", None, &FakeCodec)
            .unwrap();

        assert_eq!(payloads.len(), 2);
        assert_eq!(
            dropfiles::decode_file_list(&payloads[0].1).unwrap(),
            vec!["C:\\a.txt", "C:\\b.txt"]
        );
        assert_eq!(payloads[1].0, OsFormat::PREFERRED_DROP_EFFECT);
        assert_eq!(
            dropfiles::decode_drop_effect(&payloads[1].1),
            Some(dropfiles::DROPEFFECT_COPY)
        );
    }

    #[test]
    fn stored_image_load_adds_raster_alias() {
        let payloads = Loading::StoredImage
            .payloads(OsFormat::PNG, "ignored", Some(b"PNG:\x01\x02\x03\xff".as_slice()), &FakeCodec)
            .unwrap();

        assert_eq!(payloads[0], (OsFormat::PNG, b"PNG:\x01\x02\x03\xff".to_vec()));
        assert_eq!(payloads[1].0, OsFormat::DIB);
        let normalized = dib::normalize(&payloads[1].1, usize::MAX).unwrap();
        assert_eq!(normalized.pixels, vec![3, 2, 1, 255]);
    }

    #[test]
    fn stored_image_that_fails_to_decode_still_loads_png() {
        let payloads = Loading::StoredImage
            .payloads(OsFormat::PNG, "ignored", Some(b"garbage".as_slice()), &FakeCodec)
            .unwrap();
        assert_eq!(payloads.len(), 1);
    }

    #[test]
    fn stored_loads_require_file_content() {
        assert!(matches!(
            Loading::StoredFile.payloads(OsFormat::HTML, "x.html", None, &FakeCodec),
            Err(PayloadError::MissingStoredBytes)
        ));
        assert!(matches!(
            Loading::StoredFile.payloads(OsFormat::HTML, "x.html", Some(&[][..]), &FakeCodec),
            Err(PayloadError::EmptyValue)
        ));
        assert!(matches!(
            Loading::UnicodeText.payloads(OsFormat::UNICODE_TEXT, "", None, &FakeCodec),
            Err(PayloadError::EmptyValue)
        ));
    }
}
