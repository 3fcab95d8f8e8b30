use std::io::Cursor;

use cv_core::clipboard::dib::RasterImage;
use cv_core::ports::{CodecError, ImageCodecPort};
use image::{ImageFormat, RgbaImage};

/// [`ImageCodecPort`] backed by the `image` crate.
pub struct ImageCrateCodec;

impl ImageCodecPort for ImageCrateCodec {
    fn encode_png(&self, raster: &RasterImage) -> Result<Vec<u8>, CodecError> {
        let buffer = RgbaImage::from_raw(raster.width, raster.height, raster.rgba.clone())
            .ok_or_else(|| {
                CodecError::Encode(format!(
                    "{} bytes do not fill a {}x{} RGBA raster",
                    raster.rgba.len(),
                    raster.width,
                    raster.height
                ))
            })?;

        let mut png = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(png)
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(RasterImage {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RasterImage {
        RasterImage {
            width: 2,
            height: 1,
            rgba: vec![255, 0, 0, 255, 0, 0, 255, 128],
        }
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let codec = ImageCrateCodec;
        let png = codec.encode_png(&checker()).unwrap();

        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(codec.decode(&png).unwrap(), checker());
    }

    #[test]
    fn short_raster_is_an_encode_error() {
        let raster = RasterImage {
            width: 4,
            height: 4,
            rgba: vec![0; 3],
        };
        assert!(matches!(
            ImageCrateCodec.encode_png(&raster),
            Err(CodecError::Encode(_))
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            ImageCrateCodec.decode(b"definitely not an image"),
            Err(CodecError::Decode(_))
        ));
    }
}
