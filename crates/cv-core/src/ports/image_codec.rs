use thiserror::Error;

use crate::clipboard::dib::RasterImage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("image decode failed: {0}")]
    Decode(String),
}

/// PNG encoder and general image decoder.
pub trait ImageCodecPort: Send + Sync {
    fn encode_png(&self, image: &RasterImage) -> Result<Vec<u8>, CodecError>;

    /// Decode any supported container into an RGBA raster.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError>;
}
