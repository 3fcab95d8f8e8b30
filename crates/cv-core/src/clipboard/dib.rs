//! Device-independent bitmap (`CF_DIB`) handling.
//!
//! Incoming DIBs are normalised to 32 bpp top-down BGRA so that the same
//! picture always produces the same bytes, whatever depth or row order the
//! producing application chose. Outgoing DIBs are written bottom-up at 32 bpp,
//! which every raster consumer accepts.

use bytes::BufMut;

use crate::catalog::ExtractError;

pub const BITMAPINFOHEADER_LEN: usize = 40;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

const RED_MASK: u32 = 0x00FF_0000;
const GREEN_MASK: u32 = 0x0000_FF00;
const BLUE_MASK: u32 = 0x0000_00FF;

/// Decoded raster, RGBA8, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A DIB rewritten as 32 bpp top-down BGRA plus the matching info header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDib {
    pub width: u32,
    pub height: u32,
    pub header: Vec<u8>,
    pub pixels: Vec<u8>,
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn malformed(reason: impl Into<String>) -> ExtractError {
    ExtractError::Malformed(reason.into())
}

/// Normalise a packed DIB. `max_pixel_bytes` bounds the normalised pixel array
/// and is checked before any pixel is copied.
pub fn normalize(dib: &[u8], max_pixel_bytes: usize) -> Result<NormalizedDib, ExtractError> {
    if dib.len() < BITMAPINFOHEADER_LEN {
        return Err(malformed("DIB shorter than BITMAPINFOHEADER"));
    }

    let header_len = read_u32(dib, 0) as usize;
    if header_len < BITMAPINFOHEADER_LEN || header_len > dib.len() {
        return Err(malformed(format!("invalid DIB header size {header_len}")));
    }

    let width = read_i32(dib, 4);
    let height_raw = read_i32(dib, 8);
    let bit_count = read_u16(dib, 14);
    let compression = read_u32(dib, 16);
    let colors_used = read_u32(dib, 32) as usize;

    if width <= 0 || height_raw == 0 {
        return Err(malformed(format!("empty DIB dimensions {width}x{height_raw}")));
    }

    match (bit_count, compression) {
        (24, BI_RGB) | (32, BI_RGB) => {}
        (32, BI_BITFIELDS) => {
            if dib.len() < BITMAPINFOHEADER_LEN + 12 {
                return Err(malformed("DIB colour masks truncated"));
            }
            let masks = (read_u32(dib, 40), read_u32(dib, 44), read_u32(dib, 48));
            if masks != (RED_MASK, GREEN_MASK, BLUE_MASK) {
                return Err(malformed(format!("unsupported DIB channel masks {masks:x?}")));
            }
        }
        _ => {
            return Err(malformed(format!(
                "unsupported DIB layout: {bit_count} bpp, compression {compression}"
            )))
        }
    }

    // A bare BITMAPINFOHEADER stores the three masks after itself; V4/V5
    // headers carry them inside.
    let mask_len = if compression == BI_BITFIELDS && header_len == BITMAPINFOHEADER_LEN {
        12
    } else {
        0
    };
    let pixel_offset = header_len + mask_len + colors_used * 4;

    let width = width as u32;
    let height = height_raw.unsigned_abs();
    let top_down = height_raw < 0;

    let out_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| malformed("DIB dimensions overflow"))?;
    if out_len > max_pixel_bytes {
        return Err(ExtractError::SizeExceeded {
            size: out_len,
            max: max_pixel_bytes,
        });
    }

    let src_stride = ((width as usize * bit_count as usize + 31) / 32) * 4;
    let needed = src_stride * height as usize;
    let available = dib.len().saturating_sub(pixel_offset);
    if needed > available {
        return Err(malformed(format!(
            "DIB pixel data truncated: {available} < {needed}"
        )));
    }
    let src = &dib[pixel_offset..pixel_offset + needed];

    let mut pixels = Vec::with_capacity(out_len);
    for y in 0..height as usize {
        let src_row = if top_down { y } else { height as usize - 1 - y };
        let row = &src[src_row * src_stride..(src_row + 1) * src_stride];
        match bit_count {
            32 => pixels.extend_from_slice(&row[..width as usize * 4]),
            _ => {
                for bgr in row[..width as usize * 3].chunks_exact(3) {
                    pixels.extend_from_slice(&[bgr[0], bgr[1], bgr[2], 0xFF]);
                }
            }
        }
    }

    // 32 bpp BI_RGB producers usually leave the reserved byte at zero.
    if bit_count == 32 && pixels.chunks_exact(4).all(|px| px[3] == 0) {
        pixels.chunks_exact_mut(4).for_each(|px| px[3] = 0xFF);
    }

    Ok(NormalizedDib {
        width,
        height,
        header: top_down_header(width, height),
        pixels,
    })
}

fn info_header(width: u32, height: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(BITMAPINFOHEADER_LEN);
    buf.put_u32_le(BITMAPINFOHEADER_LEN as u32);
    buf.put_i32_le(width as i32);
    buf.put_i32_le(height);
    buf.put_u16_le(1);
    buf.put_u16_le(32);
    buf.put_u32_le(BI_RGB);
    buf.put_u32_le(width.saturating_mul(height.unsigned_abs()).saturating_mul(4));
    buf.put_i32_le(0);
    buf.put_i32_le(0);
    buf.put_u32_le(0);
    buf.put_u32_le(0);
    buf
}

/// 32 bpp BI_RGB header with negative height (rows top to bottom).
pub fn top_down_header(width: u32, height: u32) -> Vec<u8> {
    info_header(width, -(height as i32))
}

/// Width and height recorded in a header produced by [`top_down_header`].
pub fn header_dimensions(header: &[u8]) -> Result<(u32, u32), ExtractError> {
    if header.len() < BITMAPINFOHEADER_LEN {
        return Err(malformed("bitmap header truncated"));
    }
    let width = read_i32(header, 4);
    let height = read_i32(header, 8);
    if width <= 0 || height == 0 {
        return Err(malformed("bitmap header has empty dimensions"));
    }
    Ok((width as u32, height.unsigned_abs()))
}

/// Convert normalised BGRA pixels into an RGBA raster.
pub fn bgra_to_raster(width: u32, height: u32, pixels: &[u8]) -> Result<RasterImage, ExtractError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(malformed(format!(
            "pixel buffer holds {} bytes, expected {expected}",
            pixels.len()
        )));
    }
    let rgba = pixels
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0], px[3]])
        .collect();
    Ok(RasterImage {
        width,
        height,
        rgba,
    })
}

/// Pack a raster as a bottom-up 32 bpp `CF_DIB` block.
pub fn raster_to_dib(image: &RasterImage) -> Vec<u8> {
    let stride = image.width as usize * 4;
    let mut dib = info_header(image.width, image.height as i32);
    if stride == 0 {
        return dib;
    }
    dib.reserve(stride * image.height as usize);
    for row in image.rgba.chunks_exact(stride).rev() {
        for px in row.chunks_exact(4) {
            dib.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
    }
    dib
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dib_24_bottom_up(width: u32, rows_top_to_bottom: &[&[[u8; 3]]]) -> Vec<u8> {
        let height = rows_top_to_bottom.len() as i32;
        let mut dib = info_header(width, height);
        dib[14] = 24;
        let stride = ((width as usize * 24 + 31) / 32) * 4;
        for row in rows_top_to_bottom.iter().rev() {
            let mut line = Vec::with_capacity(stride);
            for bgr in row.iter() {
                line.extend_from_slice(bgr);
            }
            line.resize(stride, 0);
            dib.extend_from_slice(&line);
        }
        dib
    }

    #[test]
    fn normalizes_24_bit_bottom_up_rows_with_padding() {
        let red = [0, 0, 255];
        let blue = [255, 0, 0];
        let dib = dib_24_bottom_up(1, &[&[red], &[blue]]);

        let normalized = normalize(&dib, usize::MAX).unwrap();

        assert_eq!(normalized.width, 1);
        assert_eq!(normalized.height, 2);
        assert_eq!(normalized.pixels, vec![0, 0, 255, 255, 255, 0, 0, 255]);
        assert_eq!(header_dimensions(&normalized.header).unwrap(), (1, 2));
    }

    #[test]
    fn top_down_and_bottom_up_sources_normalize_identically() {
        let image = RasterImage {
            width: 2,
            height: 2,
            rgba: vec![
                1, 2, 3, 255, 4, 5, 6, 255, //
                7, 8, 9, 255, 10, 11, 12, 255,
            ],
        };
        let bottom_up = raster_to_dib(&image);

        let mut top_down = top_down_header(2, 2);
        for px in image.rgba.chunks_exact(4) {
            top_down.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }

        let a = normalize(&bottom_up, usize::MAX).unwrap();
        let b = normalize(&top_down, usize::MAX).unwrap();
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(bgra_to_raster(2, 2, &a.pixels).unwrap(), image);
    }

    #[test]
    fn zero_alpha_32_bit_pixels_become_opaque() {
        let mut dib = top_down_header(1, 1);
        dib.extend_from_slice(&[10, 20, 30, 0]);
        let normalized = normalize(&dib, usize::MAX).unwrap();
        assert_eq!(normalized.pixels, vec![10, 20, 30, 255]);
    }

    #[test]
    fn pixel_limit_is_inclusive() {
        let mut dib = top_down_header(2, 1);
        dib.extend_from_slice(&[0u8; 8]);

        assert!(normalize(&dib, 8).is_ok());
        assert_eq!(
            normalize(&dib, 7).unwrap_err(),
            ExtractError::SizeExceeded { size: 8, max: 7 }
        );
    }

    #[test]
    fn rejects_unsupported_and_truncated_input() {
        let mut palette = top_down_header(1, 1);
        palette[14] = 8;
        assert!(matches!(normalize(&palette, usize::MAX), Err(ExtractError::Malformed(_))));

        let truncated = top_down_header(4, 4);
        assert!(matches!(normalize(&truncated, usize::MAX), Err(ExtractError::Malformed(_))));

        assert!(matches!(normalize(&[0u8; 12], usize::MAX), Err(ExtractError::Malformed(_))));
    }
}
