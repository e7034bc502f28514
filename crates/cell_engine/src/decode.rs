use std::io::Cursor;

use image::ImageReader;

use crate::DecodedImage;

/// Total pixel budget. Aspect ratio is free: a 5000x10 banner is fine.
pub const MAX_IMAGE_PIXELS: u64 = 4096 * 4096;
pub const MAX_IMAGE_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no image data")]
    Empty,
    #[error("encoded image is {len} bytes (max {max})")]
    TooManyBytes { len: usize, max: usize },
    #[error("image dimensions {width}x{height} exceed limits")]
    Dimensions { width: u32, height: u32 },
    #[error("unrecognised or corrupt image: {0}")]
    Format(String),
}

/// Decode PNG/JPEG/GIF bytes into RGBA8, refusing empty or oversized images
/// before the full decode runs.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(DecodeError::TooManyBytes {
            len: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| DecodeError::Format(err.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|err| DecodeError::Format(err.to_string()))?;
    check_dimensions(width, height)?;

    let rgba = image::load_from_memory(bytes)
        .map_err(|err| DecodeError::Format(err.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    check_dimensions(width, height)?;

    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

fn check_dimensions(width: u32, height: u32) -> Result<(), DecodeError> {
    let pixels = (width as u64).saturating_mul(height as u64);
    if width == 0 || height == 0 || pixels > MAX_IMAGE_PIXELS {
        return Err(DecodeError::Dimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    use super::{check_dimensions, decode_image, DecodeError, MAX_IMAGE_PIXELS};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png_to_rgba() {
        let decoded = decode_image(&png(3, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert_eq!(decode_image(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn garbage_is_a_format_error() {
        let err = decode_image(b"<html>not an image</html>").unwrap_err();
        assert!(matches!(err, DecodeError::Format(_)));
    }

    #[test]
    fn wide_banner_within_pixel_budget_decodes() {
        let decoded = decode_image(&png(5000, 10)).unwrap();
        assert_eq!((decoded.width, decoded.height), (5000, 10));
        assert_eq!(decoded.rgba.len(), 5000 * 10 * 4);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(check_dimensions(4096, 4096).is_ok());
        assert!(check_dimensions(100_000, 40).is_ok());
        let width = (MAX_IMAGE_PIXELS / 2 + 1) as u32;
        assert_eq!(
            check_dimensions(width, 2),
            Err(DecodeError::Dimensions { width, height: 2 })
        );
        assert!(check_dimensions(0, 10).is_err());
    }
}
