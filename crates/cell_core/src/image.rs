use std::fmt;
use std::sync::Arc;

/// Decoded RGBA8 image shared between the cell state and its views.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl ImageHandle {
    /// Returns `None` when the buffer does not hold exactly `width * height` RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Option<Self> {
        let pixels = pixels.into();
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single-colour image, mostly useful for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

// Pixel buffers are large; keep debug output to the dimensions.
impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ImageHandle;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(ImageHandle::from_rgba(2, 2, vec![0u8; 15]).is_none());
        assert!(ImageHandle::from_rgba(2, 2, vec![0u8; 16]).is_some());
    }

    #[test]
    fn solid_fills_every_pixel() {
        let image = ImageHandle::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(image.pixels().len(), 24);
        assert!(image.pixels().chunks(4).all(|px| px == [1, 2, 3, 4]));
    }
}
