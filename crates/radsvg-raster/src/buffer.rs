//! Pixel storage.

use radsvg_canvas::Size;

use crate::error::RasterizationError;

/// A straight (non-premultiplied) RGBA8 image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            data: vec![0u8; len],
        }
    }

    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterizationError> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(RasterizationError::Encoding(format!(
                "RGBA buffer length mismatch: got {}, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA of one pixel, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(4)
    }

    /// Convert into an `image` crate buffer.
    pub fn into_rgba_image(self) -> image::RgbaImage {
        let (width, height) = (self.width, self.height);
        match image::RgbaImage::from_raw(width, height, self.data) {
            Some(img) => img,
            None => image::RgbaImage::new(width, height),
        }
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// A rasterized document: physical pixels plus the logical size and scale they represent.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub pixels: PixelBuffer,
    /// Size in logical units.
    pub size: Size,
    /// Device pixels per logical unit.
    pub scale: f32,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.data().len(), 24);
        assert!(buf.pixels().all(|p| p == [0, 0, 0, 0]));
        assert_eq!(buf.pixel(2, 1), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(3, 0), None);
    }

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(PixelBuffer::from_rgba8(2, 2, vec![0; 15]).is_err());
        let buf = PixelBuffer::from_rgba8(1, 1, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(buf.pixel(0, 0), Some([1, 2, 3, 4]));
    }

    #[test]
    fn test_image_interop() {
        let buf = PixelBuffer::from_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        let img = buf.clone().into_rgba_image();
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 128]);
        assert_eq!(PixelBuffer::from_rgba_image(img), buf);
    }
}
