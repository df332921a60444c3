//! Image encoders.

use crate::buffer::PixelBuffer;
use crate::error::RasterizationError;

/// Encodes a pixel buffer into a portable image format.
pub trait ImageEncoder {
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, RasterizationError>;

    fn mime_type(&self) -> &'static str;
}

/// Lossless 8-bit RGBA PNG.
#[derive(Debug, Clone, Copy)]
pub struct PngEncoder {
    compression: png::Compression,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self {
            compression: png::Compression::Default,
        }
    }
}

impl PngEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: png::Compression) -> Self {
        self.compression = compression;
        self
    }
}

impl ImageEncoder for PngEncoder {
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, RasterizationError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, buffer.width(), buffer.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(self.compression);

            let mut writer = encoder.write_header()?;
            writer.write_image_data(buffer.data())?;
            writer.finish()?;
        }
        Ok(out)
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

/// Encode a buffer as PNG with default settings.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, RasterizationError> {
    PngEncoder::new().encode(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!(info.color_type, png::ColorType::Rgba);
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn test_png_signature_and_pixels() {
        let data = vec![255, 0, 0, 255, 0, 255, 0, 128, 0, 0, 255, 0, 9, 9, 9, 9];
        let buffer = PixelBuffer::from_rgba8(2, 2, data.clone()).unwrap();
        let bytes = encode_png(&buffer).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode(&bytes), (2, 2, data));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(PngEncoder::new().mime_type(), "image/png");
    }
}
