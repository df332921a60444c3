//! # RadSVG Raster
//!
//! Offscreen rasterization of SVG documents and PNG encoding.
//!
//! ## Features
//!
//! - **PixelBuffer**: straight-alpha RGBA8 storage with `image` crate interop
//! - **RasterBackend**: capability trait for pixel-producing surfaces
//! - **SkiaBackend**: tiny-skia implementation (cargo feature `skia`, on by default)
//! - **ImageEncoder**: encoder trait with a lossless PNG implementation
//!
//! ## Architecture
//!
//! ```text
//! rasterize(document, size, overrides, scale, background)
//!    ├── allocate   round(size * scale) device pixels
//!    ├── render     scale(scale) x align(viewBox -> size, Center, Center)
//!    └── finish     PixelBuffer ──► PngEncoder ──► bytes
//! ```

pub mod backend;
pub mod buffer;
pub mod encode;
pub mod error;
#[cfg(feature = "skia")]
pub mod skia;

pub use backend::RasterBackend;
pub use buffer::{PixelBuffer, RasterImage};
pub use encode::{encode_png, ImageEncoder, PngEncoder};
pub use error::RasterizationError;
#[cfg(feature = "skia")]
pub use skia::{SkiaBackend, SkiaSurface};

use radsvg_canvas::{Color, Rect, Size, Transform};
use radsvg_svg::{
    compute_transform, render, ColorOverrides, HorizontalAlignment, SvgDocument,
    VerticalAlignment,
};
use tracing::debug;

/// Result type for rasterization.
pub type Result<T> = std::result::Result<T, RasterizationError>;

/// Physical pixel dimensions for a logical size at a scale factor.
pub fn physical_size(size: Size, scale: f32) -> Result<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RasterizationError::InvalidScale(scale));
    }
    let invalid = || RasterizationError::InvalidSize {
        width: size.width,
        height: size.height,
    };
    if size.is_empty() {
        return Err(invalid());
    }

    let width = (size.width * scale).round();
    let height = (size.height * scale).round();
    if !(width >= 1.0 && height >= 1.0 && width <= u32::MAX as f32 && height <= u32::MAX as f32) {
        return Err(invalid());
    }
    Ok((width as u32, height as u32))
}

/// Rasterize with an explicit backend.
pub fn rasterize_with<B: RasterBackend>(
    backend: &B,
    document: &SvgDocument,
    size: Size,
    overrides: &ColorOverrides,
    scale: f32,
    background: Option<Color>,
) -> Result<PixelBuffer> {
    let (width, height) = physical_size(size, scale)?;
    debug!(width, height, scale, "Rasterizing SVG document");

    let mut surface = backend.allocate(width, height, background)?;
    let fit = compute_transform(
        document.view_box(),
        Rect::from_size(size),
        VerticalAlignment::Center,
        HorizontalAlignment::Center,
    );
    let transform = Transform::scale(scale, scale).multiply(&fit);
    render(document, transform, overrides, &mut surface);

    backend.finish(surface)
}

/// Rasterize into a new buffer of `round(size * scale)` pixels, content centered.
#[cfg(feature = "skia")]
pub fn rasterize(
    document: &SvgDocument,
    size: Size,
    overrides: &ColorOverrides,
    scale: f32,
    background: Option<Color>,
) -> Result<PixelBuffer> {
    rasterize_with(&SkiaBackend::new(), document, size, overrides, scale, background)
}

/// Rasterize over a transparent background and keep the logical size alongside the pixels.
#[cfg(feature = "skia")]
pub fn rasterize_to_image(
    document: &SvgDocument,
    size: Size,
    overrides: &ColorOverrides,
    scale: f32,
) -> Result<RasterImage> {
    let pixels = rasterize(document, size, overrides, scale, None)?;
    Ok(RasterImage {
        pixels,
        size,
        scale,
    })
}

/// Rasterize at scale 1 and encode as PNG.
#[cfg(feature = "skia")]
pub fn rasterize_to_png_bytes(
    document: &SvgDocument,
    size: Size,
    overrides: &ColorOverrides,
    background: Option<Color>,
) -> Result<Vec<u8>> {
    let pixels = rasterize(document, size, overrides, 1.0, background)?;
    encode_png(&pixels)
}

/// PNG with no overrides over a transparent background.
#[cfg(feature = "skia")]
pub fn rasterize_to_png_bytes_default(document: &SvgDocument, size: Size) -> Result<Vec<u8>> {
    rasterize_to_png_bytes(document, size, &ColorOverrides::new(), None)
}

#[cfg(all(test, feature = "skia"))]
mod tests {
    use super::*;

    const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <rect id="square" x="25" y="25" width="50" height="50" fill="#ff0000"/>
    </svg>"##;

    fn doc() -> SvgDocument {
        let _ = radsvg_common::init_logging(radsvg_common::LogConfig::test());
        SvgDocument::parse(RED_SQUARE).unwrap()
    }

    #[test]
    fn test_physical_size() {
        assert_eq!(physical_size(Size::new(10.0, 20.0), 1.5).unwrap(), (15, 30));
        assert_eq!(physical_size(Size::new(10.4, 10.6), 1.0).unwrap(), (10, 11));
        assert!(matches!(
            physical_size(Size::new(0.0, 10.0), 1.0),
            Err(RasterizationError::InvalidSize { .. })
        ));
        assert!(matches!(
            physical_size(Size::new(f32::NAN, 10.0), 1.0),
            Err(RasterizationError::InvalidSize { .. })
        ));
        assert!(matches!(
            physical_size(Size::new(10.0, 10.0), 0.0),
            Err(RasterizationError::InvalidScale(_))
        ));
        assert!(matches!(
            physical_size(Size::new(0.2, 0.2), 1.0),
            Err(RasterizationError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_red_square_exact_pixels() {
        let buffer = rasterize(&doc(), Size::new(200.0, 200.0), &ColorOverrides::new(), 1.0, None)
            .unwrap();
        assert_eq!((buffer.width(), buffer.height()), (200, 200));

        for y in 0..200 {
            for x in 0..200 {
                let inside = (50..150).contains(&x) && (50..150).contains(&y);
                let expected = if inside { [255, 0, 0, 255] } else { [0, 0, 0, 0] };
                assert_eq!(buffer.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_scale_doubles_pixels() {
        let image = rasterize_to_image(&doc(), Size::new(100.0, 100.0), &ColorOverrides::new(), 2.0)
            .unwrap();
        assert_eq!((image.width(), image.height()), (200, 200));
        assert_eq!(image.size, Size::new(100.0, 100.0));
        assert_eq!(image.pixels.pixel(50, 50), Some([255, 0, 0, 255]));
        assert_eq!(image.pixels.pixel(49, 49), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_background_color() {
        let white = Color::WHITE;
        let buffer = rasterize(
            &doc(),
            Size::new(100.0, 100.0),
            &ColorOverrides::new(),
            1.0,
            Some(white),
        )
        .unwrap();
        assert_eq!(buffer.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(buffer.pixel(50, 50), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_override_changes_pixels_deterministically() {
        let mut overrides = ColorOverrides::new();
        overrides.insert("square".into(), Color::from_rgb(0, 0, 255));
        let size = Size::new(40.0, 40.0);

        let a = rasterize(&doc(), size, &overrides, 1.0, None).unwrap();
        let b = rasterize(&doc(), size, &overrides, 1.0, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.pixel(20, 20), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_png_bytes() {
        let bytes = rasterize_to_png_bytes_default(&doc(), Size::new(10.0, 10.0)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_invalid_size_keeps_document_usable() {
        let document = doc();
        assert!(rasterize_to_png_bytes_default(&document, Size::new(-1.0, 10.0)).is_err());
        assert!(rasterize_to_png_bytes_default(&document, Size::new(4.0, 4.0)).is_ok());
    }

    #[test]
    fn test_oversized_target_reports_allocation_failure() {
        let document = doc();
        let result = rasterize(&document, Size::new(2.0e9, 2.0e9), &ColorOverrides::new(), 1.0, None);
        assert!(matches!(result, Err(RasterizationError::Allocation { .. })));
        assert!(rasterize(&document, Size::new(4.0, 4.0), &ColorOverrides::new(), 1.0, None).is_ok());
    }

    #[test]
    fn test_degenerate_document_is_blank() {
        let empty = SvgDocument::parse(r#"<svg><rect width="5" height="5"/></svg>"#).unwrap();
        let buffer = rasterize(&empty, Size::new(8.0, 8.0), &ColorOverrides::new(), 1.0, None)
            .unwrap();
        assert!(buffer.pixels().all(|p| p == [0, 0, 0, 0]));
    }
}
