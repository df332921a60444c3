//! Raster backend capability.

use radsvg_canvas::{Color, DrawingSurface};

use crate::buffer::PixelBuffer;
use crate::error::RasterizationError;

/// A pixel-producing implementation of [`DrawingSurface`].
///
/// The rasterizer only talks to this trait, so the parser and renderer never depend on a
/// concrete graphics library. Backends are selected with cargo features.
pub trait RasterBackend {
    type Surface: DrawingSurface;

    /// Allocate a surface of `width` x `height` device pixels, cleared to `background` or
    /// to transparent.
    fn allocate(
        &self,
        width: u32,
        height: u32,
        background: Option<Color>,
    ) -> Result<Self::Surface, RasterizationError>;

    /// Consume the surface and return straight-alpha pixels.
    fn finish(&self, surface: Self::Surface) -> Result<PixelBuffer, RasterizationError>;
}
