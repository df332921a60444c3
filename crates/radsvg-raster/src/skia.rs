//! CPU backend built on tiny-skia.

use radsvg_canvas::{
    Color, DrawingSurface, FillRule, LineCap, LineJoin, Path2D, PathCommand, StrokeStyle,
    TextRun, Transform,
};
use tiny_skia::{IntSize, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke};
use tracing::trace;

use crate::backend::RasterBackend;
use crate::buffer::PixelBuffer;
use crate::error::RasterizationError;

/// tiny-skia raster backend.
#[derive(Debug, Clone, Copy)]
pub struct SkiaBackend {
    anti_alias: bool,
}

impl Default for SkiaBackend {
    fn default() -> Self {
        Self { anti_alias: true }
    }
}

impl SkiaBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }
}

impl RasterBackend for SkiaBackend {
    type Surface = SkiaSurface;

    fn allocate(
        &self,
        width: u32,
        height: u32,
        background: Option<Color>,
    ) -> Result<SkiaSurface, RasterizationError> {
        let mut pixmap = try_pixmap(width, height)?;
        if let Some(bg) = background {
            pixmap.fill(skia_color(bg));
        }
        Ok(SkiaSurface {
            pixmap,
            anti_alias: self.anti_alias,
            transform: tiny_skia::Transform::identity(),
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
        })
    }

    fn finish(&self, surface: SkiaSurface) -> Result<PixelBuffer, RasterizationError> {
        let (width, height) = (surface.pixmap.width(), surface.pixmap.height());
        let mut data = surface.pixmap.take();
        // Demultiply in place; the pixmap buffer becomes the output buffer.
        for px in data.chunks_exact_mut(4) {
            if let Some(c) = PremultipliedColorU8::from_rgba(px[0], px[1], px[2], px[3]) {
                let c = c.demultiply();
                px.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        PixelBuffer::from_rgba8(width, height, data)
    }
}

/// Allocate a cleared pixmap, reporting memory exhaustion instead of aborting.
fn try_pixmap(width: u32, height: u32) -> Result<Pixmap, RasterizationError> {
    let failed = || RasterizationError::Allocation { width, height };
    let size = IntSize::from_wh(width, height).ok_or_else(failed)?;
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(failed)?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| failed())?;
    data.resize(len, 0);
    Pixmap::from_vec(data, size).ok_or_else(failed)
}

/// A tiny-skia pixmap driven through [`DrawingSurface`].
pub struct SkiaSurface {
    pixmap: Pixmap,
    anti_alias: bool,
    transform: tiny_skia::Transform,
    fill_color: Color,
    stroke_color: Color,
}

impl SkiaSurface {
    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        let [r, g, b, a] = color.to_rgba8();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = self.anti_alias;
        paint
    }
}

impl DrawingSurface for SkiaSurface {
    fn set_transform(&mut self, t: Transform) {
        self.transform = tiny_skia::Transform::from_row(t.a, t.b, t.c, t.d, t.e, t.f);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn fill_path(&mut self, path: &Path2D, rule: FillRule) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let paint = self.paint(self.fill_color);
        let rule = match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        };
        self.pixmap
            .fill_path(&skia_path, &paint, rule, self.transform, None);
    }

    fn stroke_path(&mut self, path: &Path2D, style: &StrokeStyle) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let paint = self.paint(self.stroke_color);
        let stroke = Stroke {
            width: style.width,
            miter_limit: style.miter_limit,
            line_cap: match style.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash: None,
        };
        self.pixmap
            .stroke_path(&skia_path, &paint, &stroke, self.transform, None);
    }

    fn draw_text(&mut self, run: &TextRun) {
        // No font source is available to this backend.
        trace!(text = %run.text, "Text run not rasterized");
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

/// `None` for paths tiny-skia cannot represent (empty or a lone moveto).
fn to_skia_path(path: &Path2D) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo(x, y) => pb.move_to(x, y),
            PathCommand::LineTo(x, y) => pb.line_to(x, y),
            PathCommand::QuadTo(x1, y1, x, y) => pb.quad_to(x1, y1, x, y),
            PathCommand::CubicTo(x1, y1, x2, y2, x, y) => pb.cubic_to(x1, y1, x2, y2, x, y),
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = radsvg_common::init_logging(radsvg_common::LogConfig::test());
    }

    fn square(x: f32, y: f32, size: f32) -> Path2D {
        let mut path = Path2D::new();
        path.rect(x, y, size, size);
        path
    }

    #[test]
    fn test_allocate_zero_fails() {
        init();
        assert!(matches!(
            SkiaBackend::new().allocate(0, 10, None),
            Err(RasterizationError::Allocation { .. })
        ));
    }

    #[test]
    fn test_oversized_allocation_is_an_error() {
        init();
        let backend = SkiaBackend::new();
        assert!(matches!(
            backend.allocate(u32::MAX, u32::MAX, None),
            Err(RasterizationError::Allocation { width: u32::MAX, height: u32::MAX })
        ));
        // Fits in usize but exceeds what any allocator will hand out.
        assert!(matches!(
            backend.allocate(2_000_000_000, 2_000_000_000, None),
            Err(RasterizationError::Allocation { .. })
        ));
    }

    #[test]
    fn test_background_fill() {
        let backend = SkiaBackend::new();
        let surface = backend
            .allocate(2, 2, Some(Color::from_rgb(0, 0, 255)))
            .unwrap();
        let buffer = backend.finish(surface).unwrap();
        assert!(buffer.pixels().all(|p| p == [0, 0, 255, 255]));
    }

    #[test]
    fn test_fill_respects_transform() {
        let backend = SkiaBackend::new().with_anti_alias(false);
        let mut surface = backend.allocate(10, 10, None).unwrap();
        surface.set_transform(Transform::translate(4.0, 4.0));
        surface.set_fill_color(Color::from_rgb(255, 0, 0));
        surface.fill_path(&square(0.0, 0.0, 2.0), FillRule::NonZero);
        let buffer = backend.finish(surface).unwrap();

        assert_eq!(buffer.pixel(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(3, 4), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_semi_transparent_is_straight_alpha() {
        let backend = SkiaBackend::new().with_anti_alias(false);
        let mut surface = backend.allocate(4, 4, None).unwrap();
        surface.set_fill_color(Color::from_rgba8(0, 255, 0, 128));
        surface.fill_path(&square(0.0, 0.0, 4.0), FillRule::NonZero);
        let [r, g, b, a] = backend.finish(surface).unwrap().pixel(1, 1).unwrap();
        assert_eq!((r, b, a), (0, 0, 128));
        assert!(g >= 254);
    }

    #[test]
    fn test_stroke_draws_outline() {
        let backend = SkiaBackend::new().with_anti_alias(false);
        let mut surface = backend.allocate(20, 20, None).unwrap();
        surface.set_stroke_color(Color::BLACK);
        surface.stroke_path(
            &square(5.0, 5.0, 10.0),
            &StrokeStyle {
                width: 2.0,
                ..StrokeStyle::default()
            },
        );
        let buffer = backend.finish(surface).unwrap();
        assert_eq!(buffer.pixel(5, 10).map(|p| p[3]), Some(255));
        assert_eq!(buffer.pixel(10, 10).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_degenerate_paths_ignored() {
        let backend = SkiaBackend::new();
        let mut surface = backend.allocate(4, 4, None).unwrap();
        let mut lone = Path2D::new();
        lone.move_to(1.0, 1.0);
        surface.fill_path(&lone, FillRule::NonZero);
        surface.fill_path(&Path2D::new(), FillRule::NonZero);
        assert!(backend.finish(surface).unwrap().pixels().all(|p| p[3] == 0));
    }
}
