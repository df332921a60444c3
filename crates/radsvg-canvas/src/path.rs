//! Absolute path geometry.

use crate::geometry::{Point, Rect, Transform};

/// Bézier approximation constant for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Path command. All coordinates are absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// A 2D path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path2D {
    commands: Vec<PathCommand>,
    start: Point,
    current: Point,
}

impl Path2D {
    /// Create a new empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a point, starting a new subpath.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo(x, y));
        self.start = Point::new(x, y);
        self.current = self.start;
    }

    /// Draw a line to a point.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::LineTo(x, y));
        self.current = Point::new(x, y);
    }

    /// Draw a quadratic bezier curve.
    pub fn quad_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.commands.push(PathCommand::QuadTo(cpx, cpy, x, y));
        self.current = Point::new(x, y);
    }

    /// Draw a cubic bezier curve.
    pub fn cubic_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        self.commands
            .push(PathCommand::CubicTo(cp1x, cp1y, cp2x, cp2y, x, y));
        self.current = Point::new(x, y);
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
        self.current = self.start;
    }

    /// Append a closed rectangle.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    /// Append a rectangle with elliptical corners. Radii are clamped to half the sides.
    pub fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, rx: f32, ry: f32) {
        let rx = rx.clamp(0.0, width / 2.0);
        let ry = ry.clamp(0.0, height / 2.0);
        if rx == 0.0 || ry == 0.0 {
            self.rect(x, y, width, height);
            return;
        }

        let kx = rx * KAPPA;
        let ky = ry * KAPPA;
        let right = x + width;
        let bottom = y + height;

        self.move_to(x + rx, y);
        self.line_to(right - rx, y);
        self.cubic_to(right - rx + kx, y, right, y + ry - ky, right, y + ry);
        self.line_to(right, bottom - ry);
        self.cubic_to(right, bottom - ry + ky, right - rx + kx, bottom, right - rx, bottom);
        self.line_to(x + rx, bottom);
        self.cubic_to(x + rx - kx, bottom, x, bottom - ry + ky, x, bottom - ry);
        self.line_to(x, y + ry);
        self.cubic_to(x, y + ry - ky, x + rx - kx, y, x + rx, y);
        self.close();
    }

    /// Append a closed axis-aligned ellipse as four cubic arcs.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let kx = rx * KAPPA;
        let ky = ry * KAPPA;

        self.move_to(cx + rx, cy);
        self.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
        self.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
        self.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
        self.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
        self.close();
    }

    /// Current pen position.
    pub fn current_point(&self) -> Point {
        self.current
    }

    /// Start of the current subpath.
    pub fn start_point(&self) -> Point {
        self.start
    }

    /// Get the commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if path is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bounding box of all points, including control points.
    pub fn bounds(&self) -> Option<Rect> {
        let mut min = Point::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        let mut any = false;

        for p in self.points() {
            any = true;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        any.then(|| Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Return a copy with every point mapped through `transform`.
    pub fn transformed(&self, transform: &Transform) -> Path2D {
        let map = |x: f32, y: f32| transform.apply(x, y);
        let commands = self
            .commands
            .iter()
            .map(|cmd| match *cmd {
                PathCommand::MoveTo(x, y) => {
                    let (x, y) = map(x, y);
                    PathCommand::MoveTo(x, y)
                }
                PathCommand::LineTo(x, y) => {
                    let (x, y) = map(x, y);
                    PathCommand::LineTo(x, y)
                }
                PathCommand::QuadTo(x1, y1, x, y) => {
                    let (x1, y1) = map(x1, y1);
                    let (x, y) = map(x, y);
                    PathCommand::QuadTo(x1, y1, x, y)
                }
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                    let (x1, y1) = map(x1, y1);
                    let (x2, y2) = map(x2, y2);
                    let (x, y) = map(x, y);
                    PathCommand::CubicTo(x1, y1, x2, y2, x, y)
                }
                PathCommand::Close => PathCommand::Close,
            })
            .collect();

        Path2D {
            commands,
            start: transform.apply_point(self.start),
            current: transform.apply_point(self.current),
        }
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|cmd| {
            let pts: Vec<Point> = match *cmd {
                PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => vec![Point::new(x, y)],
                PathCommand::QuadTo(x1, y1, x, y) => vec![Point::new(x1, y1), Point::new(x, y)],
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => vec![
                    Point::new(x1, y1),
                    Point::new(x2, y2),
                    Point::new(x, y),
                ],
                PathCommand::Close => Vec::new(),
            };
            pts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_creation() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0);
        path.line_to(100.0, 100.0);
        path.close();
        assert_eq!(path.commands().len(), 3);
        assert_eq!(path.current_point(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_rect_bounds() {
        let mut path = Path2D::new();
        path.rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(path.commands().len(), 5);
        assert_eq!(path.bounds(), Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
        assert_eq!(Path2D::new().bounds(), None);
    }

    #[test]
    fn test_rounded_rect_clamps_radii() {
        let mut path = Path2D::new();
        path.rounded_rect(0.0, 0.0, 10.0, 10.0, 50.0, 50.0);
        assert_eq!(path.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let mut square = Path2D::new();
        square.rounded_rect(0.0, 0.0, 10.0, 10.0, 0.0, 3.0);
        assert_eq!(square.commands().len(), 5);
    }

    #[test]
    fn test_ellipse_bounds() {
        let mut path = Path2D::new();
        path.ellipse(50.0, 50.0, 20.0, 10.0);
        let b = path.bounds().unwrap();
        assert!((b.x - 30.0).abs() < 1e-4);
        assert!((b.width - 40.0).abs() < 1e-4);
        assert!((b.height - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_transformed() {
        let mut path = Path2D::new();
        path.rect(0.0, 0.0, 10.0, 10.0);
        let moved = path.transformed(&Transform::translate(5.0, 5.0));
        assert_eq!(moved.bounds(), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    }
}
