//! # RadSVG Canvas
//!
//! Drawing primitives shared by the radsvg parser, renderer and rasterizer.
//!
//! ## Features
//!
//! - **Color**: RGBA colors with CSS color syntax parsing
//! - **Geometry**: points, sizes, rectangles and 2D affine transforms
//! - **Path2D**: absolute moveTo/lineTo/quadTo/cubicTo/close geometry
//! - **DrawingSurface**: the abstract target the scene renderer emits into
//! - **RecordingSurface**: a surface that captures draw commands for replay or inspection
//!
//! ## Architecture
//!
//! ```text
//! DrawingSurface (trait)
//!    ├── set_transform / set_fill_color / set_stroke_color
//!    ├── fill_path / stroke_path
//!    └── draw_text
//!           │
//!           ├── RecordingSurface (this crate)
//!           └── SkiaSurface (radsvg-raster)
//! ```

pub mod color;
pub mod geometry;
pub mod path;
pub mod surface;

pub use color::Color;
pub use geometry::{Point, Rect, Size, Transform};
pub use path::{PathCommand, Path2D};
pub use surface::{
    DrawCommand, DrawingSurface, FillRule, LineCap, LineJoin, RecordingSurface, StrokeStyle,
    TextAnchor, TextRun,
};
