//! # RadSVG
//!
//! Render SVG documents into any 2D drawing surface or into PNG images.
//!
//! ## Features
//!
//! - **Loading**: from a file, string, bytes, or a named resource
//! - **Alignment**: aspect-preserving fit into a target rectangle,
//!   {Left, Center, Right} x {Top, Center, Bottom}
//! - **Color overrides**: per-call color substitution keyed by element id or class
//! - **Rasterization**: offscreen pixel buffers at any scale factor, PNG encoding
//!
//! ## Architecture
//!
//! ```text
//! bytes/text/file/name
//!        │
//!        ▼
//!   radsvg-svg (parse) ──► SvgDocument ──► compute_transform ──► render ──► DrawingSurface
//!                                                                              │
//!                                   radsvg-raster (SkiaBackend) ◄──────────────┘
//!                                              │
//!                                              ▼
//!                                     PixelBuffer ──► PNG
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use radsvg::{ColorOverrides, Color, Size};
//!
//! let doc = radsvg::load_from_file("icon.svg")?;
//! let mut overrides = ColorOverrides::new();
//! overrides.insert("accent".to_string(), Color::from_rgb(0x33, 0x66, 0xff));
//! let png = radsvg::rasterize_to_png_bytes(&doc, Size::new(64.0, 64.0), &overrides, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use radsvg_assets::{
    load_from_name, AssetError, CacheStats, DirectoryResolver, RegistryConfig, ResourceResolver,
    SvgRegistry,
};
pub use radsvg_canvas::{
    Color, DrawCommand, DrawingSurface, FillRule, LineCap, LineJoin, Path2D, PathCommand, Point,
    RecordingSurface, Rect, Size, StrokeStyle, TextAnchor, TextRun, Transform,
};
pub use radsvg_common::{init_logging, LogConfig, LogFormat};
pub use radsvg_raster::{
    encode_png, physical_size, rasterize_with, ImageEncoder, PixelBuffer, PngEncoder,
    RasterBackend, RasterImage, RasterizationError,
};
#[cfg(feature = "skia")]
pub use radsvg_raster::{
    rasterize, rasterize_to_image, rasterize_to_png_bytes, rasterize_to_png_bytes_default,
    SkiaBackend,
};
pub use radsvg_svg::{
    compute_transform, draw, load_from_bytes, load_from_file, load_from_string, render,
    ColorOverrides, GeometryWarning, HorizontalAlignment, NodeId, NodeKind, ParseError,
    SceneNode, Shape, SvgDocument, VerticalAlignment,
};

