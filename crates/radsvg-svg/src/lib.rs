//! # RadSVG SVG
//!
//! SVG document model, parser, alignment calculator and scene renderer.
//!
//! ## Features
//!
//! - **Parsing**: SVG markup to an immutable scene arena with declared intrinsic size
//! - **Shapes**: rect, circle, ellipse, line, polyline, polygon, path, text and use
//! - **Path data**: full grammar (M, L, H, V, C, S, Q, T, A, Z), arcs as cubics
//! - **Styling**: presentation attributes and inline `style`, cascaded at render time
//! - **Alignment**: aspect-preserving fit of the viewBox into any target rectangle
//! - **Rendering**: painter's-order emission into any [`DrawingSurface`], with color overrides
//!
//! ## Architecture
//!
//! ```text
//! source ──► SvgDocument::parse ──► SvgDocument (nodes, viewBox, warnings)
//!                                        │
//!            compute_transform ◄─────────┤
//!                    │                   │
//!                    └──► render(document, transform, overrides, surface)
//! ```
//!
//! Recoverable problems (bad path data, dangling or cyclic `use`) degrade only the affected
//! node and are reported through [`SvgDocument::warnings`]. Structural problems fail the
//! load with a [`ParseError`].

use std::path::Path;

pub mod align;
pub mod attributes;
pub mod document;
pub mod error;
pub mod parser;
pub mod path_data;
pub mod render;
mod scanner;
pub mod style;

pub use align::{compute_transform, HorizontalAlignment, VerticalAlignment};
pub use attributes::SvgLength;
pub use document::{GroupRole, NodeId, NodeKind, SceneNode, Shape, SvgDocument};
pub use error::{GeometryWarning, ParseError};
pub use parser::{MAX_EXPANSION_DEPTH, MAX_NESTING_DEPTH};
pub use path_data::{parse_path_data, PathDataError};
pub use render::{draw, render, ColorOverrides};
pub use style::{ComputedStyle, Display, Paint, ResolvedStyle, Visibility};

#[doc(no_inline)]
pub use radsvg_canvas::DrawingSurface;

/// Result type for document loading.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a document from a string.
pub fn load_from_string(text: &str) -> Result<SvgDocument> {
    SvgDocument::parse(text)
}

/// Parse a document from UTF-8 bytes.
pub fn load_from_bytes(data: &[u8]) -> Result<SvgDocument> {
    SvgDocument::parse_bytes(data)
}

/// Read and parse a document from a file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<SvgDocument> {
    let data = std::fs::read(path.as_ref())?;
    SvgDocument::parse_bytes(&data)
}
