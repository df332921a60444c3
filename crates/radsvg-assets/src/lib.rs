//! # RadSVG Assets
//!
//! Named SVG resources: lookup by name and a caller-owned document registry.
//!
//! ## Features
//!
//! - **ResourceResolver**: pluggable name to bytes lookup
//! - **DirectoryResolver**: searches directories for `name` / `name.svg`
//! - **SvgRegistry**: LRU-bounded cache of parsed documents shared as `Arc`, one parse per name
//!
//! The registry is an ordinary value. Nothing here keeps global state.

pub mod error;
pub mod registry;
pub mod resolver;

pub use error::AssetError;
pub use registry::{CacheStats, RegistryConfig, SvgRegistry};
pub use resolver::{DirectoryResolver, ResourceResolver};

use radsvg_svg::SvgDocument;

/// Resolve `name` and parse it, without caching.
pub fn load_from_name<R: ResourceResolver + ?Sized>(
    resolver: &R,
    name: &str,
) -> Result<SvgDocument, AssetError> {
    let data = resolver.resolve(name)?;
    Ok(SvgDocument::parse_bytes(&data)?)
}
