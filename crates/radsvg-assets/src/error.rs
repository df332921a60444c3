use radsvg_svg::ParseError;
use thiserror::Error;

/// Errors from resolving or loading a named document.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("SVG resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
