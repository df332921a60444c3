use thiserror::Error;

/// Errors from rasterizing or encoding. The document stays valid and reusable.
#[derive(Error, Debug)]
pub enum RasterizationError {
    #[error("Invalid raster size: {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("Invalid scale factor: {0}")]
    InvalidScale(f32),

    #[error("Failed to allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<png::EncodingError> for RasterizationError {
    fn from(err: png::EncodingError) -> Self {
        RasterizationError::Encoding(err.to_string())
    }
}
