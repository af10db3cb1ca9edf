use thiserror::Error;

/// Normalization errors.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The input bytes could not be decoded as a raster image.
    #[error("invalid or undecodable image: {0}")]
    InvalidImage(String),

    #[error("image encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;
