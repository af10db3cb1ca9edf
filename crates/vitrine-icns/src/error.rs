use thiserror::Error;
use vitrine_image::NormalizeError;

/// Icon pipeline errors.
#[derive(Debug, Error)]
pub enum IcnsError {
    /// The uploaded bytes could not be decoded as a raster image.
    #[error("invalid or undecodable image: {0}")]
    InvalidImage(String),

    /// A master or ladder rendition could not be encoded.
    #[error("rendition encode failed: {0}")]
    Encode(String),

    /// The packaging tool failed, or produced no container.
    #[error("icon packaging failed: {0}")]
    Packager(String),

    #[error("workspace io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IcnsResult<T> = Result<T, IcnsError>;

impl From<NormalizeError> for IcnsError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::InvalidImage(reason) => Self::InvalidImage(reason),
            NormalizeError::Encode(inner) => Self::Encode(inner.to_string()),
        }
    }
}
