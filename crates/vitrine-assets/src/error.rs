use thiserror::Error;
use vitrine_image::NormalizeError;

/// Asset registry, session, and bundle errors.
#[derive(Debug, Error)]
pub enum AssetsError {
    /// Nothing was customized; there is no bundle worth building.
    #[error("no customized assets; nothing to bundle")]
    EmptyCustomization,

    /// Some slots are still placeholders and the caller did not consent to a
    /// partial bundle.
    #[error("only {customized} of {total} slots customized; partial bundle needs explicit consent")]
    PartialCustomization { customized: usize, total: usize },

    /// The path names no slot in the manifest.
    #[error("unknown slot path: {0}")]
    UnknownSlot(String),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("archive write failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AssetsResult<T> = Result<T, AssetsError>;
