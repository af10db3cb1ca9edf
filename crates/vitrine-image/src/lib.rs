#![forbid(unsafe_code)]

//! # vitrine-image
//!
//! Deterministic image normalization for fixed-size asset slots.
//!
//! ## Public contract
//!
//! [`normalize`] takes arbitrary encoded raster bytes and produces an image of
//! *exactly* the requested pixel dimensions, using the crop-to-fill strategy:
//! the source is scaled until it fully covers the target box and the overflow
//! is cropped around the center. The output is never letterboxed.
//!
//! [`normalize_image`] is the decode-once entry point for callers that derive
//! many renditions from a single source.

mod error;
mod normalize;

pub use error::{NormalizeError, NormalizeResult};
pub use normalize::{JPEG_QUALITY, OutputEncoding, encode, normalize, normalize_image};
