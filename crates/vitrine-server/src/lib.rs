#![forbid(unsafe_code)]

//! # vitrine-server
//!
//! The HTTP application: `POST /api/generate-icns` wired through the
//! admission gate and icon pipeline, plus static file serving for the UI and
//! placeholder tree.
//!
//! Request handling order for conversions is deliberate: cheap header checks
//! first, then admission, then the (capped) body read, then the pipeline.
//! Every internal failure maps to exactly one status code with a safe
//! message; nothing crashes the serving loop.

mod app;
mod config;
mod error;
mod static_files;

pub use app::{AppState, app};
pub use config::{MAX_UPLOAD_BYTES, ServerConfig};
pub use error::ApiError;
