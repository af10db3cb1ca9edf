#![forbid(unsafe_code)]

//! # vitrine-icns
//!
//! Server-side icon conversion: one uploaded raster image becomes a
//! multi-resolution `.icns` container.
//!
//! ## Shape of a job
//!
//! Every conversion owns a uniquely-named scoped workspace directory. The
//! input is normalized to a 1024×1024 master PNG (crop-to-fill), a fixed
//! resolution ladder is derived from the master, and a single
//! [`IconPackager`] invocation produces the container, which is read back
//! into memory. The workspace is deleted on *every* exit path; the cleanup
//! is tied to ownership, not to the happy path.
//!
//! The packager is a narrow trait so the concrete external tool is swappable
//! and mockable; [`CommandPackager`] is the production implementation.

mod error;
mod packager;
mod pipeline;
mod workspace;

pub use error::{IcnsError, IcnsResult};
pub use packager::{CommandPackager, IconPackager};
pub use pipeline::{IcnsPipeline, MASTER_EDGE, RENDITION_EDGES};
pub use workspace::ScopedWorkspace;
