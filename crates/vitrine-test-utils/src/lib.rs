#![forbid(unsafe_code)]

//! Shared helpers for integration tests: an ephemeral axum server and
//! deterministic synthetic images. Test-only; nothing here ships.

mod http_server;
mod images;

pub use http_server::{TestHttpServer, fixed_bytes_router};
pub use images::solid_png;
