#![forbid(unsafe_code)]

//! # vitrine-assets
//!
//! Session-side asset state for the storefront customizer.
//!
//! ## Pieces
//!
//! - [`BundleManifest`]: the static, complete list of expected output paths
//!   (16 image slots plus the two client icon packages), each entry carrying
//!   a remote fallback locator.
//! - [`AssetRegistry`]: in-memory map from output path to produced bytes,
//!   plus the set of customized slots. A slot path present in the map is, by
//!   construction, a customized slot.
//! - [`AssetSession`]: the user flows, i.e. normalize a dropped image into
//!   one slot, or fan a master icon out to every client icon output.
//! - [`BundleAssembler`]: resolves every manifest entry to customized
//!   content or its fetched fallback and writes the final ZIP. Empty
//!   customization is an error; a partial bundle needs explicit consent.

mod bundle;
mod error;
mod fetch;
mod registry;
mod session;
mod slot;

pub use bundle::{BundleAssembler, PartialBundle};
pub use error::{AssetsError, AssetsResult};
pub use fetch::{FallbackFetch, FetchError, FetchOptions, FetchResult, HttpFetcher};
pub use registry::AssetRegistry;
pub use session::{
    AssetSession, ICON_CONTAINER_PATH, LINUX_ICON_EDGES, LINUX_ICONS_PATH, MASTER_ICON_PATH,
};
pub use slot::{AssetSlot, BundleManifest, SpecialEntry, storefront_manifest};
