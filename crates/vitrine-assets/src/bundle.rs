use std::{io::Write, sync::Arc};

use bytes::Bytes;
use url::Url;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    error::{AssetsError, AssetsResult},
    fetch::FallbackFetch,
    registry::AssetRegistry,
    slot::BundleManifest,
};

/// Caller's decision for bundles where some slots are still placeholders.
///
/// Surfacing this as an explicit parameter keeps the "download an incomplete
/// set?" question with the user instead of silently proceeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartialBundle {
    /// Refuse unless every slot is customized.
    Deny,
    /// Assemble, filling uncustomized entries from their fallbacks.
    Allow,
}

/// Builds the final downloadable archive from the manifest and registry.
pub struct BundleAssembler {
    fetcher: Arc<dyn FallbackFetch>,
}

impl BundleAssembler {
    #[must_use]
    pub fn new(fetcher: Arc<dyn FallbackFetch>) -> Self {
        Self { fetcher }
    }

    /// Assemble one ZIP with every manifest path as an entry name.
    ///
    /// Resolution per entry: registry content first, fetched fallback second;
    /// an entry whose fallback fetch also fails is omitted rather than
    /// aborting the whole bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AssetsError::EmptyCustomization`] when no slot is
    /// customized, [`AssetsError::PartialCustomization`] when some slots are
    /// missing and `consent` is [`PartialBundle::Deny`], and archive variants
    /// when the ZIP cannot be written.
    pub async fn assemble(
        &self,
        manifest: &BundleManifest,
        registry: &AssetRegistry,
        consent: PartialBundle,
    ) -> AssetsResult<Bytes> {
        let customized = registry.customized_count();
        let total = registry.total_slots();

        if customized == 0 {
            return Err(AssetsError::EmptyCustomization);
        }
        if customized < total && consent == PartialBundle::Deny {
            return Err(AssetsError::PartialCustomization { customized, total });
        }

        let mut resolved: Vec<(String, Bytes)> = Vec::new();
        for (path, fallback) in manifest.entries() {
            match self.resolve(registry, path, fallback).await {
                Some(bytes) => resolved.push((path.to_string(), bytes)),
                None => {
                    tracing::warn!(path, "no content and no fallback; omitting bundle entry");
                }
            }
        }

        let archive = tokio::task::spawn_blocking(move || write_archive(&resolved))
            .await
            .map_err(|e| AssetsError::Io(std::io::Error::other(e)))??;

        tracing::debug!(bytes = archive.len(), customized, total, "bundle assembled");
        Ok(Bytes::from(archive))
    }

    async fn resolve(
        &self,
        registry: &AssetRegistry,
        path: &str,
        fallback: &Url,
    ) -> Option<Bytes> {
        if let Some(bytes) = registry.get(path) {
            return Some(bytes);
        }
        match self.fetcher.fetch_bytes(fallback).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(path, error = %e, "fallback fetch failed");
                None
            }
        }
    }
}

fn write_archive(entries: &[(String, Bytes)]) -> AssetsResult<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, bytes) in entries {
        zip.start_file(path.as_str(), options)?;
        zip.write_all(bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
