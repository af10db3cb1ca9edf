use std::io::Write;

use bytes::Bytes;
use image::DynamicImage;
use vitrine_image::{NormalizeError, OutputEncoding, encode, normalize, normalize_image};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    error::{AssetsError, AssetsResult},
    registry::AssetRegistry,
    slot::BundleManifest,
};

/// Icon edges bundled into the secondary-platform archive.
pub const LINUX_ICON_EDGES: [u32; 7] = [16, 24, 32, 64, 96, 128, 256];

/// Slot receiving the 1024×1024 master icon rendition.
pub const MASTER_ICON_PATH: &str = "storefront-assets/client/mac_icon_1024.png";

/// Output path of the icon container produced by the conversion pipeline.
pub const ICON_CONTAINER_PATH: &str = "storefront-assets/client/mac_icon.icns";

/// Output path of the secondary-platform icon archive.
pub const LINUX_ICONS_PATH: &str = "storefront-assets/client/linux_icons.zip";

const SHORTCUT_ICON_PATH: &str = "storefront-assets/client/shortcut_icon_512.png";
const APP_ICON_PATH: &str = "storefront-assets/client/app_icon_184.jpg";

/// Session-scoped user flows over one manifest and registry.
///
/// Every operation is all-or-nothing per slot: a failure leaves the slot's
/// registry entry exactly as it was.
pub struct AssetSession {
    manifest: BundleManifest,
    registry: AssetRegistry,
}

impl AssetSession {
    #[must_use]
    pub fn new(manifest: BundleManifest) -> Self {
        let registry = AssetRegistry::new(&manifest);
        Self { manifest, registry }
    }

    #[must_use]
    pub fn manifest(&self) -> &BundleManifest {
        &self.manifest
    }

    #[must_use]
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Normalize a dropped source image into one slot and record it.
    ///
    /// Returns the normalized bytes (callers also preview them).
    ///
    /// # Errors
    ///
    /// Returns [`AssetsError::UnknownSlot`] for a path outside the manifest
    /// and [`AssetsError::Normalize`] when the source cannot be processed; in
    /// both cases the registry is untouched.
    pub fn apply_dropped_file(&self, path: &str, source: &[u8]) -> AssetsResult<Bytes> {
        let slot = self
            .manifest
            .slot(path)
            .ok_or_else(|| AssetsError::UnknownSlot(path.to_string()))?;

        let bytes = Bytes::from(normalize(source, slot.width, slot.height, slot.encoding)?);
        self.registry.put(path, bytes.clone());
        tracing::debug!(path, "slot customized");
        Ok(bytes)
    }

    /// Fan one master source image out to every client icon output: the
    /// 1024×1024 master PNG, the 512×512 shortcut PNG, and the 184×184 JPEG
    /// slots, plus the secondary-platform icon archive.
    ///
    /// Returns the master PNG bytes so the caller can feed the icon-container
    /// pipeline; its result is stored under [`ICON_CONTAINER_PATH`] via
    /// [`AssetRegistry::put`].
    ///
    /// All renditions are computed before the first registry write, so a
    /// failure leaves every slot untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AssetsError::Normalize`] for an undecodable source and
    /// archive variants when the icon archive cannot be written.
    pub fn apply_master_icon(&self, source: &[u8]) -> AssetsResult<Bytes> {
        let decoded = image::load_from_memory(source)
            .map_err(|e| AssetsError::Normalize(NormalizeError::InvalidImage(e.to_string())))?;

        let mut renditions = Vec::new();
        for path in [MASTER_ICON_PATH, SHORTCUT_ICON_PATH, APP_ICON_PATH] {
            let slot = self
                .manifest
                .slot(path)
                .ok_or_else(|| AssetsError::UnknownSlot(path.to_string()))?;
            let image = normalize_image(&decoded, slot.width, slot.height);
            renditions.push((path, Bytes::from(encode(&image, slot.encoding)?)));
        }
        let icon_archive = build_linux_icons(&decoded)?;

        for (path, bytes) in &renditions {
            self.registry.put(path, bytes.clone());
        }
        self.registry.put(LINUX_ICONS_PATH, icon_archive);
        tracing::debug!("master icon fanned out to client icon slots");

        let (_, master) = renditions.swap_remove(0);
        Ok(master)
    }
}

/// ZIP of crop-to-fill PNG renditions at every secondary-platform edge.
fn build_linux_icons(decoded: &DynamicImage) -> AssetsResult<Bytes> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for edge in LINUX_ICON_EDGES {
        let rendition = normalize_image(decoded, edge, edge);
        zip.start_file(format!("linux-icons/icon_{edge}x{edge}.png"), options)?;
        zip.write_all(&encode(&rendition, OutputEncoding::Png)?)?;
    }

    Ok(Bytes::from(zip.finish()?.into_inner()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};
    use url::Url;

    use super::*;
    use crate::slot::storefront_manifest;

    fn session() -> AssetSession {
        let base = Url::parse("http://localhost:8092/").unwrap();
        AssetSession::new(storefront_manifest(&base))
    }

    fn source_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([10, 200, 90, 255]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn dropped_file_is_normalized_to_the_slot_box() {
        let session = session();

        let bytes = session
            .apply_dropped_file(
                "storefront-assets/store/header_capsule.png",
                &source_png(3000, 2000),
            )
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (920, 430));
        assert_eq!(session.registry().customized_count(), 1);
    }

    #[test]
    fn unknown_slot_path_is_rejected() {
        let session = session();
        let err = session
            .apply_dropped_file("storefront-assets/store/unknown.png", &source_png(64, 64))
            .unwrap_err();
        assert!(matches!(err, AssetsError::UnknownSlot(_)), "{err:?}");
    }

    #[test]
    fn failed_drop_leaves_the_slot_untouched() {
        let session = session();

        let err = session
            .apply_dropped_file("storefront-assets/store/header_capsule.png", b"not pixels")
            .unwrap_err();

        assert!(matches!(err, AssetsError::Normalize(_)), "{err:?}");
        assert_eq!(session.registry().customized_count(), 0);
        assert!(
            session
                .registry()
                .get("storefront-assets/store/header_capsule.png")
                .is_none()
        );
    }

    #[test]
    fn master_icon_fans_out_to_all_client_icon_outputs() {
        let session = session();

        let master = session.apply_master_icon(&source_png(800, 600)).unwrap();

        let decoded = image::load_from_memory(&master).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 1024));

        let registry = session.registry();
        assert_eq!(registry.customized_count(), 3);
        for path in [MASTER_ICON_PATH, SHORTCUT_ICON_PATH, APP_ICON_PATH] {
            assert!(registry.is_customized(path), "{path} not customized");
        }

        let app_icon = registry.get(APP_ICON_PATH).unwrap();
        assert_eq!(
            image::guess_format(&app_icon).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn secondary_archive_contains_the_full_icon_ladder() {
        let session = session();
        session.apply_master_icon(&source_png(512, 512)).unwrap();

        let archive = session.registry().get(LINUX_ICONS_PATH).unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();

        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        let expected: Vec<String> = LINUX_ICON_EDGES
            .iter()
            .map(|e| format!("linux-icons/icon_{e}x{e}.png"))
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn undecodable_master_leaves_every_slot_untouched() {
        let session = session();

        let err = session.apply_master_icon(b"garbage").unwrap_err();
        assert!(matches!(err, AssetsError::Normalize(_)), "{err:?}");
        assert_eq!(session.registry().customized_count(), 0);
        assert!(session.registry().get(LINUX_ICONS_PATH).is_none());
    }
}
