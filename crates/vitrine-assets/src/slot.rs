use url::Url;
use vitrine_image::OutputEncoding;

/// One fixed-purpose image slot: a drop target with a known target size,
/// output encoding, and logical output path.
#[derive(Clone, Debug)]
pub struct AssetSlot {
    /// Logical output path; used verbatim as the archive-internal path.
    pub output_path: String,
    pub width: u32,
    pub height: u32,
    pub encoding: OutputEncoding,
    /// Placeholder fetched when the slot was never customized.
    pub fallback: Url,
}

/// Derived output that is not a drop target of its own: the platform icon
/// container and the secondary-platform icon archive.
#[derive(Clone, Debug)]
pub struct SpecialEntry {
    pub output_path: String,
    pub fallback: Url,
}

/// Static, complete list of expected bundle outputs. Fixed at session start;
/// never mutated.
#[derive(Clone, Debug)]
pub struct BundleManifest {
    pub slots: Vec<AssetSlot>,
    pub specials: Vec<SpecialEntry>,
}

impl BundleManifest {
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn slot(&self, path: &str) -> Option<&AssetSlot> {
        self.slots.iter().find(|s| s.output_path == path)
    }

    /// Every archive entry in manifest order (slots first, then the special
    /// packages) as `(logical path, fallback locator)`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Url)> {
        self.slots
            .iter()
            .map(|s| (s.output_path.as_str(), &s.fallback))
            .chain(
                self.specials
                    .iter()
                    .map(|s| (s.output_path.as_str(), &s.fallback)),
            )
    }
}

const PNG: OutputEncoding = OutputEncoding::Png;
const JPEG: OutputEncoding = OutputEncoding::Jpeg;

/// `(output path, placeholder path, width, height, encoding)` per slot.
const SLOT_TABLE: &[(&str, &str, u32, u32, OutputEncoding)] = &[
    (
        "storefront-assets/store/header_capsule.png",
        "placeholders/store/header_capsule_placeholder.png",
        920,
        430,
        PNG,
    ),
    (
        "storefront-assets/store/small_capsule.png",
        "placeholders/store/small_capsule_placeholder.png",
        462,
        174,
        PNG,
    ),
    (
        "storefront-assets/store/main_capsule.png",
        "placeholders/store/main_capsule_placeholder.png",
        1232,
        706,
        PNG,
    ),
    (
        "storefront-assets/store/vertical_capsule.png",
        "placeholders/store/vertical_capsule_placeholder.png",
        748,
        896,
        PNG,
    ),
    (
        "storefront-assets/screenshots/store_screenshot_01.png",
        "placeholders/screenshots/store_screenshot_01_placeholder.png",
        1920,
        1080,
        PNG,
    ),
    (
        "storefront-assets/screenshots/store_screenshot_02.png",
        "placeholders/screenshots/store_screenshot_02_placeholder.png",
        1920,
        1080,
        PNG,
    ),
    (
        "storefront-assets/screenshots/store_screenshot_03.png",
        "placeholders/screenshots/store_screenshot_03_placeholder.png",
        1920,
        1080,
        PNG,
    ),
    (
        "storefront-assets/screenshots/store_screenshot_04.png",
        "placeholders/screenshots/store_screenshot_04_placeholder.png",
        1920,
        1080,
        PNG,
    ),
    (
        "storefront-assets/screenshots/store_screenshot_05.png",
        "placeholders/screenshots/store_screenshot_05_placeholder.png",
        1920,
        1080,
        PNG,
    ),
    (
        "storefront-assets/library/library_capsule.png",
        "placeholders/library/library_capsule_placeholder.png",
        600,
        900,
        PNG,
    ),
    (
        "storefront-assets/library/library_header.png",
        "placeholders/library/library_header_placeholder.png",
        920,
        430,
        PNG,
    ),
    (
        "storefront-assets/library/library_hero.png",
        "placeholders/library/library_hero_placeholder.png",
        3840,
        1240,
        PNG,
    ),
    (
        "storefront-assets/library/library_logo.png",
        "placeholders/library/library_logo_placeholder.png",
        1280,
        720,
        PNG,
    ),
    (
        "storefront-assets/client/shortcut_icon_512.png",
        "placeholders/client/shortcut_icon_512_placeholder.png",
        512,
        512,
        PNG,
    ),
    (
        "storefront-assets/client/app_icon_184.jpg",
        "placeholders/client/app_icon_184_placeholder.jpg",
        184,
        184,
        JPEG,
    ),
    (
        "storefront-assets/client/mac_icon_1024.png",
        "placeholders/client/mac_icon_1024_placeholder.png",
        1024,
        1024,
        PNG,
    ),
];

const SPECIAL_TABLE: &[(&str, &str)] = &[
    (
        "storefront-assets/client/mac_icon.icns",
        "placeholders/client/mac_icon_placeholder.icns",
    ),
    (
        "storefront-assets/client/linux_icons.zip",
        "placeholders/client/linux_icons_placeholder.zip",
    ),
];

/// The full storefront manifest, with fallback locators resolved against
/// `placeholder_base` (the URL the placeholder tree is served under).
///
/// # Panics
///
/// Panics if a placeholder path fails to join onto `placeholder_base`; the
/// table paths are plain relative paths, so this requires a degenerate base
/// URL (e.g. a `mailto:`-style cannot-be-a-base URL).
#[must_use]
pub fn storefront_manifest(placeholder_base: &Url) -> BundleManifest {
    let join = |rel: &str| {
        placeholder_base
            .join(rel)
            .expect("join placeholder path onto base URL")
    };

    BundleManifest {
        slots: SLOT_TABLE
            .iter()
            .map(|&(path, placeholder, width, height, encoding)| AssetSlot {
                output_path: path.to_string(),
                width,
                height,
                encoding,
                fallback: join(placeholder),
            })
            .collect(),
        specials: SPECIAL_TABLE
            .iter()
            .map(|&(path, placeholder)| SpecialEntry {
                output_path: path.to_string(),
                fallback: join(placeholder),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8092/").unwrap()
    }

    #[test]
    fn manifest_has_sixteen_slots_and_two_specials() {
        let manifest = storefront_manifest(&base());
        assert_eq!(manifest.total_slots(), 16);
        assert_eq!(manifest.specials.len(), 2);
        assert_eq!(manifest.entries().count(), 18);
    }

    #[test]
    fn output_paths_are_unique() {
        let manifest = storefront_manifest(&base());
        let paths: HashSet<_> = manifest.entries().map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths.len(), 18);
    }

    #[test]
    fn fallbacks_resolve_under_the_placeholder_base() {
        let manifest = storefront_manifest(&base());
        for (_, fallback) in manifest.entries() {
            assert!(fallback.path().starts_with("/placeholders/"), "{fallback}");
        }
    }

    #[test]
    fn slot_lookup_finds_dimensions() {
        let manifest = storefront_manifest(&base());
        let slot = manifest
            .slot("storefront-assets/store/header_capsule.png")
            .unwrap();
        assert_eq!((slot.width, slot.height), (920, 430));
        assert!(manifest.slot("storefront-assets/store/nope.png").is_none());
    }
}
