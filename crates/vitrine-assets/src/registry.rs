use std::collections::{HashMap, HashSet};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::slot::BundleManifest;

/// In-memory store of produced outputs plus the set of customized slots.
///
/// Contents are owned exclusively by the registry: `put` overwrites, and
/// nothing is ever removed during a session. Each mutation is one map
/// assignment under the lock, so concurrent writes to distinct paths cannot
/// corrupt one another.
///
/// Any output path may be stored (including derived packages like the icon
/// container), but only manifest slot paths count toward
/// [`customized_count`](Self::customized_count).
pub struct AssetRegistry {
    slot_paths: HashSet<String>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    outputs: HashMap<String, Bytes>,
    customized: HashSet<String>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new(manifest: &BundleManifest) -> Self {
        Self {
            slot_paths: manifest
                .slots
                .iter()
                .map(|s| s.output_path.clone())
                .collect(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Record produced bytes for `path`, overwriting any prior content. When
    /// `path` is a manifest slot, the slot becomes Customized.
    pub fn put(&self, path: &str, bytes: Bytes) {
        let mut inner = self.inner.lock();
        inner.outputs.insert(path.to_string(), bytes);
        if self.slot_paths.contains(path) {
            inner.customized.insert(path.to_string());
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<Bytes> {
        self.inner.lock().outputs.get(path).cloned()
    }

    #[must_use]
    pub fn is_customized(&self, path: &str) -> bool {
        self.inner.lock().customized.contains(path)
    }

    /// Number of slots customized so far.
    #[must_use]
    pub fn customized_count(&self) -> usize {
        self.inner.lock().customized.len()
    }

    /// Static manifest slot count.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.slot_paths.len()
    }
}
