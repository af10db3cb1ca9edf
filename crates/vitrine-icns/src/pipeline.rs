use std::{path::PathBuf, sync::Arc};

use bytes::Bytes;
use vitrine_image::{OutputEncoding, encode, normalize_image};

use crate::{
    error::{IcnsError, IcnsResult},
    packager::IconPackager,
    workspace::ScopedWorkspace,
};

/// Edge length of the master rendition.
pub const MASTER_EDGE: u32 = 1024;

/// Resolution ladder derived from the master, smallest first.
pub const RENDITION_EDGES: [u32; 6] = [16, 32, 48, 128, 256, 512];

/// Turns one uploaded raster image into a multi-resolution icon container.
///
/// Each call owns a [`ScopedWorkspace`] that is deleted on every exit path.
/// The packager is injected so the external tool is swappable.
///
/// No wall-clock bound is applied to a job; only the admission gate upstream
/// limits how many jobs can be stuck at once.
// TODO: bound the external packager's runtime; a hung tool currently holds
// its admission slot forever.
#[derive(Clone)]
pub struct IcnsPipeline {
    packager: Arc<dyn IconPackager>,
    workspace_root: Option<PathBuf>,
}

impl IcnsPipeline {
    #[must_use]
    pub fn new(packager: Arc<dyn IconPackager>) -> Self {
        Self {
            packager,
            workspace_root: None,
        }
    }

    /// Place job workspaces under `root` instead of the system temp
    /// directory.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Build an `.icns` container from encoded image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IcnsError::InvalidImage`] when the input cannot be decoded;
    /// other variants when a rendition, the packaging invocation, or
    /// workspace IO fails. The workspace is removed in every case.
    pub async fn build_icon_container(&self, source: Bytes) -> IcnsResult<Bytes> {
        let workspace = ScopedWorkspace::create(self.workspace_root.as_deref())?;

        // Decode once and derive every rendition on a blocking thread; the
        // resize ladder is pure CPU.
        let renditions = tokio::task::spawn_blocking(move || render_ladder(&source))
            .await
            .map_err(|e| IcnsError::Io(std::io::Error::other(e)))??;

        let master_path = workspace.file("master_1024.png");
        tokio::fs::write(&master_path, &renditions.master).await?;

        let mut rendition_paths = Vec::with_capacity(RENDITION_EDGES.len());
        for (edge, bytes) in RENDITION_EDGES.iter().zip(&renditions.ladder) {
            let path = workspace.file(&format!("icon_{edge}x{edge}.png"));
            tokio::fs::write(&path, bytes).await?;
            rendition_paths.push(path);
        }

        let container_path = workspace.file("icon.icns");
        self.packager
            .package(&master_path, &rendition_paths, &container_path)
            .await?;

        let container = tokio::fs::read(&container_path)
            .await
            .map_err(|e| IcnsError::Packager(format!("container missing after packaging: {e}")))?;

        tracing::debug!(bytes = container.len(), "icon container built");
        Ok(Bytes::from(container))
    }
}

struct Renditions {
    master: Vec<u8>,
    ladder: Vec<Vec<u8>>,
}

fn render_ladder(source: &[u8]) -> IcnsResult<Renditions> {
    let decoded =
        image::load_from_memory(source).map_err(|e| IcnsError::InvalidImage(e.to_string()))?;

    let master = normalize_image(&decoded, MASTER_EDGE, MASTER_EDGE);
    let master_png = encode(&master, OutputEncoding::Png)?;

    let mut ladder = Vec::with_capacity(RENDITION_EDGES.len());
    for edge in RENDITION_EDGES {
        let rendition = normalize_image(&master, edge, edge);
        ladder.push(encode(&rendition, OutputEncoding::Png)?);
    }

    Ok(Renditions {
        master: master_png,
        ladder,
    })
}
