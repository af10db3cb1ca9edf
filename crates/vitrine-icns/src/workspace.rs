use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::IcnsResult;

/// Uniquely-named temporary directory exclusively owned by one conversion
/// job.
///
/// The directory and everything in it are removed recursively when the
/// workspace is dropped, success or failure alike.
#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
}

impl ScopedWorkspace {
    const PREFIX: &'static str = "vitrine-icns-";

    /// Create a fresh workspace.
    ///
    /// Lives under `root` when given, otherwise under the system temp
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IcnsError::Io`] when the directory cannot be created.
    pub fn create(root: Option<&Path>) -> IcnsResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(Self::PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        tracing::debug!(path = %dir.path().display(), "conversion workspace created");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path for a file inside the workspace.
    #[must_use]
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
