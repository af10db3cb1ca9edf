use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{IcnsError, IcnsResult};

/// Packages a master image plus its fixed-resolution renditions into one
/// icon container file.
///
/// Implementations receive paths inside the job's scoped workspace and must
/// write the container to `out`; everything else in the workspace is owned by
/// the pipeline.
#[async_trait]
pub trait IconPackager: Send + Sync {
    /// Produce the container at `out` from `master` and `renditions`.
    ///
    /// # Errors
    ///
    /// Returns [`IcnsError::Packager`] when the container cannot be built.
    async fn package(&self, master: &Path, renditions: &[PathBuf], out: &Path) -> IcnsResult<()>;
}

/// Production packager: one invocation of an external `png2icns`-style tool,
/// called as `<program> <out> <master> <renditions...>` with all stdio
/// detached.
#[derive(Clone, Debug)]
pub struct CommandPackager {
    program: String,
}

impl CommandPackager {
    pub const DEFAULT_PROGRAM: &'static str = "png2icns";

    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandPackager {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl IconPackager for CommandPackager {
    async fn package(&self, master: &Path, renditions: &[PathBuf], out: &Path) -> IcnsResult<()> {
        let status = Command::new(&self.program)
            .arg(out)
            .arg(master)
            .args(renditions)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| IcnsError::Packager(format!("failed to launch {}: {e}", self.program)))?;

        if !status.success() {
            return Err(IcnsError::Packager(format!(
                "{} exited with {status}",
                self.program
            )));
        }

        tracing::debug!(program = %self.program, out = %out.display(), "icon container packaged");
        Ok(())
    }
}
