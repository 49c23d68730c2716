//! Per-request scratch directories.
//!
//! A [`ScratchDir`] owns a fresh temporary directory and removes it when
//! dropped, so every exit path of a request cleans up after itself.

use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// File name used for the downloaded source inside a scratch directory.
pub const SOURCE_FILE_NAME: &str = "source_video.mp4";

const SCRATCH_PREFIX: &str = "shorts-";

/// Temporary working directory scoped to one request.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a scratch directory under `root`, or the system temp dir.
    pub fn create(root: Option<&Path>) -> MediaResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the downloaded source is stored.
    pub fn source_path(&self) -> PathBuf {
        self.dir.path().join(SOURCE_FILE_NAME)
    }
}

/// Join `name` onto `dir`, refusing anything but a single plain file name.
///
/// Absolute paths, separators and `.`/`..` would let the result land outside
/// `dir`, where nothing removes it.
pub fn contained_path(dir: &Path, name: &str) -> MediaResult<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(dir.join(name)),
        _ => Err(MediaError::InvalidFileName(name.to_string())),
    }
}
