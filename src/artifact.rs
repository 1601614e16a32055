use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Intermediate file owned by a single pipeline run.
///
/// The file is deleted when the guard is dropped, on every exit path of the
/// owning scope. A file that was never created is not an error.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match remove_if_exists(&self.path) {
            Ok(true) => debug!("Removed temporary file {}", self.path.display()),
            Ok(false) => {}
            Err(e) => warn!("Failed to remove temporary file {}: {}", self.path.display(), e),
        }
    }
}

/// Delete a file, treating "not found" as success. Returns whether a file was removed.
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
