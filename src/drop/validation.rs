use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::media_support::MediaSupport;
use super::permissions::{PermissionError, PermissionStore};

/// Path produced by expansion, not yet checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CandidateFile {
    path: PathBuf,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Candidate that exists, is playable and had access granted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AcceptedFile {
    path: PathBuf,
    absolute: PathBuf,
}

impl AcceptedFile {
    /// Path as it was resolved from the drop.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute form handed to players.
    pub fn absolute_path(&self) -> &Path {
        &self.absolute
    }
}

/// Existence and media-type gate applied to every candidate.
#[derive(Clone, Copy)]
pub struct FileValidator<'a> {
    media: &'a dyn MediaSupport,
    permissions: &'a dyn PermissionStore,
}

impl<'a> FileValidator<'a> {
    pub fn new(media: &'a dyn MediaSupport, permissions: &'a dyn PermissionStore) -> Self {
        Self { media, permissions }
    }

    /// Grant access, then keep the candidate only if it exists and is supported.
    ///
    /// Rejections are routine (mixed folders, stray files) and only traced.
    pub fn accept(&self, candidate: &CandidateFile) -> Option<AcceptedFile> {
        let path = candidate.path();
        match self.permissions.grant(path) {
            Ok(()) | Err(PermissionError::Missing { .. }) => {}
            Err(err) => {
                warn!("Permission grant failed for {}: {err}", path.display());
                return None;
            }
        }
        if !path.exists() {
            debug!("Dropped path does not exist: {}", path.display());
            return None;
        }
        if !self.media.is_supported(path) {
            debug!("Dropped file is not supported media: {}", path.display());
            return None;
        }
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Some(AcceptedFile {
            path: path.to_path_buf(),
            absolute,
        })
    }
}

impl std::fmt::Debug for FileValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileValidator").finish_non_exhaustive()
    }
}
