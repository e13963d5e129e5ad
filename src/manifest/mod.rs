//! Manifest reading collaborator
//!
//! Package names ultimately come from a manifest file. Parsing the manifest
//! is out of scope for this crate; callers inject a [`ManifestReader`]
//! implementation. Implementations must be stateless and reentrant so that
//! independent variants can be resolved concurrently.

use std::path::{Path, PathBuf};

/// Errors surfaced by a manifest reader
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {manifest}: {source}")]
    Io {
        manifest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {manifest} is malformed: {reason}")]
    Malformed { manifest: PathBuf, reason: String },

    #[error("manifest {manifest} declares no package name")]
    MissingPackage { manifest: PathBuf },
}

/// Capability for reading the package name out of a manifest file
pub trait ManifestReader: Send + Sync {
    /// Return the package name declared by the manifest at `manifest`
    fn package(&self, manifest: &Path) -> Result<String, ManifestError>;
}
