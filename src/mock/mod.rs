//! Test doubles
//!
//! In-process fakes for the external collaborators: a configurable manifest
//! reader and a canned dependency node. Used by unit and integration tests;
//! no production code path depends on this module.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dependency::{DepHandle, LibraryDependency};
use crate::manifest::{ManifestError, ManifestReader};

/// Manifest reader backed by an in-memory map
#[derive(Debug, Default)]
pub struct FakeManifestReader {
    packages: HashMap<PathBuf, String>,
    fallback: Option<String>,
}

impl FakeManifestReader {
    /// Reader that knows no packages (every lookup fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader that answers every lookup with the same package name
    pub fn with_fallback(package: impl Into<String>) -> Self {
        Self {
            packages: HashMap::new(),
            fallback: Some(package.into()),
        }
    }

    /// Register a package name for a specific manifest path
    pub fn insert(&mut self, manifest: impl Into<PathBuf>, package: impl Into<String>) {
        self.packages.insert(manifest.into(), package.into());
    }
}

impl ManifestReader for FakeManifestReader {
    fn package(&self, manifest: &Path) -> Result<String, ManifestError> {
        if let Some(package) = self.packages.get(manifest) {
            return Ok(package.clone());
        }
        match &self.fallback {
            Some(package) => Ok(package.clone()),
            None => Err(ManifestError::MissingPackage {
                manifest: manifest.to_path_buf(),
            }),
        }
    }
}

/// Canned dependency node with a conventional on-disk layout
pub struct FakeDependency {
    manifest: PathBuf,
    resources: Option<PathBuf>,
    artifact: PathBuf,
    dependencies: Vec<DepHandle>,
}

impl FakeDependency {
    /// Leaf library with a resource directory
    pub fn new(name: &str) -> DepHandle {
        Self::build(name, true, Vec::new())
    }

    /// Leaf library without resources
    pub fn without_resources(name: &str) -> DepHandle {
        Self::build(name, false, Vec::new())
    }

    /// Library with the given direct dependencies
    pub fn with_deps(name: &str, dependencies: Vec<DepHandle>) -> DepHandle {
        Self::build(name, true, dependencies)
    }

    fn build(name: &str, with_resources: bool, dependencies: Vec<DepHandle>) -> DepHandle {
        let root = PathBuf::from("/deps").join(name);
        Arc::new(Self {
            manifest: root.join("manifest.xml"),
            resources: with_resources.then(|| root.join("res")),
            artifact: root.join(format!("{}.jar", name)),
            dependencies,
        })
    }
}

impl LibraryDependency for FakeDependency {
    fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    fn resource_dir(&self) -> Option<&Path> {
        self.resources.as_deref()
    }

    fn artifact_file(&self) -> &Path {
        &self.artifact
    }

    fn direct_dependencies(&self) -> &[DepHandle] {
        &self.dependencies
    }
}
