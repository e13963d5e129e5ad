//! Source sets
//!
//! A source set describes where one configuration layer (default, build type
//! or flavor) keeps its manifest, resources and compile classpath. Source
//! sets are immutable inputs with a read-only contract; this core never
//! constructs them from disk layout conventions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Read-only contract for one configuration layer's sources
pub trait SourceSet: Send + Sync {
    /// Path to the layer's manifest file
    fn manifest_path(&self) -> &Path;

    /// Resource directory, if the layer provides resources
    fn resource_dir(&self) -> Option<&Path>;

    /// Compile classpath entries contributed by the layer
    fn compile_classpath(&self) -> &[PathBuf];
}

/// Plain directory-backed source set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirSourceSet {
    /// Manifest file path
    pub manifest: PathBuf,

    /// Resource directory, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<PathBuf>,

    /// Compile classpath entries
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
}

impl DirSourceSet {
    /// Create a source set with only a manifest
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            resources: None,
            classpath: Vec::new(),
        }
    }

    /// Set the resource directory
    pub fn with_resources(mut self, resources: impl Into<PathBuf>) -> Self {
        self.resources = Some(resources.into());
        self
    }

    /// Append a compile classpath entry
    pub fn with_classpath_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.classpath.push(entry.into());
        self
    }
}

impl SourceSet for DirSourceSet {
    fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    fn resource_dir(&self) -> Option<&Path> {
        self.resources.as_deref()
    }

    fn compile_classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let sources = DirSourceSet::new("/app/manifest.xml")
            .with_resources("/app/res")
            .with_classpath_entry("/libs/a.jar")
            .with_classpath_entry("/libs/b.jar");

        assert_eq!(sources.manifest_path(), Path::new("/app/manifest.xml"));
        assert_eq!(sources.resource_dir(), Some(Path::new("/app/res")));
        assert_eq!(sources.compile_classpath().len(), 2);
    }

    #[test]
    fn test_manifest_only() {
        let sources = DirSourceSet::new("/app/manifest.xml");

        assert!(sources.resource_dir().is_none());
        assert!(sources.compile_classpath().is_empty());
    }
}
