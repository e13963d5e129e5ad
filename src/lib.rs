//! Variant configuration resolution for modular application builds.
//!
//! This crate resolves the effective configuration of one build variant:
//! it merges layered override sources (default configuration, build type,
//! flavors) into one effective configuration and flattens the library
//! dependency graph into the deduplicated, priority-ordered sequence that
//! drives resource-overlay and classpath precedence downstream.
//!
//! The entry point is [`VariantConfig`]: construct it from a default
//! configuration and a build type, add flavors and library dependencies,
//! then query the resolved package name, resource inputs and compile
//! classpath. Manifest parsing stays outside the crate behind the
//! [`ManifestReader`] trait.

pub mod build_type;
pub mod buildfile;
pub mod dependency;
pub mod flavor;
pub mod manifest;
pub mod mock;
pub mod source_set;
pub mod variant;

pub use build_type::{append_package_suffix, BuildTypeConfig};
pub use buildfile::{BuildFile, BuildFileError};
pub use dependency::{flatten, same_dependency, DepHandle, LibraryDependency};
pub use flavor::{merge_flavors, FlavorConfig};
pub use manifest::{ManifestError, ManifestReader};
pub use source_set::{DirSourceSet, SourceSet};
pub use variant::{VariantConfig, VariantError, VariantKind, DEFAULT_TEST_RUNNER};
