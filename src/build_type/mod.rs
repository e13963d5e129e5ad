//! Build type configuration
//!
//! A build type is the single always-present override layer (e.g., debug or
//! release) applied on top of the merged flavors. It carries a package-name
//! suffix and a handful of build-type-only flags. The flags are carried for
//! downstream consumers; this core only interprets the suffix.

use serde::{Deserialize, Serialize};

/// Conventional debug build type name
pub const DEBUG: &str = "debug";

/// Conventional release build type name
pub const RELEASE: &str = "release";

/// Immutable build-type override layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTypeConfig {
    /// Build type name (e.g., "debug", "release")
    #[serde(default)]
    pub name: String,

    /// Suffix appended to the resolved package name (with or without a
    /// leading dot)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name_suffix: Option<String>,

    /// Whether the produced application is debuggable
    #[serde(default)]
    pub debuggable: bool,

    /// Whether code shrinking runs for this build type
    #[serde(default)]
    pub run_shrinker: bool,

    /// Whether the final archive is alignment-optimized
    #[serde(default = "default_zip_align")]
    pub zip_align: bool,
}

fn default_zip_align() -> bool {
    true
}

impl Default for BuildTypeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            package_name_suffix: None,
            debuggable: false,
            run_shrinker: false,
            zip_align: true,
        }
    }
}

impl BuildTypeConfig {
    /// Create an empty build type with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Conventional debug preset: debuggable, no alignment pass
    pub fn debug() -> Self {
        Self {
            name: DEBUG.to_string(),
            debuggable: true,
            zip_align: false,
            ..Self::default()
        }
    }

    /// Conventional release preset
    pub fn release() -> Self {
        Self::new(RELEASE)
    }

    /// Set the package-name suffix
    pub fn with_package_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.package_name_suffix = Some(suffix.into());
        self
    }
}

/// Compose a package name with a build-type suffix.
///
/// A suffix starting with `.` concatenates directly; otherwise a `.`
/// separator is inserted. An empty suffix leaves the base unchanged.
pub fn append_package_suffix(base: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        base.to_string()
    } else if suffix.starts_with('.') {
        format!("{}{}", base, suffix)
    } else {
        format!("{}.{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_suffix_with_leading_dot() {
        assert_eq!(
            append_package_suffix("com.example", ".debug"),
            "com.example.debug"
        );
    }

    #[test]
    fn test_append_suffix_without_leading_dot() {
        assert_eq!(
            append_package_suffix("com.example", "debug"),
            "com.example.debug"
        );
    }

    #[test]
    fn test_append_empty_suffix() {
        assert_eq!(append_package_suffix("com.example", ""), "com.example");
    }

    #[test]
    fn test_debug_preset() {
        let debug = BuildTypeConfig::debug();

        assert_eq!(debug.name, DEBUG);
        assert!(debug.debuggable);
        assert!(!debug.zip_align);
        assert!(debug.package_name_suffix.is_none());
    }

    #[test]
    fn test_release_preset() {
        let release = BuildTypeConfig::release();

        assert_eq!(release.name, RELEASE);
        assert!(!release.debuggable);
        assert!(release.zip_align);
    }

    #[test]
    fn test_toml_defaults() {
        let parsed: BuildTypeConfig = toml::from_str("package_name_suffix = \".debug\"").unwrap();

        assert_eq!(parsed.package_name_suffix.as_deref(), Some(".debug"));
        assert!(!parsed.debuggable);
        assert!(parsed.zip_align);
    }
}
