//! Flavor configuration and the override merge chain
//!
//! A flavor is a named bag of scalar overrides. Flavors stack: each field is
//! taken from the overriding flavor when set, otherwise inherited from the
//! layer below, with the default configuration as the ultimate fallback.

use serde::{Deserialize, Serialize};

/// A named bundle of build-variant overrides.
///
/// Every field other than `name` is optional; an unset field falls through to
/// the layer below it in the merge chain. Instances are immutable once
/// constructed — merging produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorConfig {
    /// Flavor name (e.g., "free", "paid")
    #[serde(default)]
    pub name: String,

    /// Package name override for the produced application
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    /// Suffix appended to the resolved package name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name_suffix: Option<String>,

    /// Package name override for the test application
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_package_name: Option<String>,

    /// Instrumentation runner class for test variants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_instrumentation_runner: Option<String>,

    /// Numeric version code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_code: Option<i32>,

    /// Human-readable version name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,

    /// Minimum supported platform API level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_sdk_version: Option<u32>,

    /// Platform API level the build targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_sdk_version: Option<u32>,
}

impl FlavorConfig {
    /// Create an empty flavor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Merge this flavor over a base layer.
    ///
    /// Each field is taken from `self` when set, otherwise from `base`. The
    /// result keeps the receiver's name. Override is silent and total: no
    /// field-level conflict is ever reported.
    pub fn merge_over(&self, base: &FlavorConfig) -> FlavorConfig {
        FlavorConfig {
            name: self.name.clone(),
            package_name: self
                .package_name
                .clone()
                .or_else(|| base.package_name.clone()),
            package_name_suffix: self
                .package_name_suffix
                .clone()
                .or_else(|| base.package_name_suffix.clone()),
            test_package_name: self
                .test_package_name
                .clone()
                .or_else(|| base.test_package_name.clone()),
            test_instrumentation_runner: self
                .test_instrumentation_runner
                .clone()
                .or_else(|| base.test_instrumentation_runner.clone()),
            version_code: self.version_code.or(base.version_code),
            version_name: self
                .version_name
                .clone()
                .or_else(|| base.version_name.clone()),
            min_sdk_version: self.min_sdk_version.or(base.min_sdk_version),
            target_sdk_version: self.target_sdk_version.or(base.target_sdk_version),
        }
    }
}

/// Fold a sequence of flavors over a default configuration.
///
/// Flavors are applied in declaration order, so the last-declared flavor has
/// the highest priority and the default configuration the lowest.
pub fn merge_flavors(flavors: &[FlavorConfig], default_config: &FlavorConfig) -> FlavorConfig {
    flavors
        .iter()
        .fold(default_config.clone(), |merged, flavor| {
            flavor.merge_over(&merged)
        })
}
