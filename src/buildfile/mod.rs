//! Build description file
//!
//! Parses the TOML build description declaring the default configuration,
//! the build types and the flavors a project offers. One entry of each is
//! picked out of this file to construct a [`crate::VariantConfig`]. The raw
//! file bytes are digested so downstream build records can state exactly
//! which description produced a variant.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::build_type::BuildTypeConfig;
use crate::flavor::FlavorConfig;

/// Schema version for the build description file
pub const SCHEMA_VERSION: u32 = 1;

/// Errors when loading or validating a build description
#[derive(Debug, thiserror::Error)]
pub enum BuildFileError {
    #[error("failed to read build file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("build file not found: {0}")]
    NotFound(PathBuf),

    #[error("build type or flavor with an empty name")]
    EmptyName,

    #[error("flavor '{0}' shadows a build type of the same name")]
    NameClash(String),

    #[error("unknown build type: '{0}'")]
    UnknownBuildType(String),

    #[error("unknown flavor: '{0}'")]
    UnknownFlavor(String),
}

/// Parsed build description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildFile {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default configuration layer
    #[serde(rename = "default")]
    pub default_config: FlavorConfig,

    /// Build types by name
    #[serde(default, rename = "build_type")]
    pub build_types: BTreeMap<String, BuildTypeConfig>,

    /// Flavors by name
    #[serde(default, rename = "flavor")]
    pub flavors: BTreeMap<String, FlavorConfig>,

    /// SHA-256 digest of the raw file bytes (absent when parsed from a
    /// string)
    #[serde(skip)]
    pub digest: Option<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BuildFile {
    /// Load a build description from a file, recording its content digest
    pub fn load(path: &Path) -> Result<Self, BuildFileError> {
        if !path.exists() {
            return Err(BuildFileError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let digest = hex::encode(Sha256::digest(&bytes));

        let content = String::from_utf8_lossy(&bytes);
        let mut build_file = Self::parse(&content)?;
        build_file.digest = Some(digest);
        Ok(build_file)
    }

    /// Parse a build description from a TOML string
    pub fn parse(content: &str) -> Result<Self, BuildFileError> {
        let mut build_file: BuildFile = toml::from_str(content)?;

        // Table keys are the names; copy them into the entries.
        build_file.default_config.name = "main".to_string();
        for (name, build_type) in &mut build_file.build_types {
            build_type.name = name.clone();
        }
        for (name, flavor) in &mut build_file.flavors {
            flavor.name = name.clone();
        }

        build_file.validate()?;
        Ok(build_file)
    }

    fn validate(&self) -> Result<(), BuildFileError> {
        if self.build_types.keys().any(String::is_empty)
            || self.flavors.keys().any(String::is_empty)
        {
            return Err(BuildFileError::EmptyName);
        }

        for name in self.flavors.keys() {
            if self.build_types.contains_key(name) {
                return Err(BuildFileError::NameClash(name.clone()));
            }
        }

        Ok(())
    }

    /// Look up a build type by name
    pub fn build_type(&self, name: &str) -> Result<&BuildTypeConfig, BuildFileError> {
        self.build_types
            .get(name)
            .ok_or_else(|| BuildFileError::UnknownBuildType(name.to_string()))
    }

    /// Look up a flavor by name
    pub fn flavor(&self, name: &str) -> Result<&FlavorConfig, BuildFileError> {
        self.flavors
            .get(name)
            .ok_or_else(|| BuildFileError::UnknownFlavor(name.to_string()))
    }
}
