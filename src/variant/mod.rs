//! Variant configuration aggregate
//!
//! One `VariantConfig` describes one concrete build variant: a default
//! configuration plus build type plus zero or more flavors, with an optional
//! tested variant for test builds. It is built once, mutated only through
//! [`VariantConfig::add_flavor`], [`VariantConfig::set_dependencies`] and
//! [`VariantConfig::set_output`] during the configuration phase, and treated
//! as read-only afterwards. Derived state (merged flavor, flattened
//! dependency list) is recomputed eagerly on every mutation.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::build_type::{append_package_suffix, BuildTypeConfig};
use crate::dependency::{flatten, resource_dirs, DepHandle};
use crate::flavor::{merge_flavors, FlavorConfig};
use crate::manifest::{ManifestError, ManifestReader};
use crate::source_set::SourceSet;

/// Runner used for test variants when no flavor overrides one
pub const DEFAULT_TEST_RUNNER: &str = "android.test.InstrumentationTestRunner";

/// Suffix appended to the tested package when deriving a test package name
const TEST_PACKAGE_SUFFIX: &str = ".test";

/// What kind of variant a configuration describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// A plain application variant
    Default,
    /// A library variant; produces an artifact other variants can depend on
    Library,
    /// A test variant targeting a tested configuration
    Test,
}

/// Role-specific state. Keeps the `Test`-only tested reference and the
/// `Library`-only output artifact representable only where they are legal.
enum VariantRole {
    Default,
    Library { output: Option<DepHandle> },
    Test { tested: Arc<VariantConfig> },
}

/// Errors raised while constructing or resolving a variant configuration
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    /// Non-test variant whose default manifest does not exist
    #[error("main manifest missing from {path}")]
    MissingManifest { path: PathBuf },

    /// A tested library was used for dependency resolution before its
    /// output artifact was set
    #[error("tested library has no output artifact; call set_output on the tested variant first")]
    TestedOutputNotSet,

    /// `set_output` called on a variant that is not a library
    #[error("output artifact can only be set on a library variant")]
    OutputOnNonLibrary,

    /// Package name required but neither an override nor the manifest
    /// supplies one
    #[error("no package name for {manifest}: not overridden and not declared by the manifest")]
    UnresolvedPackageName { manifest: PathBuf },

    /// Manifest reader failure
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Effective configuration of one build variant
pub struct VariantConfig {
    default_flavor: FlavorConfig,
    default_sources: Arc<dyn SourceSet>,

    build_type: BuildTypeConfig,
    build_type_sources: Arc<dyn SourceSet>,

    /// Additional flavors, in addition order (last added wins)
    flavors: Vec<FlavorConfig>,
    flavor_sources: Vec<Arc<dyn SourceSet>>,

    role: VariantRole,

    /// All flavors folded over the default configuration
    merged_flavor: FlavorConfig,

    /// Plain jar dependencies; carried for downstream packaging, not merged
    /// into the compile classpath
    jar_dependencies: Vec<PathBuf>,

    /// Directly declared library dependencies
    direct_libraries: Vec<DepHandle>,

    /// Flat list in resource-overlay priority order (earlier overrides later)
    flat_libraries: Vec<DepHandle>,

    manifest_reader: Arc<dyn ManifestReader>,
}

impl VariantConfig {
    /// Create a plain application variant
    pub fn new(
        default_flavor: FlavorConfig,
        default_sources: Arc<dyn SourceSet>,
        build_type: BuildTypeConfig,
        build_type_sources: Arc<dyn SourceSet>,
        manifest_reader: Arc<dyn ManifestReader>,
    ) -> Result<Self, VariantError> {
        Self::with_role(
            default_flavor,
            default_sources,
            build_type,
            build_type_sources,
            VariantRole::Default,
            manifest_reader,
        )
    }

    /// Create a library variant. The output artifact is set later through
    /// [`VariantConfig::set_output`], once the build knows where it lands.
    pub fn library(
        default_flavor: FlavorConfig,
        default_sources: Arc<dyn SourceSet>,
        build_type: BuildTypeConfig,
        build_type_sources: Arc<dyn SourceSet>,
        manifest_reader: Arc<dyn ManifestReader>,
    ) -> Result<Self, VariantError> {
        Self::with_role(
            default_flavor,
            default_sources,
            build_type,
            build_type_sources,
            VariantRole::Library { output: None },
            manifest_reader,
        )
    }

    /// Create a test variant targeting `tested`
    pub fn test(
        default_flavor: FlavorConfig,
        default_sources: Arc<dyn SourceSet>,
        build_type: BuildTypeConfig,
        build_type_sources: Arc<dyn SourceSet>,
        tested: Arc<VariantConfig>,
        manifest_reader: Arc<dyn ManifestReader>,
    ) -> Result<Self, VariantError> {
        Self::with_role(
            default_flavor,
            default_sources,
            build_type,
            build_type_sources,
            VariantRole::Test { tested },
            manifest_reader,
        )
    }

    fn with_role(
        default_flavor: FlavorConfig,
        default_sources: Arc<dyn SourceSet>,
        build_type: BuildTypeConfig,
        build_type_sources: Arc<dyn SourceSet>,
        role: VariantRole,
        manifest_reader: Arc<dyn ManifestReader>,
    ) -> Result<Self, VariantError> {
        let merged_flavor = default_flavor.clone();

        let config = Self {
            default_flavor,
            default_sources,
            build_type,
            build_type_sources,
            flavors: Vec::new(),
            flavor_sources: Vec::new(),
            role,
            merged_flavor,
            jar_dependencies: Vec::new(),
            direct_libraries: Vec::new(),
            flat_libraries: Vec::new(),
            manifest_reader,
        };

        config.validate()?;
        Ok(config)
    }

    /// Structural validation at construction time.
    ///
    /// A non-test variant must have an existing default manifest file.
    /// Absent or empty overrides are all legal and not checked here.
    fn validate(&self) -> Result<(), VariantError> {
        if self.kind() != VariantKind::Test {
            let manifest = self.default_sources.manifest_path();
            if !manifest.is_file() {
                return Err(VariantError::MissingManifest {
                    path: manifest.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Add a configured flavor.
    ///
    /// Flavor priority is addition order: a later-added flavor supersedes
    /// earlier ones for overlapping fields, and its resources take
    /// precedence in [`VariantConfig::resource_inputs`].
    pub fn add_flavor(&mut self, flavor: FlavorConfig, sources: Arc<dyn SourceSet>) {
        self.flavors.push(flavor);
        self.flavor_sources.push(sources);
        self.merged_flavor = merge_flavors(&self.flavors, &self.default_flavor);

        tracing::debug!(
            flavor = %self.flavors[self.flavors.len() - 1].name,
            flavors = self.flavors.len(),
            "merged flavor recomputed"
        );
    }

    /// Set the plain jar dependencies
    pub fn set_jar_dependencies(&mut self, jars: Vec<PathBuf>) {
        self.jar_dependencies = jars;
    }

    /// Add directly declared library dependencies and recompute the flat
    /// list. Each library carries its own dependencies.
    pub fn set_dependencies(&mut self, direct: Vec<DepHandle>) -> Result<(), VariantError> {
        self.direct_libraries.extend(direct);
        self.flat_libraries = flatten(&self.full_direct_dependencies()?);
        Ok(())
    }

    /// Set the produced artifact of a library variant
    pub fn set_output(&mut self, output: DepHandle) -> Result<(), VariantError> {
        match &mut self.role {
            VariantRole::Library { output: slot } => {
                *slot = Some(output);
                Ok(())
            }
            _ => Err(VariantError::OutputOnNonLibrary),
        }
    }

    /// The effective direct-dependency list fed to the flattener.
    ///
    /// A test of a library merges in the tested side: this variant's own
    /// direct dependencies, then the tested library's output artifact, then
    /// the tested library's own direct dependencies, in that order.
    pub fn full_direct_dependencies(&self) -> Result<Vec<DepHandle>, VariantError> {
        if let VariantRole::Test { tested } = &self.role {
            if let VariantRole::Library { output } = &tested.role {
                let output = output.clone().ok_or(VariantError::TestedOutputNotSet)?;

                let mut combined =
                    Vec::with_capacity(self.direct_libraries.len() + tested.direct_libraries.len() + 1);
                combined.extend(self.direct_libraries.iter().cloned());
                combined.push(output);
                combined.extend(tested.direct_libraries.iter().cloned());
                return Ok(combined);
            }
        }

        Ok(self.direct_libraries.clone())
    }

    /// Resolved package name for this variant.
    ///
    /// Test variants use the merged flavor's test-package override when set.
    /// A test of a library shares the tested library's package outright; a
    /// test of an application derives its package as the tested package
    /// with a `.test` suffix. Other variants use the override-composed
    /// package name when available, otherwise the package declared by the
    /// default manifest.
    pub fn package_name(&self) -> Result<String, VariantError> {
        if let VariantRole::Test { tested } = &self.role {
            if let Some(test_package) = &self.merged_flavor.test_package_name {
                return Ok(test_package.clone());
            }
            let tested_package = tested.package_name()?;
            if tested.kind() == VariantKind::Library {
                return Ok(tested_package);
            }
            return Ok(format!("{}{}", tested_package, TEST_PACKAGE_SUFFIX));
        }

        match self.package_override()? {
            Some(package) => Ok(package),
            None => self.package_from_manifest(),
        }
    }

    /// Package name of the configuration under test.
    ///
    /// Only defined for test variants. A test of a library shares its
    /// package with the synthesized test application, so the library case
    /// returns this variant's own resolved package name.
    pub fn tested_package_name(&self) -> Result<Option<String>, VariantError> {
        let VariantRole::Test { tested } = &self.role else {
            return Ok(None);
        };

        let package = if tested.kind() == VariantKind::Library {
            self.package_name()?
        } else {
            tested.package_name()?
        };
        Ok(Some(package))
    }

    /// Package name coming purely from overrides, or `None` when neither
    /// the merged flavor nor the build-type suffix applies.
    ///
    /// When only a suffix is set, the base package is first read from the
    /// manifest and then suffixed.
    pub fn package_override(&self) -> Result<Option<String>, VariantError> {
        let mut package = self.merged_flavor.package_name.clone();

        if let Some(suffix) = self
            .build_type
            .package_name_suffix
            .as_deref()
            .filter(|suffix| !suffix.is_empty())
        {
            let base = match package {
                Some(base) => base,
                None => self.package_from_manifest()?,
            };
            package = Some(append_package_suffix(&base, suffix));
        }

        Ok(package)
    }

    /// Package name declared by the default manifest
    pub fn package_from_manifest(&self) -> Result<String, VariantError> {
        let manifest = self.default_sources.manifest_path();
        match self.manifest_reader.package(manifest) {
            Ok(package) if !package.is_empty() => Ok(package),
            Ok(_) | Err(ManifestError::MissingPackage { .. }) => {
                Err(VariantError::UnresolvedPackageName {
                    manifest: manifest.to_path_buf(),
                })
            }
            Err(err) => Err(VariantError::Manifest(err)),
        }
    }

    /// Instrumentation runner for the test variant
    pub fn instrumentation_runner(&self) -> &str {
        self.merged_flavor
            .test_instrumentation_runner
            .as_deref()
            .unwrap_or(DEFAULT_TEST_RUNNER)
    }

    /// Resource directories feeding overlay resolution, in priority order:
    /// build type, flavors in addition order, default sources, then the
    /// flattened library dependencies. Absent directories are skipped.
    pub fn resource_inputs(&self) -> Vec<PathBuf> {
        let mut inputs = Vec::new();

        if let Some(dir) = self.build_type_sources.resource_dir() {
            inputs.push(dir.to_path_buf());
        }

        for sources in &self.flavor_sources {
            if let Some(dir) = sources.resource_dir() {
                inputs.push(dir.to_path_buf());
            }
        }

        if let Some(dir) = self.default_sources.resource_dir() {
            inputs.push(dir.to_path_buf());
        }

        inputs.extend(resource_dirs(&self.flat_libraries));
        inputs
    }

    /// Compile classpath for this variant: the union of all source-set
    /// classpaths. A test of a library also pulls in the tested output
    /// artifact and the tested variant's own compile classpath.
    pub fn compile_classpath(&self) -> Result<HashSet<PathBuf>, VariantError> {
        let mut classpath: HashSet<PathBuf> = HashSet::new();

        classpath.extend(self.default_sources.compile_classpath().iter().cloned());
        classpath.extend(self.build_type_sources.compile_classpath().iter().cloned());
        for sources in &self.flavor_sources {
            classpath.extend(sources.compile_classpath().iter().cloned());
        }

        if let VariantRole::Test { tested } = &self.role {
            if let VariantRole::Library { output } = &tested.role {
                let output = output.as_ref().ok_or(VariantError::TestedOutputNotSet)?;
                classpath.insert(output.artifact_file().to_path_buf());
                classpath.extend(tested.compile_classpath()?);
            }
        }

        Ok(classpath)
    }

    /// Colon-joined package names of the flattened library dependencies, or
    /// `None` when there are no libraries
    pub fn library_packages(&self) -> Result<Option<String>, VariantError> {
        if self.flat_libraries.is_empty() {
            return Ok(None);
        }

        let mut packages = Vec::with_capacity(self.flat_libraries.len());
        for library in &self.flat_libraries {
            packages.push(self.manifest_reader.package(library.manifest_path())?);
        }
        Ok(Some(packages.join(":")))
    }

    /// Variant kind tag
    pub fn kind(&self) -> VariantKind {
        match self.role {
            VariantRole::Default => VariantKind::Default,
            VariantRole::Library { .. } => VariantKind::Library,
            VariantRole::Test { .. } => VariantKind::Test,
        }
    }

    /// The configuration under test, for test variants
    pub fn tested_config(&self) -> Option<&Arc<VariantConfig>> {
        match &self.role {
            VariantRole::Test { tested } => Some(tested),
            _ => None,
        }
    }

    /// Produced artifact of a library variant, once set
    pub fn output(&self) -> Option<&DepHandle> {
        match &self.role {
            VariantRole::Library { output } => output.as_ref(),
            _ => None,
        }
    }

    /// Default configuration layer
    pub fn default_flavor(&self) -> &FlavorConfig {
        &self.default_flavor
    }

    /// Default source set
    pub fn default_sources(&self) -> &Arc<dyn SourceSet> {
        &self.default_sources
    }

    /// Build type layer
    pub fn build_type(&self) -> &BuildTypeConfig {
        &self.build_type
    }

    /// Build type source set
    pub fn build_type_sources(&self) -> &Arc<dyn SourceSet> {
        &self.build_type_sources
    }

    /// All flavors folded over the default configuration
    pub fn merged_flavor(&self) -> &FlavorConfig {
        &self.merged_flavor
    }

    /// Additional flavors, in addition order
    pub fn flavors(&self) -> &[FlavorConfig] {
        &self.flavors
    }

    /// Source sets of the additional flavors, in addition order
    pub fn flavor_sources(&self) -> &[Arc<dyn SourceSet>] {
        &self.flavor_sources
    }

    /// Whether any additional flavor was added
    pub fn has_flavors(&self) -> bool {
        !self.flavors.is_empty()
    }

    /// Whether any library dependency was declared
    pub fn has_libraries(&self) -> bool {
        !self.direct_libraries.is_empty()
    }

    /// Directly declared library dependencies
    pub fn direct_libraries(&self) -> &[DepHandle] {
        &self.direct_libraries
    }

    /// Flattened library dependencies in resource-overlay priority order
    pub fn flat_libraries(&self) -> &[DepHandle] {
        &self.flat_libraries
    }

    /// Plain jar dependencies
    pub fn jar_dependencies(&self) -> &[PathBuf] {
        &self.jar_dependencies
    }
}
