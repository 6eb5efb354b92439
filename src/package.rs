//! Package version resolution
//!
//! The generated manifest carries the version of the tooling package that
//! produced it. [`InstalledPackages`] reads it from Composer's installed
//! package list; [`FixedVersion`] supplies it directly, for callers that know
//! the version up front.

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The tooling package whose version identifies the generated manifest.
pub const TOOLING_PACKAGE: &str = "magento/ece-tools";

/// Composer's list of installed packages, relative to the root.
pub const INSTALLED_JSON: &str = "vendor/composer/installed.json";

/// Resolves the installed version of a package.
pub trait VersionResolver {
    /// # Errors
    ///
    /// Returns `Error::UndefinedPackage` when the package is unknown.
    fn version(&self, package: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct InstalledPackage {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

/// Composer 1.x writes a bare array, 2.x wraps it in `{"packages": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledJson {
    Wrapped { packages: Vec<InstalledPackage> },
    Bare(Vec<InstalledPackage>),
}

/// Versions from `vendor/composer/installed.json`.
pub struct InstalledPackages<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> InstalledPackages<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &Path) -> Self {
        Self {
            fs,
            path: root.join(INSTALLED_JSON),
        }
    }

    fn undefined(&self, package: &str, message: impl Into<String>) -> Error {
        Error::UndefinedPackage {
            package: package.to_string(),
            message: message.into(),
        }
    }
}

impl VersionResolver for InstalledPackages<'_> {
    fn version(&self, package: &str) -> Result<String> {
        if !self.fs.exists(&self.path) {
            return Err(self.undefined(
                package,
                format!("{} does not exist", self.path.display()),
            ));
        }

        let content = self.fs.read_to_string(&self.path)?;
        let installed: InstalledJson = serde_json::from_str(&content).map_err(|e| {
            self.undefined(
                package,
                format!("cannot parse {}: {}", self.path.display(), e),
            )
        })?;

        let packages = match installed {
            InstalledJson::Wrapped { packages } | InstalledJson::Bare(packages) => packages,
        };

        packages
            .into_iter()
            .find(|p| p.name == package)
            .and_then(|p| p.version)
            .ok_or_else(|| self.undefined(package, "package is not installed"))
    }
}

/// A resolver that answers with one version for every package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVersion(pub String);

impl VersionResolver for FixedVersion {
    fn version(&self, _package: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
