//! Module discovery and registration
//!
//! Every package found inside a cloned repository becomes a `path` repository
//! in the manifest. Where packages live depends on the repository's
//! [`RepoType`]; each layout has its own handler.

use super::{ManifestDocument, ManifestGenerator, MANIFEST_FILE};
use crate::error::{Error, Result};
use crate::merge::ANY_VERSION;
use crate::repository::{RepoOptions, RepoType};
use log::{debug, warn};
use serde_json::Value;
use std::path::{Component, Path};

/// Module packages of a modular repository.
const MODULE_CODE_GLOB: &str = "app/code/Magento/*";

/// Theme packages of a modular repository, one per area and theme.
const MODULE_DESIGN_GLOB: &str = "app/design/*/Magento/*";

/// Framework library root of a modular repository.
const FRAMEWORK_LIBRARY_DIR: &str = "lib/internal/Magento/Framework";

/// Framework library packages, registered only when the library exists.
const FRAMEWORK_LIBRARY_GLOB: &str = "lib/internal/Magento/Framework/*";

impl ManifestGenerator<'_> {
    /// Discover and register the packages of every repository.
    pub fn add_modules(
        &self,
        repo_options: &RepoOptions,
        manifest: &mut ManifestDocument,
    ) -> Result<()> {
        for (name, option) in repo_options.iter() {
            let repo_dir = self.root.join(name);
            match option.repo_type {
                RepoType::SinglePackage => self.add_single_package(&repo_dir, manifest)?,
                RepoType::FlatStructure => self.add_flat_structure(&repo_dir, manifest)?,
                RepoType::Modular => self.add_modular(&repo_dir, manifest)?,
            }
        }
        Ok(())
    }

    /// The repository root is the package. Its requirement is always `*`,
    /// whatever version it declares.
    fn add_single_package(&self, repo_dir: &Path, manifest: &mut ManifestDocument) -> Result<()> {
        self.add_module(repo_dir, manifest, Some(ANY_VERSION))
    }

    fn add_flat_structure(&self, repo_dir: &Path, manifest: &mut ManifestDocument) -> Result<()> {
        for dir in self.fs.glob_dirs(repo_dir, "*")? {
            self.add_module(&dir, manifest, None)?;
        }
        Ok(())
    }

    fn add_modular(&self, repo_dir: &Path, manifest: &mut ManifestDocument) -> Result<()> {
        let mut patterns = vec![MODULE_CODE_GLOB, MODULE_DESIGN_GLOB];
        if self.fs.is_dir(&repo_dir.join(FRAMEWORK_LIBRARY_DIR)) {
            patterns.push(FRAMEWORK_LIBRARY_GLOB);
        }

        for pattern in patterns {
            for dir in self.fs.glob_dirs(repo_dir, pattern)? {
                self.add_module(&dir, manifest, None)?;
            }
        }
        Ok(())
    }

    /// Register the package in `dir` as a path repository.
    ///
    /// Directories without a manifest are not packages and are skipped. The
    /// requirement is `version` if given, else the package's declared
    /// version, else `*`.
    pub fn add_module(
        &self,
        dir: &Path,
        manifest: &mut ManifestDocument,
        version: Option<&str>,
    ) -> Result<()> {
        let Some(package) = self.read_manifest(&dir.join(MANIFEST_FILE))? else {
            debug!("No {} in {}, skipping", MANIFEST_FILE, dir.display());
            return Ok(());
        };

        let Some(name) = package.get("name").and_then(Value::as_str) else {
            warn!(
                "{} in {} has no package name, skipping",
                MANIFEST_FILE,
                dir.display()
            );
            return Ok(());
        };

        let constraint = version
            .or_else(|| package.get("version").and_then(Value::as_str))
            .unwrap_or(ANY_VERSION);

        let url = self.relative_url(dir)?;
        debug!("Registering {} at {} ({})", name, url, constraint);
        manifest.register_path_package(name, &url, constraint);
        Ok(())
    }

    /// `dir` relative to the root, with forward slashes and no leading
    /// separator. `.` components on either side are ignored.
    fn relative_url(&self, dir: &Path) -> Result<String> {
        let mut parts = significant_components(dir);
        for root_part in significant_components(&self.root) {
            if parts.next() != Some(root_part) {
                return Err(Error::filesystem(
                    dir,
                    format!("not inside the deployment root {}", self.root.display()),
                ));
            }
        }

        Ok(parts
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"))
    }
}

fn significant_components(path: &Path) -> impl Iterator<Item = Component<'_>> {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
}
