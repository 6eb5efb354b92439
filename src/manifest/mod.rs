//! # Development Manifest Generation
//!
//! This module builds the `composer.json` that assembles a development
//! environment out of several git repositories checked out side by side under
//! the deployment root.
//!
//! ## Generation Order
//!
//! [`ManifestGenerator::generate`] layers its sources with a fixed precedence,
//! each step overlaying the previous one (see [`crate::merge`]):
//!
//! 1.  The base document: fixed metadata, the framework path repository and
//!     the lifecycle scripts.
//! 2.  The root `composer.json`, if present. Its `require` and `repositories`
//!     entries win over the base. Without one, the tooling package is required
//!     at [`FALLBACK_TOOLING_CONSTRAINT`].
//! 3.  Each repository's `composer.json`, in table order, so the last
//!     repository wins on a shared dependency.
//! 4.  Framework and module requirements are pinned to `*`.
//! 5.  Packages found inside the repositories are registered as path
//!     repositories (see `modules.rs`).
//!
//! The finished document always satisfies two invariants: every
//! `repositories` key has a `require` entry, and every framework or module
//! requirement is `*`.

mod modules;
mod scripts;

pub use scripts::{
    install_from_git_scripts, prepare_packages_scripts, MKDIR_CONFIG_DIR, RSYNC_EXCLUDES,
};

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::merge::{overlay, overlay_all, pin_local_packages, ANY_VERSION};
use crate::package::{VersionResolver, TOOLING_PACKAGE};
use crate::repository::RepoOptions;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Manifest file name, at the root and in every package directory.
pub const MANIFEST_FILE: &str = "composer.json";

/// Tooling constraint used when the root has no manifest of its own.
pub const FALLBACK_TOOLING_CONSTRAINT: &str = "2002.0.*";

/// The framework package served from a local path.
pub const FRAMEWORK_PACKAGE: &str = "magento/framework";

/// Location of the framework package, relative to the root.
pub const FRAMEWORK_PATH: &str = "./magento2ce/lib/internal/Magento/Framework/";

/// Lifecycle scripts of the generated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Scripts {
    pub install_from_git: Vec<String>,
    pub prepare_packages: Vec<String>,
    pub pre_install_cmd: Vec<String>,
    pub pre_update_cmd: Vec<String>,
    pub post_install_cmd: Vec<String>,
}

/// The generated `composer.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestDocument {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub package_type: String,
    pub version: String,
    pub license: Vec<String>,
    /// Package name -> repository declaration
    pub repositories: Map<String, Value>,
    /// Package name -> version constraint
    pub require: Map<String, Value>,
    pub config: Map<String, Value>,
    pub autoload: Value,
    pub minimum_stability: String,
    pub prefer_stable: bool,
    pub extra: Map<String, Value>,
    pub scripts: Scripts,
}

impl ManifestDocument {
    /// Register a package served from `url` and require it at `constraint`.
    pub fn register_path_package(&mut self, name: &str, url: &str, constraint: &str) {
        self.repositories
            .insert(name.to_string(), path_repository(url));
        self.require
            .insert(name.to_string(), Value::String(constraint.to_string()));
    }

    /// Pin local packages and give every repository a requirement.
    pub fn enforce_invariants(&mut self) {
        pin_local_packages(&mut self.require);
        for name in self.repositories.keys() {
            if !self.require.contains_key(name) {
                self.require
                    .insert(name.clone(), Value::String(ANY_VERSION.to_string()));
            }
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// A `path` repository declaration with symlinking disabled, so Composer
/// copies the package into place.
pub fn path_repository(url: &str) -> Value {
    json!({
        "type": "path",
        "url": url,
        "options": {"symlink": false},
        "transport-options": {"symlink": false},
    })
}

/// Builds development manifests for the repositories under a root directory.
pub struct ManifestGenerator<'a> {
    fs: &'a dyn FileSystem,
    versions: &'a dyn VersionResolver,
    root: PathBuf,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        versions: &'a dyn VersionResolver,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            versions,
            root: root.into(),
        }
    }

    /// Generate the manifest for `repo_options`.
    ///
    /// # Errors
    ///
    /// - `Error::UndefinedPackage` if the tooling version cannot be resolved.
    /// - `Error::Filesystem` if a manifest exists but cannot be read.
    /// - `Error::Manifest` if a manifest exists but is not a JSON object.
    pub fn generate(&self, repo_options: &RepoOptions) -> Result<ManifestDocument> {
        let mut manifest = self.base_manifest(repo_options)?;

        let root_manifest_path = self.root.join(MANIFEST_FILE);
        match self.read_manifest(&root_manifest_path)? {
            Some(root_manifest) => {
                debug!("Merging root manifest {}", root_manifest_path.display());
                overlay(
                    &mut manifest.require,
                    &section(&root_manifest, "require", &root_manifest_path),
                );
                overlay(
                    &mut manifest.repositories,
                    &section(&root_manifest, "repositories", &root_manifest_path),
                );
            }
            None => {
                manifest.require.insert(
                    TOOLING_PACKAGE.to_string(),
                    Value::String(FALLBACK_TOOLING_CONSTRAINT.to_string()),
                );
            }
        }

        let mut repo_requirements = Vec::new();
        for name in repo_options.names() {
            let path = self.root.join(name).join(MANIFEST_FILE);
            if let Some(repo_manifest) = self.read_manifest(&path)? {
                debug!("Merging requirements of {}", path.display());
                repo_requirements.push(section(&repo_manifest, "require", &path));
            }
        }
        overlay_all(&mut manifest.require, &repo_requirements);

        pin_local_packages(&mut manifest.require);

        self.add_modules(repo_options, &mut manifest)?;
        manifest.enforce_invariants();

        Ok(manifest)
    }

    /// The fixed part of every generated manifest.
    pub fn base_manifest(&self, repo_options: &RepoOptions) -> Result<ManifestDocument> {
        let version = self.versions.version(TOOLING_PACKAGE)?;

        let mut repositories = Map::new();
        repositories.insert(FRAMEWORK_PACKAGE.to_string(), path_repository(FRAMEWORK_PATH));

        Ok(ManifestDocument {
            name: "magento/cloud-dev".to_string(),
            description: "eCommerce Platform for Growth".to_string(),
            package_type: "project".to_string(),
            version,
            license: vec!["OSL-3.0".to_string()],
            repositories,
            require: Map::new(),
            config: object(json!({"use-include-path": true})),
            autoload: json!({
                "psr-4": {
                    "Magento\\Setup\\": "setup/src/Magento/Setup/",
                    "Zend\\Mvc\\Controller\\": "setup/src/Zend/Mvc/Controller/"
                }
            }),
            minimum_stability: "dev".to_string(),
            prefer_stable: true,
            extra: object(json!({
                "magento-force": "override",
                "magento-deploystrategy": "copy"
            })),
            scripts: Scripts {
                install_from_git: install_from_git_scripts(repo_options),
                prepare_packages: prepare_packages_scripts(repo_options),
                pre_install_cmd: vec!["@install-from-git".to_string()],
                pre_update_cmd: vec!["@install-from-git".to_string()],
                post_install_cmd: vec!["@prepare-packages".to_string()],
            },
        })
    }

    /// Read and parse a manifest, or `None` if it does not exist.
    fn read_manifest(&self, path: &Path) -> Result<Option<Map<String, Value>>> {
        if !self.fs.exists(path) {
            return Ok(None);
        }

        let content = self.fs.read_to_string(path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| Error::Manifest {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// A mapping-valued section of a manifest; absent or non-mapping sections
/// read as empty.
fn section(manifest: &Map<String, Value>, key: &str, path: &Path) -> Map<String, Value> {
    match manifest.get(key) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            warn!(
                "'{}' in {} is not a mapping, ignoring it",
                key,
                path.display()
            );
            Map::new()
        }
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
