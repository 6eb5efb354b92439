//! Shared test utilities for integration and E2E tests.
//!
//! This module provides fixtures and configuration snippets that lay out a
//! deployment root on disk: `.magento.env.yaml`, cloned repositories and
//! package manifests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_env_config(configs::TWO_REPOS);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common `.magento.env.yaml` snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Two modular repositories.
    pub const TWO_REPOS: &str = r#"
stage:
  global:
    DEPLOY_FROM_GIT_OPTIONS:
      repositories:
        a:
          repo: u1
          branch: b1
        b:
          repo: u2
          branch: b2
"#;

    /// One repository of every layout.
    pub const MIXED_LAYOUTS: &str = r#"
stage:
  global:
    DEPLOY_FROM_GIT_OPTIONS:
      repositories:
        magento2ce:
          repo: git@example.com:magento2ce.git
          branch: 2.4-develop
        inventory:
          repo: git@example.com:inventory.git
          branch: develop
          type: flat-structure
        fastly:
          repo: git@example.com:fastly.git
          branch: master
          type: single-package
"#;

    /// Explicit session configuration for the deploy stage.
    pub const EXPLICIT_SESSION: &str = r#"
stage:
  deploy:
    SESSION_CONFIGURATION:
      save: files
"#;

    /// No deployment options at all.
    pub const EMPTY: &str = "stage: {}\n";
}

/// A deployment root in a temporary directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.magento.env.yaml` with the given content.
    pub fn with_env_config(self, content: &str) -> Self {
        self.with_file(".magento.env.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a package manifest declaring `name` and optionally `version`.
    pub fn with_package(self, dir: &str, name: &str, version: Option<&str>) -> Self {
        let manifest = match version {
            Some(version) => serde_json::json!({"name": name, "version": version}),
            None => serde_json::json!({"name": name}),
        };
        self.with_file(&format!("{}/composer.json", dir), &manifest.to_string())
    }

    /// Add an empty directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read and parse the generated `composer.json`.
    pub fn manifest(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.path().join("composer.json"))
            .expect("Failed to read composer.json");
        serde_json::from_str(&content).expect("composer.json should be valid JSON")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cloud-dev");
        cmd.current_dir(self.path())
            .env_remove("CLOUD_DEV_ROOT")
            .env_remove("MAGENTO_CLOUD_RELATIONSHIPS")
            .env_remove("RUST_LOG")
            .env("CLOUD_DEV_TOOLING_VERSION", "2002.1.0");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_package() {
        let fixture = TestFixture::new().with_package("ce/Module", "vendor/module", Some("1.0.0"));
        let content = std::fs::read_to_string(fixture.path().join("ce/Module/composer.json")).unwrap();
        assert!(content.contains("vendor/module"));
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        let configs = [
            configs::TWO_REPOS,
            configs::MIXED_LAYOUTS,
            configs::EXPLICIT_SESSION,
            configs::EMPTY,
        ];

        for config in configs {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }
}
