//! # Deployment Configuration
//!
//! This module reads the deployment configuration file, `.magento.env.yaml`,
//! found at the deployment root. The file groups variables by stage:
//!
//! ```yaml
//! stage:
//!   global:
//!     DEPLOY_FROM_GIT_OPTIONS:
//!       repositories:
//!         ce:
//!           repo: git@github.com:magento/magento2.git
//!           branch: 2.4-develop
//!   deploy:
//!     SESSION_CONFIGURATION:
//!       save: files
//! ```
//!
//! ## Key Components
//!
//! - **`EnvConfig`**: The parsed file. A missing file is an empty
//!   configuration, not an error.
//! - **`StageConfig`**: The key-value view a consumer reads from. A
//!   `StageView` answers with the value from its own stage, then from
//!   `global`, then the variable's built-in default.
//! - **`DeployFromGitOptions`**: The typed `DEPLOY_FROM_GIT_OPTIONS` section
//!   that drives manifest generation.

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::repository::RepoOptions;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::Path;

/// File name of the deployment configuration, relative to the root.
pub const ENV_CONFIG_FILE: &str = ".magento.env.yaml";

/// Explicit session-storage configuration.
pub const VAR_SESSION_CONFIGURATION: &str = "SESSION_CONFIGURATION";

/// Repositories that make up a development environment.
pub const VAR_DEPLOY_FROM_GIT_OPTIONS: &str = "DEPLOY_FROM_GIT_OPTIONS";

/// Deployment stages that carry their own variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Global,
    Build,
    Deploy,
}

/// Key-value configuration for one stage.
pub trait StageConfig {
    /// The value of `key`, or the variable's default when unset.
    fn get(&self, key: &str) -> Value;
}

/// Built-in default for a configuration variable.
pub fn default_value(key: &str) -> Value {
    match key {
        VAR_SESSION_CONFIGURATION => json!({}),
        _ => Value::Null,
    }
}

#[derive(Debug, Default, Deserialize)]
struct EnvFile {
    stage: Option<Stages>,
}

#[derive(Debug, Default, Deserialize)]
struct Stages {
    global: Option<Map<String, Value>>,
    build: Option<Map<String, Value>>,
    deploy: Option<Map<String, Value>>,
}

/// Parsed `.magento.env.yaml`.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    global: Map<String, Value>,
    build: Map<String, Value>,
    deploy: Map<String, Value>,
}

impl EnvConfig {
    /// Load `.magento.env.yaml` from `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Filesystem` if the file exists but cannot be read and
    /// `Error::Yaml` if it is not valid YAML of the expected shape.
    pub fn load(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let path = root.join(ENV_CONFIG_FILE);
        if !fs.exists(&path) {
            debug!("{} not found, using empty configuration", path.display());
            return Ok(Self::default());
        }
        Self::parse(&fs.read_to_string(&path)?)
    }

    /// Parse the contents of a `.magento.env.yaml` file.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: Option<EnvFile> = serde_yaml::from_str(yaml_content)?;
        let stages = file.and_then(|f| f.stage).unwrap_or_default();

        Ok(Self {
            global: stages.global.unwrap_or_default(),
            build: stages.build.unwrap_or_default(),
            deploy: stages.deploy.unwrap_or_default(),
        })
    }

    /// View of a single stage.
    pub fn stage(&self, stage: Stage) -> StageView<'_> {
        StageView {
            config: self,
            stage,
        }
    }

    fn variables(&self, stage: Stage) -> &Map<String, Value> {
        match stage {
            Stage::Global => &self.global,
            Stage::Build => &self.build,
            Stage::Deploy => &self.deploy,
        }
    }

    /// The `DEPLOY_FROM_GIT_OPTIONS` section of the global stage.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` if the section is absent or malformed.
    pub fn deploy_from_git_options(&self) -> Result<DeployFromGitOptions> {
        let value = self.stage(Stage::Global).get(VAR_DEPLOY_FROM_GIT_OPTIONS);
        if value.is_null() {
            return Err(Error::ConfigParse {
                message: format!("{} is not configured", VAR_DEPLOY_FROM_GIT_OPTIONS),
                hint: Some(format!(
                    "Add '{}: {{repositories: ...}}' under stage.global in {}",
                    VAR_DEPLOY_FROM_GIT_OPTIONS, ENV_CONFIG_FILE
                )),
            });
        }

        serde_json::from_value(value).map_err(|e| Error::ConfigParse {
            message: format!("Invalid {}: {}", VAR_DEPLOY_FROM_GIT_OPTIONS, e),
            hint: Some("Each repository needs 'repo' and 'branch'".to_string()),
        })
    }
}

/// A stage-scoped view over [`EnvConfig`].
#[derive(Debug, Clone, Copy)]
pub struct StageView<'a> {
    config: &'a EnvConfig,
    stage: Stage,
}

impl StageConfig for StageView<'_> {
    fn get(&self, key: &str) -> Value {
        [self.stage, Stage::Global]
            .into_iter()
            .filter_map(|stage| self.config.variables(stage).get(key))
            .find(|value| !value.is_null())
            .cloned()
            .unwrap_or_else(|| default_value(key))
    }
}

impl StageConfig for Map<String, Value> {
    fn get(&self, key: &str) -> Value {
        Map::get(self, key)
            .cloned()
            .unwrap_or_else(|| default_value(key))
    }
}

/// The `DEPLOY_FROM_GIT_OPTIONS` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployFromGitOptions {
    /// Repositories to clone, in configuration order.
    #[serde(default)]
    pub repositories: RepoOptions,
}
