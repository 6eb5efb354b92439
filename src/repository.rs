//! # Repository Options
//!
//! The repository-options table names every git repository that makes up a
//! development environment, in the order they were configured:
//!
//! ```yaml
//! ce:
//!   repo: git@github.com:magento/magento2.git
//!   branch: 2.4-develop
//! fastly:
//!   repo: git@github.com:fastly/fastly-magento2.git
//!   branch: master
//!   type: single-package
//! ```
//!
//! The key is both the clone target directory and the repository name used
//! in generated scripts. Order is load-bearing: clone commands, `rm -rf`
//! arguments and last-repository-wins merging all follow it, so
//! [`RepoOptions`] keeps entries in source order instead of using a hash map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// How a repository lays out its packages on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoType {
    /// The repository root is itself one package.
    SinglePackage,
    /// Every immediate subdirectory of the root is a package.
    FlatStructure,
    /// Platform layout with packages under `app/code`, `app/design` and
    /// `lib/internal`.
    #[default]
    #[serde(alias = "default")]
    Modular,
}

/// One repository in the options table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOption {
    /// Source URL passed to `git clone`.
    pub repo: String,
    /// Branch to clone.
    pub branch: String,
    /// Package layout; absent means [`RepoType::Modular`].
    #[serde(rename = "type", default)]
    pub repo_type: RepoType,
}

impl RepoOption {
    pub fn new(repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            branch: branch.into(),
            repo_type: RepoType::default(),
        }
    }

    pub fn with_type(mut self, repo_type: RepoType) -> Self {
        self.repo_type = repo_type;
        self
    }
}

/// Repository name -> [`RepoOption`], in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoOptions {
    entries: Vec<(String, RepoOption)>,
}

impl RepoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository. Re-inserting a name replaces its option but keeps
    /// its original position.
    pub fn insert(&mut self, name: impl Into<String>, option: RepoOption) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = option,
            None => self.entries.push((name, option)),
        }
    }

    /// Iterate `(name, option)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RepoOption)> {
        self.entries
            .iter()
            .map(|(name, option)| (name.as_str(), option))
    }

    /// Repository names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, RepoOption)> for RepoOptions {
    fn from_iter<I: IntoIterator<Item = (N, RepoOption)>>(iter: I) -> Self {
        let mut options = RepoOptions::new();
        for (name, option) in iter {
            options.insert(name, option);
        }
        options
    }
}

impl Serialize for RepoOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, option) in &self.entries {
            map.serialize_entry(name, option)?;
        }
        map.end()
    }
}

struct RepoOptionsVisitor;

impl<'de> Visitor<'de> for RepoOptionsVisitor {
    type Value = RepoOptions;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping of repository name to {repo, branch, type}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut options = RepoOptions::new();
        while let Some((name, option)) = access.next_entry::<String, RepoOption>()? {
            options.insert(name, option);
        }
        Ok(options)
    }
}

impl<'de> Deserialize<'de> for RepoOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RepoOptionsVisitor)
    }
}
