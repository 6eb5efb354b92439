//! # Cloud Development Tooling
//!
//! This library assembles development environments for cloud deployments out
//! of several git repositories, and derives the session storage settings a
//! deployment should use. It backs the `cloud-dev` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use cloud_dev::filesystem::MemoryFS;
//! use cloud_dev::manifest::ManifestGenerator;
//! use cloud_dev::package::FixedVersion;
//! use cloud_dev::repository::{RepoOption, RepoOptions};
//!
//! let mut fs = MemoryFS::new();
//! fs.add_file_string(
//!     "/app/ce/app/code/Magento/Store/composer.json",
//!     r#"{"name": "magento/module-store", "version": "101.0.0"}"#,
//! );
//!
//! let options: RepoOptions = [("ce", RepoOption::new("git@example.com:ce.git", "2.4-develop"))]
//!     .into_iter()
//!     .collect();
//!
//! let versions = FixedVersion("2002.1.0".to_string());
//! let generator = ManifestGenerator::new(&fs, &versions, "/app");
//! let manifest = generator.generate(&options).unwrap();
//!
//! assert_eq!(manifest.require["magento/module-store"], "*");
//! assert_eq!(
//!     manifest.repositories["magento/module-store"]["url"],
//!     "ce/app/code/Magento/Store"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Repository options (`repository`)**: The ordered table of git
//!   repositories that make up the environment.
//! - **Manifest generation (`manifest`)**: Builds the development
//!   `composer.json`, registering every package found in the repositories as
//!   a local path repository, plus the shell commands that fetch them.
//! - **Session configuration (`session`)**: Chooses between explicit session
//!   settings, the platform's redis service, and the platform default.
//! - **Collaborators (`filesystem`, `package`, `environment`, `config`)**:
//!   Traits for everything the two components read from outside, with real
//!   and in-memory implementations.

pub mod config;
pub mod environment;
pub mod error;
pub mod filesystem;
pub mod manifest;
pub mod merge;
pub mod package;
pub mod repository;
pub mod session;

#[cfg(test)]
mod merge_proptest;
