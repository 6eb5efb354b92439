//! # Error Handling
//!
//! This module defines the centralized error type for `cloud-dev`. It uses the
//! `thiserror` library to describe every failure the library can surface.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Each variant carries the
//!   context needed to explain the failure (the offending path, the package
//!   name, a configuration hint).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Missing files are never errors in this crate. A repository without a
//! `composer.json`, or a deployment without `.magento.env.yaml`, is an ordinary
//! branch. Only a file that exists but cannot be read, or cannot be parsed,
//! becomes an `Error`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for cloud-dev operations
#[derive(Error, Debug)]
pub enum Error {
    /// A file exists but could not be read or written.
    #[error("Filesystem error for {}: {message}", path.display())]
    Filesystem { path: PathBuf, message: String },

    /// The version of a package could not be resolved.
    #[error("Undefined package {package}: {message}")]
    UndefinedPackage { package: String, message: String },

    /// The deployment configuration is missing a required section or has an
    /// unexpected shape.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A manifest file could not be parsed.
    #[error("Malformed manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Filesystem {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
