//! # Error Handling for CookbookFlow
//!
//! This module defines the error types for the cookbook build pipeline. The
//! `thiserror` crate is used to simplify error creation and ensure consistent
//! handling across the library.
//!
//! Every failure in CookbookFlow is a build-time failure: configuration
//! errors surface when the site configuration is loaded, validation errors
//! surface when a recipe document violates the collection schema, and output
//! errors surface while the stylesheet or pages are being written. All of
//! them halt the build; there is no runtime error path.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the CookbookFlow library.
pub type Result<T> = std::result::Result<T, BuildError>;

/// The main error type for CookbookFlow, encompassing all potential error cases.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Error related to site or theme configuration.
    ///
    /// Raised when the configuration file cannot be read or parsed, when a
    /// value is malformed (for example an invalid site URL), or when an
    /// unknown integration or theme preset is named.
    #[error("Configuration error: {message}.")]
    Config {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// A content document violated the collection schema.
    ///
    /// Reported per-document with the offending field, so the author can fix
    /// the front matter and rebuild.
    #[error("Validation error in field `{field}`: {message}")]
    Validation {
        /// The front-matter field that failed validation.
        field: String,
        /// Description of the violation and the expected shape.
        message: String,
        /// Path of the document that failed, when known.
        path: Option<PathBuf>,
    },

    /// Error in stylesheet or page output generation.
    #[error("Output generation error: {message} at {path:?}.")]
    OutputGeneration {
        /// Description of the output generation error.
        message: String,
        /// Path associated with the error.
        path: PathBuf,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    Io {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// General internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for BuildError {
    fn from(source: std::io::Error) -> Self {
        BuildError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl BuildError {
    /// Creates a `Config` error with a specific message and optional file path.
    pub fn config<S: Into<String>>(message: S, path: Option<PathBuf>) -> Self {
        BuildError::Config {
            message: message.into(),
            path,
        }
    }

    /// Creates a `Validation` error for a front-matter field.
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        BuildError::Validation {
            field: field.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Attaches a document path to a `Validation` error, leaving other
    /// variants untouched.
    #[must_use]
    pub fn with_document(self, document: PathBuf) -> Self {
        match self {
            BuildError::Validation { field, message, .. } => BuildError::Validation {
                field,
                message,
                path: Some(document),
            },
            other => other,
        }
    }

    /// Creates an `OutputGeneration` error with a message, path, and optional source.
    pub fn output_generation<S: Into<String>>(
        message: S,
        path: PathBuf,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        BuildError::OutputGeneration {
            message: message.into(),
            path,
            source,
        }
    }

    /// Wraps an IO error with the path it occurred at.
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        BuildError::Io { path, source }
    }

    /// Creates a general internal error with a custom message.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        BuildError::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = BuildError::config("unknown integration `vue`", None);
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown integration `vue`."
        );
    }

    #[test]
    fn test_validation_error_display_names_field() {
        let err = BuildError::validation("title", "missing required field");
        assert!(err.to_string().contains("`title`"));
        assert!(err.to_string().contains("missing required field"));
    }

    #[test]
    fn test_with_document_attaches_path() {
        let err = BuildError::validation("category", "expected text")
            .with_document(PathBuf::from("src/content/recipes/pie.md"));
        match err {
            BuildError::Validation { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("src/content/recipes/pie.md")));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_with_document_leaves_other_variants() {
        let err = BuildError::internal("boom").with_document(PathBuf::from("x"));
        assert!(matches!(err, BuildError::Internal(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BuildError = io.into();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
