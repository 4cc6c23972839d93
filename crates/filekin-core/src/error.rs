//! Error types for configuration loading and path transformation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for path transformations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors raised while loading, validating or compiling a link configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file type pattern or ignore pattern failed to compile.
    #[error("invalid regex `{pattern}` in {context}: {source}")]
    InvalidRegex {
        context: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Two file types share the same name.
    #[error("duplicate file type name: {name}")]
    DuplicateFileType { name: String },

    /// A file type was declared without a name.
    #[error("file type #{index} has an empty name")]
    EmptyFileTypeName { index: usize },

    /// A pattern designates a key group the regex does not define.
    #[error("pattern `{pattern}` of file type {file_type} has no capture group {group}")]
    MissingKeyGroup {
        file_type: String,
        pattern: String,
        group: String,
    },

    /// A creation pattern contains an invalid transformation step.
    #[error("creation pattern `{pattern}` of file type {file_type}: {source}")]
    CreationPattern {
        file_type: String,
        pattern: String,
        #[source]
        source: TransformError,
    },

    /// I/O error while reading a configuration file.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create an invalid-regex error for the given context.
    pub fn invalid_regex(
        context: impl Into<String>,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Self::InvalidRegex {
            context: context.into(),
            pattern: pattern.into(),
            source,
        }
    }
}

/// Errors raised while compiling or applying transformation steps.
///
/// These are configuration defects: a step that merely does not apply
/// (its test regex fails) is not an error.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A step's test or search regex failed to compile.
    #[error("invalid {role} regex `{pattern}`: {source}")]
    InvalidRegex {
        role: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A case format name is not one of the supported formats.
    #[error("unknown case format: {0}")]
    UnknownCaseFormat(String),

    /// A re-cased group does not exist in the search regex.
    #[error("search regex `{pattern}` has no capture group {group}")]
    MissingGroup { pattern: String, group: String },
}
