//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Parameter not present in the setup
    #[error("parameter not found in setup: {0}")]
    ParameterNotFound(String),

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_and_source() {
        let err = ConfigError::read_file("/a/setup.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/setup.toml"), "got: {msg}");
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = ConfigError::write_file("/out/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/path"))
        );
    }

    #[test]
    fn create_dir_source_is_some() {
        let err = ConfigError::create_dir("/x", mock_io_err());
        assert!(err.source().is_some(), "CreateDir must expose I/O source");
    }

    #[test]
    fn parameter_not_found_display() {
        let err = ConfigError::ParameterNotFound("Smile".to_string());
        assert_eq!(err.to_string(), "parameter not found in setup: Smile");
        assert!(err.source().is_none());
    }

    #[test]
    fn validation_wraps_source() {
        let err = ConfigError::from(crate::validation::ValidationError::EmptyNamespace);
        assert!(err.to_string().starts_with("validation failed: "), "got: {err}");
    }
}
