//! CLI error types

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::SchemaError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty input")]
    EmptyInput,

    #[error("{0}")]
    Schema(#[from] SchemaError),
}

impl CliError {
    /// Stable code written in error responses
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CLI_CONFIG_ERROR",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::Json(_) | CliError::EmptyInput => "CLI_INVALID_INPUT",
            CliError::Schema(err) => err.code().code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            CliError::Schema(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Field path of a schema error, empty otherwise
    pub fn path(&self) -> &str {
        match self {
            CliError::Schema(err) => err.path(),
            _ => "",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CliError::EmptyInput.code(), "CLI_INVALID_INPUT");
        let err: CliError = io::Error::new(io::ErrorKind::Other, "closed").into();
        assert_eq!(err.code(), "CLI_IO_ERROR");
        let err: CliError = ConfigError::Invalid("x".into()).into();
        assert_eq!(err.code(), "CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_schema_error_passthrough() {
        let err: CliError = SchemaError::null_value().within("name").into();
        assert_eq!(err.code(), "SCHEMA_NULL_VIOLATION");
        assert_eq!(err.path(), "name");
        assert_eq!(err.message(), "value should not be null");
        assert!(err.to_string().contains("SCHEMA_NULL_VIOLATION"));
    }
}
