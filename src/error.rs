//! Error types for treemorph.
//!
//! The morph core itself never fails once it is running; errors only surface
//! while validating or loading the configuration that particles are generated
//! from.

use std::io;
use thiserror::Error;

/// Errors that can occur while configuring or generating a particle tree.
#[derive(Debug, Error)]
pub enum Error {
    /// A count, dimension or rate that must be positive and finite was not.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failed to read a configuration file.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] io::Error),

    /// A configuration file was not valid JSON for [`TreeConfig`](crate::TreeConfig).
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = Error::invalid("tree_height must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tree_height must be positive, got -1"
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
